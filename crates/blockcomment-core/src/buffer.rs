//! Text Buffer
//!
//! Rope-backed text storage addressed by **character offsets** (Unicode scalar values).
//! Line terminators are `'\n'`, `'\r'` and `"\r\n"`; the terminator is not part of a line's
//! text.

use crate::commands::Position;
use crate::delta::TextDeltaEdit;
use ropey::Rope;
use thiserror::Error;

/// Errors produced by [`TextBuffer`] mutations and range checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("offset {offset} is outside the buffer (length {len})")]
    /// An offset pointed past the end of the buffer.
    OffsetOutOfBounds {
        /// Offending character offset.
        offset: usize,
        /// Buffer length in characters.
        len: usize,
    },

    #[error("invalid range {start}..{end} (buffer length {len})")]
    /// A range was reversed or extended past the end of the buffer.
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Buffer length in characters.
        len: usize,
    },

    #[error("buffer is read-only")]
    /// The buffer refused a mutation.
    ReadOnly,
}

/// Newline sequence used for lines the engine inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
}

impl LineEnding {
    /// Detect the dominant line ending: [`LineEnding::Crlf`] if the text contains any `"\r\n"`,
    /// otherwise [`LineEnding::Lf`].
    pub fn detect(chars: impl IntoIterator<Item = char>) -> Self {
        let mut after_cr = false;
        for ch in chars {
            if after_cr && ch == '\n' {
                return Self::Crlf;
            }
            after_cr = ch == '\r';
        }
        Self::Lf
    }

    /// The newline sequence.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CharRange {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl CharRange {
    /// Create a range. `start` must not be greater than `end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "reversed range {start}..{end}");
        Self { start, end }
    }

    /// An empty range at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `other` lies entirely inside `self` (bounds included).
    pub fn contains_range(&self, other: &CharRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

pub(crate) fn is_line_terminator(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

fn is_blank(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Mutable, offset-addressable text.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    read_only: bool,
}

impl TextBuffer {
    /// Build a buffer from text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            read_only: false,
        }
    }

    /// Get complete text
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Total character count
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Whether mutations are currently refused.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Mark the buffer read-only (or writable again).
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Character at `offset`, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }

    /// Validate a range against the current buffer length.
    pub fn check_range(&self, range: CharRange) -> Result<(), BufferError> {
        let len = self.len_chars();
        if range.start > range.end || range.end > len {
            return Err(BufferError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    /// Validate an offset against the current buffer length.
    pub fn check_offset(&self, offset: usize) -> Result<(), BufferError> {
        let len = self.len_chars();
        if offset > len {
            return Err(BufferError::OffsetOutOfBounds { offset, len });
        }
        Ok(())
    }

    /// Text of a range.
    pub fn slice(&self, range: CharRange) -> Result<String, BufferError> {
        self.check_range(range)?;
        Ok(self.rope.slice(range.start..range.end).to_string())
    }

    /// Insert `text` at `offset` and return the applied edit.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<TextDeltaEdit, BufferError> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        self.check_offset(offset)?;
        if !text.is_empty() {
            self.rope.insert(offset, text);
        }
        Ok(TextDeltaEdit {
            start: offset,
            deleted_text: String::new(),
            inserted_text: text.to_string(),
        })
    }

    /// Delete a range and return the applied edit.
    pub fn delete(&mut self, range: CharRange) -> Result<TextDeltaEdit, BufferError> {
        if self.read_only {
            return Err(BufferError::ReadOnly);
        }
        let deleted_text = self.slice(range)?;
        if !range.is_empty() {
            self.rope.remove(range.start..range.end);
        }
        Ok(TextDeltaEdit {
            start: range.start,
            deleted_text,
            inserted_text: String::new(),
        })
    }

    /// Returns `true` if `pattern` occurs literally at `offset`.
    ///
    /// Never fails: a pattern running past the end of the buffer simply does not match.
    pub fn matches_at(&self, offset: usize, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        let pattern_len = pattern.chars().count();
        if offset + pattern_len > self.len_chars() {
            return false;
        }
        self.rope
            .chars_at(offset)
            .zip(pattern.chars())
            .all(|(a, b)| a == b)
    }

    /// Start offset of the last occurrence of `pattern` that starts at or before `from`.
    pub fn last_index_of(&self, pattern: &str, from: usize) -> Option<usize> {
        let pattern_len = pattern.chars().count();
        if pattern_len == 0 || pattern_len > self.len_chars() {
            return None;
        }
        let last_start = from.min(self.len_chars() - pattern_len);
        (0..=last_start)
            .rev()
            .find(|&offset| self.matches_at(offset, pattern))
    }

    /// Scan backwards from `offset - 1` over spaces and tabs.
    ///
    /// Returns the offset of the first other character, or `None` if the scan ran off the
    /// start of the buffer.
    pub fn skip_blanks_backward(&self, offset: usize) -> Option<usize> {
        let mut pos = offset.min(self.len_chars());
        while pos > 0 {
            pos -= 1;
            match self.rope.get_char(pos) {
                Some(ch) if is_blank(ch) => continue,
                _ => return Some(pos),
            }
        }
        None
    }

    /// Scan forward from `offset` over spaces and tabs and return the first other offset
    /// (which may be the buffer length).
    pub fn skip_blanks_forward(&self, offset: usize) -> usize {
        let len = self.len_chars();
        let mut pos = offset.min(len);
        while pos < len && self.rope.get_char(pos).is_some_and(is_blank) {
            pos += 1;
        }
        pos
    }

    /// Returns `true` if `offset` is 0 or directly follows a line terminator.
    ///
    /// The offset between the `'\r'` and `'\n'` of a `"\r\n"` pair is not a line start.
    pub fn is_line_start(&self, offset: usize) -> bool {
        if offset == 0 {
            return true;
        }
        match self.rope.get_char(offset - 1) {
            Some('\r') => self.rope.get_char(offset) != Some('\n'),
            Some(ch) => is_line_terminator(ch),
            None => false,
        }
    }

    /// The newline sequence new lines in this buffer should use.
    pub fn line_ending(&self) -> LineEnding {
        LineEnding::detect(self.rope.chars())
    }

    /// Total line count (an empty buffer has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Character offset of the first character of `line` (buffer length if out of range).
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Length of `line` in characters, excluding its terminator.
    pub fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
        }
        if len > 0 && slice.char(len - 1) == '\r' {
            len -= 1;
        }
        len
    }

    /// Text of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let start = self.line_start(line);
        Some(self.rope.slice(start..start + self.line_len(line)).to_string())
    }

    /// Line number containing `offset` (clamped to the buffer).
    pub fn offset_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.len_chars()))
    }

    /// Logical position of a character offset (clamped to the buffer).
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Character offset of a logical position; the line and column are clamped.
    pub fn position_to_offset(&self, position: Position) -> usize {
        let line = position.line.min(self.line_count().saturating_sub(1));
        self.line_start(line) + position.column.min(self.line_len(line))
    }

    /// Convert a character offset to a UTF-8 byte offset (clamped).
    pub fn char_to_byte(&self, offset: usize) -> usize {
        self.rope.char_to_byte(offset.min(self.len_chars()))
    }

    /// Convert a UTF-8 byte offset to a character offset (clamped).
    pub fn byte_to_char(&self, byte: usize) -> usize {
        self.rope.byte_to_char(byte.min(self.rope.len_bytes()))
    }
}
