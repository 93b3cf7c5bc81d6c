use super::{CommentError, DelimiterPair};
use crate::buffer::{CharRange, TextBuffer};
use crate::delta::{InsertionQueue, TextDelta};
use tracing::trace;

/// Where the outer delimiters go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapLayout {
    /// Delimiters are inserted directly at the range bounds.
    Inline,
    /// Delimiters get lines of their own, prefixed with `indent`.
    WholeLine {
        /// Indentation in front of each delimiter line.
        indent: String,
    },
}

/// Wraps a range in a block comment, escaping delimiters already present inside it so that the
/// new outer pair stays the only open/close pair spanning the range.
pub struct NestedCommentInserter<'p> {
    pair: &'p DelimiterPair,
}

impl<'p> NestedCommentInserter<'p> {
    /// Create an inserter for a delimiter pair.
    pub fn new(pair: &'p DelimiterPair) -> Self {
        Self { pair }
    }

    /// Returns `true` if `range` starts at a line start and ends at a line start or at the end
    /// of the buffer, i.e. it covers whole lines.
    pub fn is_whole_line(&self, buffer: &TextBuffer, range: CharRange) -> bool {
        let ends_on_boundary =
            range.end == buffer.len_chars() || (range.end > 0 && buffer.is_line_start(range.end));
        buffer.is_line_start(range.start) && ends_on_boundary
    }

    /// Wrap `range` and return the range of the new comment (outer prefix to outer suffix end,
    /// excluding indentation and line breaks added by [`WrapLayout::WholeLine`]).
    pub fn wrap(
        &self,
        buffer: &mut TextBuffer,
        range: CharRange,
        layout: &WrapLayout,
        delta: &mut TextDelta,
    ) -> Result<CharRange, CommentError> {
        let body: Vec<char> = buffer.slice(range)?.chars().collect();
        let (prefixes, suffixes) = scan_nested(
            &body,
            range.start,
            self.pair.trimmed_prefix(),
            self.pair.trimmed_suffix(),
        );

        let (outer_prefix, outer_suffix, lead) = match layout {
            WrapLayout::Inline => (
                self.pair.prefix().to_string(),
                self.pair.suffix().to_string(),
                0,
            ),
            WrapLayout::WholeLine { indent } => {
                let newline = buffer.line_ending().as_str();
                (
                    format!("{indent}{}{newline}", self.pair.prefix()),
                    format!("{indent}{}{newline}", self.pair.suffix()),
                    indent.chars().count(),
                )
            }
        };

        let escape_open = self.pair.trimmed_prefix();
        let escape_close = self.pair.trimmed_suffix();
        let close_len = escape_close.chars().count();

        let mut queue = InsertionQueue::new();
        queue.push(range.end, outer_suffix.as_str());

        // Escape nested delimiters from the tail so earlier offsets stay valid.
        let (mut i, mut j) = (prefixes.len(), suffixes.len());
        while i > 0 && j > 0 {
            let prefix_at = prefixes[i - 1];
            let suffix_at = suffixes[j - 1];
            if prefix_at > suffix_at {
                trace!(prefix_at, "closing before nested prefix");
                queue.push(prefix_at, escape_close);
                i -= 1;
            } else {
                trace!(suffix_at, "reopening after nested suffix");
                queue.push(suffix_at + close_len, escape_open);
                j -= 1;
            }
        }
        for &prefix_at in prefixes[..i].iter().rev() {
            queue.push(prefix_at, escape_close);
        }
        for &suffix_at in suffixes[..j].iter().rev() {
            queue.push(suffix_at + close_len, escape_open);
        }

        queue.push(range.start, outer_prefix.as_str());

        let inserted = queue.inserted_chars();
        let outer_suffix_len = outer_suffix.chars().count();
        queue.apply(buffer, delta)?;

        let start = range.start + lead;
        let outer_suffix_at = range.end + inserted - outer_suffix_len;
        Ok(CharRange::new(
            start,
            outer_suffix_at + lead + self.pair.suffix_len(),
        ))
    }
}

/// Offsets of literal `prefix` and `suffix` occurrences in `body` (shifted by `base`).
///
/// The prefix wins when both match at the same offset; matches never overlap.
fn scan_nested(
    body: &[char],
    base: usize,
    prefix: &str,
    suffix: &str,
) -> (Vec<usize>, Vec<usize>) {
    let prefix: Vec<char> = prefix.chars().collect();
    let suffix: Vec<char> = suffix.chars().collect();
    let matches = |pos: usize, pattern: &[char]| {
        !pattern.is_empty() && body.get(pos..pos + pattern.len()) == Some(pattern)
    };

    let mut prefixes = Vec::new();
    let mut suffixes = Vec::new();
    let mut pos = 0;
    while pos < body.len() {
        if matches(pos, &prefix) {
            prefixes.push(base + pos);
            pos += prefix.len();
        } else if matches(pos, &suffix) {
            suffixes.push(base + pos);
            pos += suffix.len();
        } else {
            pos += 1;
        }
    }
    (prefixes, suffixes)
}
