//! Structured text change deltas.
//!
//! Incremental consumers (LSP sync, incremental parsing, caret tracking) need **structured
//! edits** without diffing old/new text. This module defines a small, UI-agnostic delta format
//! expressed in **character offsets** (Unicode scalar values), plus the back-to-front
//! insertion queue the comment toggler uses to apply many insertions computed against one
//! snapshot of the buffer.

use crate::buffer::{BufferError, TextBuffer};

/// A single text edit expressed in character offsets.
///
/// Semantics:
/// - `start` is a character offset in the document **at the time this edit is applied**.
/// - The deleted range is defined by the length (in `char`s) of `deleted_text`.
/// - Edits inside a [`TextDelta`] must be applied **in order** to transform the "before" document
///   into the "after" document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDeltaEdit {
    /// Start character offset of the edit.
    pub start: usize,
    /// Exact deleted text (may be empty).
    pub deleted_text: String,
    /// Exact inserted text (may be empty).
    pub inserted_text: String,
}

impl TextDeltaEdit {
    /// Length of `deleted_text` in characters.
    pub fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    /// Length of `inserted_text` in characters.
    pub fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }

    /// Exclusive end character offset in the pre-edit document.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.deleted_len())
    }

    /// Map an offset of the pre-edit document into the post-edit document.
    ///
    /// Offsets inside the deleted text collapse to `start`; an offset equal to `start` stays in
    /// front of inserted text.
    pub fn map_offset(&self, offset: usize) -> usize {
        if offset <= self.start {
            return offset;
        }
        let end = self.end();
        if offset < end {
            return self.start;
        }
        offset - self.deleted_len() + self.inserted_len()
    }
}

/// A structured description of a document text change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDelta {
    /// Character count before applying `edits`.
    pub before_char_count: usize,
    /// Character count after applying `edits`.
    pub after_char_count: usize,
    /// Ordered list of edits that transforms the "before" document into the "after" document.
    pub edits: Vec<TextDeltaEdit>,
}

impl TextDelta {
    /// Start recording a delta against a buffer of `before_char_count` characters.
    pub fn new(before_char_count: usize) -> Self {
        Self {
            before_char_count,
            after_char_count: before_char_count,
            edits: Vec::new(),
        }
    }

    /// Returns `true` if this delta contains no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Record an applied edit.
    pub fn push(&mut self, edit: TextDeltaEdit) {
        self.after_char_count = self.after_char_count + edit.inserted_len() - edit.deleted_len();
        self.edits.push(edit);
    }

    /// Map an offset of the "before" document through every edit, in order.
    pub fn map_offset(&self, offset: usize) -> usize {
        self.edits
            .iter()
            .fold(offset, |offset, edit| edit.map_offset(offset))
    }
}

/// An insertion computed against the buffer as it was before any queued insertion ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInsertion {
    /// Character offset in the original buffer.
    pub offset: usize,
    /// Text to insert.
    pub text: String,
}

/// Collects [`PendingInsertion`]s and applies them back-to-front.
///
/// Applying in descending offset order keeps every not-yet-applied offset valid. Among
/// insertions at the same offset, the one queued first is applied first and therefore ends up
/// *after* the ones queued later.
#[derive(Debug, Clone, Default)]
pub struct InsertionQueue {
    pending: Vec<PendingInsertion>,
}

impl InsertionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `text` at `offset` (original-buffer coordinates).
    pub fn push(&mut self, offset: usize, text: impl Into<String>) {
        self.pending.push(PendingInsertion {
            offset,
            text: text.into(),
        });
    }

    /// Number of queued insertions.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total number of characters that will be inserted.
    pub fn inserted_chars(&self) -> usize {
        self.pending.iter().map(|p| p.text.chars().count()).sum()
    }

    /// Apply all insertions to `buffer`, recording them into `delta`.
    ///
    /// Offsets are validated up front so a bad offset leaves the buffer untouched.
    pub fn apply(
        mut self,
        buffer: &mut TextBuffer,
        delta: &mut TextDelta,
    ) -> Result<(), BufferError> {
        for pending in &self.pending {
            buffer.check_offset(pending.offset)?;
        }

        // Stable sort: equal offsets keep their queue order.
        self.pending.sort_by_key(|p| std::cmp::Reverse(p.offset));

        for pending in self.pending {
            if pending.text.is_empty() {
                continue;
            }
            let edit = buffer.insert(pending.offset, &pending.text)?;
            delta.push(edit);
        }
        Ok(())
    }
}
