use super::{CommentError, DelimiterPair};
use crate::buffer::{BufferError, CharRange, TextBuffer, is_line_terminator};
use crate::delta::TextDelta;

/// Strips the outer delimiters of a block comment.
///
/// Only the outer pair is removed; escape delimiters inserted by
/// [`NestedCommentInserter`](super::NestedCommentInserter) stay in the text.
pub struct NestedCommentRemover<'p> {
    pair: &'p DelimiterPair,
}

impl<'p> NestedCommentRemover<'p> {
    /// Create a remover for a delimiter pair.
    pub fn new(pair: &'p DelimiterPair) -> Self {
        Self { pair }
    }

    /// Remove the prefix at `comment.start` and, if the comment is terminated, the suffix that
    /// ends at `comment.end`. Delimiters alone on their line take the whole line with them.
    pub fn unwrap(
        &self,
        buffer: &mut TextBuffer,
        comment: CharRange,
        delta: &mut TextDelta,
    ) -> Result<(), CommentError> {
        buffer.check_range(comment)?;
        let prefix_len = self.pair.prefix_len();
        let suffix_len = self.pair.suffix_len();
        let ends_properly = comment.len() >= prefix_len + suffix_len
            && buffer.matches_at(comment.end - suffix_len, self.pair.suffix());

        let prefix_span = CharRange::new(
            comment.start,
            (comment.start + prefix_len).min(comment.end),
        );
        let prefix_span = whole_line_span(buffer, prefix_span);
        // The prefix line must not swallow the suffix (e.g. a suffix made of a line break).
        if ends_properly && prefix_span.end > comment.end - suffix_len {
            return Err(BufferError::InvalidRange {
                start: prefix_span.start,
                end: prefix_span.end,
                len: buffer.len_chars(),
            }
            .into());
        }
        let edit = buffer.delete(prefix_span)?;
        let shift = edit.deleted_len();
        delta.push(edit);

        if ends_properly {
            let suffix_end = comment.end - shift;
            let suffix_span = whole_line_span(
                buffer,
                CharRange::new(suffix_end - suffix_len, suffix_end),
            );
            delta.push(buffer.delete(suffix_span)?);
        }
        Ok(())
    }
}

/// Widen `span` to its whole line (terminator included) when only spaces and tabs surround it
/// on that line.
fn whole_line_span(buffer: &TextBuffer, span: CharRange) -> CharRange {
    let before = buffer.skip_blanks_backward(span.start);
    let at_line_start = before.is_none_or(|at| buffer.char_at(at).is_some_and(is_line_terminator));
    if !at_line_start {
        return span;
    }

    let len = buffer.len_chars();
    let after = buffer.skip_blanks_forward(span.end);
    let at_line_end = after == len || buffer.char_at(after).is_some_and(is_line_terminator);
    if !at_line_end {
        return span;
    }

    let start = before.map_or(0, |at| at + 1);
    let end = if after < len {
        if buffer.char_at(after) == Some('\r') && buffer.char_at(after + 1) == Some('\n') {
            after + 2
        } else {
            after + 1
        }
    } else {
        span.end
    };
    CharRange::new(start, end)
}
