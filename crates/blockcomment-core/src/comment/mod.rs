//! Block comment toggling.
//!
//! # Overview
//!
//! [`BlockCommentToggler`] implements the "comment with block comment" editor action:
//!
//! 1. resolve the delimiter pair at the caret ([`resolve_delimiters`])
//! 2. detect an existing block comment around the caret ([`RangeDetector`])
//! 3. decide between commenting and uncommenting
//! 4. mutate the buffer ([`NestedCommentInserter`] / [`NestedCommentRemover`])
//! 5. report the new caret/selection plus a [`TextDelta`] of the applied edits
//!
//! Everything that depends on the host (languages, syntax trees, code style, write access) is
//! passed in through a [`SourceContext`], so the toggler itself holds no ambient state.
//!
//! # Example
//!
//! ```rust
//! use blockcomment_core::comment::{BlockCommentToggler, CaretState, SingleLanguage, SourceContext};
//! use blockcomment_core::{CommentConfig, TextBuffer};
//!
//! let languages = SingleLanguage::new("c", CommentConfig::block("/*", "*/"));
//! let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
//!
//! let mut buffer = TextBuffer::new("abc");
//! let state = CaretState::from_offset(&buffer, 1);
//! let outcome = toggler.toggle(&mut buffer, &state).unwrap();
//!
//! assert_eq!(buffer.text(), "a/**/bc");
//! assert_eq!(buffer.position_to_offset(outcome.caret), 3);
//! ```

mod detect;
mod indent;
mod insert;
mod lexer;
mod remove;
mod resolve;

pub use detect::{CommentFinder, LexicalDetector, RangeDetector, StructuredDetector};
pub use indent::{IndentProvider, MinLineIndent};
pub use insert::{NestedCommentInserter, WrapLayout};
pub use lexer::{CustomSyntaxLexer, Token, TokenKind};
pub use remove::NestedCommentRemover;
pub use resolve::{LanguageRegions, LanguageResolver, SingleLanguage, resolve_delimiters};

use crate::buffer::{BufferError, CharRange, TextBuffer};
use crate::commands::Position;
use crate::delta::{InsertionQueue, TextDelta};
use blockcomment_lang::{CommentConfig, CommentSettings, CustomSyntax};
use thiserror::Error;
use tracing::debug;

/// Errors produced by [`BlockCommentToggler::toggle`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("selection {start}..{end} is outside the buffer (length {len})")]
    /// The caller passed a linear selection that does not fit the buffer.
    SelectionOutOfBounds {
        /// Selection start.
        start: usize,
        /// Selection end (exclusive).
        end: usize,
        /// Buffer length in characters.
        len: usize,
    },

    #[error(transparent)]
    /// A computed offset fell outside the buffer.
    Buffer(#[from] BufferError),
}

/// A block comment prefix/suffix pair, e.g. `("/*", "*/")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterPair {
    prefix: String,
    suffix: String,
}

impl DelimiterPair {
    /// Create a pair; returns `None` if either delimiter is empty.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Option<Self> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        if prefix.is_empty() || suffix.is_empty() {
            return None;
        }
        Some(Self { prefix, suffix })
    }

    /// The block comment pair of a language config, if it has one.
    pub fn from_config(config: &CommentConfig) -> Option<Self> {
        let (prefix, suffix) = config.block_pair()?;
        Self::new(prefix, suffix)
    }

    /// Comment opening delimiter.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Comment closing delimiter.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Prefix length in characters.
    pub fn prefix_len(&self) -> usize {
        self.prefix.chars().count()
    }

    /// Suffix length in characters.
    pub fn suffix_len(&self) -> usize {
        self.suffix.chars().count()
    }

    /// Prefix without surrounding whitespace, as it appears when embedded in text.
    pub fn trimmed_prefix(&self) -> &str {
        self.prefix.trim()
    }

    /// Suffix without surrounding whitespace, as it appears when embedded in text.
    pub fn trimmed_suffix(&self) -> &str {
        self.suffix.trim()
    }
}

/// Rectangular (column) selection, inclusive on lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSelection {
    /// First selected line.
    pub start_line: usize,
    /// Last selected line (inclusive).
    pub end_line: usize,
    /// Left column.
    pub start_column: usize,
    /// Right column.
    pub end_column: usize,
}

impl BlockSelection {
    /// Build a block selection from two opposite corners.
    pub fn from_corners(anchor: Position, active: Position) -> Self {
        Self {
            start_line: anchor.line.min(active.line),
            end_line: anchor.line.max(active.line),
            start_column: anchor.column.min(active.column),
            end_column: anchor.column.max(active.column),
        }
    }
}

/// Shape of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionShape {
    /// Just a caret.
    #[default]
    None,
    /// A linear character range.
    Linear(CharRange),
    /// A rectangular selection.
    Block(BlockSelection),
}

/// Caret and selection at the moment the action is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretState {
    /// Logical caret position. The column may lie past the end of the line (virtual space).
    pub caret: Position,
    /// Current selection.
    pub selection: SelectionShape,
}

impl CaretState {
    /// A caret without selection.
    pub fn new(caret: Position) -> Self {
        Self {
            caret,
            selection: SelectionShape::None,
        }
    }

    /// A caret at a character offset, without selection.
    pub fn from_offset(buffer: &TextBuffer, offset: usize) -> Self {
        Self::new(buffer.offset_to_position(offset))
    }

    /// Attach a linear selection.
    pub fn with_selection(mut self, range: CharRange) -> Self {
        self.selection = SelectionShape::Linear(range);
        self
    }

    /// Attach a rectangular selection.
    pub fn with_block_selection(mut self, block: BlockSelection) -> Self {
        self.selection = SelectionShape::Block(block);
        self
    }

    /// The linear selection, if it is non-empty.
    pub fn linear_selection(&self) -> Option<CharRange> {
        match self.selection {
            SelectionShape::Linear(range) if !range.is_empty() => Some(range),
            _ => None,
        }
    }
}

/// Negotiates write access for a read-only buffer (e.g. a VCS checkout prompt).
pub trait WriteAccess {
    /// Try to make the document writable. Returns `true` on success.
    fn request_write_access(&self) -> bool;
}

impl<F> WriteAccess for F
where
    F: Fn() -> bool,
{
    fn request_write_access(&self) -> bool {
        self()
    }
}

/// Why the toggler left the buffer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No block comment delimiters are available at the caret.
    NoDelimiters,
    /// The buffer is read-only and write access was not granted.
    ReadOnly,
}

/// What the toggler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// A range was wrapped; `comment` spans the new outer delimiters.
    Commented {
        /// Range of the new comment, from the outer prefix to the end of the outer suffix.
        comment: CharRange,
        /// Whether the delimiters were placed on their own lines.
        whole_line: bool,
    },
    /// An existing comment (range before the edit) was unwrapped.
    Uncommented {
        /// The comment that was removed.
        comment: CharRange,
    },
    /// An empty `prefix + suffix` pair was inserted at the caret.
    InsertedEmpty {
        /// Offset of the inserted prefix.
        offset: usize,
    },
    /// Each line of a rectangular selection was wrapped.
    BlockCommented {
        /// Number of wrapped lines.
        lines: usize,
    },
    /// Nothing happened.
    Skipped(SkipReason),
}

/// Result of [`BlockCommentToggler::toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// What was done.
    pub action: ToggleAction,
    /// New caret position.
    pub caret: Position,
    /// New linear selection, if one survives the action.
    pub selection: Option<CharRange>,
    /// Edits applied to the buffer, in order.
    pub delta: TextDelta,
}

/// Host-provided collaborators for one toggle invocation.
#[derive(Clone, Copy)]
pub struct SourceContext<'a> {
    /// Language lookup and per-language comment tokens.
    pub languages: &'a dyn LanguageResolver,
    /// Set for freeform file types; switches detection to the lexical strategy.
    pub custom_syntax: Option<&'a CustomSyntax>,
    /// Structured comment lookup (syntax tree), used when there is no custom syntax.
    pub comment_finder: Option<&'a dyn CommentFinder>,
    /// Indentation for whole-line comments; defaults to [`MinLineIndent`].
    pub indent: Option<&'a dyn IndentProvider>,
    /// Code-style settings.
    pub settings: CommentSettings,
    /// Write-access negotiation for read-only buffers.
    pub write_access: Option<&'a dyn WriteAccess>,
}

impl<'a> SourceContext<'a> {
    /// A context with only a language resolver.
    pub fn new(languages: &'a dyn LanguageResolver) -> Self {
        Self {
            languages,
            custom_syntax: None,
            comment_finder: None,
            indent: None,
            settings: CommentSettings::default(),
            write_access: None,
        }
    }

    /// Treat the document as a custom file type.
    pub fn with_custom_syntax(mut self, syntax: &'a CustomSyntax) -> Self {
        self.custom_syntax = Some(syntax);
        self
    }

    /// Install a structured comment finder.
    pub fn with_comment_finder(mut self, finder: &'a dyn CommentFinder) -> Self {
        self.comment_finder = Some(finder);
        self
    }

    /// Override the indentation provider.
    pub fn with_indent_provider(mut self, indent: &'a dyn IndentProvider) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Set code-style settings.
    pub fn with_settings(mut self, settings: CommentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Install write-access negotiation.
    pub fn with_write_access(mut self, write_access: &'a dyn WriteAccess) -> Self {
        self.write_access = Some(write_access);
        self
    }

    /// The detection strategy for this source: lexical for custom syntaxes, structured
    /// otherwise.
    pub fn detector(&self) -> Detector<'a> {
        match self.custom_syntax {
            Some(syntax) => Detector::Lexical(LexicalDetector::new(syntax)),
            None => Detector::Structured(StructuredDetector::new(self.comment_finder)),
        }
    }
}

/// The detection strategy selected by [`SourceContext::detector`].
pub enum Detector<'a> {
    /// Lexer-based detection for custom file types.
    Lexical(LexicalDetector<'a>),
    /// Syntax-tree based detection.
    Structured(StructuredDetector<'a>),
}

impl RangeDetector for Detector<'_> {
    fn detect(&self, buffer: &TextBuffer, caret: usize, pair: &DelimiterPair) -> Option<CharRange> {
        match self {
            Detector::Lexical(detector) => detector.detect(buffer, caret, pair),
            Detector::Structured(detector) => detector.detect(buffer, caret, pair),
        }
    }
}

/// The block comment toggle action.
pub struct BlockCommentToggler<'a> {
    context: SourceContext<'a>,
}

impl<'a> BlockCommentToggler<'a> {
    /// Create a toggler over the given collaborators.
    pub fn new(context: SourceContext<'a>) -> Self {
        Self { context }
    }

    /// Comment or uncomment around the caret/selection.
    ///
    /// The buffer is only touched when the returned action is not [`ToggleAction::Skipped`].
    pub fn toggle(
        &self,
        buffer: &mut TextBuffer,
        state: &CaretState,
    ) -> Result<ToggleOutcome, CommentError> {
        if let SelectionShape::Linear(range) = state.selection {
            let len = buffer.len_chars();
            if range.start > range.end || range.end > len {
                return Err(CommentError::SelectionOutOfBounds {
                    start: range.start,
                    end: range.end,
                    len,
                });
            }
        }

        if buffer.is_read_only() {
            let granted = self
                .context
                .write_access
                .is_some_and(|access| access.request_write_access());
            if !granted {
                debug!("block comment skipped: buffer is read-only");
                return Ok(Self::skipped(state, SkipReason::ReadOnly));
            }
            buffer.set_read_only(false);
        }

        let caret_offset = buffer.position_to_offset(state.caret);
        let selection = state.linear_selection();
        let Some(pair) = resolve_delimiters(
            self.context.languages,
            self.context.custom_syntax,
            caret_offset,
            selection,
        ) else {
            debug!(caret_offset, "block comment skipped: no delimiters");
            return Ok(Self::skipped(state, SkipReason::NoDelimiters));
        };

        let detected = self.context.detector().detect(buffer, caret_offset, &pair);
        debug!(caret_offset, ?detected, ?selection, "block comment detection");

        match detected {
            Some(comment) => {
                let target = selection.unwrap_or(comment);
                if target.contains_range(&comment) || comment.contains_range(&target) {
                    self.uncomment(buffer, state, comment, &pair)
                } else {
                    self.comment_range(buffer, state, target, &pair)
                }
            }
            None => match state.selection {
                SelectionShape::Block(block) => self.comment_block(buffer, block, &pair),
                _ => match selection {
                    Some(range) => self.comment_range(buffer, state, range, &pair),
                    None => self.insert_empty(buffer, state.caret, &pair),
                },
            },
        }
    }

    fn skipped(state: &CaretState, reason: SkipReason) -> ToggleOutcome {
        ToggleOutcome {
            action: ToggleAction::Skipped(reason),
            caret: state.caret,
            selection: state.linear_selection(),
            delta: TextDelta::default(),
        }
    }

    fn comment_range(
        &self,
        buffer: &mut TextBuffer,
        state: &CaretState,
        range: CharRange,
        pair: &DelimiterPair,
    ) -> Result<ToggleOutcome, CommentError> {
        let inserter = NestedCommentInserter::new(pair);
        let whole_line = inserter.is_whole_line(buffer, range);
        let layout = if !whole_line {
            WrapLayout::Inline
        } else if self.context.settings.block_comment_at_first_column {
            WrapLayout::WholeLine {
                indent: String::new(),
            }
        } else {
            let first_line = buffer.offset_to_line(range.start);
            let last_line = buffer.offset_to_line(range.end.saturating_sub(1).max(range.start));
            let indent = match self.context.indent {
                Some(provider) => provider.indent_for_lines(buffer, first_line, last_line),
                None => MinLineIndent::new(self.context.settings.indent).indent_for_lines(
                    buffer, first_line, last_line,
                ),
            };
            WrapLayout::WholeLine { indent }
        };

        let mut delta = TextDelta::new(buffer.len_chars());
        let comment = inserter.wrap(buffer, range, &layout, &mut delta)?;

        let caret = if whole_line {
            Position::new(state.caret.line + 1, state.caret.column)
        } else {
            Position::new(state.caret.line, state.caret.column + pair.prefix_len())
        };
        let caret = buffer.offset_to_position(buffer.position_to_offset(caret));
        debug!(?range, ?comment, whole_line, "block comment inserted");

        Ok(ToggleOutcome {
            action: ToggleAction::Commented {
                comment,
                whole_line,
            },
            caret,
            selection: None,
            delta,
        })
    }

    fn uncomment(
        &self,
        buffer: &mut TextBuffer,
        state: &CaretState,
        comment: CharRange,
        pair: &DelimiterPair,
    ) -> Result<ToggleOutcome, CommentError> {
        let caret_offset = buffer.position_to_offset(state.caret);
        let mut delta = TextDelta::new(buffer.len_chars());
        NestedCommentRemover::new(pair).unwrap(buffer, comment, &mut delta)?;

        let caret = buffer.offset_to_position(delta.map_offset(caret_offset));
        let selection = state.linear_selection().map(|range| {
            CharRange::new(delta.map_offset(range.start), delta.map_offset(range.end))
        });
        debug!(?comment, "block comment removed");

        Ok(ToggleOutcome {
            action: ToggleAction::Uncommented { comment },
            caret,
            selection,
            delta,
        })
    }

    fn insert_empty(
        &self,
        buffer: &mut TextBuffer,
        caret: Position,
        pair: &DelimiterPair,
    ) -> Result<ToggleOutcome, CommentError> {
        let line = caret.line.min(buffer.line_count().saturating_sub(1));
        let line_len = buffer.line_len(line);
        let pad = caret.column.saturating_sub(line_len);
        let offset = buffer.line_start(line) + caret.column.min(line_len);

        let mut text = " ".repeat(pad);
        text.push_str(pair.prefix());
        text.push_str(pair.suffix());

        let mut delta = TextDelta::new(buffer.len_chars());
        delta.push(buffer.insert(offset, &text)?);

        let caret = buffer.offset_to_position(offset + pad + pair.prefix_len());
        Ok(ToggleOutcome {
            action: ToggleAction::InsertedEmpty {
                offset: offset + pad,
            },
            caret,
            selection: None,
            delta,
        })
    }

    fn comment_block(
        &self,
        buffer: &mut TextBuffer,
        block: BlockSelection,
        pair: &DelimiterPair,
    ) -> Result<ToggleOutcome, CommentError> {
        let last_line = block.end_line.min(buffer.line_count().saturating_sub(1));
        let targets: Vec<(usize, usize)> = (block.start_line..=last_line)
            .map(|line| (buffer.line_start(line), buffer.line_len(line)))
            .collect();

        let mut queue = InsertionQueue::new();
        for &(line_start, line_len) in &targets {
            let prefix_pad = block.start_column.saturating_sub(line_len);
            let suffix_pad = block
                .end_column
                .saturating_sub(line_len)
                .saturating_sub(prefix_pad);
            queue.push(
                line_start + block.end_column.min(line_len),
                format!("{}{}", " ".repeat(suffix_pad), pair.suffix()),
            );
        }
        for &(line_start, line_len) in &targets {
            let prefix_pad = block.start_column.saturating_sub(line_len);
            queue.push(
                line_start + block.start_column.min(line_len),
                format!("{}{}", " ".repeat(prefix_pad), pair.prefix()),
            );
        }

        let mut delta = TextDelta::new(buffer.len_chars());
        queue.apply(buffer, &mut delta)?;
        debug!(lines = targets.len(), "block selection commented");

        let caret_line = if targets.is_empty() {
            buffer.offset_to_line(buffer.len_chars())
        } else {
            last_line
        };
        let caret = buffer.offset_to_position(buffer.position_to_offset(Position::new(
            caret_line,
            block.start_column + pair.prefix_len(),
        )));

        Ok(ToggleOutcome {
            action: ToggleAction::BlockCommented {
                lines: targets.len(),
            },
            caret,
            selection: None,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn c_like() -> SingleLanguage {
        SingleLanguage::new("c", CommentConfig::block("/*", "*/"))
    }

    #[test]
    fn test_delimiter_pair_rejects_empty() {
        assert!(DelimiterPair::new("", "*/").is_none());
        assert!(DelimiterPair::new("/*", "").is_none());
        assert_eq!(
            DelimiterPair::new(" <!-- ", " -->").unwrap().trimmed_prefix(),
            "<!--"
        );
    }

    #[test]
    fn test_block_selection_from_corners_normalizes() {
        let block = BlockSelection::from_corners(Position::new(3, 7), Position::new(1, 2));
        assert_eq!(
            block,
            BlockSelection {
                start_line: 1,
                end_line: 3,
                start_column: 2,
                end_column: 7,
            }
        );
    }

    #[test]
    fn test_empty_linear_selection_counts_as_caret() {
        let state = CaretState::new(Position::new(0, 1)).with_selection(CharRange::empty(1));
        assert_eq!(state.linear_selection(), None);
    }

    #[test]
    fn test_caret_inside_comment_uncomments() {
        let languages = c_like();
        let finder = |_: &TextBuffer, offset: usize| {
            (offset < 9).then_some(CharRange::new(0, 9))
        };
        let toggler =
            BlockCommentToggler::new(SourceContext::new(&languages).with_comment_finder(&finder));
        let mut buffer = TextBuffer::new("/*hello*/");
        let caret = CaretState::from_offset(&buffer, 4);
        let outcome = toggler
            .toggle(&mut buffer, &caret)
            .unwrap();

        assert_eq!(buffer.text(), "hello");
        assert_eq!(
            outcome.action,
            ToggleAction::Uncommented {
                comment: CharRange::new(0, 9)
            }
        );
        assert_eq!(outcome.caret, Position::new(0, 2));
    }

    #[test]
    fn test_missing_delimiters_is_a_no_op() {
        let languages = SingleLanguage::new("py", CommentConfig::line("#"));
        let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
        let mut buffer = TextBuffer::new("x = 1");
        let caret = CaretState::from_offset(&buffer, 2);
        let outcome = toggler
            .toggle(&mut buffer, &caret)
            .unwrap();

        assert_eq!(outcome.action, ToggleAction::Skipped(SkipReason::NoDelimiters));
        assert_eq!(buffer.text(), "x = 1");
        assert!(outcome.delta.is_empty());
    }

    #[test]
    fn test_read_only_without_access_is_skipped() {
        let languages = c_like();
        let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
        let mut buffer = TextBuffer::new("abc");
        buffer.set_read_only(true);
        let caret = CaretState::from_offset(&buffer, 1);
        let outcome = toggler
            .toggle(&mut buffer, &caret)
            .unwrap();

        assert_eq!(outcome.action, ToggleAction::Skipped(SkipReason::ReadOnly));
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_read_only_with_granted_access_proceeds() {
        let languages = c_like();
        let grant = || true;
        let toggler =
            BlockCommentToggler::new(SourceContext::new(&languages).with_write_access(&grant));
        let mut buffer = TextBuffer::new("abc");
        buffer.set_read_only(true);
        let caret = CaretState::from_offset(&buffer, 1);
        toggler
            .toggle(&mut buffer, &caret)
            .unwrap();

        assert_eq!(buffer.text(), "a/**/bc");
        assert!(!buffer.is_read_only());
    }

    #[test]
    fn test_selection_out_of_bounds_is_an_error() {
        let languages = c_like();
        let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
        let mut buffer = TextBuffer::new("abc");
        let state = CaretState::from_offset(&buffer, 1).with_selection(CharRange::new(1, 7));
        let err = toggler.toggle(&mut buffer, &state).unwrap_err();

        assert_eq!(
            err,
            CommentError::SelectionOutOfBounds {
                start: 1,
                end: 7,
                len: 3
            }
        );
    }

    #[test]
    fn test_caret_in_virtual_space_is_padded() {
        let languages = c_like();
        let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
        let mut buffer = TextBuffer::new("ab\ncd");
        let outcome = toggler
            .toggle(&mut buffer, &CaretState::new(Position::new(0, 4)))
            .unwrap();

        assert_eq!(buffer.text(), "ab  /**/\ncd");
        assert_eq!(outcome.caret, Position::new(0, 6));
        assert_eq!(outcome.action, ToggleAction::InsertedEmpty { offset: 4 });
    }
}
