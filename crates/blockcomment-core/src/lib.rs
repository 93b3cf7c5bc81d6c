#![warn(missing_docs)]
//! Block Comment Core - Headless "Comment with Block Comment" Kernel
//!
//! # Overview
//!
//! `blockcomment-core` implements the editor action that wraps a selection in a block comment
//! (`/* ... */`, `<!-- ... -->`, ...) or, when the caret/selection is already inside one, removes
//! it again. It does not render anything and does not know about files or languages by itself:
//! the host plugs in language lookup, syntax-tree comment lookup and code-style settings.
//!
//! # Core Features
//!
//! - **Nesting safety**: delimiters already inside the commented range are escaped so the new
//!   comment never closes early
//! - **Whole-line layout**: full-line selections get their delimiters on lines of their own,
//!   indented like the wrapped code
//! - **Rectangular selections**: every line of a column selection is wrapped, padding virtual
//!   space as needed
//! - **Dual detection**: syntax-tree lookup for real languages, a lexer for custom file types
//! - **Structured deltas**: every action reports a [`TextDelta`] of the edits it applied
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Command Interface (CommandExecutor)        │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  BlockCommentToggler                        │  ← Decide & reposition
//! ├─────────────────────────────────────────────┤
//! │  Detectors / Inserter / Remover / Resolvers │  ← Comment logic
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (Rope) + InsertionQueue         │  ← Text storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use blockcomment_core::{Command, CommandExecutor, CommentConfig, CursorCommand, EditCommand, Position};
//!
//! let mut executor = CommandExecutor::new("foo\nbar\n");
//!
//! executor.execute(Command::Cursor(CursorCommand::SetSelection {
//!     start: Position::new(0, 0),
//!     end: Position::new(2, 0),
//! })).unwrap();
//! executor.execute(Command::Edit(EditCommand::ToggleBlockComment {
//!     config: CommentConfig::block("/*", "*/"),
//! })).unwrap();
//!
//! assert_eq!(executor.editor().get_text(), "/*\nfoo\nbar\n*/\n");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Rope based text buffer addressed by character offsets
//! - [`delta`] - Structured text deltas and the back-to-front insertion queue
//! - [`comment`] - Detection, decision, insertion and removal of block comments
//! - [`commands`] - Unified command interface
//!
//! # Logging
//!
//! Decisions are reported through [`tracing`] at `debug` level and individual escape insertions
//! at `trace` level. The library never installs a subscriber.

pub mod buffer;
pub mod commands;
pub mod comment;
pub mod delta;

pub use blockcomment_lang::{CommentConfig, CommentSettings, CustomSyntax, IndentStyle};
pub use buffer::{BufferError, CharRange, LineEnding, TextBuffer};
pub use commands::{
    Command, CommandError, CommandExecutor, CommandResult, CursorCommand, EditCommand, EditorCore,
    Position, Selection, SelectionDirection,
};
pub use comment::{
    BlockCommentToggler, BlockSelection, CaretState, CommentError, DelimiterPair, SkipReason,
    SourceContext, ToggleAction, ToggleOutcome,
};
pub use delta::{InsertionQueue, PendingInsertion, TextDelta, TextDeltaEdit};
