//! Editor commands.
//!
//! Frontends drive the engine by sending [`Command`] values to a [`CommandExecutor`].
//!
//! # Overview
//!
//! The command layer wraps a [`TextBuffer`] plus caret/selection state and routes editor actions
//! through a single [`CommandExecutor::execute`] entry point:
//!
//! - **Text Editing**: insert and delete text, toggle block comments
//! - **Cursor Operations**: move the caret, set linear or rectangular selections
//!
//! The block comment action needs host collaborators (language lookup, a syntax-tree comment
//! finder, write access). They are installed on the executor once and handed to the
//! [`BlockCommentToggler`] on every toggle.
//!
//! # Example
//!
//! ```rust
//! use blockcomment_core::{Command, CommandExecutor, CommentConfig, CursorCommand, EditCommand};
//!
//! let mut executor = CommandExecutor::new("let x = 1;");
//!
//! executor.execute(Command::Cursor(CursorCommand::SetSelection {
//!     start: blockcomment_core::Position::new(0, 4),
//!     end: blockcomment_core::Position::new(0, 5),
//! })).unwrap();
//! executor.execute(Command::Edit(EditCommand::ToggleBlockComment {
//!     config: CommentConfig::block("/*", "*/"),
//! })).unwrap();
//!
//! assert_eq!(executor.editor().get_text(), "let /*x*/ = 1;");
//! ```

use crate::buffer::{BufferError, CharRange, TextBuffer};
use crate::comment::{
    BlockCommentToggler, BlockSelection, CaretState, CommentError, CommentFinder,
    LanguageResolver, SingleLanguage, SourceContext, ToggleAction, WriteAccess,
};
use crate::delta::TextDelta;
use blockcomment_lang::{CommentConfig, CommentSettings, CustomSyntax};
use std::cmp::Ordering;
use thiserror::Error;

/// A caret position: zero-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the logical line.
    pub column: usize,
}

impl Position {
    /// Create a new logical position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selection range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Selection start position
    pub start: Position,
    /// Selection end position
    pub end: Position,
    /// Selection direction
    pub direction: SelectionDirection,
}

impl Selection {
    /// Build a selection between two positions; the direction follows their order.
    pub fn between(anchor: Position, active: Position) -> Self {
        if anchor <= active {
            Self {
                start: anchor,
                end: active,
                direction: SelectionDirection::Forward,
            }
        } else {
            Self {
                start: active,
                end: anchor,
                direction: SelectionDirection::Backward,
            }
        }
    }

    /// Returns `true` if start and end coincide.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Selection direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionDirection {
    /// Forward selection (from start to end)
    Forward,
    /// Backward selection (from end to start)
    Backward,
}

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Insert text at the specified position
    Insert {
        /// Character offset to insert at.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Delete text in specified range
    Delete {
        /// Character offset of the deletion start.
        start: usize,
        /// Length of the deletion in characters.
        length: usize,
    },
    /// Comment or uncomment with a block comment at the caret/selection.
    ///
    /// `config` holds the comment tokens of the file language. It is only consulted when no
    /// [`LanguageResolver`] is installed on the executor.
    ToggleBlockComment {
        /// Comment tokens of the document language.
        config: CommentConfig,
    },
}

/// Caret and selection commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move cursor to the specified position
    MoveTo {
        /// Target logical line index.
        line: usize,
        /// Target column in characters (clamped to line length unless virtual space is on).
        column: usize,
    },
    /// Set selection range
    SetSelection {
        /// Selection start position.
        start: Position,
        /// Selection end position.
        end: Position,
    },
    /// Set rectangular selection (box/column selection)
    SetRectSelection {
        /// Anchor position (fixed corner).
        anchor: Position,
        /// Active position (moving corner).
        active: Position,
    },
    /// Clear selection
    ClearSelection,
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor command
    Cursor(CursorCommand),
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The command ran; nothing to report.
    Success,
    /// Block comment toggle result.
    BlockComment(ToggleAction),
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Invalid offset
    #[error("Invalid offset: {0}")]
    InvalidOffset(usize),
    /// Invalid position
    #[error("Invalid position: line {line}, column {column}")]
    InvalidPosition {
        /// Logical line index.
        line: usize,
        /// Column in characters.
        column: usize,
    },
    /// Invalid range
    #[error("Invalid range: {start}..{end}")]
    InvalidRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// Empty text
    #[error("Text cannot be empty")]
    EmptyText,
    /// The block comment action failed.
    #[error(transparent)]
    Comment(#[from] CommentError),
    /// The buffer rejected an edit.
    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Editor Core state: the text plus caret and selections.
///
/// # Example
///
/// ```rust
/// use blockcomment_core::EditorCore;
///
/// let core = EditorCore::new("Hello\nWorld");
/// assert_eq!(core.line_count(), 2);
/// assert_eq!(core.get_text(), "Hello\nWorld");
/// ```
pub struct EditorCore {
    /// Text storage
    pub buffer: TextBuffer,
    /// Current cursor position
    pub cursor_position: Position,
    /// Current selection range
    pub selection: Option<Selection>,
    /// Current rectangular selection, if any. Takes precedence over `selection`.
    pub block_selection: Option<BlockSelection>,
}

impl EditorCore {
    /// Editor state over `text`, caret at the start.
    pub fn new(text: &str) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            cursor_position: Position::new(0, 0),
            selection: None,
            block_selection: None,
        }
    }

    /// Editor state over an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Get text content
    pub fn get_text(&self) -> String {
        self.buffer.text()
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.buffer.len_chars()
    }

    /// Get cursor position
    pub fn cursor_position(&self) -> Position {
        self.cursor_position
    }

    /// Get selection range
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Get rectangular selection
    pub fn block_selection(&self) -> Option<BlockSelection> {
        self.block_selection
    }

    /// The caret/selection snapshot handed to the block comment toggler.
    pub fn caret_state(&self) -> CaretState {
        let state = CaretState::new(self.cursor_position);
        if let Some(block) = self.block_selection {
            return state.with_block_selection(block);
        }
        match &self.selection {
            Some(selection) => state.with_selection(CharRange::new(
                self.buffer.position_to_offset(selection.start),
                self.buffer.position_to_offset(selection.end),
            )),
            None => state,
        }
    }

    fn clamp_column_for_line(&self, line: usize, column: usize) -> usize {
        column.min(self.buffer.line_len(line))
    }

    fn normalize_cursor_and_selection(&mut self) {
        let clamp = |core: &Self, position: Position| {
            core.buffer
                .offset_to_position(core.buffer.position_to_offset(position))
        };
        self.cursor_position = clamp(self, self.cursor_position);
        if let Some(selection) = self.selection.take() {
            let start = clamp(self, selection.start);
            let end = clamp(self, selection.end);
            self.selection = (start != end).then_some(Selection {
                start,
                end,
                direction: selection.direction,
            });
        }
    }
}

/// Command Executor
///
/// Owns the [`EditorCore`] and the host collaborators used by the block comment action.
///
/// # Example
///
/// ```rust
/// use blockcomment_core::{CommandExecutor, Command, CursorCommand, EditCommand, Position};
///
/// let mut executor = CommandExecutor::new("fn main() {}");
///
/// // Move cursor
/// executor.execute(Command::Cursor(CursorCommand::MoveTo {
///     line: 0,
///     column: 3,
/// })).unwrap();
///
/// assert_eq!(executor.editor().cursor_position(), Position::new(0, 3));
/// ```
pub struct CommandExecutor {
    /// Editor Core
    editor: EditorCore,
    /// Command history
    command_history: Vec<Command>,
    /// Structured delta for the last executed text modification (cleared on each `execute()` call).
    last_text_delta: Option<TextDelta>,
    /// Allow the caret to sit past the end of its line.
    virtual_space: bool,
    languages: Option<Box<dyn LanguageResolver>>,
    comment_finder: Option<Box<dyn CommentFinder>>,
    custom_syntax: Option<CustomSyntax>,
    comment_settings: CommentSettings,
    write_access: Option<Box<dyn WriteAccess>>,
}

impl CommandExecutor {
    /// Create a new command executor
    pub fn new(text: &str) -> Self {
        Self {
            editor: EditorCore::new(text),
            command_history: Vec::new(),
            last_text_delta: None,
            virtual_space: false,
            languages: None,
            comment_finder: None,
            custom_syntax: None,
            comment_settings: CommentSettings::default(),
            write_access: None,
        }
    }

    /// Create an empty command executor
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        self.last_text_delta = None;

        self.command_history.push(command.clone());

        match command {
            Command::Edit(edit_cmd) => self.execute_edit(edit_cmd),
            Command::Cursor(cursor_cmd) => self.execute_cursor(cursor_cmd),
        }
    }

    /// Batch execute commands (stops at the first error)
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, CommandError> {
        let mut results = Vec::new();

        for command in commands {
            let result = self.execute(command)?;
            results.push(result);
        }

        Ok(results)
    }

    /// Get the structured text delta produced by the last successful `execute()` call, if any.
    pub fn last_text_delta(&self) -> Option<&TextDelta> {
        self.last_text_delta.as_ref()
    }

    /// Take the structured text delta produced by the last successful `execute()` call, if any.
    pub fn take_last_text_delta(&mut self) -> Option<TextDelta> {
        self.last_text_delta.take()
    }

    /// Get command history
    pub fn get_command_history(&self) -> &[Command] {
        &self.command_history
    }

    /// Get a reference to the Editor Core
    pub fn editor(&self) -> &EditorCore {
        &self.editor
    }

    /// Get a mutable reference to the Editor Core
    pub fn editor_mut(&mut self) -> &mut EditorCore {
        &mut self.editor
    }

    /// Allow or forbid caret columns past the end of the line.
    pub fn set_virtual_space(&mut self, enabled: bool) {
        self.virtual_space = enabled;
    }

    /// Install a language resolver. Once set, the `config` of
    /// [`EditCommand::ToggleBlockComment`] is ignored.
    pub fn set_language_resolver(&mut self, languages: impl LanguageResolver + 'static) {
        self.languages = Some(Box::new(languages));
    }

    /// Install a structured comment finder (e.g. backed by tree-sitter).
    pub fn set_comment_finder(&mut self, finder: impl CommentFinder + 'static) {
        self.comment_finder = Some(Box::new(finder));
    }

    /// Treat the document as a custom file type.
    pub fn set_custom_syntax(&mut self, syntax: Option<CustomSyntax>) {
        self.custom_syntax = syntax;
    }

    /// Set code-style settings used by the block comment action.
    pub fn set_comment_settings(&mut self, settings: CommentSettings) {
        self.comment_settings = settings;
    }

    /// Install write-access negotiation for read-only buffers.
    pub fn set_write_access(&mut self, write_access: impl WriteAccess + 'static) {
        self.write_access = Some(Box::new(write_access));
    }

    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::Insert { offset, text } => self.execute_insert_command(offset, text),
            EditCommand::Delete { start, length } => self.execute_delete_command(start, length),
            EditCommand::ToggleBlockComment { config } => {
                self.execute_toggle_block_comment_command(config)
            }
        }
    }

    fn execute_insert_command(
        &mut self,
        offset: usize,
        text: String,
    ) -> Result<CommandResult, CommandError> {
        if text.is_empty() {
            return Err(CommandError::EmptyText);
        }

        let before_char_count = self.editor.buffer.len_chars();
        if offset > before_char_count {
            return Err(CommandError::InvalidOffset(offset));
        }

        let edit = self.editor.buffer.insert(offset, &text)?;

        self.editor.normalize_cursor_and_selection();

        let mut delta = TextDelta::new(before_char_count);
        delta.push(edit);
        self.last_text_delta = Some(delta);

        Ok(CommandResult::Success)
    }

    fn execute_delete_command(
        &mut self,
        start: usize,
        length: usize,
    ) -> Result<CommandResult, CommandError> {
        if length == 0 {
            return Ok(CommandResult::Success);
        }

        let before_char_count = self.editor.buffer.len_chars();
        if start > before_char_count {
            return Err(CommandError::InvalidOffset(start));
        }
        if start + length > before_char_count {
            return Err(CommandError::InvalidRange {
                start,
                end: start + length,
            });
        }

        let edit = self
            .editor
            .buffer
            .delete(CharRange::new(start, start + length))?;

        self.editor.normalize_cursor_and_selection();

        let mut delta = TextDelta::new(before_char_count);
        delta.push(edit);
        self.last_text_delta = Some(delta);

        Ok(CommandResult::Success)
    }

    fn execute_toggle_block_comment_command(
        &mut self,
        config: CommentConfig,
    ) -> Result<CommandResult, CommandError> {
        let fallback_languages;
        let languages: &dyn LanguageResolver = match &self.languages {
            Some(languages) => languages.as_ref(),
            None => {
                fallback_languages = SingleLanguage::new("text", config.clone());
                &fallback_languages
            }
        };

        // Without any structural information, lex the document with the config's own tokens.
        let fallback_syntax;
        let custom_syntax = match &self.custom_syntax {
            Some(syntax) => Some(syntax),
            None if self.languages.is_none() && self.comment_finder.is_none() => {
                fallback_syntax = CustomSyntax::from_comment_config(&config);
                Some(&fallback_syntax)
            }
            None => None,
        };

        let mut context = SourceContext::new(languages).with_settings(self.comment_settings);
        if let Some(syntax) = custom_syntax {
            context = context.with_custom_syntax(syntax);
        }
        if let Some(finder) = &self.comment_finder {
            context = context.with_comment_finder(finder.as_ref());
        }
        if let Some(write_access) = &self.write_access {
            context = context.with_write_access(write_access.as_ref());
        }

        let state = self.editor.caret_state();
        let outcome = BlockCommentToggler::new(context).toggle(&mut self.editor.buffer, &state)?;

        if !matches!(outcome.action, ToggleAction::Skipped(_)) {
            self.editor.cursor_position = outcome.caret;
            self.editor.block_selection = None;
            self.editor.selection = outcome.selection.map(|range| {
                let direction = self
                    .editor
                    .selection
                    .as_ref()
                    .map_or(SelectionDirection::Forward, |s| s.direction);
                Selection {
                    start: self.editor.buffer.offset_to_position(range.start),
                    end: self.editor.buffer.offset_to_position(range.end),
                    direction,
                }
            });
            self.last_text_delta = Some(outcome.delta);
        }

        Ok(CommandResult::BlockComment(outcome.action))
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        let line_count = self.editor.buffer.line_count();
        match command {
            CursorCommand::MoveTo { line, column } => {
                if line >= line_count {
                    return Err(CommandError::InvalidPosition { line, column });
                }

                let column = if self.virtual_space {
                    column
                } else {
                    self.editor.clamp_column_for_line(line, column)
                };
                self.editor.cursor_position = Position::new(line, column);
                self.editor.selection = None;
                self.editor.block_selection = None;
                Ok(CommandResult::Success)
            }
            CursorCommand::SetSelection { start, end } => {
                if start.line >= line_count || end.line >= line_count {
                    return Err(CommandError::InvalidPosition {
                        line: start.line.max(end.line),
                        column: start.column.max(end.column),
                    });
                }

                let start = Position::new(
                    start.line,
                    self.editor.clamp_column_for_line(start.line, start.column),
                );
                let end = Position::new(
                    end.line,
                    self.editor.clamp_column_for_line(end.line, end.column),
                );

                let selection = Selection::between(start, end);
                self.editor.selection = (!selection.is_empty()).then_some(selection);
                self.editor.block_selection = None;
                self.editor.cursor_position = end;
                Ok(CommandResult::Success)
            }
            CursorCommand::SetRectSelection { anchor, active } => {
                if anchor.line >= line_count || active.line >= line_count {
                    return Err(CommandError::InvalidPosition {
                        line: anchor.line.max(active.line),
                        column: anchor.column.max(active.column),
                    });
                }

                // Columns are kept as-is: a rectangle may extend into virtual space.
                self.editor.block_selection = Some(BlockSelection::from_corners(anchor, active));
                self.editor.selection = None;
                self.editor.cursor_position = active;
                Ok(CommandResult::Success)
            }
            CursorCommand::ClearSelection => {
                self.editor.selection = None;
                self.editor.block_selection = None;
                Ok(CommandResult::Success)
            }
        }
    }
}
