use blockcomment_core::comment::CommentFinder;
use blockcomment_core::{CharRange, TextBuffer, TextDelta};
use std::cell::RefCell;
use streaming_iterator::StreamingIterator;
use thiserror::Error;
use tracing::debug;
use tree_sitter::{InputEdit, Parser, Point, Query, QueryCursor, Tree};

/// Errors produced by [`TreeSitterCommentFinder`].
#[derive(Debug, Error)]
pub enum TreeSitterError {
    /// Setting the Tree-sitter language failed.
    #[error("tree-sitter language error: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    /// Compiling the comments query failed.
    #[error("tree-sitter query error: {0}")]
    Query(#[from] tree_sitter::QueryError),
    /// The delta did not match the text the finder last parsed.
    #[error("tree-sitter delta mismatch")]
    DeltaMismatch,
}

/// How the finder obtained the tree used by the last lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSitterUpdateMode {
    /// First parse for this finder instance.
    Initial,
    /// Tree edited through [`TreeSitterCommentFinder::apply_text_delta`] and re-parsed
    /// incrementally.
    Incremental,
    /// The buffer text diverged from the cached text; re-parsed from scratch.
    FullReparse,
    /// The cached tree was still current.
    Reused,
}

/// Configuration for [`TreeSitterCommentFinder`].
#[derive(Debug, Clone)]
pub struct TreeSitterCommentConfig {
    /// Tree-sitter language.
    pub language: tree_sitter::Language,
    /// Query whose captures are comment nodes (capture names are ignored).
    pub comments_query: String,
}

impl TreeSitterCommentConfig {
    /// Create a config with a language and a comments query.
    pub fn new(language: tree_sitter::Language, comments_query: impl Into<String>) -> Self {
        Self {
            language,
            comments_query: comments_query.into(),
        }
    }

    /// Config for grammars naming their comment nodes `block_comment` / `line_comment`
    /// (Rust, Java, ...).
    pub fn with_default_comment_nodes(language: tree_sitter::Language) -> Self {
        Self::new(
            language,
            r#"
            (block_comment) @comment
            (line_comment) @comment
            "#,
        )
    }
}

struct ParseState {
    parser: Parser,
    tree: Option<Tree>,
    text: String,
    last_update_mode: TreeSitterUpdateMode,
}

fn byte_for_char(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

fn point_for_byte(text: &str, byte: usize) -> Point {
    let before = &text.as_bytes()[..byte.min(text.len())];
    let row = before.iter().filter(|b| **b == b'\n').count();
    let line_start = before
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |newline| newline + 1);
    Point {
        row,
        column: before.len() - line_start,
    }
}

fn advance_point(mut point: Point, text: &str) -> Point {
    let mut parts = text.split('\n');
    let Some(first) = parts.next() else {
        return point;
    };

    point.column = point.column.saturating_add(first.len());
    for part in parts {
        point.row = point.row.saturating_add(1);
        point.column = part.len();
    }

    point
}

impl ParseState {
    fn sync(&mut self, text: String) {
        let initial = self.tree.is_none();
        self.tree = self.parser.parse(&text, None);
        self.text = text;
        self.last_update_mode = if initial {
            TreeSitterUpdateMode::Initial
        } else {
            TreeSitterUpdateMode::FullReparse
        };
    }
}

/// A [`CommentFinder`] backed by a Tree-sitter parse.
///
/// The finder caches the last parsed text and tree. A lookup against a buffer whose text
/// differs from the cache re-parses from scratch; hosts that track edits can keep the tree
/// current cheaply with [`apply_text_delta`](Self::apply_text_delta).
pub struct TreeSitterCommentFinder {
    query: Query,
    state: RefCell<ParseState>,
}

impl TreeSitterCommentFinder {
    /// Create a finder from the given config.
    pub fn new(config: TreeSitterCommentConfig) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser.set_language(&config.language)?;
        let query = Query::new(&config.language, &config.comments_query)?;

        Ok(Self {
            query,
            state: RefCell::new(ParseState {
                parser,
                tree: None,
                text: String::new(),
                last_update_mode: TreeSitterUpdateMode::FullReparse,
            }),
        })
    }

    /// Get the last update mode (useful for tests and instrumentation).
    pub fn last_update_mode(&self) -> TreeSitterUpdateMode {
        self.state.borrow().last_update_mode
    }

    /// Apply the edits of `delta` to the cached text and tree, then re-parse incrementally.
    ///
    /// On error the cache is left as it was; the next lookup falls back to a full parse.
    pub fn apply_text_delta(&self, delta: &TextDelta) -> Result<(), TreeSitterError> {
        let mut state = self.state.borrow_mut();
        if state.tree.is_none() || state.text.chars().count() != delta.before_char_count {
            return Err(TreeSitterError::DeltaMismatch);
        }

        let mut text = state.text.clone();
        let mut input_edits = Vec::with_capacity(delta.edits.len());
        for edit in &delta.edits {
            let start_byte = byte_for_char(&text, edit.start);
            let old_end_byte = start_byte.saturating_add(edit.deleted_text.len());
            let new_end_byte = start_byte.saturating_add(edit.inserted_text.len());

            if text.get(start_byte..old_end_byte) != Some(edit.deleted_text.as_str()) {
                return Err(TreeSitterError::DeltaMismatch);
            }

            let start_position = point_for_byte(&text, start_byte);
            input_edits.push(InputEdit {
                start_byte,
                old_end_byte,
                new_end_byte,
                start_position,
                old_end_position: advance_point(start_position, &edit.deleted_text),
                new_end_position: advance_point(start_position, &edit.inserted_text),
            });
            text.replace_range(start_byte..old_end_byte, &edit.inserted_text);
        }

        if text.chars().count() != delta.after_char_count {
            return Err(TreeSitterError::DeltaMismatch);
        }

        let state = &mut *state;
        if let Some(tree) = state.tree.as_mut() {
            for input_edit in &input_edits {
                tree.edit(input_edit);
            }
        }
        state.tree = state.parser.parse(&text, state.tree.as_ref());
        state.text = text;
        state.last_update_mode = TreeSitterUpdateMode::Incremental;
        debug!(edits = delta.edits.len(), "tree-sitter tree updated incrementally");
        Ok(())
    }

    fn innermost_comment(&self, text: &str, tree: &Tree, byte: usize) -> Option<(usize, usize)> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), text.as_bytes());
        let mut best: Option<(usize, usize)> = None;
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let node = capture.node;
                let (start, end) = (node.start_byte(), node.end_byte());
                if start > byte || byte >= end {
                    continue;
                }
                if best.is_none_or(|(s, e)| end - start < e - s) {
                    best = Some((start, end));
                }
            }
        }
        best
    }
}

impl CommentFinder for TreeSitterCommentFinder {
    fn enclosing_comment(&self, buffer: &TextBuffer, offset: usize) -> Option<CharRange> {
        let mut state = self.state.borrow_mut();
        let text = buffer.text();
        if state.tree.is_none() || state.text != text {
            state.sync(text);
        } else {
            state.last_update_mode = TreeSitterUpdateMode::Reused;
        }

        let byte = byte_for_char(&state.text, offset);
        let tree = state.tree.as_ref()?;
        let (start, end) = self.innermost_comment(&state.text, tree, byte)?;
        Some(CharRange::new(
            buffer.byte_to_char(start),
            buffer.byte_to_char(end),
        ))
    }
}
