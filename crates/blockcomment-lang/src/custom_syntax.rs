use crate::{CommentConfig, ConfigError};
use serde::{Deserialize, Serialize};

/// Syntax table of a user-defined ("custom") file type.
///
/// Custom file types have no parser, so block comments are found by lexing the text with these
/// tokens instead of querying a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomSyntax {
    /// Line comment token (e.g. `#`).
    pub line_comment: Option<String>,
    /// Block comment start token (e.g. `{-`).
    pub block_comment_start: Option<String>,
    /// Block comment end token (e.g. `-}`).
    pub block_comment_end: Option<String>,
    /// Characters that open and close string literals.
    pub string_quotes: Vec<char>,
    /// Escape character inside string literals.
    pub escape_char: Option<char>,
}

impl Default for CustomSyntax {
    fn default() -> Self {
        Self {
            line_comment: None,
            block_comment_start: None,
            block_comment_end: None,
            string_quotes: vec!['"', '\''],
            escape_char: Some('\\'),
        }
    }
}

impl CustomSyntax {
    /// A syntax with the given block comment tokens and default string rules.
    pub fn with_block_comment(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            block_comment_start: Some(start.into()),
            block_comment_end: Some(end.into()),
            ..Self::default()
        }
    }

    /// A syntax lexing the tokens of `config`, with default string rules.
    pub fn from_comment_config(config: &CommentConfig) -> Self {
        Self {
            line_comment: config.line.clone(),
            block_comment_start: config.block_start.clone(),
            block_comment_end: config.block_end.clone(),
            ..Self::default()
        }
    }

    /// Set the line comment token.
    pub fn with_line_comment(mut self, token: impl Into<String>) -> Self {
        self.line_comment = Some(token.into());
        self
    }

    /// Parse a syntax table from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The comment tokens of this syntax, in the shape used by language-aware callers.
    pub fn comment_config(&self) -> CommentConfig {
        CommentConfig {
            line: self.line_comment.clone(),
            block_start: self.block_comment_start.clone(),
            block_end: self.block_comment_end.clone(),
        }
    }
}
