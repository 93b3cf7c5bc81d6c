#![warn(missing_docs)]
//! `blockcomment-lang` - data-driven language configuration helpers for `blockcomment-core`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any parsing or
//! highlighting system. It provides small structs that hosts can deserialize (JSON) and hand to
//! the comment toggler:
//!
//! - [`CommentConfig`]: comment tokens of a language
//! - [`CustomSyntax`]: a freeform "custom file type" syntax table (no parser available)
//! - [`CommentSettings`]: code-style settings that affect where block comments are placed

mod code_style;
mod custom_syntax;

pub use code_style::{CommentSettings, IndentStyle};
pub use custom_syntax::CustomSyntax;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading language configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    /// The configuration document was not valid JSON for the requested type.
    Json(#[from] serde_json::Error),

    #[error("tab width must be greater than 0")]
    /// `IndentStyle::tab_width` was zero.
    InvalidTabWidth,

    #[error("block comment tokens must both be non-empty (got {start:?} / {end:?})")]
    /// Only one of the block comment tokens was configured, or one of them was empty.
    IncompleteBlockComment {
        /// Configured start token.
        start: Option<String>,
        /// Configured end token.
        end: Option<String>,
    },
}

/// Comment tokens/config for a given language.
///
/// The editor kernel uses this to implement comment toggling in a UI-agnostic way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// Create a config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block_start: Some(start.into()),
            block_end: Some(end.into()),
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block_start: Some(block_start.into()),
            block_end: Some(block_end.into()),
        }
    }

    /// Parse a config from JSON, e.g. `{"block_start": "<!--", "block_end": "-->"}`.
    ///
    /// A half-configured block pair is rejected; a config with no block tokens at all is fine
    /// (the toggler then treats block comments as unsupported).
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        let start_set = config.block_start.is_some();
        let end_set = config.block_end.is_some();
        if (start_set || end_set) && !config.has_block() {
            return Err(ConfigError::IncompleteBlockComment {
                start: config.block_start,
                end: config.block_end,
            });
        }
        Ok(config)
    }

    /// Returns `true` if a line comment token is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment tokens are configured.
    pub fn has_block(&self) -> bool {
        self.block_start.as_deref().is_some_and(|s| !s.is_empty())
            && self.block_end.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// The `(start, end)` block comment tokens, if both are configured and non-empty.
    pub fn block_pair(&self) -> Option<(&str, &str)> {
        match (self.block_start.as_deref(), self.block_end.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => Some((start, end)),
            _ => None,
        }
    }
}
