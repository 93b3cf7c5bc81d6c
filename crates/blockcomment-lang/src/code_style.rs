use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// How indentation is written when the toggler has to synthesize it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentStyle {
    /// Fill indentation with `'\t'` (plus spaces for the remainder) instead of spaces.
    pub use_tabs: bool,
    /// Width of a tab stop in character cells (must be greater than 0).
    pub tab_width: usize,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self {
            use_tabs: false,
            tab_width: 4,
        }
    }
}

impl IndentStyle {
    /// Visual width of a run of leading whitespace (`' '` and `'\t'`).
    pub fn measure(&self, whitespace: &str) -> usize {
        let tab_width = self.tab_width.max(1);
        whitespace.chars().fold(0, |width, ch| match ch {
            '\t' => (width / tab_width + 1) * tab_width,
            _ => width + 1,
        })
    }

    /// Produce an indentation string that spans `width` cells.
    pub fn fill(&self, width: usize) -> String {
        if !self.use_tabs {
            return " ".repeat(width);
        }
        let tab_width = self.tab_width.max(1);
        let mut out = "\t".repeat(width / tab_width);
        out.push_str(&" ".repeat(width % tab_width));
        out
    }
}

/// Code-style settings consulted while inserting block comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSettings {
    /// Place whole-line block comment delimiters at column 0 instead of at the minimum
    /// indentation of the wrapped lines.
    pub block_comment_at_first_column: bool,
    /// Indentation style used to build the delimiter lines.
    pub indent: IndentStyle,
}

impl CommentSettings {
    /// Parse settings from JSON, e.g. `{"block_comment_at_first_column": true}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        if settings.indent.tab_width == 0 {
            return Err(ConfigError::InvalidTabWidth);
        }
        Ok(settings)
    }
}
