use super::DelimiterPair;
use super::lexer::{CustomSyntaxLexer, TokenKind};
use crate::buffer::{CharRange, TextBuffer};
use blockcomment_lang::CustomSyntax;
use tracing::debug;

/// Finds the range of an existing block comment covering the caret.
pub trait RangeDetector {
    /// Range of the block comment around `caret`, if any.
    fn detect(&self, buffer: &TextBuffer, caret: usize, pair: &DelimiterPair) -> Option<CharRange>;
}

/// Structured comment lookup, typically backed by a syntax tree.
pub trait CommentFinder {
    /// Range of the comment node enclosing the character at `offset`, of any comment flavour.
    fn enclosing_comment(&self, buffer: &TextBuffer, offset: usize) -> Option<CharRange>;
}

impl<F> CommentFinder for F
where
    F: Fn(&TextBuffer, usize) -> Option<CharRange>,
{
    fn enclosing_comment(&self, buffer: &TextBuffer, offset: usize) -> Option<CharRange> {
        self(buffer, offset)
    }
}

/// Detection for custom file types: find the nearest prefix before the caret and confirm with
/// the custom-syntax lexer that it belongs to a block comment reaching the caret.
pub struct LexicalDetector<'a> {
    lexer: CustomSyntaxLexer<'a>,
}

impl<'a> LexicalDetector<'a> {
    /// Create a detector for a custom syntax.
    pub fn new(syntax: &'a CustomSyntax) -> Self {
        Self {
            lexer: CustomSyntaxLexer::new(syntax),
        }
    }
}

impl RangeDetector for LexicalDetector<'_> {
    fn detect(&self, buffer: &TextBuffer, caret: usize, pair: &DelimiterPair) -> Option<CharRange> {
        let candidate = buffer.last_index_of(pair.prefix(), caret)?;
        let text: Vec<char> = buffer.text().chars().collect();
        let token = self.lexer.token_at(&text, candidate)?;
        if token.kind != TokenKind::BlockComment || token.range.end < caret {
            debug!(candidate, ?token, "prefix is not part of a block comment at the caret");
            return None;
        }
        Some(token.range)
    }
}

/// Detection through a [`CommentFinder`]; only comments of the requested flavour qualify.
pub struct StructuredDetector<'a> {
    finder: Option<&'a dyn CommentFinder>,
}

impl<'a> StructuredDetector<'a> {
    /// Create a detector; without a finder nothing is ever detected.
    pub fn new(finder: Option<&'a dyn CommentFinder>) -> Self {
        Self { finder }
    }
}

impl RangeDetector for StructuredDetector<'_> {
    fn detect(&self, buffer: &TextBuffer, caret: usize, pair: &DelimiterPair) -> Option<CharRange> {
        let range = self.finder?.enclosing_comment(buffer, caret)?;
        let text = buffer.slice(range).ok()?;
        if !text.starts_with(pair.prefix()) || !text.ends_with(pair.suffix()) {
            debug!(?range, "comment at caret uses different delimiters");
            return None;
        }
        Some(range)
    }
}
