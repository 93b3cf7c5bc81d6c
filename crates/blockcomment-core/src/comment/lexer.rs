use crate::buffer::{CharRange, is_line_terminator};
use blockcomment_lang::CustomSyntax;

/// Kind of a lexed token. Plain code is not reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A block comment, possibly unterminated (then it runs to the end of the text).
    BlockComment,
    /// A line comment, up to (excluding) the line terminator.
    LineComment,
    /// A string literal, possibly unterminated (then it runs to the end of the line).
    String,
}

/// A lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Character range.
    pub range: CharRange,
}

/// A small lexer for user-defined file types, driven by a [`CustomSyntax`].
pub struct CustomSyntaxLexer<'a> {
    syntax: &'a CustomSyntax,
    block: Option<(Vec<char>, Vec<char>)>,
    line: Option<Vec<char>>,
}

fn starts_with(text: &[char], pos: usize, pattern: &[char]) -> bool {
    !pattern.is_empty() && text.get(pos..pos + pattern.len()) == Some(pattern)
}

fn find(text: &[char], from: usize, pattern: &[char]) -> Option<usize> {
    (from..text.len()).find(|&pos| starts_with(text, pos, pattern))
}

impl<'a> CustomSyntaxLexer<'a> {
    /// Create a lexer for `syntax`.
    pub fn new(syntax: &'a CustomSyntax) -> Self {
        let block = match (&syntax.block_comment_start, &syntax.block_comment_end) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some((start.chars().collect(), end.chars().collect()))
            }
            _ => None,
        };
        let line = syntax
            .line_comment
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(|token| token.chars().collect());
        Self {
            syntax,
            block,
            line,
        }
    }

    /// Lex the whole text.
    pub fn tokenize(&self, text: &[char]) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < text.len() {
            match self.token_starting_at(text, pos) {
                Some(token) => {
                    pos = token.range.end;
                    tokens.push(token);
                }
                None => pos += 1,
            }
        }
        tokens
    }

    /// The token covering `offset`, lexing only as far as needed.
    pub fn token_at(&self, text: &[char], offset: usize) -> Option<Token> {
        let mut pos = 0;
        while pos <= offset && pos < text.len() {
            match self.token_starting_at(text, pos) {
                Some(token) if token.range.end > offset => return Some(token),
                Some(token) => pos = token.range.end,
                None => pos += 1,
            }
        }
        None
    }

    fn token_starting_at(&self, text: &[char], pos: usize) -> Option<Token> {
        if let Some((open, close)) = &self.block {
            if starts_with(text, pos, open) {
                let end = find(text, pos + open.len(), close)
                    .map_or(text.len(), |close_at| close_at + close.len());
                return Some(Token {
                    kind: TokenKind::BlockComment,
                    range: CharRange::new(pos, end),
                });
            }
        }

        if let Some(line) = &self.line {
            if starts_with(text, pos, line) {
                let end = (pos..text.len())
                    .find(|&i| is_line_terminator(text[i]))
                    .unwrap_or(text.len());
                return Some(Token {
                    kind: TokenKind::LineComment,
                    range: CharRange::new(pos, end),
                });
            }
        }

        let quote = text[pos];
        if self.syntax.string_quotes.contains(&quote) {
            let mut end = pos + 1;
            while end < text.len() {
                let ch = text[end];
                if Some(ch) == self.syntax.escape_char {
                    end = (end + 2).min(text.len());
                    continue;
                }
                if is_line_terminator(ch) {
                    break;
                }
                end += 1;
                if ch == quote {
                    break;
                }
            }
            return Some(Token {
                kind: TokenKind::String,
                range: CharRange::new(pos, end),
            });
        }

        None
    }
}
