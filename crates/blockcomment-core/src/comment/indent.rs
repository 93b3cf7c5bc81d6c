use crate::buffer::TextBuffer;
use blockcomment_lang::IndentStyle;

/// Supplies the indentation placed in front of whole-line comment delimiters.
pub trait IndentProvider {
    /// Indentation for a comment wrapping `first_line..=last_line`.
    fn indent_for_lines(&self, buffer: &TextBuffer, first_line: usize, last_line: usize) -> String;
}

impl<F> IndentProvider for F
where
    F: Fn(&TextBuffer, usize, usize) -> String,
{
    fn indent_for_lines(&self, buffer: &TextBuffer, first_line: usize, last_line: usize) -> String {
        self(buffer, first_line, last_line)
    }
}

/// The smallest indentation among the non-blank lines of the range.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinLineIndent {
    style: IndentStyle,
}

impl MinLineIndent {
    /// Create a provider that measures and fills with `style`.
    pub fn new(style: IndentStyle) -> Self {
        Self { style }
    }
}

impl IndentProvider for MinLineIndent {
    fn indent_for_lines(&self, buffer: &TextBuffer, first_line: usize, last_line: usize) -> String {
        let width = (first_line..=last_line)
            .filter_map(|line| buffer.line_text(line))
            .filter(|text| !text.trim().is_empty())
            .map(|text| {
                let leading: String = text
                    .chars()
                    .take_while(|ch| *ch == ' ' || *ch == '\t')
                    .collect();
                self.style.measure(&leading)
            })
            .min()
            .unwrap_or(0);
        self.style.fill(width)
    }
}
