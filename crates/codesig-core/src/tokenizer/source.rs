//! Character buffer with a line index.

use crate::token::{Position, TextSpan};

/// Source text split into characters, with the offset of each line start.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Debug, Clone)]
pub struct SourceText {
    chars: Vec<char>,
    line_starts: Vec<usize>,
}

impl SourceText {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut line_starts = vec![0];
        for (i, &c) in chars.iter().enumerate() {
            match c {
                '\n' => line_starts.push(i + 1),
                '\r' if chars.get(i + 1) != Some(&'\n') => line_starts.push(i + 1),
                _ => {}
            }
        }
        Self { chars, line_starts }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Line and column of the character at `offset`.
    pub fn position(&self, offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position {
            line: line as u32,
            column: (offset - self.line_starts[line]) as u32,
        }
    }

    /// Span covering `len` characters from `offset`.
    pub fn span(&self, offset: usize, len: usize) -> TextSpan {
        TextSpan {
            offset,
            len,
            start: self.position(offset),
            end: self.position(offset + len.saturating_sub(1)),
        }
    }

    pub fn slice(&self, offset: usize, len: usize) -> String {
        self.chars[offset..offset + len].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_across_line_endings() {
        let source = SourceText::new("ab\ncd\r\nef\rg");
        assert_eq!(source.position(0), Position { line: 0, column: 0 });
        assert_eq!(source.position(4), Position { line: 1, column: 1 });
        assert_eq!(source.position(7), Position { line: 2, column: 0 });
        assert_eq!(source.position(10), Position { line: 3, column: 0 });
    }

    #[test]
    fn test_span_endpoints() {
        let source = SourceText::new("x\nabc");
        let span = source.span(2, 3);
        assert_eq!(span.start, Position { line: 1, column: 0 });
        assert_eq!(span.end, Position { line: 1, column: 2 });
        assert_eq!(source.slice(2, 3), "abc");
    }
}
