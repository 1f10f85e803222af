/// A line/column location in the input text.
///
/// Lines start at 1. The column counts characters consumed on the current line, so it is 0 at
/// the start of a line and equals the 1-based column of the most recently consumed character
/// otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Current line, starting at 1.
    pub line: usize,
    /// Characters consumed on the current line.
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 0 }
    }
}

impl Position {
    /// Account for one consumed character.
    #[inline]
    pub fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Account for a run of consumed characters.
    pub fn advance_str(&mut self, s: &str) {
        for c in s.chars() {
            self.advance(c);
        }
    }
}

#[test]
fn test_advance() {
    let mut pos = Position::default();
    pos.advance_str("ab\ncd");
    assert_eq!(pos, Position { line: 2, column: 2 });
    pos.advance('\n');
    assert_eq!(pos, Position { line: 3, column: 0 });
}

#[test]
fn test_advance_counts_chars_not_bytes() {
    let mut pos = Position::default();
    pos.advance_str("ñü€");
    assert_eq!(pos.column, 3);
}
