//! Source positions.

use serde::Serialize;

/// Byte range plus 1-based line/column of its start.
///
/// Positions are produced once from a [`LineIndex`] and never change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(start: u32, end: u32, line: u32, col: u32) -> Self {
        debug_assert!(start <= end, "position start {start} after end {end}");
        Self {
            start,
            end,
            line,
            col,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest position covering both. Line/column come from whichever starts first.
    pub fn cover(self, other: Position) -> Position {
        let first = if other.start < self.start { other } else { self };
        Position {
            start: first.start,
            end: self.end.max(other.end),
            line: first.line,
            col: first.col,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Offsets of every line start, for offset → line/column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    pub(crate) len: u32,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line and column of `offset`. Columns count bytes.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        self.ensure_in_bounds(offset);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col + 1)
    }

    pub fn position(&self, start: u32, end: u32) -> Position {
        let (line, col) = self.line_col(start);
        Position::new(start, end, line, col)
    }

    /// Text of a 1-based line, without its line terminator.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> Option<&'s str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(source.len(), |&next| next as usize);
        let text = source.get(start..end)?;
        Some(text.trim_end_matches(['\n', '\r']))
    }
}
