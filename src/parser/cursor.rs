//! Line cursor over a decoded .re1 file.
//!
//! The cursor is `Copy`, so a layout strategy can work on its own copy and
//! only hand back an advanced cursor when it fully succeeds.

use crate::error::{Re1Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct LineCursor<'a> {
    lines: &'a [&'a str],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [&'a str]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Index of the next unread line
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 1-based line number used in error messages
    pub fn line_number(&self) -> usize {
        (self.pos + 1).min(self.lines.len().max(1))
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Number of non-blank lines not yet consumed
    pub fn remaining_non_empty(&self) -> usize {
        self.lines
            .iter()
            .skip(self.pos)
            .filter(|line| !line.trim().is_empty())
            .count()
    }

    /// Move past blank lines and return the next line without consuming it
    pub fn peek_non_empty(&mut self) -> Option<&'a str> {
        while self.pos < self.lines.len() && self.lines[self.pos].trim().is_empty() {
            self.pos += 1;
        }
        self.lines.get(self.pos).copied()
    }

    /// The first non-blank line after the current one
    pub fn peek_following_non_empty(&self) -> Option<&'a str> {
        self.lines
            .iter()
            .skip(self.pos + 1)
            .find(|line| !line.trim().is_empty())
            .copied()
    }

    /// Consume the current line
    pub fn advance(&mut self) {
        if self.pos < self.lines.len() {
            self.pos += 1;
        }
    }

    /// Consume the next non-blank line, failing with a structural error at end of input
    pub fn next_non_empty(&mut self, field: &'static str) -> Result<&'a str> {
        match self.peek_non_empty() {
            Some(line) => {
                self.pos += 1;
                Ok(line)
            }
            None => Err(Re1Error::structural(
                field,
                self.line_number(),
                format!("Unexpected end of file while reading {}", field),
            )),
        }
    }

    /// Scan forward to the first line containing `needle` (case-insensitive) and consume it
    pub fn seek_past(&mut self, needle: &str) -> Option<usize> {
        let needle = needle.to_uppercase();
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            self.pos += 1;
            if line.to_uppercase().contains(&needle) {
                return Some(self.pos - 1);
            }
        }
        None
    }

    /// Structural error pointing at the most recently consumed line
    pub fn error_at_previous(&self, field: &'static str, reason: impl Into<String>) -> Re1Error {
        Re1Error::structural(field, self.pos.max(1), reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_lines() {
        let lines = ["", "  \t", "first", "", "second"];
        let mut cursor = LineCursor::new(&lines);
        assert_eq!(cursor.peek_non_empty(), Some("first"));
        assert_eq!(cursor.peek_following_non_empty(), Some("second"));
        assert_eq!(cursor.next_non_empty("a").unwrap(), "first");
        assert_eq!(cursor.next_non_empty("b").unwrap(), "second");
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_remaining_ignores_blank_lines() {
        let lines = ["head", "", "a", "  ", "b"];
        let mut cursor = LineCursor::new(&lines);
        assert_eq!(cursor.remaining_non_empty(), 3);
        cursor.next_non_empty("head").unwrap();
        assert_eq!(cursor.remaining_non_empty(), 2);
    }

    #[test]
    fn test_end_of_input_names_field() {
        let lines = ["only", ""];
        let mut cursor = LineCursor::new(&lines);
        cursor.advance();
        let err = cursor.next_non_empty("LCG VCG").unwrap_err();
        assert!(err.to_string().contains("LCG VCG"));
    }

    #[test]
    fn test_copy_leaves_original_untouched() {
        let lines = ["a", "b", "c"];
        let cursor = LineCursor::new(&lines);
        let mut scratch = cursor;
        scratch.advance();
        scratch.advance();
        assert_eq!(cursor.position(), 0);
        assert_eq!(scratch.position(), 2);
    }

    #[test]
    fn test_seek_past_is_case_insensitive() {
        let lines = ["junk", "Motion Transfer Functions", "next"];
        let mut cursor = LineCursor::new(&lines);
        assert_eq!(cursor.seek_past("MOTION TRANSFER FUNCTIONS"), Some(1));
        assert_eq!(cursor.peek_non_empty(), Some("next"));
        assert_eq!(cursor.seek_past("missing"), None);
    }
}
