//! Cursor over the raw markup text.
//!
//! [`ParserInput`] tracks the byte position, line and column, and the
//! element nesting depth. The markup parser is lossless, so the cursor never
//! rewrites input: callers take verbatim slices between two positions.
//!
//! # Security
//!
//! The nesting depth is capped so that hostile input cannot build a tree
//! deep enough to overflow the stack of the recursive serializer.

use crate::error::{ErrorSeverity, ParseDiagnostic, ParseError, SourceLocation};

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// Shared low-level input state for the markup parser.
pub(crate) struct ParserInput<'a> {
    /// The input text.
    input: &'a str,

    /// Current byte offset in `input`. Always on a char boundary.
    pos: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, in characters).
    column: u32,

    /// Current element nesting depth.
    depth: u32,

    /// Maximum allowed nesting depth.
    max_depth: u32,
}

impl<'a> ParserInput<'a> {
    /// Creates a new `ParserInput` with default limits.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting depth.
    pub fn set_max_depth(&mut self, max: u32) {
        self.max_depth = max;
    }

    // -- Depth tracking --

    /// Increments the nesting depth. Returns an error if the limit is exceeded.
    pub fn increment_depth(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(self.fatal(format!(
                "maximum nesting depth exceeded ({})",
                self.max_depth
            )));
        }
        Ok(())
    }

    /// Decrements the nesting depth (saturating at 0).
    pub fn decrement_depth(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -- Position queries --

    /// Returns the current source location.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.pos,
        }
    }

    /// Returns `true` if all input has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Returns the verbatim input between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Returns the unconsumed input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    // -- Peek operations --

    /// Returns the byte at the current position without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Returns the byte at `current_position + offset` without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Returns the character at the current position without consuming it.
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    // -- Advance operations --

    /// Advances by one character, updating line/column.
    pub fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Advances by `count` characters.
    pub fn advance(&mut self, count: usize) {
        for _ in 0..count {
            self.advance_char();
        }
    }

    /// Advances to the absolute byte offset `end`, which must lie on a
    /// char boundary at or after the current position.
    pub fn advance_to(&mut self, end: usize) {
        let end = end.min(self.input.len());
        while self.pos < end {
            self.advance_char();
        }
    }

    // -- Lookahead --

    /// Returns `true` if the remaining input starts with `s`.
    pub fn looking_at(&self, s: &[u8]) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(s)
    }

    /// Case-insensitive (ASCII) lookahead check.
    pub fn looking_at_ci(&self, expected: &[u8]) -> bool {
        let bytes = self.input.as_bytes();
        if self.pos + expected.len() > bytes.len() {
            return false;
        }
        bytes[self.pos..self.pos + expected.len()].eq_ignore_ascii_case(expected)
    }

    /// Returns the absolute byte offset of the next occurrence of `needle`,
    /// searching from the current position.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.remaining().find(needle).map(|off| self.pos + off)
    }

    // -- Whitespace --

    /// Skips whitespace characters. Returns `true` if any were consumed.
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\r' || b == b'\n' || b == b'\x0C' {
                self.advance_char();
            } else {
                break;
            }
        }
        self.pos > start
    }

    // -- Take while --

    /// Consumes ASCII bytes while `pred` returns `true` and returns the
    /// consumed slice.
    pub fn take_while_ascii(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii() && pred(b) {
                self.advance_char();
            } else {
                break;
            }
        }
        self.slice(start, self.pos)
    }

    // -- Error helpers --

    /// Creates a fatal `ParseError` at the current location.
    pub fn fatal(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.location(),
            diagnostics: Vec::new(),
        }
    }

    /// Builds a diagnostic at the current location.
    pub fn diagnostic(&self, severity: ErrorSeverity, message: String) -> ParseDiagnostic {
        ParseDiagnostic {
            severity,
            message,
            location: self.location(),
        }
    }
}
