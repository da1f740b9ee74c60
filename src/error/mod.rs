//! Error types and diagnostics.
//!
//! Two layers of errors live here. [`ParseError`] and [`ParseDiagnostic`]
//! come out of the markup parser and carry source locations. [`PatchError`]
//! is what the public document API returns: every variant is a caller-input
//! error, raised synchronously with a message naming the offending path or
//! segment.
//!
//! The parser is error-tolerant: it collects warnings into a
//! `Vec<ParseDiagnostic>` while still producing a tree, and only fails with
//! a `ParseError` when it cannot go on (for example, the nesting depth limit).

use std::fmt;

use thiserror::Error;

/// Severity level for a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// A non-fatal issue that doesn't prevent parsing.
    Warning,
    /// A recoverable error; the tree is still usable.
    Error,
    /// An unrecoverable error; parsing must stop.
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal error"),
        }
    }
}

/// Source location within a markup document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single diagnostic emitted during parsing.
#[derive(Debug, Clone, Error)]
#[error("{severity}: {message} at {location}")]
pub struct ParseDiagnostic {
    /// The severity of this diagnostic.
    pub severity: ErrorSeverity,
    /// Human-readable error message.
    pub message: String,
    /// Where in the source this diagnostic was raised.
    pub location: SourceLocation,
}

/// The error type returned when markup parsing fails.
#[derive(Debug, Clone, Error)]
#[error("parse error at {location}: {message}")]
pub struct ParseError {
    /// The primary error message.
    pub message: String,
    /// Where in the source the fatal error occurred.
    pub location: SourceLocation,
    /// All diagnostics collected before the fatal error.
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Errors returned by [`HtmlDocument`](crate::HtmlDocument) operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The input could not be parsed, or its root is missing or misnamed.
    #[error("wrong document format: {message}")]
    MalformedDocument {
        /// What was wrong with the document.
        message: String,
        /// The underlying parser failure, if parsing itself failed.
        #[source]
        source: Option<ParseError>,
    },

    /// The path is empty, has blank items, or misplaces an attribute reference.
    #[error("invalid path `{path}`: {reason}")]
    InvalidPath {
        /// The offending path, joined with `/`.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// The first path item does not name the document's root element.
    #[error("root element name `{found}` does not match path root `{expected}`")]
    RootMismatch {
        /// The first item of the path.
        expected: String,
        /// The actual root element name.
        found: String,
    },

    /// A delete (or read) addressed an element that does not exist.
    #[error("no element matches `{segment}` in path `{path}`")]
    NotFound {
        /// The offending path, joined with `/`.
        path: String,
        /// The path item that failed to resolve.
        segment: String,
    },

    /// Raw input bytes could not be decoded with the requested encoding.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type for document operations.
pub type PatchResult<T> = Result<T, PatchError>;
