//! Error types for histree-core
//!
//! Provides the extraction error taxonomy. Per-file errors are values and
//! never abort processing of other files; recoverable parse failures become
//! [crate::shared::Diagnostic]s instead of errors.

use crate::shared::QualifiedPath;
use thiserror::Error;

/// Reason a token could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    UnterminatedBlockComment,
    UnterminatedString,
    UnterminatedChar,
    UnexpectedChar(char),
}

impl LexErrorKind {
    fn describe(&self) -> String {
        match self {
            LexErrorKind::UnterminatedBlockComment => "unterminated block comment".to_string(),
            LexErrorKind::UnterminatedString => "unterminated string literal".to_string(),
            LexErrorKind::UnterminatedChar => "unterminated character literal".to_string(),
            LexErrorKind::UnexpectedChar(c) => format!("unexpected character '{}'", c),
        }
    }
}

/// Malformed token; fatal for the file, isolated within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lex error at offset {offset}: {}", kind.describe())]
pub struct LexError {
    pub offset: usize,
    pub kind: LexErrorKind,
}

/// Malformed declaration structure from which recovery failed.
///
/// Member-level failures are recovered by skip-and-continue and reported as
/// diagnostics; this error is raised only when resynchronization fails
/// before the end of the file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at offset {offset}: expected {}", expected.join(" or "))]
pub struct SyntaxError {
    pub offset: usize,
    pub expected: Vec<&'static str>,
}

/// Ambiguous entity model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Two sibling entities share a structural signature. Whether this is
    /// fatal is decided by [crate::config::DuplicatePolicy].
    #[error("duplicate structural signature at {path}")]
    DuplicateSignature { path: QualifiedPath },
}

/// Umbrella error for `parse_file`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("similarity threshold {0} is outside (0, 1]")]
    InvalidThreshold(f64),

    #[error("similarity weights must be non-negative and sum to a positive value")]
    InvalidWeights,
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display() {
        let err = LexError {
            offset: 17,
            kind: LexErrorKind::UnterminatedString,
        };
        assert_eq!(
            err.to_string(),
            "lex error at offset 17: unterminated string literal"
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let err = SyntaxError {
            offset: 3,
            expected: vec!["class", "interface"],
        };
        assert_eq!(
            err.to_string(),
            "syntax error at offset 3: expected class or interface"
        );
    }
}
