//! Public engine operations
//!
//! Thin facade over the feature slices: single-file extraction, tree
//! diffing, history aggregation and full project processing.

use crate::config::EngineConfig;
use crate::errors::Result;
use crate::features::lexing::application::tokenize;
use crate::features::model::application::{build, FileModel};
use crate::features::syntax::application::parse;

pub use crate::features::diffing::application::diff;
pub use crate::features::history::application::aggregate;
pub use crate::pipeline::coordinator::process_project;

/// Extracts the entity tree of one source file with default policies.
///
/// Fatal failures (lexing, unrecoverable syntax, duplicate signatures under
/// the default policy) return an error; member-level recovery events are
/// reported through [FileModel::diagnostics].
pub fn parse_file(path: &str, content: &str) -> Result<FileModel> {
    parse_file_with(path, content, &EngineConfig::default())
}

/// Extracts the entity tree of one source file under explicit policies.
pub fn parse_file_with(path: &str, content: &str, config: &EngineConfig) -> Result<FileModel> {
    let tokens = tokenize(content)?;
    let outcome = parse(path, &tokens)?;
    let mut file_model = build(path, &outcome.syntax, config)?;
    let mut diagnostics = outcome.diagnostics;
    diagnostics.append(&mut file_model.diagnostics);
    file_model.diagnostics = diagnostics;
    Ok(file_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ExtractError, LexErrorKind};

    #[test]
    fn test_parse_file_extracts_tree() {
        let file_model = parse_file("A.java", "class A { void f() {} }").unwrap();
        assert_eq!(file_model.path, "A.java");
        assert_eq!(file_model.root.children.len(), 1);
        assert!(file_model.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_file_lex_failure() {
        let err = parse_file("A.java", "class A { char c = 'x").unwrap_err();
        match err {
            ExtractError::Lex(e) => assert_eq!(e.kind, LexErrorKind::UnterminatedChar),
            other => panic!("expected lex error, got {other:?}"),
        }
    }
}
