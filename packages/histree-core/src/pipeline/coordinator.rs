//! Revision sequence processing
//!
//! Revisions are strictly ordered; files within a revision are extracted in
//! parallel (parsing shares no mutable state) and then folded into the
//! history store sequentially in path order, so the resulting store is
//! independent of thread scheduling.

use crate::api::parse_file_with;
use crate::config::EngineConfig;
use crate::errors::ExtractError;
use crate::features::diffing::application::{added_file_script, diff, removed_file_script};
use crate::features::history::application::aggregate;
use crate::features::history::domain::{HistoryStore, RevisionId};
use crate::features::model::application::FileModel;
use crate::features::model::domain::Entity;
use crate::shared::Diagnostic;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One project snapshot: a revision label and the full set of source files
/// at that revision, keyed by file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: RevisionId,
    pub files: BTreeMap<String, String>,
}

impl Revision {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: RevisionId::new(id),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

/// Aggregated result of processing a revision sequence.
#[derive(Debug, Clone, Default)]
pub struct ProjectHistory {
    pub store: HistoryStore,
    /// All non-fatal diagnostics, in revision order then path order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Processes the revisions in order and returns the accumulated entity
/// histories.
///
/// A file that fails to extract keeps its previous revision's tree (it is
/// re-diffed once it parses again) and contributes an error diagnostic;
/// other files in the same revision are unaffected. A file missing from a
/// revision's file set is a whole-tree removal.
pub fn process_project(revisions: &[Revision], config: &EngineConfig) -> ProjectHistory {
    let mut store = HistoryStore::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut trees: BTreeMap<String, Entity> = BTreeMap::new();

    for revision in revisions {
        let files: Vec<(&String, &String)> = revision.files.iter().collect();
        let extracted: Vec<(&String, Result<FileModel, ExtractError>)> = files
            .par_iter()
            .map(|(path, content)| (*path, parse_file_with(path, content, config)))
            .collect();

        for (path, outcome) in extracted {
            match outcome {
                Ok(file_model) => {
                    diagnostics.extend(file_model.diagnostics);
                    let script = match trees.get(path.as_str()) {
                        Some(old) => diff(old, &file_model.root, config),
                        None => added_file_script(&file_model.root),
                    };
                    diagnostics.extend(script.diagnostics.iter().cloned());
                    store = aggregate(store, &script, &revision.id, config);
                    trees.insert(path.clone(), file_model.root);
                }
                Err(error) => {
                    debug!(%path, %error, "extraction failed; keeping previous tree");
                    let diagnostic =
                        Diagnostic::error(path.clone(), format!("extraction failed: {error}"));
                    diagnostics.push(match extraction_offset(&error) {
                        Some(offset) => diagnostic.at(offset),
                        None => diagnostic,
                    });
                }
            }
        }

        let gone: Vec<String> = trees
            .keys()
            .filter(|path| !revision.files.contains_key(*path))
            .cloned()
            .collect();
        for path in gone {
            if let Some(root) = trees.remove(&path) {
                let script = removed_file_script(&root);
                store = aggregate(store, &script, &revision.id, config);
            }
        }

        info!(
            revision = %revision.id,
            files = revision.files.len(),
            entities = store.len(),
            "processed revision"
        );
    }

    ProjectHistory { store, diagnostics }
}

fn extraction_offset(error: &ExtractError) -> Option<usize> {
    match error {
        ExtractError::Lex(e) => Some(e.offset),
        ExtractError::Syntax(e) => Some(e.offset),
        ExtractError::Model(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::diffing::domain::ChangeKind;
    use crate::shared::{QualifiedPath, Severity};
    use pretty_assertions::assert_eq;

    fn method_path() -> QualifiedPath {
        QualifiedPath::file("A.java").container("A").member("f()")
    }

    #[test]
    fn test_file_added_then_removed() {
        let revisions = vec![
            Revision::new("r1").with_file("A.java", "class A { void f() {} }"),
            Revision::new("r2"),
        ];
        let project = process_project(&revisions, &EngineConfig::default());
        assert!(project.diagnostics.is_empty());
        assert_eq!(project.store.live_at(&method_path()), None);
        let history = project
            .store
            .iter()
            .find(|h| h.path == method_path())
            .unwrap();
        assert!(history.terminal);
    }

    #[test]
    fn test_unparseable_file_keeps_previous_tree() {
        let revisions = vec![
            Revision::new("r1").with_file("A.java", "class A { int f() { return 1; } }"),
            Revision::new("r2").with_file("A.java", "class A { \"unterminated"),
            Revision::new("r3").with_file("A.java", "class A { int f() { return 2; } }"),
        ];
        let project = process_project(&revisions, &EngineConfig::default());

        let errors: Vec<_> = project
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file, "A.java");

        // r2 contributed nothing; r3 diffs against the r1 tree.
        let history = project.store.history_at(&method_path()).unwrap();
        let changes: Vec<ChangeKind> = history.entries.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![ChangeKind::Added, ChangeKind::Modified]);
        let revisions_seen: Vec<&str> =
            history.revisions().map(|r| r.as_str()).collect();
        assert_eq!(revisions_seen, vec!["r1", "r3"]);
    }

    #[test]
    fn test_failed_file_does_not_affect_others() {
        let revisions = vec![Revision::new("r1")
            .with_file("A.java", "class A {")
            .with_file("B.java", "class B { void g() {} }")];
        let project = process_project(&revisions, &EngineConfig::default());
        let g = QualifiedPath::file("B.java").container("B").member("g()");
        assert!(project.store.history_at(&g).is_some());
        assert_eq!(
            project
                .diagnostics
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .count(),
            1
        );
    }

    #[test]
    fn test_deterministic_across_runs() {
        let revisions = vec![
            Revision::new("r1")
                .with_file("A.java", "class A { void f() {} void g() {} }")
                .with_file("B.java", "class B { int x; }"),
            Revision::new("r2")
                .with_file("A.java", "class A { void f() {} void h() {} }")
                .with_file("B.java", "class B { int x; int y; }"),
        ];
        let config = EngineConfig::default();
        let first = process_project(&revisions, &config);
        let second = process_project(&revisions, &config);
        let ids_first: Vec<_> = first.store.iter().map(|h| (h.id, h.path.clone())).collect();
        let ids_second: Vec<_> = second.store.iter().map(|h| (h.id, h.path.clone())).collect();
        assert_eq!(ids_first, ids_second);
    }

    #[test]
    fn test_empty_project() {
        let project = process_project(&[], &EngineConfig::default());
        assert!(project.store.is_empty());
        assert!(project.diagnostics.is_empty());
    }
}
