//! Edit script aggregation
//!
//! Folds one revision's edit script into the history store. `Added` and
//! `Removed` changes carry whole subtrees and every entity in them gets its
//! own record; `Modified` appends to an existing record; `Moved` remaps the
//! subtree's path index according to the configured move policy.

use crate::config::{EngineConfig, MovePolicy};
use crate::features::diffing::domain::{Change, ChangeKind, RevisionEditScript};
use crate::features::history::domain::{EntityHistory, HistoryStore, RevisionId};
use crate::features::model::domain::Entity;
use tracing::debug;

/// Applies `script` to `store` for `revision` and returns the updated
/// store. Scripts must be applied in strictly increasing revision order;
/// within one script, changes are applied in script order.
pub fn aggregate(
    mut store: HistoryStore,
    script: &RevisionEditScript,
    revision: &RevisionId,
    config: &EngineConfig,
) -> HistoryStore {
    for change in script.iter() {
        match change.kind {
            ChangeKind::Added => {
                if let Some(after) = &change.after {
                    open_subtree(&mut store, after, revision);
                }
            }
            ChangeKind::Removed => {
                if let Some(before) = &change.before {
                    close_subtree(&mut store, before, revision);
                }
            }
            ChangeKind::Modified => {
                // A rename reports the modification under the new path while
                // the index still holds the old one; re-key the whole subtree
                // before appending so descendants stay resolvable too.
                let renamed_from = change
                    .before
                    .as_ref()
                    .map(|before| before.path.clone())
                    .filter(|old_path| old_path != &change.path);
                let id = match renamed_from {
                    Some(old_path) => store.rebase_tree(&old_path, &change.path),
                    None => store.live_at(&change.path),
                };
                if let Some(id) = id {
                    if let Some(history) = store.get_mut(id) {
                        history.record(revision.clone(), ChangeKind::Modified);
                    }
                }
            }
            ChangeKind::Moved => apply_move(&mut store, change, revision, config),
        }
    }
    debug!(
        revision = %revision,
        changes = script.len(),
        entities = store.len(),
        "aggregated edit script"
    );
    store
}

/// Opens a fresh record for every entity in an added subtree. A path that
/// was occupied before is a re-introduction: the old record stayed terminal
/// and the new one gets a fresh identifier.
fn open_subtree(store: &mut HistoryStore, root: &Entity, revision: &RevisionId) {
    for entity in root.walk() {
        let id = store.allocate();
        store.insert(EntityHistory::begin(
            id,
            entity.path.clone(),
            revision.clone(),
        ));
    }
}

/// Terminates the record of every entity in a removed subtree and drops
/// the paths from the live index.
fn close_subtree(store: &mut HistoryStore, root: &Entity, revision: &RevisionId) {
    for entity in root.walk() {
        if let Some(id) = store.unindex(&entity.path) {
            if let Some(history) = store.get_mut(id) {
                history.record(revision.clone(), ChangeKind::Removed);
            }
        }
    }
}

fn apply_move(
    store: &mut HistoryStore,
    change: &Change,
    revision: &RevisionId,
    config: &EngineConfig,
) {
    let (Some(before), Some(after)) = (&change.before, &change.after) else {
        return;
    };
    match config.move_policy {
        MovePolicy::ContinueHistory => {
            // The subtree root gets a Moved entry; live descendants keep
            // their records and only have their paths remapped. Entities
            // dropped in the same revision are re-keyed too, so their
            // Removed changes (reported under the new prefix) resolve.
            if let Some(id) = store.rebase_tree(&before.path, &after.path) {
                if let Some(history) = store.get_mut(id) {
                    history.record(revision.clone(), ChangeKind::Moved);
                }
            }
        }
        MovePolicy::NewIdentity => {
            close_subtree(store, before, revision);
            open_subtree(store, after, revision);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::diffing::application::{added_file_script, diff};
    use crate::features::lexing::application::tokenize;
    use crate::features::model::application::build;
    use crate::features::syntax::application::parse;
    use crate::shared::QualifiedPath;
    use pretty_assertions::assert_eq;

    fn model(source: &str) -> Entity {
        let tokens = tokenize(source).unwrap();
        let outcome = parse("A.java", &tokens).unwrap();
        build("A.java", &outcome.syntax, &EngineConfig::default())
            .unwrap()
            .root
    }

    fn revision(n: u32) -> RevisionId {
        RevisionId::new(format!("r{n}"))
    }

    fn run(sources: &[&str]) -> HistoryStore {
        let config = EngineConfig::default();
        let mut store = HistoryStore::new();
        let mut previous: Option<Entity> = None;
        for (n, source) in sources.iter().enumerate() {
            let tree = model(source);
            let script = match &previous {
                None => added_file_script(&tree),
                Some(old) => diff(old, &tree, &config),
            };
            store = aggregate(store, &script, &revision(n as u32 + 1), &config);
            previous = Some(tree);
        }
        store
    }

    fn method_path() -> QualifiedPath {
        QualifiedPath::file("A.java").container("A").member("f()")
    }

    #[test]
    fn test_added_subtree_opens_one_record_per_entity() {
        let store = run(&["class A { void f() {} int x; }"]);
        // Package root, type A, method f, field x.
        assert_eq!(store.len(), 4);
        let history = store.history_at(&method_path()).unwrap();
        assert_eq!(history.entries.len(), 1);
        assert_eq!(history.entries[0].change, ChangeKind::Added);
    }

    #[test]
    fn test_modification_appends_same_id() {
        let store = run(&[
            "class A { int f() { return 1; } }",
            "class A { int f() { return 2; } }",
        ]);
        let history = store.history_at(&method_path()).unwrap();
        let changes: Vec<ChangeKind> = history.entries.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![ChangeKind::Added, ChangeKind::Modified]);
    }

    #[test]
    fn test_removed_is_terminal_and_reintroduction_gets_fresh_id() {
        let store = run(&[
            "class A { void f() {} }",
            "class A {}",
            "class A { void f() {} }",
        ]);
        let reintroduced = store.history_at(&method_path()).unwrap();
        assert_eq!(reintroduced.entries.len(), 1);

        let terminated = store
            .iter()
            .find(|h| h.path == method_path() && h.terminal)
            .unwrap();
        assert_ne!(terminated.id, reintroduced.id);
        let changes: Vec<ChangeKind> = terminated.entries.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![ChangeKind::Added, ChangeKind::Removed]);
    }

    #[test]
    fn test_move_continues_history_by_default() {
        let store = run(&[
            "class A { static class Inner {} void f() {} }",
            "class A { static class Inner { void f() {} } }",
        ]);
        let moved_to = QualifiedPath::file("A.java")
            .container("A")
            .container("Inner")
            .member("f()");
        let history = store.history_at(&moved_to).unwrap();
        let changes: Vec<ChangeKind> = history.entries.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![ChangeKind::Added, ChangeKind::Moved]);
        assert_eq!(store.live_at(&method_path()), None);
    }

    #[test]
    fn test_move_policy_new_identity() {
        let config = EngineConfig {
            move_policy: MovePolicy::NewIdentity,
            ..Default::default()
        };
        let old = model("class A { static class Inner {} void f() {} }");
        let new = model("class A { static class Inner { void f() {} } }");

        let mut store = HistoryStore::new();
        store = aggregate(store, &added_file_script(&old), &revision(1), &config);
        let original = store.history_at(&method_path()).unwrap().id;

        let script = diff(&old, &new, &config);
        store = aggregate(store, &script, &revision(2), &config);

        let moved_to = QualifiedPath::file("A.java")
            .container("A")
            .container("Inner")
            .member("f()");
        let fresh = store.history_at(&moved_to).unwrap();
        assert_ne!(fresh.id, original);
        assert!(store.get(original).unwrap().terminal);
    }

    #[test]
    fn test_renamed_then_removed_entity_is_terminated() {
        let store = run(&[
            "class A { int getCount() { return 0; } }",
            "class A { int getCounts() { return 0; } }",
            "class A {}",
        ]);
        // Package root, type A, and one method record through the rename.
        assert_eq!(store.len(), 3);
        let history = store
            .iter()
            .find(|h| h.path.to_string() == "A.java:A#getCounts()")
            .unwrap();
        let changes: Vec<ChangeKind> = history.entries.iter().map(|e| e.change).collect();
        assert_eq!(
            changes,
            vec![ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed]
        );
        assert!(history.terminal);
        let renamed_to = QualifiedPath::file("A.java").container("A").member("getCounts()");
        assert_eq!(store.live_at(&renamed_to), None);
    }

    #[test]
    fn test_move_with_member_removal_terminates_the_member() {
        let store = run(&[
            "class Outer {} class B { void f() {} void g() {} }",
            "class Outer { class B { void f() {} } }",
        ]);
        let dropped = store
            .iter()
            .find(|h| h.path.to_string() == "A.java:Outer:B#g()")
            .unwrap();
        let changes: Vec<ChangeKind> = dropped.entries.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![ChangeKind::Added, ChangeKind::Removed]);
        assert!(!dropped.is_alive());

        let moved_class = QualifiedPath::file("A.java").container("Outer").container("B");
        let class_history = store.history_at(&moved_class).unwrap();
        let changes: Vec<ChangeKind> = class_history.entries.iter().map(|e| e.change).collect();
        assert_eq!(changes, vec![ChangeKind::Added, ChangeKind::Moved]);

        // The surviving member keeps its record under the new prefix.
        let survivor = QualifiedPath::file("A.java")
            .container("Outer")
            .container("B")
            .member("f()");
        let history = store.history_at(&survivor).unwrap();
        assert_eq!(history.entries.len(), 1);
        assert_eq!(history.entries[0].change, ChangeKind::Added);
    }

    #[test]
    fn test_entries_follow_revision_order() {
        let store = run(&[
            "class A { int f() { return 1; } }",
            "class A { int f() { return 2; } }",
            "class A { int f() { return 3; } }",
        ]);
        let history = store.history_at(&method_path()).unwrap();
        let revisions: Vec<&str> = history.revisions().map(RevisionId::as_str).collect();
        assert_eq!(revisions, vec!["r1", "r2", "r3"]);
    }
}
