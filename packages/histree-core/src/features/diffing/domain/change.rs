//! Edit script model
//!
//! A [RevisionEditScript] is the ordered list of structural changes between
//! two entity trees. `Added`/`Removed` changes cover whole subtrees; the
//! snapshots carry the affected entities so the history aggregator can walk
//! them without re-parsing.

use crate::features::model::domain::Entity;
use crate::shared::{Diagnostic, QualifiedPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
    Moved,
}

/// One structural change between two revisions of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    /// Path of the entity in the new revision. A `Removed` entity keeps
    /// its old-revision path, except inside a renamed or moved ancestor,
    /// where the path is expressed under the ancestor's new prefix.
    pub path: QualifiedPath,
    /// Old path for `Moved` changes.
    pub from_path: Option<QualifiedPath>,
    pub before: Option<Entity>,
    pub after: Option<Entity>,
}

impl Change {
    pub fn added(after: Entity) -> Self {
        Self {
            kind: ChangeKind::Added,
            path: after.path.clone(),
            from_path: None,
            before: None,
            after: Some(after),
        }
    }

    pub fn removed(before: Entity) -> Self {
        Self {
            kind: ChangeKind::Removed,
            path: before.path.clone(),
            from_path: None,
            before: Some(before),
            after: None,
        }
    }

    pub fn modified(before: Entity, after: Entity) -> Self {
        Self {
            kind: ChangeKind::Modified,
            path: after.path.clone(),
            from_path: None,
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn moved(before: Entity, after: Entity) -> Self {
        Self {
            kind: ChangeKind::Moved,
            path: after.path.clone(),
            from_path: Some(before.path.clone()),
            before: Some(before),
            after: Some(after),
        }
    }
}

/// Ordered, deterministic sequence of changes between two entity trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevisionEditScript {
    pub changes: Vec<Change>,
    /// Match ambiguity reports; never silently dropped.
    pub diagnostics: Vec<Diagnostic>,
}

impl RevisionEditScript {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    /// Changes of one kind, in script order.
    pub fn of_kind(&self, kind: ChangeKind) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::model::domain::{Entity, EntityKind};

    #[test]
    fn test_script_serializes() {
        let entity = Entity::new(
            EntityKind::Field,
            "DEBUG",
            QualifiedPath::file("A.java").container("A").member("DEBUG"),
        );
        let script = RevisionEditScript {
            changes: vec![Change::added(entity)],
            diagnostics: Vec::new(),
        };
        let json = serde_json::to_string(&script).unwrap();
        let back: RevisionEditScript = serde_json::from_str(&json).unwrap();
        assert_eq!(back, script);
    }
}
