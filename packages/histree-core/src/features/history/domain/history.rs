//! History records and the in-memory store
//!
//! `HistoryStore` is a value passed into and out of the aggregator; there
//! is no global registry. Identifiers are dense `u64`s handed out in
//! first-seen order, so two runs over the same revision sequence produce
//! identical stores.

use crate::features::diffing::domain::ChangeKind;
use crate::shared::QualifiedPath;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque, ordered label of one revision as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of one logical entity across revisions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// One event in an entity's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub revision: RevisionId,
    pub change: ChangeKind,
    /// The entity's path after this event.
    pub path: QualifiedPath,
}

/// Append-only record of one logical entity.
///
/// The first entry is always `Added`; a `Removed` entry is terminal and no
/// further entries are appended under this identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHistory {
    pub id: EntityId,
    /// Current (or final) qualified path.
    pub path: QualifiedPath,
    pub entries: Vec<HistoryEntry>,
    pub terminal: bool,
}

impl EntityHistory {
    pub fn begin(id: EntityId, path: QualifiedPath, revision: RevisionId) -> Self {
        let entry = HistoryEntry {
            revision,
            change: ChangeKind::Added,
            path: path.clone(),
        };
        Self {
            id,
            path,
            entries: vec![entry],
            terminal: false,
        }
    }

    pub fn record(&mut self, revision: RevisionId, change: ChangeKind) {
        self.entries.push(HistoryEntry {
            revision,
            change,
            path: self.path.clone(),
        });
        if change == ChangeKind::Removed {
            self.terminal = true;
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.terminal
    }

    /// Revisions this entity was touched in, in processing order.
    pub fn revisions(&self) -> impl Iterator<Item = &RevisionId> {
        self.entries.iter().map(|e| &e.revision)
    }
}

/// All entity histories of a project plus the live path index.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    histories: FxHashMap<EntityId, EntityHistory>,
    /// Paths of live entities only; removed entities are unindexed.
    index: FxHashMap<QualifiedPath, EntityId>,
    next: u64,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    pub(crate) fn insert(&mut self, history: EntityHistory) {
        self.index.insert(history.path.clone(), history.id);
        self.histories.insert(history.id, history);
    }

    pub(crate) fn unindex(&mut self, path: &QualifiedPath) -> Option<EntityId> {
        self.index.remove(path)
    }

    pub(crate) fn reindex(&mut self, old: &QualifiedPath, new: QualifiedPath) -> Option<EntityId> {
        let id = self.index.remove(old)?;
        if let Some(history) = self.histories.get_mut(&id) {
            history.path = new.clone();
        }
        self.index.insert(new, id);
        Some(id)
    }

    /// Re-key every live entity at or under `old_prefix` onto `new_prefix`.
    ///
    /// Returns the identifier of the entity at `old_prefix` itself, if one
    /// was live there. Descendants keep their identifiers; only their index
    /// keys and recorded paths change.
    pub(crate) fn rebase_tree(
        &mut self,
        old_prefix: &QualifiedPath,
        new_prefix: &QualifiedPath,
    ) -> Option<EntityId> {
        let affected: Vec<QualifiedPath> = self
            .index
            .keys()
            .filter(|path| path.starts_with(old_prefix))
            .cloned()
            .collect();
        let mut root = None;
        for old_path in affected {
            if let Some(new_path) = old_path.rebase(old_prefix, new_prefix) {
                let id = self.reindex(&old_path, new_path);
                if old_path == *old_prefix {
                    root = id;
                }
            }
        }
        root
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityHistory> {
        self.histories.get_mut(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityHistory> {
        self.histories.get(&id)
    }

    /// Identifier of the live entity at `path`, if any.
    pub fn live_at(&self, path: &QualifiedPath) -> Option<EntityId> {
        self.index.get(path).copied()
    }

    pub fn history_at(&self, path: &QualifiedPath) -> Option<&EntityHistory> {
        self.live_at(path).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Histories in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EntityHistory> {
        let mut all: Vec<&EntityHistory> = self.histories.values().collect();
        all.sort_by_key(|h| h.id);
        all.into_iter()
    }
}

/// Serialized as the identifier-ordered history list; the live-path index
/// and the next identifier are derived, so they are rebuilt on load.
impl Serialize for HistoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for HistoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let histories = Vec::<EntityHistory>::deserialize(deserializer)?;
        let mut store = HistoryStore::new();
        for history in histories {
            store.next = store.next.max(history.id.0 + 1);
            if history.is_alive() {
                store.index.insert(history.path.clone(), history.id);
            }
            store.histories.insert(history.id, history);
        }
        Ok(store)
    }
}
