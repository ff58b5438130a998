pub mod history;

pub use history::{EntityHistory, EntityId, HistoryEntry, HistoryStore, RevisionId};
