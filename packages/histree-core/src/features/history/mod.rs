//! Append-only entity histories
//!
//! Accumulates edit scripts across revisions into one record per logical
//! entity. Identity survives modifications and (by default) moves; a
//! removal is terminal and a later entity at the same path is a fresh
//! identity.

pub mod application;
pub mod domain;

pub use application::aggregate;
pub use domain::{EntityHistory, EntityId, HistoryEntry, HistoryStore, RevisionId};
