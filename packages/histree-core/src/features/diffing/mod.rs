//! Revision diffing
//!
//! Aligns two entity trees of the same logical file and produces a
//! deterministic edit script: additions, deletions, modifications and
//! moves, keyed by structural signature equality.

pub mod application;
pub mod domain;

pub use application::diff;
pub use domain::{Change, ChangeKind, RevisionEditScript};
