pub mod change;
pub mod similarity;

pub use change::{Change, ChangeKind, RevisionEditScript};
