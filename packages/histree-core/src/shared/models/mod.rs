pub mod diagnostics;
pub mod modifiers;
pub mod path;
pub mod span;

pub use diagnostics::{Diagnostic, Severity};
pub use modifiers::ModifierSet;
pub use path::{QualifiedPath, Segment, SegmentKind};
pub use span::{Location, Span};
