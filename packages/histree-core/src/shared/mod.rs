//! Shared models used across feature slices.

pub mod models;

pub use models::{
    Diagnostic, Location, ModifierSet, QualifiedPath, Segment, SegmentKind, Severity, Span,
};
