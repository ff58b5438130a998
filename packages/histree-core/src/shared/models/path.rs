//! Qualified entity paths
//!
//! A [QualifiedPath] identifies an entity by the ordered sequence of simple
//! names from the project root: the file path first, then the enclosing
//! types, then the member. Rendering uses `:` before container segments and
//! `#` before member segments, so `src/Main.java:Main#getVersion()` names a
//! method inside a top-level type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a segment attaches to its parent in the rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// The file path at the root of every entity path.
    File,
    /// A type (or synthetic anonymous type) nested in its parent.
    Container,
    /// A method, field, enum constant or annotation element.
    Member,
}

/// One simple name in a qualified path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub name: String,
}

impl Segment {
    fn separator(&self) -> Option<char> {
        match self.kind {
            SegmentKind::File => None,
            SegmentKind::Container => Some(':'),
            SegmentKind::Member => Some('#'),
        }
    }
}

/// Ordered sequence of simple names identifying an entity within a project.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualifiedPath {
    segments: Vec<Segment>,
}

impl QualifiedPath {
    /// Root path for a source file.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                kind: SegmentKind::File,
                name: path.into(),
            }],
        }
    }

    /// Extends this path with a nested type name.
    pub fn container(&self, name: impl Into<String>) -> Self {
        self.child(SegmentKind::Container, name.into())
    }

    /// Extends this path with a member name (the signature rendering for
    /// methods, the simple name otherwise).
    pub fn member(&self, name: impl Into<String>) -> Self {
        self.child(SegmentKind::Member, name.into())
    }

    fn child(&self, kind: SegmentKind, name: String) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment { kind, name });
        Self { segments }
    }

    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn simple_name(&self) -> &str {
        self.segments.last().map(|s| s.name.as_str()).unwrap_or("")
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The file path segment at the root of this path.
    pub fn source_file(&self) -> &str {
        self.segments.first().map(|s| s.name.as_str()).unwrap_or("")
    }

    pub fn starts_with(&self, prefix: &QualifiedPath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// Rebases `self` from under `old_prefix` to under `new_prefix`.
    ///
    /// Returns `None` when `self` is not under `old_prefix`.
    pub fn rebase(&self, old_prefix: &QualifiedPath, new_prefix: &QualifiedPath) -> Option<Self> {
        if !self.starts_with(old_prefix) {
            return None;
        }
        let mut segments = new_prefix.segments.clone();
        segments.extend_from_slice(&self.segments[old_prefix.segments.len()..]);
        Some(Self { segments })
    }

    /// Validates a simple name: separators and quote characters are reserved.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(['/', ':', '#', '\'', '"', '\\'])
    }
}

impl fmt::Display for QualifiedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            if let Some(sep) = segment.separator() {
                write!(f, "{}", sep)?;
            }
            write!(f, "{}", segment.name)?;
        }
        Ok(())
    }
}
