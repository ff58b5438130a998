//! Canonical entity model
//!
//! Lowers the declaration CST into a formatting-independent entity tree and
//! computes a stable structural signature per entity.

pub mod application;
pub mod domain;

pub use application::{build, FileModel};
pub use domain::{Entity, EntityKind, Signature, TypeKind, ANONYMOUS_TYPE_NAME};
