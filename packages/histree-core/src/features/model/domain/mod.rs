pub mod entity;

pub use entity::{Entity, EntityKind, Signature, TypeKind, ANONYMOUS_TYPE_NAME};
