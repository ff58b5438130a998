//! Entity tree
//!
//! Entities are owned exclusively by their parent; no entity is shared
//! across parents. The structural signature is the identity key used for
//! cross-revision matching: kind + simple name + ordered parameter types,
//! deliberately excluding formatting, comment text and statement bodies.
//! Everything else that can change without changing identity (modifiers,
//! supertypes, bodies, default values) lives in the content fingerprint.

use crate::features::syntax::domain::Parameter;
use crate::shared::{ModifierSet, QualifiedPath};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

/// Path segment name of the synthetic type owning an enum constant's
/// anonymous body. Constants have no identifier for their bodies, so a
/// fixed marker keys them consistently across revisions.
pub const ANONYMOUS_TYPE_NAME: &str = "<anon>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The file root: the package scope the file's types are declared in.
    Package,
    Type(TypeKind),
    Method,
    Field,
    EnumConstant,
    AnnotationElement,
}

impl EntityKind {
    pub fn is_container(&self) -> bool {
        matches!(self, EntityKind::Package | EntityKind::Type(_))
    }
}

/// Formatting-independent identity key for an entity among its siblings.
///
/// Overloaded methods are distinguished solely by their parameter-type
/// sequence; two methods with identical name and parameter types are
/// indistinguishable and raise `ModelError::DuplicateSignature`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub kind: EntityKind,
    pub name: String,
    pub param_types: Vec<String>,
}

impl Signature {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            param_types: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>, param_types: Vec<String>) -> Self {
        Self {
            kind: EntityKind::Method,
            name: name.into(),
            param_types,
        }
    }

    /// Rendered form: `countTo(int)` for methods, the simple name otherwise.
    pub fn render(&self) -> String {
        if self.kind == EntityKind::Method {
            format!("{}({})", self.name, self.param_types.join(","))
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Canonical, formatting-independent representation of a declared code
/// element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub name: String,
    pub path: QualifiedPath,
    pub signature: Signature,
    pub modifiers: ModifierSet,
    /// `extends`/`implements` type names for type entities.
    pub supertypes: BTreeSet<String>,
    /// Formal parameters for methods and constructors.
    pub parameters: Vec<Parameter>,
    /// Normalized documentation text; excluded from the content fingerprint
    /// so comment edits never produce diff entries.
    pub doc: Option<String>,
    /// Trivia-stripped tokens of the opaque body span (method body, field
    /// initializer or enum constant arguments).
    pub body: Vec<String>,
    /// Annotation element default value tokens.
    pub default_value: Vec<String>,
    /// Back-reference (relation, not ownership) to the abstract method this
    /// entity satisfies, for methods in enum constant anonymous bodies.
    pub overrides: Option<QualifiedPath>,
    /// Child entities in source order.
    pub children: Vec<Entity>,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>, path: QualifiedPath) -> Self {
        let name = name.into();
        let signature = Signature::new(kind, &name);
        Self {
            kind,
            name,
            path,
            signature,
            modifiers: ModifierSet::new(),
            supertypes: BTreeSet::new(),
            parameters: Vec::new(),
            doc: None,
            body: Vec::new(),
            default_value: Vec::new(),
            overrides: None,
            children: Vec::new(),
        }
    }

    /// Digest of everything that counts as a modification at the same
    /// signature: modifiers, supertypes, parameters, body and default
    /// value. Children diff on their own; doc text is excluded.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        let mut feed = |part: &str| {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        };
        for modifier in self.modifiers.iter() {
            feed(modifier);
        }
        feed("|");
        for supertype in &self.supertypes {
            feed(supertype);
        }
        feed("|");
        for parameter in &self.parameters {
            feed(&parameter.type_name);
            feed(&parameter.name);
        }
        feed("|");
        for token in &self.body {
            feed(token);
        }
        feed("|");
        for token in &self.default_value {
            feed(token);
        }
        hasher.finalize().into()
    }

    /// Preorder walk over this entity and all of its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn child_by_signature(&self, signature: &Signature) -> Option<&Entity> {
        self.children.iter().find(|c| &c.signature == signature)
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a Entity>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Entity;

    fn next(&mut self) -> Option<Self::Item> {
        let entity = self.stack.pop()?;
        self.stack.extend(entity.children.iter().rev());
        Some(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: Vec<&str>) -> Entity {
        let signature =
            Signature::method(name, params.into_iter().map(String::from).collect());
        let path = QualifiedPath::file("A.java")
            .container("A")
            .member(signature.render());
        let mut entity = Entity::new(EntityKind::Method, name, path);
        entity.signature = signature;
        entity
    }

    #[test]
    fn test_signature_render() {
        assert_eq!(
            Signature::method("countTo", vec!["int".into()]).render(),
            "countTo(int)"
        );
        assert_eq!(
            Signature::new(EntityKind::Field, "DEBUG").render(),
            "DEBUG"
        );
    }

    #[test]
    fn test_overloads_are_distinct() {
        let a = method("f", vec!["int"]);
        let b = method("f", vec!["long"]);
        assert_ne!(a.signature, b.signature);
        assert_eq!(a.signature, method("f", vec!["int"]).signature);
    }

    #[test]
    fn test_fingerprint_ignores_doc() {
        let mut a = method("f", vec![]);
        let mut b = a.clone();
        a.doc = Some("old".into());
        b.doc = Some("new".into());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_tracks_modifiers_and_body() {
        let base = method("f", vec![]);
        let mut modified = base.clone();
        modified.modifiers.insert("static");
        assert_ne!(base.fingerprint(), modified.fingerprint());

        let mut body_changed = base.clone();
        body_changed.body = vec!["return".into(), "1".into(), ";".into()];
        assert_ne!(base.fingerprint(), body_changed.fingerprint());
    }

    #[test]
    fn test_walk_preorder() {
        let mut root = Entity::new(EntityKind::Package, "", QualifiedPath::file("A.java"));
        let mut ty = Entity::new(
            EntityKind::Type(TypeKind::Class),
            "A",
            root.path.container("A"),
        );
        ty.children.push(method("f", vec![]));
        root.children.push(ty);
        let names: Vec<&str> = root.walk().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["", "A", "f"]);
    }
}
