//! Concrete syntax tree for declarations
//!
//! Declaration-shaped nodes only; everything below a declaration header is
//! either a child declaration or an opaque, trivia-stripped token span.
//! Child order is source order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Class,
    Interface,
    Enum,
    /// An `@interface` annotation type declaration.
    Annotation,
    /// Methods and constructors.
    Method,
    Field,
    EnumConstant,
    AnnotationElement,
}

impl DeclKind {
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclKind::Class | DeclKind::Interface | DeclKind::Enum | DeclKind::Annotation
        )
    }
}

/// A formal parameter of a method or constructor. The type name is
/// whitespace-normalized (`Map<String,Integer>`, `int[]`, `int...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// A declaration node in the CST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    /// Explicit modifiers in source order; annotation uses appear as
    /// `@Name` or `@Name(args)` with whitespace dropped.
    pub modifiers: Vec<String>,
    /// `extends` and `implements` clause type names, whitespace-normalized.
    pub supertypes: Vec<String>,
    /// Formal parameters (methods and constructors only).
    pub parameters: Vec<Parameter>,
    /// Child declarations in source order. For enum constants these are the
    /// members of the anonymous body.
    pub children: Vec<Declaration>,
    /// Raw javadoc comment text immediately preceding the declaration.
    pub doc: Option<String>,
    /// Significant tokens of the opaque body span: method body, field
    /// initializer or enum constant arguments.
    pub body_tokens: Vec<String>,
    /// Significant tokens of an annotation element default value.
    pub default_tokens: Vec<String>,
    /// Whether an enum constant carries an anonymous body (an empty body
    /// still counts).
    pub has_anonymous_body: bool,
    /// Byte offset of the declaration header.
    pub offset: usize,
}

impl Declaration {
    pub fn new(kind: DeclKind, name: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Vec::new(),
            supertypes: Vec::new(),
            parameters: Vec::new(),
            children: Vec::new(),
            doc: None,
            body_tokens: Vec::new(),
            default_tokens: Vec::new(),
            has_anonymous_body: false,
            offset,
        }
    }
}

/// Synthetic file node at the root of the CST.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceFileSyntax {
    /// Dotted package name from the `package` declaration, if any.
    pub package: Option<String>,
    /// Top-level type declarations in source order.
    pub types: Vec<Declaration>,
}
