//! Entity model builder
//!
//! Depth-first walk of the CST: computes explicit and implicit modifiers,
//! the structural signature, and the extended qualified path for every
//! declaration; synthesizes anonymous type entities for enum constant
//! bodies and resolves their override relations against the enclosing
//! enum's abstract member set.

use crate::config::{DuplicatePolicy, EngineConfig};
use crate::errors::ModelError;
use crate::features::model::application::doc;
use crate::features::model::domain::{
    Entity, EntityKind, Signature, TypeKind, ANONYMOUS_TYPE_NAME,
};
use crate::features::syntax::domain::{DeclKind, Declaration, SourceFileSyntax};
use crate::shared::{Diagnostic, QualifiedPath};
use std::collections::HashMap;
use std::collections::HashSet;
use tracing::warn;

/// Entity tree for one (file, revision) pair, plus the non-fatal
/// diagnostics produced while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileModel {
    pub path: String,
    pub root: Entity,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lowers a CST into a canonical entity tree.
pub fn build(
    path: &str,
    syntax: &SourceFileSyntax,
    config: &EngineConfig,
) -> Result<FileModel, ModelError> {
    let mut builder = Builder {
        file: path,
        config,
        diagnostics: Vec::new(),
    };
    let root = builder.build_root(syntax)?;
    Ok(FileModel {
        path: path.to_string(),
        root,
        diagnostics: builder.diagnostics,
    })
}

struct Builder<'a> {
    file: &'a str,
    config: &'a EngineConfig,
    diagnostics: Vec<Diagnostic>,
}

impl Builder<'_> {
    fn build_root(&mut self, syntax: &SourceFileSyntax) -> Result<Entity, ModelError> {
        let path = QualifiedPath::file(self.file);
        let package = syntax.package.clone().unwrap_or_default();
        let mut root = Entity::new(EntityKind::Package, package, path.clone());
        let mut children = Vec::new();
        for decl in &syntax.types {
            children.push(self.build_type(decl, &path)?);
        }
        root.children = self.check_siblings(children, &path)?;
        Ok(root)
    }

    fn build_type(
        &mut self,
        decl: &Declaration,
        parent_path: &QualifiedPath,
    ) -> Result<Entity, ModelError> {
        let type_kind = match decl.kind {
            DeclKind::Class => TypeKind::Class,
            DeclKind::Interface => TypeKind::Interface,
            DeclKind::Enum => TypeKind::Enum,
            DeclKind::Annotation => TypeKind::Annotation,
            _ => unreachable!("build_type called with a member declaration"),
        };
        let path = parent_path.container(&decl.name);
        let mut entity = Entity::new(EntityKind::Type(type_kind), &decl.name, path.clone());
        entity.modifiers = decl.modifiers.iter().cloned().collect();
        entity.supertypes = decl.supertypes.iter().cloned().collect();
        entity.doc = decl.doc.as_deref().map(doc::normalize);

        // Abstract member set of an enum, for resolving overrides in the
        // anonymous bodies of its constants.
        let abstract_methods: HashMap<Signature, QualifiedPath> = if type_kind == TypeKind::Enum {
            decl.children
                .iter()
                .filter(|c| c.kind == DeclKind::Method && c.modifiers.iter().any(|m| m == "abstract"))
                .map(|c| {
                    let signature = method_signature(c);
                    let method_path = path.member(signature.render());
                    (signature, method_path)
                })
                .collect()
        } else {
            HashMap::new()
        };

        let mut children = Vec::new();
        for child in &decl.children {
            if let Some(entity) =
                self.build_member(child, &path, type_kind, &abstract_methods)?
            {
                children.push(entity);
            }
        }
        entity.children = self.check_siblings(children, &path)?;
        Ok(entity)
    }

    fn build_member(
        &mut self,
        decl: &Declaration,
        parent_path: &QualifiedPath,
        enclosing: TypeKind,
        abstract_methods: &HashMap<Signature, QualifiedPath>,
    ) -> Result<Option<Entity>, ModelError> {
        if decl.kind.is_type() {
            return Ok(Some(self.build_type(decl, parent_path)?));
        }
        let mut entity = match decl.kind {
            DeclKind::Method => {
                let signature = method_signature(decl);
                let path = parent_path.member(signature.render());
                let mut entity = Entity::new(EntityKind::Method, &decl.name, path);
                entity.signature = signature;
                entity.parameters = decl.parameters.clone();
                entity.body = decl.body_tokens.clone();
                entity.overrides = abstract_methods.get(&entity.signature).cloned();
                entity
            }
            DeclKind::Field => {
                let path = parent_path.member(&decl.name);
                let mut entity = Entity::new(EntityKind::Field, &decl.name, path);
                entity.body = decl.body_tokens.clone();
                entity
            }
            DeclKind::EnumConstant => {
                return Ok(Some(self.build_enum_constant(decl, parent_path, abstract_methods)?))
            }
            DeclKind::AnnotationElement => {
                let path = parent_path.member(&decl.name);
                let mut entity = Entity::new(EntityKind::AnnotationElement, &decl.name, path);
                entity.default_value = decl.default_tokens.clone();
                entity
            }
            _ => unreachable!("type declarations handled above"),
        };
        entity.modifiers = decl.modifiers.iter().cloned().collect();
        for implicit in implicit_modifiers(decl, enclosing) {
            entity.modifiers.insert(implicit);
        }
        entity.doc = decl.doc.as_deref().map(doc::normalize);
        Ok(Some(entity))
    }

    fn build_enum_constant(
        &mut self,
        decl: &Declaration,
        parent_path: &QualifiedPath,
        abstract_methods: &HashMap<Signature, QualifiedPath>,
    ) -> Result<Entity, ModelError> {
        let path = parent_path.member(&decl.name);
        let mut constant = Entity::new(EntityKind::EnumConstant, &decl.name, path.clone());
        constant.modifiers = decl.modifiers.iter().cloned().collect();
        for implicit in ["public", "static", "final"] {
            constant.modifiers.insert(implicit);
        }
        constant.doc = decl.doc.as_deref().map(doc::normalize);
        constant.body = decl.body_tokens.clone();

        if decl.has_anonymous_body {
            let anon_path = path.container(ANONYMOUS_TYPE_NAME);
            let mut anon = Entity::new(
                EntityKind::Type(TypeKind::Class),
                ANONYMOUS_TYPE_NAME,
                anon_path.clone(),
            );
            let mut members = Vec::new();
            for child in &decl.children {
                if let Some(entity) =
                    self.build_member(child, &anon_path, TypeKind::Class, abstract_methods)?
                {
                    members.push(entity);
                }
            }
            anon.children = self.check_siblings(members, &anon_path)?;
            constant.children.push(anon);
        }
        Ok(constant)
    }

    /// Enforces the sibling invariant: within one parent, the set of
    /// structural signatures of direct children is unique.
    fn check_siblings(
        &mut self,
        children: Vec<Entity>,
        parent_path: &QualifiedPath,
    ) -> Result<Vec<Entity>, ModelError> {
        let mut seen: HashSet<Signature> = HashSet::with_capacity(children.len());
        let mut kept = Vec::with_capacity(children.len());
        for child in children {
            if seen.insert(child.signature.clone()) {
                kept.push(child);
                continue;
            }
            match self.config.duplicate_policy {
                DuplicatePolicy::Fail => {
                    return Err(ModelError::DuplicateSignature {
                        path: child.path.clone(),
                    })
                }
                DuplicatePolicy::KeepFirst => {
                    warn!(file = self.file, path = %child.path, "duplicate signature, keeping first occurrence");
                    self.diagnostics.push(Diagnostic::warning(
                        self.file,
                        format!("duplicate signature '{}' in {}", child.signature, parent_path),
                    ));
                }
            }
        }
        Ok(kept)
    }
}

fn method_signature(decl: &Declaration) -> Signature {
    Signature::method(
        &decl.name,
        decl.parameters.iter().map(|p| p.type_name.clone()).collect(),
    )
}

/// Implicit modifiers mandated by the enclosing declaration kind.
fn implicit_modifiers(decl: &Declaration, enclosing: TypeKind) -> Vec<&'static str> {
    match (enclosing, decl.kind) {
        (TypeKind::Interface, DeclKind::Method) => {
            let explicit_default_or_static = decl
                .modifiers
                .iter()
                .any(|m| m == "default" || m == "static");
            if explicit_default_or_static {
                vec!["public"]
            } else {
                vec!["public", "abstract"]
            }
        }
        (TypeKind::Interface, DeclKind::Field) | (TypeKind::Annotation, DeclKind::Field) => {
            vec!["public", "static", "final"]
        }
        (TypeKind::Annotation, DeclKind::AnnotationElement) => vec!["public", "abstract"],
        _ => Vec::new(),
    }
}
