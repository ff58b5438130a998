//! Declaration syntax building
//!
//! Consumes the token stream and produces a concrete syntax tree for
//! declarations only. Statement bodies, initializer blocks and default
//! values are retained as opaque token spans, never parsed into expression
//! trees. One malformed member does not abort extraction of the rest of the
//! file.

pub mod application;
pub mod domain;

pub use application::{parse, ParseOutcome};
pub use domain::{DeclKind, Declaration, Parameter, SourceFileSyntax};
