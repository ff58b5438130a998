pub mod cst;

pub use cst::{DeclKind, Declaration, Parameter, SourceFileSyntax};
