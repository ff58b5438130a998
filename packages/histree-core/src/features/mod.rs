//! Vertical feature slices: lexing → syntax → model → diffing → history.

pub mod diffing;
pub mod history;
pub mod lexing;
pub mod model;
pub mod syntax;
