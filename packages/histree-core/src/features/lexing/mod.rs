//! Lossless tokenization
//!
//! Converts raw source text into an ordered token sequence that covers the
//! input exactly: concatenating the token texts in order reproduces the
//! source byte-for-byte, including whitespace and comments.

pub mod application;
pub mod domain;

pub use application::tokenize;
pub use domain::{Token, TokenKind};
