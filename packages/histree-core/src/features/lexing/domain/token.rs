//! Token model
//!
//! Tokens are immutable once produced and carry their raw source text plus
//! positional data, so formatting can be discarded later without losing
//! semantic boundaries.

use crate::shared::Location;
use serde::{Deserialize, Serialize};

/// Java keywords recognised by the tokenizer, including contextual ones the
/// declaration parser cares about (`default` doubles as a modifier).
pub const KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    /// Numeric literal, `true`/`false`/`null` are keywords in the JLS but
    /// identifiers here; neither occurs in declaration headers.
    Literal,
    StringLiteral,
    CharLiteral,
    Punct,
    LineComment,
    BlockComment,
    Whitespace,
}

/// One lexeme of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// Whitespace and comments carry no declaration structure.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// A javadoc comment starts with `/**` and is not the degenerate `/**/`.
    pub fn is_javadoc(&self) -> bool {
        self.kind == TokenKind::BlockComment && self.text.starts_with("/**") && self.text.len() > 4
    }

    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.chars().next() == Some(c) && self.text.len() == c.len_utf8()
    }

    pub fn is_keyword(&self, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == kw
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }
}
