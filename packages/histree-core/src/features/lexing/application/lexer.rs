//! Java tokenizer
//!
//! Single-pass scanner over the source text. Every byte of the input lands
//! in exactly one token; an unterminated comment or literal is a fatal
//! [LexError] for the file.

use crate::errors::{LexError, LexErrorKind};
use crate::features::lexing::domain::{Token, TokenKind, KEYWORDS};
use crate::shared::Location;

/// Tokenizes `source` into a lossless token sequence.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn location(&self) -> Location {
        Location::new(self.pos, self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn token(&self, kind: TokenKind, start: Location) -> Token {
        Token::new(kind, &self.src[start.offset..self.pos], start)
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let start = self.location();
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };
        let token = match c {
            c if c.is_whitespace() => self.whitespace(start),
            '/' if self.peek_second() == Some('/') => self.line_comment(start),
            '/' if self.peek_second() == Some('*') => self.block_comment(start)?,
            '"' => self.string_literal(start)?,
            '\'' => self.char_literal(start)?,
            c if is_identifier_start(c) => self.identifier(start),
            c if c.is_ascii_digit() => self.number(start),
            '`' | '\\' => {
                return Err(LexError {
                    offset: start.offset,
                    kind: LexErrorKind::UnexpectedChar(c),
                })
            }
            _ => {
                self.bump();
                self.token(TokenKind::Punct, start)
            }
        };
        Ok(Some(token))
    }

    fn whitespace(&mut self, start: Location) -> Token {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.token(TokenKind::Whitespace, start)
    }

    fn line_comment(&mut self, start: Location) -> Token {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        self.token(TokenKind::LineComment, start)
    }

    /// Block and javadoc comments. Inline tags like `{@code …}` are opaque
    /// text as far as tokenization is concerned.
    fn block_comment(&mut self, start: Location) -> Result<Token, LexError> {
        self.bump(); // '/'
        self.bump(); // '*'
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    return Ok(self.token(TokenKind::BlockComment, start));
                }
                Some(_) => {}
                None => {
                    return Err(LexError {
                        offset: start.offset,
                        kind: LexErrorKind::UnterminatedBlockComment,
                    })
                }
            }
        }
    }

    fn string_literal(&mut self, start: Location) -> Result<Token, LexError> {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError {
                        offset: start.offset,
                        kind: LexErrorKind::UnterminatedString,
                    })
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('"') => {
                    self.bump();
                    return Ok(self.token(TokenKind::StringLiteral, start));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn char_literal(&mut self, start: Location) -> Result<Token, LexError> {
        self.bump(); // opening quote
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexError {
                        offset: start.offset,
                        kind: LexErrorKind::UnterminatedChar,
                    })
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('\'') => {
                    self.bump();
                    return Ok(self.token(TokenKind::CharLiteral, start));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn identifier(&mut self, start: Location) -> Token {
        while self.peek().is_some_and(is_identifier_part) {
            self.bump();
        }
        let text = &self.src[start.offset..self.pos];
        let kind = if KEYWORDS.contains(&text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.token(kind, start)
    }

    /// Numeric literals: decimal, hex/binary/octal, underscores, floating
    /// point with exponents and type suffixes are all folded into one token.
    fn number(&mut self, start: Location) -> Token {
        let mut prev = '0';
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '_' => {
                    prev = c;
                    self.bump();
                }
                Some('.') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                    prev = '.';
                    self.bump();
                }
                Some(c @ ('+' | '-'))
                    if matches!(prev, 'e' | 'E')
                        && self.peek_second().is_some_and(|c| c.is_ascii_digit()) =>
                {
                    prev = c;
                    self.bump();
                }
                _ => break,
            }
        }
        self.token(TokenKind::Literal, start)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn rejoin(source: &str) -> String {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn test_simple_declaration() {
        let source = "public class A {}";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Keyword,
                TokenKind::Whitespace,
                TokenKind::Keyword,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Punct,
                TokenKind::Punct,
            ]
        );
        assert_eq!(rejoin(source), source);
    }

    #[test]
    fn test_comments() {
        let source = "// line\n/* block */\n/** javadoc {@code int x = 1;} */";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[2].kind, TokenKind::BlockComment);
        assert!(!tokens[2].is_javadoc());
        assert!(tokens[4].is_javadoc());
        // The inline tag stays inside the comment token.
        assert!(tokens[4].text.contains("{@code int x = 1;}"));
        assert_eq!(rejoin(source), source);
    }

    #[test]
    fn test_string_and_char_escapes() {
        let source = r#"String s = "a\"b\\"; char c = '\'';"#;
        let tokens = tokenize(source).unwrap();
        let string = tokens.iter().find(|t| t.kind == TokenKind::StringLiteral);
        assert_eq!(string.unwrap().text, r#""a\"b\\""#);
        let ch = tokens.iter().find(|t| t.kind == TokenKind::CharLiteral);
        assert_eq!(ch.unwrap().text, r"'\''");
        assert_eq!(rejoin(source), source);
    }

    #[test]
    fn test_unicode_identifier() {
        let tokens = tokenize("int número = π;").unwrap();
        let idents: Vec<&str> = tokens
            .iter()
            .filter(|t| t.is_identifier())
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(idents, vec!["número", "π"]);
    }

    #[test]
    fn test_numeric_literals() {
        let source = "int a = 0xFF; long b = 1_000L; double d = 1.5e-3;";
        let literals: Vec<String> = tokenize(source)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == TokenKind::Literal)
            .map(|t| t.text)
            .collect();
        assert_eq!(literals, vec!["0xFF", "1_000L", "1.5e-3"]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = tokenize("int a; /* oops").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedBlockComment);
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("String s = \"abc\nmore").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a\n  b").unwrap();
        let b = tokens.last().unwrap();
        assert_eq!(b.location.line, 2);
        assert_eq!(b.location.column, 3);
        assert_eq!(b.offset(), 4);
    }

    proptest! {
        /// If tokenization succeeds, concatenating the token texts in order
        /// reproduces the input byte-for-byte.
        #[test]
        fn prop_round_trip(source in "[ -~\\n]{0,200}") {
            if let Ok(tokens) = tokenize(&source) {
                let rejoined: String = tokens.into_iter().map(|t| t.text).collect();
                prop_assert_eq!(rejoined, source);
            }
        }
    }
}
