//! Declaration parser
//!
//! Builds the declaration CST from the token stream. Trivia is skipped
//! between significant tokens, so declarations may span arbitrary line
//! breaks. Recovery policy: a malformed member skips tokens to the next
//! balanced `;` or brace boundary and records a non-fatal diagnostic.

use crate::errors::SyntaxError;
use crate::features::lexing::domain::{Token, TokenKind};
use crate::features::syntax::domain::{DeclKind, Declaration, Parameter, SourceFileSyntax};
use crate::shared::Diagnostic;
use tracing::debug;

/// Modifier keywords accepted in declaration headers.
const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "default",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
];

/// CST plus the non-fatal diagnostics produced while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub syntax: SourceFileSyntax,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses `tokens` into a declaration CST rooted at a synthetic file node.
///
/// Returns a fatal [SyntaxError] only when recovery cannot resynchronize
/// before the end of the file.
pub fn parse(file: &str, tokens: &[Token]) -> Result<ParseOutcome, SyntaxError> {
    Parser::new(file, tokens).parse_file()
}

struct Parser<'a> {
    file: &'a str,
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    fn new(file: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            file,
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn eof_offset(&self) -> usize {
        self.tokens
            .last()
            .map(|t| t.offset() + t.text.len())
            .unwrap_or(0)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(Token::offset)
            .unwrap_or_else(|| self.eof_offset())
    }

    /// Current significant token; trivia before it is consumed.
    fn peek(&mut self) -> Option<&'a Token> {
        while let Some(token) = self.tokens.get(self.pos) {
            if token.is_trivia() {
                self.pos += 1;
            } else {
                return Some(token);
            }
        }
        None
    }

    /// N-th significant token after the current one, without consuming.
    fn peek_nth(&mut self, n: usize) -> Option<&'a Token> {
        self.peek()?;
        let mut seen = 0;
        for token in &self.tokens[self.pos..] {
            if token.is_trivia() {
                continue;
            }
            if seen == n {
                return Some(token);
            }
            seen += 1;
        }
        None
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Skips trivia and returns the last javadoc comment in the run, which
    /// by construction has no intervening significant token before the next
    /// declaration.
    fn skip_trivia_capture_doc(&mut self) -> Option<String> {
        let mut doc = None;
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.is_trivia() {
                break;
            }
            if token.is_javadoc() {
                doc = Some(token.text.clone());
            }
            self.pos += 1;
        }
        doc
    }

    fn eat_punct(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|t| t.is_punct(c)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(kw)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_punct(&mut self, c: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(c))
    }

    fn expect_punct(&mut self, c: char, expected: &'static str) -> Result<(), SyntaxError> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(self.unexpected(&[expected]))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        match self.peek() {
            Some(token) if token.is_identifier() => {
                self.pos += 1;
                Ok(token.text.clone())
            }
            _ => Err(self.unexpected(&["identifier"])),
        }
    }

    fn unexpected(&mut self, expected: &[&'static str]) -> SyntaxError {
        SyntaxError {
            offset: self.offset(),
            expected: expected.to_vec(),
        }
    }

    // ------------------------------------------------------------------
    // File level
    // ------------------------------------------------------------------

    fn parse_file(mut self) -> Result<ParseOutcome, SyntaxError> {
        let mut syntax = SourceFileSyntax::default();
        loop {
            let doc = self.skip_trivia_capture_doc();
            let Some(token) = self.peek() else { break };
            if token.is_keyword("package") {
                self.pos += 1;
                syntax.package = Some(self.parse_dotted_name()?);
                self.expect_punct(';', ";")?;
                continue;
            }
            if token.is_keyword("import") {
                self.skip_to_semicolon();
                continue;
            }
            if token.is_punct(';') {
                self.pos += 1;
                continue;
            }
            match self.parse_type_decl(doc) {
                Ok(decl) => syntax.types.push(decl),
                Err(error) => {
                    debug!(file = self.file, offset = error.offset, "recovering from malformed top-level declaration");
                    self.diagnostics.push(
                        Diagnostic::warning(self.file, format!("skipped malformed declaration: {}", error))
                            .at(error.offset),
                    );
                    self.recover()?;
                }
            }
        }
        Ok(ParseOutcome {
            syntax,
            diagnostics: self.diagnostics,
        })
    }

    fn parse_dotted_name(&mut self) -> Result<String, SyntaxError> {
        let mut name = self.expect_identifier()?;
        while self.at_punct('.') && self.peek_nth(1).is_some_and(Token::is_identifier) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.expect_identifier()?);
        }
        Ok(name)
    }

    fn skip_to_semicolon(&mut self) {
        while let Some(token) = self.peek() {
            self.pos += 1;
            if token.is_punct(';') {
                break;
            }
        }
    }

    // ------------------------------------------------------------------
    // Type declarations
    // ------------------------------------------------------------------

    fn parse_type_decl(&mut self, doc: Option<String>) -> Result<Declaration, SyntaxError> {
        let offset = self.offset();
        let modifiers = self.parse_modifiers()?;
        self.parse_type_decl_rest(doc, modifiers, offset)
    }

    /// Parses a type declaration after its modifiers have been consumed.
    fn parse_type_decl_rest(
        &mut self,
        doc: Option<String>,
        modifiers: Vec<String>,
        offset: usize,
    ) -> Result<Declaration, SyntaxError> {
        let kind = if self.eat_keyword("class") {
            DeclKind::Class
        } else if self.eat_keyword("interface") {
            DeclKind::Interface
        } else if self.eat_keyword("enum") {
            DeclKind::Enum
        } else if self.at_punct('@') && self.peek_nth(1).is_some_and(|t| t.is_keyword("interface"))
        {
            self.pos += 1;
            self.eat_keyword("interface");
            DeclKind::Annotation
        } else {
            return Err(self.unexpected(&["class", "interface", "enum", "@interface"]));
        };

        let name = self.expect_identifier()?;
        let mut decl = Declaration::new(kind, &name, offset);
        decl.doc = doc;
        decl.modifiers = modifiers;

        if self.at_punct('<') {
            self.skip_generics()?;
        }
        if self.eat_keyword("extends") {
            decl.supertypes.append(&mut self.parse_type_list()?);
        }
        if self.eat_keyword("implements") {
            decl.supertypes.append(&mut self.parse_type_list()?);
        }

        self.expect_punct('{', "{")?;
        if kind == DeclKind::Enum {
            self.parse_enum_body(&mut decl)?;
        } else {
            self.parse_type_body(&mut decl, kind == DeclKind::Annotation)?;
        }
        Ok(decl)
    }

    /// Members of a class, interface or annotation body, up to and including
    /// the closing brace.
    fn parse_type_body(
        &mut self,
        decl: &mut Declaration,
        in_annotation: bool,
    ) -> Result<(), SyntaxError> {
        let enclosing = decl.name.clone();
        loop {
            let doc = self.skip_trivia_capture_doc();
            if self.eat_punct('}') {
                return Ok(());
            }
            if self.peek().is_none() {
                return Err(self.unexpected(&["}"]));
            }
            if self.eat_punct(';') {
                continue;
            }
            match self.parse_member(&enclosing, in_annotation, doc) {
                Ok(members) => decl.children.extend(members),
                Err(error) => {
                    debug!(file = self.file, offset = error.offset, "recovering from malformed member");
                    self.diagnostics.push(
                        Diagnostic::warning(self.file, format!("skipped malformed member: {}", error))
                            .at(error.offset),
                    );
                    self.recover()?;
                }
            }
        }
    }

    fn parse_enum_body(&mut self, decl: &mut Declaration) -> Result<(), SyntaxError> {
        // Constant section first, then an optional member section after ';'.
        loop {
            let doc = self.skip_trivia_capture_doc();
            if self.eat_punct('}') {
                return Ok(());
            }
            if self.eat_punct(';') {
                break;
            }
            match self.parse_enum_constant(&decl.name, doc) {
                Ok(constant) => decl.children.push(constant),
                Err(error) => {
                    self.diagnostics.push(
                        Diagnostic::warning(
                            self.file,
                            format!("skipped malformed enum constant: {}", error),
                        )
                        .at(error.offset),
                    );
                    self.recover()?;
                }
            }
            if self.eat_punct(',') {
                continue;
            }
        }
        self.parse_type_body(decl, false)
    }

    fn parse_enum_constant(
        &mut self,
        enum_name: &str,
        doc: Option<String>,
    ) -> Result<Declaration, SyntaxError> {
        let offset = self.offset();
        let mut modifiers = Vec::new();
        while self.at_punct('@') && self.peek_nth(1).is_some_and(Token::is_identifier) {
            modifiers.push(self.parse_annotation_use()?);
        }
        let name = self.expect_identifier()?;
        let mut constant = Declaration::new(DeclKind::EnumConstant, name, offset);
        constant.doc = doc;
        constant.modifiers = modifiers;

        if self.at_punct('(') {
            constant.body_tokens = self.capture_balanced('(', ')')?;
        }
        if self.at_punct('{') {
            constant.has_anonymous_body = true;
            self.expect_punct('{', "{")?;
            let mut body = Declaration::new(DeclKind::Class, enum_name, offset);
            self.parse_type_body(&mut body, false)?;
            constant.children = body.children;
        }
        Ok(constant)
    }

    // ------------------------------------------------------------------
    // Members
    // ------------------------------------------------------------------

    /// Parses one member declaration. Returns no declarations for
    /// initializer blocks, and several for comma-separated field
    /// declarator lists.
    fn parse_member(
        &mut self,
        enclosing: &str,
        in_annotation: bool,
        doc: Option<String>,
    ) -> Result<Vec<Declaration>, SyntaxError> {
        let offset = self.offset();
        let modifiers = self.parse_modifiers()?;

        // Nested type declaration.
        if self
            .peek()
            .is_some_and(|t| t.is_keyword("class") || t.is_keyword("interface") || t.is_keyword("enum"))
            || (self.at_punct('@') && self.peek_nth(1).is_some_and(|t| t.is_keyword("interface")))
        {
            return Ok(vec![self.parse_type_decl_rest(doc, modifiers, offset)?]);
        }

        // Static or instance initializer block: opaque, no entity.
        if self.at_punct('{') {
            self.capture_balanced('{', '}')?;
            return Ok(Vec::new());
        }

        // Generic method type parameters.
        if self.at_punct('<') {
            self.skip_generics()?;
        }

        // Constructor: the enclosing type's name directly followed by '('.
        if self
            .peek()
            .is_some_and(|t| t.is_identifier() && t.text == enclosing)
            && self.peek_nth(1).is_some_and(|t| t.is_punct('('))
        {
            let name = self.expect_identifier()?;
            let mut method = Declaration::new(DeclKind::Method, name, offset);
            method.doc = doc;
            method.modifiers = modifiers;
            self.parse_method_rest(&mut method)?;
            return Ok(vec![method]);
        }

        let _return_type = self.parse_type_ref()?;
        let name = self.expect_identifier()?;

        if self.at_punct('(') {
            if in_annotation {
                let mut element = Declaration::new(DeclKind::AnnotationElement, name, offset);
                element.doc = doc;
                element.modifiers = modifiers;
                self.expect_punct('(', "(")?;
                self.expect_punct(')', ")")?;
                if self.eat_keyword("default") {
                    element.default_tokens = self.capture_expression(&[';'])?;
                }
                self.expect_punct(';', ";")?;
                return Ok(vec![element]);
            }
            let mut method = Declaration::new(DeclKind::Method, name, offset);
            method.doc = doc;
            method.modifiers = modifiers;
            self.parse_method_rest(&mut method)?;
            return Ok(vec![method]);
        }

        // Field declarator list: one declaration per declarator.
        let mut fields = Vec::new();
        let mut declarator = name;
        loop {
            let mut field = Declaration::new(DeclKind::Field, &declarator, offset);
            field.doc = doc.clone();
            field.modifiers = modifiers.clone();
            while self.at_punct('[') {
                self.expect_punct('[', "[")?;
                self.expect_punct(']', "]")?;
            }
            if self.eat_punct('=') {
                field.body_tokens = self.capture_expression(&[',', ';'])?;
            }
            fields.push(field);
            if self.eat_punct(',') {
                declarator = self.expect_identifier()?;
                continue;
            }
            self.expect_punct(';', ";")?;
            return Ok(fields);
        }
    }

    /// Parameters, throws clause and body of a method whose name has been
    /// consumed.
    fn parse_method_rest(&mut self, method: &mut Declaration) -> Result<(), SyntaxError> {
        method.parameters = self.parse_parameters()?;
        if self.eat_keyword("throws") {
            self.parse_type_list()?;
        }
        if self.at_punct('{') {
            method.body_tokens = self.capture_balanced('{', '}')?;
        } else {
            self.expect_punct(';', "; or method body")?;
        }
        Ok(())
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, SyntaxError> {
        self.expect_punct('(', "(")?;
        let mut parameters = Vec::new();
        loop {
            if self.eat_punct(')') {
                return Ok(parameters);
            }
            while self.at_punct('@') && self.peek_nth(1).is_some_and(Token::is_identifier) {
                self.parse_annotation_use()?;
            }
            self.eat_keyword("final");
            let mut type_name = self.parse_type_ref()?;
            if self.at_punct('.') {
                // Varargs: three consecutive dots.
                self.expect_punct('.', ".")?;
                self.expect_punct('.', ".")?;
                self.expect_punct('.', ".")?;
                type_name.push_str("...");
            }
            let name = self.expect_identifier()?;
            while self.at_punct('[') {
                self.expect_punct('[', "[")?;
                self.expect_punct(']', "]")?;
                type_name.push_str("[]");
            }
            parameters.push(Parameter { type_name, name });
            if !self.eat_punct(',') && !self.at_punct(')') {
                return Err(self.unexpected(&[", or )"]));
            }
        }
    }

    // ------------------------------------------------------------------
    // Modifiers and type references
    // ------------------------------------------------------------------

    fn parse_modifiers(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut modifiers = Vec::new();
        loop {
            if let Some(token) = self.peek() {
                if token.kind == TokenKind::Keyword
                    && MODIFIER_KEYWORDS.contains(&token.text.as_str())
                {
                    modifiers.push(token.text.clone());
                    self.pos += 1;
                    continue;
                }
                if token.is_punct('@') && self.peek_nth(1).is_some_and(Token::is_identifier) {
                    modifiers.push(self.parse_annotation_use()?);
                    continue;
                }
            }
            return Ok(modifiers);
        }
    }

    /// An annotation use such as `@Deprecated` or `@Author(name = "x")`,
    /// rendered without whitespace.
    fn parse_annotation_use(&mut self) -> Result<String, SyntaxError> {
        self.expect_punct('@', "@")?;
        let mut text = format!("@{}", self.parse_dotted_name()?);
        if self.at_punct('(') {
            text.push('(');
            for token_text in self.capture_balanced('(', ')')? {
                text.push_str(&token_text);
            }
            text.push(')');
        }
        Ok(text)
    }

    /// A type reference: primitive or dotted name, generic arguments and
    /// array dimensions, rendered without whitespace.
    fn parse_type_ref(&mut self) -> Result<String, SyntaxError> {
        while self.at_punct('@') && self.peek_nth(1).is_some_and(Token::is_identifier) {
            self.parse_annotation_use()?;
        }
        let mut text = match self.peek() {
            Some(token) if token.is_identifier() || is_type_keyword(token) => {
                self.pos += 1;
                token.text.clone()
            }
            _ => return Err(self.unexpected(&["type"])),
        };
        loop {
            if self.at_punct('.') && self.peek_nth(1).is_some_and(Token::is_identifier) {
                self.pos += 1;
                text.push('.');
                text.push_str(&self.expect_identifier()?);
            } else if self.at_punct('<') {
                text.push('<');
                for token_text in self.capture_balanced('<', '>')? {
                    text.push_str(&token_text);
                }
                text.push('>');
            } else if self.at_punct('[') && self.peek_nth(1).is_some_and(|t| t.is_punct(']')) {
                self.pos += 1;
                self.pos += 1;
                text.push_str("[]");
            } else {
                return Ok(text);
            }
        }
    }

    fn parse_type_list(&mut self) -> Result<Vec<String>, SyntaxError> {
        let mut types = vec![self.parse_type_ref()?];
        while self.eat_punct(',') {
            types.push(self.parse_type_ref()?);
        }
        Ok(types)
    }

    fn skip_generics(&mut self) -> Result<(), SyntaxError> {
        self.capture_balanced('<', '>')?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Opaque spans
    // ------------------------------------------------------------------

    /// Consumes a balanced `open … close` region and returns the
    /// significant token texts between the outer delimiters.
    fn capture_balanced(&mut self, open: char, close: char) -> Result<Vec<String>, SyntaxError> {
        if !self.eat_punct(open) {
            return Err(self.unexpected(&["opening delimiter"]));
        }
        let mut depth = 1usize;
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.advance() else {
                return Err(SyntaxError {
                    offset: self.eof_offset(),
                    expected: vec!["closing delimiter"],
                });
            };
            if token.is_punct(open) {
                depth += 1;
            } else if token.is_punct(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(tokens);
                }
            }
            tokens.push(token.text.clone());
        }
    }

    /// Captures significant tokens of an expression until one of `stops`
    /// appears at bracket depth zero. The stop token is not consumed.
    fn capture_expression(&mut self, stops: &[char]) -> Result<Vec<String>, SyntaxError> {
        let mut depth = 0usize;
        let mut tokens = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(SyntaxError {
                    offset: self.eof_offset(),
                    expected: vec!["expression"],
                });
            };
            if depth == 0 && stops.iter().any(|c| token.is_punct(*c)) {
                return Ok(tokens);
            }
            if token.is_punct('(') || token.is_punct('[') || token.is_punct('{') {
                depth += 1;
            } else if token.is_punct(')') || token.is_punct(']') || token.is_punct('}') {
                if depth == 0 {
                    return Err(self.unexpected(&["; or ,"]));
                }
                depth -= 1;
            }
            tokens.push(token.text.clone());
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------
    // Recovery
    // ------------------------------------------------------------------

    /// Skips tokens to the next balanced `;` or brace boundary.
    fn recover(&mut self) -> Result<(), SyntaxError> {
        let mut depth = 0usize;
        loop {
            let Some(token) = self.peek() else {
                return Err(SyntaxError {
                    offset: self.eof_offset(),
                    expected: vec!["member declaration"],
                });
            };
            if depth == 0 {
                if token.is_punct(';') {
                    self.pos += 1;
                    return Ok(());
                }
                if token.is_punct('}') {
                    // End of the enclosing body; the caller consumes it.
                    return Ok(());
                }
            }
            if token.is_punct('{') || token.is_punct('(') || token.is_punct('[') {
                depth += 1;
            } else if token.is_punct(')') || token.is_punct(']') {
                depth = depth.saturating_sub(1);
            } else if token.is_punct('}') {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    self.pos += 1;
                    return Ok(());
                }
            }
            self.pos += 1;
        }
    }
}

fn is_type_keyword(token: &Token) -> bool {
    token.kind == TokenKind::Keyword
        && matches!(
            token.text.as_str(),
            "void" | "boolean" | "byte" | "short" | "int" | "long" | "char" | "float" | "double"
        )
}
