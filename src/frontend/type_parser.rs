// Recursive-descent parser for Swift type expressions.
//
// Interface documents spell types the way they appear in the protocol
// (`[String: Int]?`, `(Int) async throws -> User`, `Result<T, Error>`).
// This module turns those strings into `SemanticType`s, resolving identifiers
// that name an in-scope function-level generic into placeholders.

use crate::core::{SemanticType, TupleElement, TypeParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Attribute(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Colon,
    Dot,
    Question,
    Bang,
    Arrow,
    Ellipsis,
    Ampersand,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("`{}`", name),
            Token::Attribute(name) => format!("`@{}`", name),
            Token::LParen => "`(`".into(),
            Token::RParen => "`)`".into(),
            Token::LBracket => "`[`".into(),
            Token::RBracket => "`]`".into(),
            Token::Lt => "`<`".into(),
            Token::Gt => "`>`".into(),
            Token::Comma => "`,`".into(),
            Token::Colon => "`:`".into(),
            Token::Dot => "`.`".into(),
            Token::Question => "`?`".into(),
            Token::Bang => "`!`".into(),
            Token::Arrow => "`->`".into(),
            Token::Ellipsis => "`...`".into(),
            Token::Ampersand => "`&`".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, TypeParseError> {
    let mut tokens = Vec::new();
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|(_, c)| *c);
        let simple = match c {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            '<' => Some(Token::Lt),
            '>' => Some(Token::Gt),
            ',' => Some(Token::Comma),
            ':' => Some(Token::Colon),
            '?' => Some(Token::Question),
            '!' => Some(Token::Bang),
            '&' => Some(Token::Ampersand),
            _ => None,
        };

        if let Some(token) = simple {
            tokens.push((token, offset));
            i += 1;
        } else if c.is_whitespace() {
            i += 1;
        } else if c == '-' && next == Some('>') {
            tokens.push((Token::Arrow, offset));
            i += 2;
        } else if c == '.' {
            let is_ellipsis = next == Some('.') && chars.get(i + 2).map(|(_, c)| *c) == Some('.');
            if is_ellipsis {
                tokens.push((Token::Ellipsis, offset));
                i += 3;
            } else {
                tokens.push((Token::Dot, offset));
                i += 1;
            }
        } else if c == '@' || is_ident_start(c) {
            let start = if c == '@' { i + 1 } else { i };
            let mut end = start;
            while end < chars.len() && is_ident_continue(chars[end].1) {
                end += 1;
            }
            let word: String = chars[start..end].iter().map(|(_, c)| *c).collect();
            if word.is_empty() {
                return Err(TypeParseError::new(input, offset, "expected attribute name after `@`"));
            }
            let token = if c == '@' {
                Token::Attribute(word)
            } else {
                Token::Ident(word)
            };
            tokens.push((token, offset));
            i = end;
        } else {
            return Err(TypeParseError::new(
                input,
                offset,
                format!("unexpected character `{}`", c),
            ));
        }
    }
    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A parameter's type as written, split into the parts the model keeps apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterType {
    pub ty: SemanticType,
    pub attributes: Vec<String>,
    pub is_variadic: bool,
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, usize)>,
    pos: usize,
    generics: &'a [&'a str],
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, generics: &'a [&'a str]) -> Result<Self, TypeParseError> {
        Ok(Self {
            input,
            tokens: tokenize(input)?,
            pos: 0,
            generics,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, o)| *o)
            .unwrap_or(self.input.len())
    }

    fn error(&self, message: impl Into<String>) -> TypeParseError {
        TypeParseError::new(self.input, self.offset(), message)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, keyword: &str) -> bool {
        if matches!(self.peek(), Some(Token::Ident(word)) if word == keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: Token, message: &str) -> Result<(), TypeParseError> {
        if self.match_token(&expected) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn expect_end(&self) -> Result<(), TypeParseError> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(self.error(format!("unexpected {} after type", token.describe()))),
        }
    }

    fn attributes(&mut self) -> Vec<String> {
        let mut attributes = Vec::new();
        while let Some(Token::Attribute(name)) = self.peek() {
            attributes.push(format!("@{}", name));
            self.pos += 1;
        }
        attributes
    }

    /// Type with protocol composition and postfix `?` / `!`.
    fn parse_type(&mut self) -> Result<SemanticType, TypeParseError> {
        // Nested attributes (`@Sendable` inside a function type) carry no
        // meaning for spy storage.
        self.attributes();

        if self.match_keyword("inout") {
            return Err(self.error("inout parameters are not supported"));
        }
        if matches!(self.peek(), Some(Token::Ident(word)) if word == "some") {
            return Err(self.error("opaque `some` types are not supported"));
        }

        let ty = if self.match_keyword("any") {
            let inner = self.parse_primary()?;
            existential(inner).map_err(|message| self.error(message))?
        } else {
            self.parse_primary()?
        };
        let mut ty = self.parse_composition(ty)?;

        loop {
            if self.match_token(&Token::Question) {
                ty = ty.optional();
            } else if self.match_token(&Token::Bang) {
                ty = ty.implicitly_unwrapped();
            } else {
                break;
            }
        }
        Ok(ty)
    }

    fn parse_primary(&mut self) -> Result<SemanticType, TypeParseError> {
        match self.peek() {
            Some(Token::LParen) => self.parse_parenthesized(),
            Some(Token::LBracket) => self.parse_collection(),
            Some(Token::Ident(_)) => self.parse_nominal(),
            Some(token) => {
                let message = format!("expected a type, found {}", token.describe());
                Err(self.error(message))
            }
            None => Err(self.error("expected a type, found end of input")),
        }
    }

    fn parse_collection(&mut self) -> Result<SemanticType, TypeParseError> {
        self.consume(Token::LBracket, "expected `[`")?;
        let element = self.parse_type()?;
        if self.match_token(&Token::Colon) {
            let value = self.parse_type()?;
            self.consume(Token::RBracket, "expected `]` after dictionary value type")?;
            return Ok(SemanticType::Dictionary {
                key: Box::new(element),
                value: Box::new(value),
            });
        }
        self.consume(Token::RBracket, "expected `]` after array element type")?;
        Ok(element.array())
    }

    /// `(...)` is a function type when followed by effects or `->`, a plain
    /// parenthesized type when it holds one unlabeled element, else a tuple.
    fn parse_parenthesized(&mut self) -> Result<SemanticType, TypeParseError> {
        self.consume(Token::LParen, "expected `(`")?;
        let mut elements = Vec::new();
        if !self.match_token(&Token::RParen) {
            loop {
                elements.push(self.parse_tuple_element()?);
                if self.match_token(&Token::Comma) {
                    continue;
                }
                self.consume(Token::RParen, "expected `,` or `)`")?;
                break;
            }
        }

        let is_async = self.match_keyword("async");
        let is_throwing = self.match_keyword("throws") || self.match_keyword("rethrows");
        if self.match_token(&Token::Arrow) {
            let returns = self.parse_type()?;
            return Ok(SemanticType::function(
                elements.into_iter().map(|e| e.ty).collect(),
                is_async,
                is_throwing,
                returns,
            ));
        }
        if is_async || is_throwing {
            return Err(self.error("expected `->` after function effects"));
        }

        match elements.as_slice() {
            [single] if single.label.is_none() => Ok(single.ty.clone()),
            _ => Ok(SemanticType::Tuple { elements }),
        }
    }

    fn parse_tuple_element(&mut self) -> Result<TupleElement, TypeParseError> {
        // `label: T` or `_ name: T` (function type parameter names)
        let label = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
            (Some(Token::Ident(label)), Some(Token::Colon), _) => Some(label.clone()),
            (Some(Token::Ident(_)), Some(Token::Ident(_)), Some(Token::Colon)) => {
                self.pos += 1;
                None
            }
            _ => None,
        };
        if label.is_some() {
            self.pos += 2;
        } else if matches!(self.peek_at(1), Some(Token::Colon)) {
            // `_ name:` form, label already skipped
            self.pos += 2;
        }
        let ty = self.parse_type()?;
        Ok(TupleElement { label, ty })
    }

    fn parse_nominal(&mut self) -> Result<SemanticType, TypeParseError> {
        let mut segments = Vec::new();
        loop {
            match self.advance() {
                Some(Token::Ident(segment)) => segments.push(segment),
                _ => return Err(self.error("expected identifier")),
            }
            if !self.match_token(&Token::Dot) {
                break;
            }
        }
        let name = segments.join(".");

        if self.match_token(&Token::Lt) {
            let mut arguments = vec![self.parse_type()?];
            while self.match_token(&Token::Comma) {
                arguments.push(self.parse_type()?);
            }
            self.consume(Token::Gt, "expected `>` after generic arguments")?;
            return Ok(SemanticType::Applied { name, arguments });
        }

        let first = segments[0].as_str();
        if self.generics.contains(&first) {
            let base = SemanticType::placeholder(first);
            if segments.len() == 1 {
                return Ok(base);
            }
            return Ok(SemanticType::MemberType {
                base: Box::new(base),
                member: segments[1..].join("."),
            });
        }
        Ok(SemanticType::named(name))
    }

    /// Protocol composition: `P & Q` or `any P & Q`.
    fn parse_composition(&mut self, first: SemanticType) -> Result<SemanticType, TypeParseError> {
        let mut parts = vec![first];
        while self.match_token(&Token::Ampersand) {
            parts.push(self.parse_primary()?);
        }
        if parts.len() == 1 {
            return Ok(parts.remove(0));
        }
        let names = parts
            .iter()
            .map(|p| match p {
                SemanticType::Named { name } => Ok(name.clone()),
                _ => Err(self.error("protocol compositions may only contain named types")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SemanticType::named(names.join(" & ")))
    }
}

fn existential(inner: SemanticType) -> Result<SemanticType, String> {
    match inner {
        SemanticType::Named { name } => Ok(SemanticType::named(format!("any {}", name))),
        SemanticType::GenericPlaceholder { .. } | SemanticType::MemberType { .. } => {
            Err("`any` cannot be applied to a generic placeholder".to_string())
        }
        other => Ok(other),
    }
}

/// Parses a complete type expression.
///
/// `generics` lists the function-level generic parameter names in scope;
/// bare identifiers matching one of them become placeholders.
pub fn parse_type(input: &str, generics: &[&str]) -> Result<SemanticType, TypeParseError> {
    let mut parser = Parser::new(input, generics)?;
    let ty = parser.parse_type()?;
    parser.expect_end()?;
    Ok(ty)
}

/// Parses a parameter type, which may additionally carry leading attributes
/// (`@escaping`) and a trailing variadic `...`.
pub fn parse_parameter_type(
    input: &str,
    generics: &[&str],
) -> Result<ParameterType, TypeParseError> {
    let mut parser = Parser::new(input, generics)?;
    let attributes = parser.attributes();
    let ty = parser.parse_type()?;
    let is_variadic = parser.match_token(&Token::Ellipsis);
    parser.expect_end()?;
    Ok(ParameterType {
        ty,
        attributes,
        is_variadic,
    })
}
