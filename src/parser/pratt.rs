//! Pratt parser for composite EL expressions
//!
//! Binary operators are parsed by precedence climbing over a single
//! precedence table; property access, method invocation, indexing and
//! lambda application are handled as postfix operations. The parser keeps
//! one token of lookahead; the only speculative case is the `name:local(`
//! qualified-function form, which restores the tokenizer when the suffix
//! does not materialize (a `:` is otherwise a ternary separator).

use super::ParserFeatures;
use super::error::{ParseError, ParseResult};
use super::span::Spanned;
use super::tokenizer::{Token, Tokenizer};
use crate::ast::{BinaryOp, Node, UnaryOp};

/// Operator precedence levels (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Ternary `?:` (right associative)
    Ternary = 1,
    /// Logical OR
    Or = 2,
    /// Logical AND
    And = 3,
    /// Equality operators (`==`, `!=`)
    Equality = 4,
    /// Relational operators (`<`, `>`, `<=`, `>=`)
    Relational = 5,
    /// Additive operators (`+`, `-`)
    Additive = 6,
    /// Multiplicative operators (`*`, `/`, `%`)
    Multiplicative = 7,
}

/// Lowest precedence, the entry level for subexpressions
const LOWEST: u8 = Precedence::Ternary as u8;

#[inline]
fn get_precedence(token: &Token<'_>) -> Option<Precedence> {
    match token {
        Token::Question => Some(Precedence::Ternary),
        Token::Or => Some(Precedence::Or),
        Token::And => Some(Precedence::And),
        Token::Eq | Token::Ne => Some(Precedence::Equality),
        Token::Lt | Token::Le | Token::Gt | Token::Ge => Some(Precedence::Relational),
        Token::Plus | Token::Minus => Some(Precedence::Additive),
        Token::Star | Token::Slash | Token::Percent => Some(Precedence::Multiplicative),
        _ => None,
    }
}

#[inline]
fn token_to_binary_op(token: &Token<'_>) -> Option<BinaryOp> {
    match token {
        Token::Or => Some(BinaryOp::Or),
        Token::And => Some(BinaryOp::And),
        Token::Eq => Some(BinaryOp::Eq),
        Token::Ne => Some(BinaryOp::Ne),
        Token::Lt => Some(BinaryOp::Lt),
        Token::Le => Some(BinaryOp::Le),
        Token::Gt => Some(BinaryOp::Gt),
        Token::Ge => Some(BinaryOp::Ge),
        Token::Plus => Some(BinaryOp::Add),
        Token::Minus => Some(BinaryOp::Sub),
        Token::Star => Some(BinaryOp::Mul),
        Token::Slash => Some(BinaryOp::Div),
        Token::Percent => Some(BinaryOp::Mod),
        _ => None,
    }
}

/// The composite expression parser
pub struct PrattParser<'input> {
    tokenizer: Tokenizer<'input>,
    current: Option<Spanned<Token<'input>>>,
    features: ParserFeatures,
}

impl<'input> PrattParser<'input> {
    /// Create a parser over the given source
    pub fn new(input: &'input str, features: ParserFeatures) -> Self {
        Self {
            tokenizer: Tokenizer::new(input),
            current: None,
            features,
        }
    }

    #[inline]
    fn advance(&mut self) -> ParseResult<()> {
        self.current = self.tokenizer.next_token()?;
        Ok(())
    }

    #[inline]
    fn current_token(&self) -> Option<&Token<'input>> {
        self.current.as_ref().map(|sp| &sp.value)
    }

    fn position(&self) -> usize {
        self.current
            .as_ref()
            .map_or_else(|| self.tokenizer.position(), Spanned::start)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current {
            Some(sp) => ParseError::UnexpectedToken {
                position: sp.span.start,
                found: sp.value.describe(),
                expected: expected.to_string(),
            },
            None => ParseError::UnexpectedEof {
                position: self.tokenizer.position(),
                expected: expected.to_string(),
            },
        }
    }

    fn expect_token(&mut self, expected: Token<'input>, what: &str) -> ParseResult<()> {
        if self.current_token() == Some(&expected) {
            self.advance()
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        let name = match self.current_token() {
            Some(Token::Identifier(s)) => (*s).to_string(),
            _ => return Err(self.unexpected(what)),
        };
        self.advance()?;
        Ok(name)
    }

    /// Parse the whole composite; returns the root node and whether the
    /// composite used deferred (`#{...}`) delimiters
    pub fn parse(mut self) -> ParseResult<(Node, bool)> {
        self.advance()?;
        let mut pieces: Vec<Node> = Vec::new();
        let mut deferred: Option<bool> = None;

        while let Some(sp) = self.current.take() {
            match sp.value {
                Token::Text(text) => {
                    self.advance()?;
                    pieces.push(Node::Text(text.into_owned()));
                }
                Token::StartEval { deferred: d } => {
                    if deferred.is_some_and(|prev| prev != d) {
                        return Err(ParseError::MixedDelimiters {
                            position: sp.span.start,
                        });
                    }
                    deferred = Some(d);
                    self.advance()?;
                    let expr = self.parse_expr(LOWEST)?;
                    self.expect_token(Token::EndEval, "'}'")?;
                    pieces.push(Node::Eval {
                        expr: Box::new(expr),
                        deferred: d,
                    });
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        position: sp.span.start,
                        found: other.describe(),
                        expected: "text or '${'".to_string(),
                    });
                }
            }
        }

        let root = match pieces.len() {
            0 => Node::Text(String::new()),
            1 => pieces.remove(0),
            _ => Node::Composite(pieces),
        };
        Ok((root, deferred == Some(true)))
    }

    fn parse_expr(&mut self, min_prec: u8) -> ParseResult<Node> {
        let mut left = self.parse_unary()?;

        while let Some(prec) = self.current_token().and_then(get_precedence) {
            if (prec as u8) < min_prec {
                break;
            }
            if matches!(self.current_token(), Some(Token::Question)) {
                self.advance()?;
                let yes = self.parse_expr(LOWEST)?;
                self.expect_token(Token::Colon, "':'")?;
                let no = self.parse_expr(LOWEST)?;
                left = Node::Choice {
                    cond: Box::new(left),
                    yes: Box::new(yes),
                    no: Box::new(no),
                };
                continue;
            }
            let Some(op) = self.current_token().and_then(token_to_binary_op) else {
                break;
            };
            self.advance()?;
            let right = self.parse_expr(prec as u8 + 1)?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Node> {
        let op = match self.current_token() {
            Some(Token::Minus) => Some(UnaryOp::Neg),
            Some(Token::Not) => Some(UnaryOp::Not),
            Some(Token::Empty) => Some(UnaryOp::Empty),
            _ => None,
        };
        if let Some(op) = op {
            self.advance()?;
            let operand = self.parse_unary()?;
            return Ok(Node::unary(op, operand));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<Node> {
        let mut node = self.parse_primary()?;
        loop {
            match self.current_token() {
                Some(Token::Dot) => {
                    self.advance()?;
                    let property = self.expect_identifier("property name")?;
                    let target = Node::dot(node, property);
                    node = self.maybe_method(target)?;
                }
                Some(Token::LBracket) => {
                    self.advance()?;
                    let property = self.parse_expr(LOWEST)?;
                    self.expect_token(Token::RBracket, "']'")?;
                    let target = Node::bracket(node, property);
                    node = self.maybe_method(target)?;
                }
                Some(Token::LParen) => {
                    let args = self.parse_args()?;
                    node = Node::Invoke {
                        target: Box::new(node),
                        args,
                    };
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn maybe_method(&mut self, target: Node) -> ParseResult<Node> {
        if !matches!(self.current_token(), Some(Token::LParen)) {
            return Ok(target);
        }
        if !self.features.methods {
            return Err(ParseError::Invalid {
                position: self.position(),
                message: "method invocations are disabled".to_string(),
            });
        }
        let args = self.parse_args()?;
        Ok(Node::Method {
            target: Box::new(target),
            args,
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Node> {
        let Some(sp) = self.current.clone() else {
            return Err(ParseError::UnexpectedEof {
                position: self.tokenizer.position(),
                expected: "expression".to_string(),
            });
        };
        match sp.value {
            Token::Integer(n) => {
                self.advance()?;
                Ok(Node::Long(n))
            }
            Token::Float(text) => {
                let value = text.parse::<f64>().map_err(|_| ParseError::Invalid {
                    position: sp.span.start,
                    message: format!("malformed float literal '{text}'"),
                })?;
                self.advance()?;
                Ok(Node::Double(value))
            }
            Token::Str(s) => {
                self.advance()?;
                Ok(Node::Str(s.into_owned()))
            }
            Token::True => {
                self.advance()?;
                Ok(Node::Boolean(true))
            }
            Token::False => {
                self.advance()?;
                Ok(Node::Boolean(false))
            }
            Token::Null => {
                self.advance()?;
                Ok(Node::Null)
            }
            Token::Identifier(name) => self.parse_identifier_like(name),
            Token::LParen => self.parse_paren(sp.span.start),
            other => Err(ParseError::UnexpectedToken {
                position: sp.span.start,
                found: other.describe(),
                expected: "expression".to_string(),
            }),
        }
    }

    /// An identifier may begin a plain reference, a function call, a
    /// qualified function call (`ns:fn(...)`) or a single-parameter lambda
    fn parse_identifier_like(&mut self, name: &'input str) -> ParseResult<Node> {
        self.advance()?;
        match self.current_token() {
            Some(Token::LParen) => {
                let args = self.parse_args()?;
                Ok(Node::function(name, args))
            }
            Some(Token::Arrow) => {
                self.advance()?;
                let body = self.parse_expr(LOWEST)?;
                Ok(Node::Lambda {
                    params: vec![name.to_string()],
                    body: Box::new(body),
                })
            }
            Some(Token::Colon) => {
                // only a function-call suffix claims the colon; a ternary
                // separator restores and yields the bare identifier
                let saved_tokenizer = self.tokenizer.clone();
                let saved_current = self.current.clone();
                let mut local: Option<String> = None;
                if self.advance().is_ok() {
                    if let Some(Token::Identifier(s)) = self.current_token() {
                        local = Some((*s).to_string());
                    }
                }
                if let Some(local) = local {
                    if self.advance().is_ok()
                        && matches!(self.current_token(), Some(Token::LParen))
                    {
                        let args = self.parse_args()?;
                        return Ok(Node::function(format!("{name}:{local}"), args));
                    }
                }
                self.tokenizer = saved_tokenizer;
                self.current = saved_current;
                Ok(Node::identifier(name))
            }
            _ => Ok(Node::identifier(name)),
        }
    }

    /// `(` may open a parenthesized expression or a lambda parameter list
    fn parse_paren(&mut self, start: usize) -> ParseResult<Node> {
        self.advance()?;

        if matches!(self.current_token(), Some(Token::RParen)) {
            self.advance()?;
            self.expect_token(Token::Arrow, "'->' after empty parameter list")?;
            let body = self.parse_expr(LOWEST)?;
            return Ok(Node::Lambda {
                params: vec![],
                body: Box::new(body),
            });
        }

        let first = self.parse_expr(LOWEST)?;

        if matches!(self.current_token(), Some(Token::Comma)) {
            let mut params = vec![into_param(first, start)?];
            while matches!(self.current_token(), Some(Token::Comma)) {
                self.advance()?;
                params.push(self.expect_identifier("parameter name")?);
            }
            self.expect_token(Token::RParen, "')'")?;
            self.expect_token(Token::Arrow, "'->'")?;
            let body = self.parse_expr(LOWEST)?;
            return Ok(Node::Lambda {
                params,
                body: Box::new(body),
            });
        }

        self.expect_token(Token::RParen, "')'")?;
        if matches!(self.current_token(), Some(Token::Arrow)) {
            self.advance()?;
            let param = into_param(first, start)?;
            let body = self.parse_expr(LOWEST)?;
            return Ok(Node::Lambda {
                params: vec![param],
                body: Box::new(body),
            });
        }
        Ok(Node::Nested(Box::new(first)))
    }

    fn parse_args(&mut self) -> ParseResult<Vec<Node>> {
        self.expect_token(Token::LParen, "'('")?;
        let mut args = Vec::new();
        if matches!(self.current_token(), Some(Token::RParen)) {
            self.advance()?;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr(LOWEST)?);
            match self.current_token() {
                Some(Token::Comma) => self.advance()?,
                Some(Token::RParen) => {
                    self.advance()?;
                    break;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
        Ok(args)
    }
}

fn into_param(node: Node, position: usize) -> ParseResult<String> {
    match node {
        Node::Identifier { name, .. } => Ok(name),
        other => Err(ParseError::Invalid {
            position,
            message: format!("expected parameter name, found {}", other.kind()),
        }),
    }
}
