use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Display};
use std::mem;
use std::ops::{Deref, DerefMut};

use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::ast::{self, Expr, Name, NumberLit, Program, Stmt};
use crate::parse::lexer::Lexer;
use crate::parse::lookahead::Lookahead;
use crate::parse::token::{Keyword, Operator, Symbol, Token, TokenType, TokenValue, TypeName};
use crate::position::{HasSpan, Position, Span, Spanned};

const RECURSION_LIMIT: usize = 128;

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum ParserError<'buf> {
    UnexpectedToken {
        expected: Cow<'static, [TokenType]>,
        actual: Token<'buf>,
    },

    ExpectedExpression(Token<'buf>),
    UnrecognizedStatement(Token<'buf>),

    UnterminatedBody {
        open: Token<'buf>,
        eof: Token<'buf>,
    },

    InvalidCharacter(Token<'buf>),
    RecursionLimit(Span),
}

fn describe_token(f: &mut fmt::Formatter<'_>, token: &Token<'_>) -> fmt::Result {
    match token.value {
        TokenValue::Eof => write!(f, "end of input"),
        TokenValue::Invalid(c) => write!(f, "an invalid character `{}`", c),
        TokenValue::String(s) => write!(f, "string \"{}\"", s),
        value => write!(f, "`{}`", value.text().unwrap_or_default()),
    }
}

impl Display for ParserError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { expected, actual } => {
                write!(f, "encountered an unexpected token: ")?;
                describe_token(f, actual)?;

                match expected.len() {
                    0 => Ok(()),
                    1 => write!(f, " (expected {})", &expected[0]),
                    2 => write!(f, " (expected {} or {})", &expected[0], &expected[1]),

                    _ => {
                        write!(f, " (expected ")?;

                        for ty in expected.iter().take(expected.len() - 1) {
                            write!(f, "{}, ", ty)?;
                        }

                        write!(f, "or {})", &expected[expected.len() - 1])
                    }
                }
            }

            Self::ExpectedExpression(actual) => {
                write!(f, "expected an expression, found ")?;
                describe_token(f, actual)
            }

            Self::UnrecognizedStatement(actual) => {
                write!(f, "unrecognized statement starting with ")?;
                describe_token(f, actual)
            }

            Self::UnterminatedBody { .. } => {
                write!(f, "the function body is not closed before the end of input")
            }

            Self::InvalidCharacter(token) => {
                write!(f, "encountered ")?;
                describe_token(f, token)
            }

            Self::RecursionLimit(_) => {
                write!(f, "a recursion limit has been reached while parsing")
            }
        }
    }
}

impl Error for ParserError<'_> {}

impl HasSpan for ParserError<'_> {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { actual, .. } => actual.span(),
            Self::ExpectedExpression(actual) => actual.span(),
            Self::UnrecognizedStatement(actual) => actual.span(),
            Self::UnterminatedBody { open, .. } => open.span(),
            Self::InvalidCharacter(token) => token.span(),
            Self::RecursionLimit(span) => *span,
        }
    }
}

trait Matcher {
    fn matches(&self, token: &Token<'_>) -> bool;

    fn expected_tokens(&self) -> Cow<'static, [TokenType]>;
}

impl Matcher for TokenType {
    fn matches(&self, token: &Token<'_>) -> bool {
        self == &token.ty()
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        vec![*self].into()
    }
}

impl Matcher for Symbol {
    fn matches(&self, token: &Token<'_>) -> bool {
        TokenType::Symbol(*self) == token.ty()
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        vec![TokenType::Symbol(*self)].into()
    }
}

impl<const N: usize> Matcher for [Symbol; N] {
    fn matches(&self, token: &Token<'_>) -> bool {
        match token.ty() {
            TokenType::Symbol(sym) => self.contains(&sym),
            _ => false,
        }
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        self.iter().copied().map(TokenType::Symbol).collect()
    }
}

impl Matcher for Operator {
    fn matches(&self, token: &Token<'_>) -> bool {
        TokenType::Operator(*self) == token.ty()
    }

    fn expected_tokens(&self) -> Cow<'static, [TokenType]> {
        vec![TokenType::Operator(*self)].into()
    }
}

fn format_expected(tokens: Cow<'static, [TokenType]>) -> String {
    tokens.iter().map(|token| format!("{}", token)).join(", ")
}

/// The outcome of parsing one source file.
///
/// Statements that failed to parse are absent from `program`; each failure is in `errors`.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Parsed<'buf> {
    pub program: Program<'buf>,
    pub errors: Vec<ParserError<'buf>>,
}

struct BoundedParser<'buf, 'a> {
    parser: &'a mut Parser<'buf>,
    prev_layer_start: Position,
}

impl Drop for BoundedParser<'_, '_> {
    fn drop(&mut self) {
        self.parser.recursion_limit += 1;
        self.parser.layer_start = self.prev_layer_start;
    }
}

impl<'buf> Deref for BoundedParser<'buf, '_> {
    type Target = Parser<'buf>;

    fn deref(&self) -> &Parser<'buf> {
        self.parser
    }
}

impl<'buf> DerefMut for BoundedParser<'buf, '_> {
    fn deref_mut(&mut self) -> &mut Parser<'buf> {
        self.parser
    }
}

pub struct Parser<'buf> {
    tokens: Lookahead<'buf>,
    recursion_limit: usize,
    layer_start: Position,
    errors: Vec<ParserError<'buf>>,
}

impl<'buf> Parser<'buf> {
    pub fn new(lexer: Lexer<'buf>) -> Self {
        let layer_start = lexer.pos();

        Self {
            tokens: Lookahead::new(lexer),
            recursion_limit: RECURSION_LIMIT,
            layer_start,
            errors: vec![],
        }
    }

    fn bounded(&mut self) -> Result<BoundedParser<'buf, '_>, ParserError<'buf>> {
        self.recursion_limit =
            self.recursion_limit
                .checked_sub(1)
                .ok_or(ParserError::RecursionLimit(Span {
                    start: self.layer_start,
                    end: self.next_pos(),
                }))?;

        let layer_start = self.next_pos();
        let prev_layer_start = mem::replace(&mut self.layer_start, layer_start);

        Ok(BoundedParser {
            parser: self,
            prev_layer_start,
        })
    }

    fn next_pos(&self) -> Position {
        self.tokens.current().span.start
    }

    fn unexpected(&self, matcher: impl Matcher) -> ParserError<'buf> {
        ParserError::UnexpectedToken {
            expected: matcher.expected_tokens(),
            actual: self.tokens.current(),
        }
    }

    #[instrument(
        level = "trace",
        ret,
        skip(self, matcher),
        fields(matcher = format_expected(matcher.expected_tokens()))
    )]
    fn expect(&mut self, matcher: impl Matcher) -> Result<Token<'buf>, ParserError<'buf>> {
        trace!(token = ?self.tokens.current());

        if matcher.matches(&self.tokens.current()) {
            Ok(self.tokens.advance())
        } else {
            Err(self.unexpected(matcher))
        }
    }

    fn try_consume(&mut self, matcher: impl Matcher) -> Option<Token<'buf>> {
        matcher
            .matches(&self.tokens.current())
            .then(|| self.tokens.advance())
    }

    fn matches_nth(&mut self, n: usize, matcher: impl Matcher) -> bool {
        matcher.matches(&self.tokens.peek(n))
    }

    /// Parses statements until the end of input.
    ///
    /// A statement that fails to parse is recorded, and one token is skipped before trying
    /// again, so the whole input is always consumed.
    pub fn parse(mut self) -> Parsed<'buf> {
        let mut stmts = Vec::new();

        while !self.tokens.current().is_eof() {
            match self.parse_statement() {
                Ok(stmt) => {
                    debug!(
                        kind = stmt.kind_name(),
                        name = stmt.name().as_str(),
                        "parsed a statement"
                    );

                    stmts.push(stmt);
                }

                Err(e) => {
                    debug!(error = %e, "skipping a malformed statement");
                    self.errors.push(e);
                    self.tokens.advance();
                }
            }
        }

        Parsed {
            program: Program { stmts },
            errors: self.errors,
        }
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_statement(&mut self) -> Result<Stmt<'buf>, ParserError<'buf>> {
        let token = self.tokens.current();

        match token.value {
            TokenValue::Keyword(Keyword::Const | Keyword::Var) => {
                self.tokens.advance();

                self.parse_declaration(Some(token)).map(Stmt::Declaration)
            }

            TokenValue::TypeName(_) if self.matches_nth(1, TokenType::Identifier) => {
                if self.matches_nth(2, Symbol::ParenLeft) {
                    self.parse_function_declaration().map(Stmt::Function)
                } else {
                    self.parse_declaration(None).map(Stmt::Declaration)
                }
            }

            TokenValue::Ident(_) => self.parse_assignment().map(Stmt::Assignment),

            _ => Err(ParserError::UnrecognizedStatement(token)),
        }
    }

    /// Parses `T name = expr;`.
    ///
    /// `keyword` is the already consumed `Const` or `Var` in front of the type, if any.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_declaration(
        &mut self,
        keyword: Option<Token<'buf>>,
    ) -> Result<ast::Declaration<'buf>, ParserError<'buf>> {
        let ty = self.parse_type_name()?;
        let name = self.parse_name()?;
        self.expect(Operator::Assign)?;
        let init = self.bounded()?.parse_expression()?;
        let semicolon = self.expect(Symbol::Semicolon)?;

        let start = keyword.map_or(ty.span, |keyword| keyword.span);
        let is_const = matches!(
            keyword.map(|keyword| keyword.value),
            Some(TokenValue::Keyword(Keyword::Const))
        );

        Ok(ast::Declaration {
            name,
            is_const,
            ty,
            init,
            span: start.convex_hull(&semicolon.span),
        })
    }

    /// Parses `name = expr;`. Whether `name` was declared is not checked.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_assignment(&mut self) -> Result<ast::Assignment<'buf>, ParserError<'buf>> {
        let name = self.parse_name()?;
        self.expect(Operator::Assign)?;
        let init = self.bounded()?.parse_expression()?;
        let semicolon = self.expect(Symbol::Semicolon)?;
        let span = name.span().convex_hull(&semicolon.span);

        Ok(ast::Assignment { name, init, span })
    }

    /// Parses an identifier, a number, or an operator followed by exactly two operands.
    ///
    /// There is no precedence and no grouping: `+ a * b c` is `a + (b * c)`.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_expression(&mut self) -> Result<Expr<'buf>, ParserError<'buf>> {
        let token = self.tokens.current();

        match token.value {
            TokenValue::Ident(_) => Ok(Expr::Ident(self.parse_name()?)),

            TokenValue::Number(value) => {
                self.tokens.advance();

                Ok(Expr::Number(NumberLit(Spanned {
                    value,
                    span: token.span,
                })))
            }

            TokenValue::Operator(op) => {
                self.tokens.advance();
                let lhs = self.bounded()?.parse_expression()?;
                let rhs = self.bounded()?.parse_expression()?;
                let span = token.span.convex_hull(&rhs.span());

                Ok(Expr::BinOp(ast::BinOpExpr {
                    op: Spanned {
                        value: op,
                        span: token.span,
                    },
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                    span,
                }))
            }

            _ => Err(ParserError::ExpectedExpression(token)),
        }
    }

    /// Parses `T name(T a, T b) { ... }`.
    ///
    /// The body is skipped up to the first `}`, so a nested block ends it early.
    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse_function_declaration(
        &mut self,
    ) -> Result<ast::Function<'buf>, ParserError<'buf>> {
        let return_ty = self.parse_type_name()?;
        let name = self.parse_name()?;
        self.expect(Symbol::ParenLeft)?;
        let mut params = Vec::new();

        loop {
            if self.try_consume(Symbol::ParenRight).is_some() {
                break;
            }

            if !params.is_empty() && self.try_consume(Symbol::Comma).is_none() {
                return Err(self.unexpected([Symbol::ParenRight, Symbol::Comma]));
            }

            params.push(self.parse_param()?);
        }

        let brace_left = self.expect(Symbol::BraceLeft)?;
        let brace_right = self.skip_body(brace_left)?;
        let span = return_ty.span.convex_hull(&brace_right.span);

        Ok(ast::Function {
            name,
            return_ty,
            params,
            span,
        })
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_param(&mut self) -> Result<ast::Param<'buf>, ParserError<'buf>> {
        let ty = self.parse_type_name()?;
        let name = self.parse_name()?;
        let span = ty.span.convex_hull(&name.span());

        Ok(ast::Param { ty, name, span })
    }

    fn skip_body(&mut self, brace_left: Token<'buf>) -> Result<Token<'buf>, ParserError<'buf>> {
        loop {
            let token = self.tokens.current();

            match token.value {
                TokenValue::Symbol(Symbol::BraceRight) => return Ok(self.tokens.advance()),

                TokenValue::Eof => {
                    return Err(ParserError::UnterminatedBody {
                        open: brace_left,
                        eof: token,
                    })
                }

                TokenValue::Invalid(_) => {
                    debug!(?token, "invalid character in a function body");
                    self.errors.push(ParserError::InvalidCharacter(token));
                    self.tokens.advance();
                }

                _ => {
                    trace!(?token, "skipping a function body token");
                    self.tokens.advance();
                }
            }
        }
    }

    fn parse_name(&mut self) -> Result<Name<'buf>, ParserError<'buf>> {
        let token = self.tokens.current();

        match token.value {
            TokenValue::Ident(value) => {
                self.tokens.advance();

                Ok(Name(Spanned {
                    value,
                    span: token.span,
                }))
            }

            _ => Err(self.unexpected(TokenType::Identifier)),
        }
    }

    fn parse_type_name(&mut self) -> Result<Spanned<TypeName>, ParserError<'buf>> {
        let token = self.tokens.current();

        match token.value {
            TokenValue::TypeName(value) => {
                self.tokens.advance();

                Ok(Spanned {
                    value,
                    span: token.span,
                })
            }

            _ => Err(self.unexpected(TokenType::TypeName)),
        }
    }
}
