pub mod dump;

use serde::Serialize;

use crate::parse::token::{Operator, TypeName};
use crate::position::{HasSpan, Span, Spanned};

macro_rules! define_visitor {
    ($( $name:ident ( $arg:ident : $ty:ty ) );+ $(;)?) => {
        pub trait Visitor<'buf>
        where
            Self: Sized,
        {
            type Output;

            $(
                fn $name(&mut self, $arg: &$ty) -> Self::Output;
            )+
        }
    };
}

define_visitor! {
    visit_program(program: Program<'buf>);

    // statements
    visit_stmt(stmt: Stmt<'buf>);
    visit_declaration(decl: Declaration<'buf>);
    visit_assignment(assignment: Assignment<'buf>);
    visit_function(func: Function<'buf>);
    visit_param(param: Param<'buf>);

    // expr
    visit_expr(expr: Expr<'buf>);
    visit_bin_op(expr: BinOpExpr<'buf>);
    visit_name(name: Name<'buf>);
    visit_number_lit(expr: NumberLit<'buf>);
}

macro_rules! impl_has_span {
    ($type:ty) => {
        impl HasSpan for $type {
            fn span(&self) -> Span {
                self.span
            }
        }
    };

    (|$s:ident: $type:ty| $body:expr) => {
        impl HasSpan for $type {
            fn span(&$s) -> Span {
                $body
            }
        }
    };
}

/// The top-level statements of one source file, in source order.
#[derive(Serialize, Debug, Clone, Eq, PartialEq, Default)]
pub struct Program<'buf> {
    pub stmts: Vec<Stmt<'buf>>,
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum Stmt<'buf> {
    Declaration(Declaration<'buf>),
    Assignment(Assignment<'buf>),
    Function(Function<'buf>),
}

impl Stmt<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Declaration(_) => "Declaration",
            Self::Assignment(_) => "Assignment",
            Self::Function(_) => "Function",
        }
    }

    pub fn name(&self) -> &Name<'_> {
        match self {
            Self::Declaration(decl) => &decl.name,
            Self::Assignment(assignment) => &assignment.name,
            Self::Function(func) => &func.name,
        }
    }
}

impl_has_span!(|self: Stmt<'_>| match self {
    Self::Declaration(decl) => decl.span,
    Self::Assignment(assignment) => assignment.span,
    Self::Function(func) => func.span,
});

/// `Const T x = e;`, `Var T x = e;` or `T x = e;`.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Declaration<'buf> {
    pub name: Name<'buf>,
    pub is_const: bool,
    pub ty: Spanned<TypeName>,
    pub init: Expr<'buf>,
    pub span: Span,
}

impl_has_span!(Declaration<'_>);

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Assignment<'buf> {
    pub name: Name<'buf>,
    pub init: Expr<'buf>,
    pub span: Span,
}

impl_has_span!(Assignment<'_>);

/// A function declaration. Its body is skipped by the parser and not retained.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Function<'buf> {
    pub name: Name<'buf>,
    pub return_ty: Spanned<TypeName>,
    pub params: Vec<Param<'buf>>,
    pub span: Span,
}

impl_has_span!(Function<'_>);

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Param<'buf> {
    pub ty: Spanned<TypeName>,
    pub name: Name<'buf>,
    pub span: Span,
}

impl_has_span!(Param<'_>);

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum Expr<'buf> {
    Ident(Name<'buf>),
    Number(NumberLit<'buf>),
    BinOp(BinOpExpr<'buf>),
}

impl_has_span!(|self: Expr<'_>| match self {
    Self::Ident(name) => name.span(),
    Self::Number(lit) => lit.span(),
    Self::BinOp(expr) => expr.span,
});

/// A prefix binary operation: `op lhs rhs`.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct BinOpExpr<'buf> {
    pub op: Spanned<Operator>,
    pub lhs: Box<Expr<'buf>>,
    pub rhs: Box<Expr<'buf>>,
    pub span: Span,
}

impl_has_span!(BinOpExpr<'_>);

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Name<'buf>(pub Spanned<&'buf str>);

impl<'buf> Name<'buf> {
    pub fn as_str(&self) -> &'buf str {
        self.0.value
    }
}

impl_has_span!(|self: Name<'_>| self.0.span);

/// A number literal, kept as written.
#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub struct NumberLit<'buf>(pub Spanned<&'buf str>);

impl<'buf> NumberLit<'buf> {
    pub fn as_str(&self) -> &'buf str {
        self.0.value
    }
}

impl_has_span!(|self: NumberLit<'_>| self.0.span);
