use std::fmt::{self, Display};

use serde::Serialize;

use crate::source::{Source, SourceId};

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Position {
    #[serde(skip)]
    pub src: Option<SourceId>,
    pub byte: usize,
    pub line: usize,
    pub col: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            src: None,
            byte: 0,
            line: 1,
            col: 1,
        }
    }
}

/// A half-open span: `end` is the position right after the last character.
#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn convex_hull(&self, other: &Span) -> Span {
        let start = if other.start.byte < self.start.byte {
            other.start
        } else {
            self.start
        };

        let end = if other.end.byte > self.end.byte {
            other.end
        } else {
            self.end
        };

        Span { start, end }
    }

    pub fn display<'a>(&self, source: &'a Source<'_>) -> PositionPath<'a> {
        PositionPath::new(self.start, source)
    }
}

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq, Default)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

pub trait HasSpan {
    fn span(&self) -> Span;
}

impl HasSpan for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl<T> HasSpan for Spanned<T> {
    fn span(&self) -> Span {
        self.span
    }
}

/// Renders a position as `path:line:col`.
pub struct PositionPath<'a> {
    pos: Position,
    source: &'a Source<'a>,
}

impl<'a> PositionPath<'a> {
    pub fn new(pos: Position, source: &'a Source<'_>) -> Self {
        Self { pos, source }
    }
}

impl Display for PositionPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos.src.and_then(|id| self.source.get(id)) {
            Some(file) => write!(f, "{}", file.path().display())?,
            None => write!(f, "<unknown>")?,
        }

        write!(f, ":{}:{}", self.pos.line, self.pos.col)
    }
}
