use super::ast::{Expr, Stmt};
use super::tokenizer::Token;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub(crate) fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Location {
                line: start_line,
                column: start_col,
            },
            end: Location {
                line: end_line,
                column: end_col,
            },
        }
    }

    pub(crate) fn till<R: Locatable>(&self, other: &R) -> Self {
        Self {
            start: self.start,
            end: other.span().end,
        }
    }

    pub fn line(&self) -> usize {
        self.start.line
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} till {}", self.start, self.end)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl Locatable for Stmt {
    fn span(&self) -> Span {
        match self {
            Self::Assign(_, _, s) => *s,
            Self::Print(_, s) => *s,
            Self::If(_, _, _, s) => *s,
            Self::Loop(_, _, s) => *s,
            Self::DebugDump(s) => *s,
        }
    }
}

impl Locatable for Expr {
    fn span(&self) -> Span {
        match self {
            Self::Number(_, s) => *s,
            Self::StringLit(_, s) => *s,
            Self::VarRef(_, s) => *s,
            Self::BinOp(_, _, _, s) => *s,
        }
    }
}

impl<R> Locatable for Vec<R>
where
    R: Locatable,
{
    fn span(&self) -> Span {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first.span().till(last),
            _ => Span::default(),
        }
    }
}
