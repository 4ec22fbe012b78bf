use super::locations::Span;
use super::tokenizer::{
    KW_CAMEMBERT, KW_CHESHIRE, KW_EDAM, KW_EMMENTAL, KW_GOUDA, KW_JARLSBERG, KW_LANCASHIRE,
    KW_LIPTAUER, KW_TILSIT, KW_WINDSOR,
};

/// A parsed program: the statement list between `Cheese` and `NoCheese`.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// The flat statement set. Every node exclusively owns its children; the
/// conditional carries its two branches as explicit lists.
#[derive(Debug, Clone)]
pub enum Stmt {
    Assign(String, Expr, Span),
    Print(Expr, Span),
    If(Expr, Vec<Stmt>, Vec<Stmt>, Span),
    Loop(Vec<Stmt>, Expr, Span),
    DebugDump(Span),
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64, Span),
    StringLit(String, Span),
    VarRef(String, Span),
    BinOp(Box<Expr>, BinOpKind, Box<Expr>, Span),
}

/// Canonical operator tags, one per operator keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl BinOpKind {
    /// The surface keyword this tag was parsed from, for error messages.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Add => KW_GOUDA,
            Self::Sub => KW_EDAM,
            Self::Mul => KW_EMMENTAL,
            Self::Div => KW_CAMEMBERT,
            Self::Eq => KW_CHESHIRE,
            Self::Ne => KW_LANCASHIRE,
            Self::Gt => KW_WINDSOR,
            Self::Lt => KW_TILSIT,
            Self::Ge => KW_JARLSBERG,
            Self::Le => KW_LIPTAUER,
        }
    }
}

impl std::fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
