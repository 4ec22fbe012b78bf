//! Syntax-directed builder: turns parse-tree productions into AST nodes,
//! bottom-up, exactly one node per production. The builder only tags and
//! restructures, it never evaluates.

use super::ast::{BinOpKind, Expr, Program, Stmt};
use super::grammar::{ParseTree, Production};
use super::locations::{Locatable, Span};
use super::tokenizer::{Token, TokenType as TT, STRING_DELIM};
use crate::errors::{CheeseError, SUGGEST_INVALID_SWISS};

/// Width of the delimiter stripped from each end of a string lexeme.
pub(crate) const STRING_DELIM_LEN: usize = STRING_DELIM.len();

pub(crate) fn build_program(tree: ParseTree) -> Result<Program, CheeseError> {
    match tree {
        ParseTree::Rule(Production::Program, children, _) => {
            let statements = children
                .into_iter()
                .map(build_stmt)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Program { statements })
        }
        other => Err(malformed(Production::Program, &other)),
    }
}

fn build_stmt(tree: ParseTree) -> Result<Stmt, CheeseError> {
    let (production, children, span) = match tree {
        ParseTree::Rule(production, children, span) => (production, children, span),
        leaf @ ParseTree::Leaf(_) => return Err(malformed(Production::Program, &leaf)),
    };
    match production {
        Production::Assignment => {
            let [name, expr] = take(production, children, span)?;
            Ok(Stmt::Assign(leaf_name(name)?, build_expr(expr)?, span))
        }
        Production::PrintStmt => {
            let [expr] = take(production, children, span)?;
            Ok(Stmt::Print(build_expr(expr)?, span))
        }
        Production::IfStmt => {
            let [condition, then_block, else_block] = take(production, children, span)?;
            Ok(Stmt::If(
                build_expr(condition)?,
                build_block(then_block)?,
                build_block(else_block)?,
                span,
            ))
        }
        Production::LoopStmt => {
            let [body, condition] = take(production, children, span)?;
            Ok(Stmt::Loop(build_block(body)?, build_expr(condition)?, span))
        }
        Production::BelgianStmt => {
            if !children.is_empty() {
                return Err(arity_error(production, 0, children.len(), span));
            }
            Ok(Stmt::DebugDump(span))
        }
        other => Err(CheeseError::syntax(format!(
            "malformed parse tree: {other:?} is not a statement production"
        ))
        .at_line(span.line())),
    }
}

fn build_block(tree: ParseTree) -> Result<Vec<Stmt>, CheeseError> {
    match tree {
        ParseTree::Rule(
            Production::ThenBlock | Production::ElseBlock | Production::LoopBody,
            children,
            _,
        ) => children.into_iter().map(build_stmt).collect(),
        other => Err(malformed(Production::ThenBlock, &other)),
    }
}

fn build_expr(tree: ParseTree) -> Result<Expr, CheeseError> {
    let (production, children, span) = match tree {
        ParseTree::Rule(production, children, span) => (production, children, span),
        leaf @ ParseTree::Leaf(_) => return Err(malformed(Production::Number, &leaf)),
    };
    if let Some(kind) = binop_kind(production) {
        let [left, right] = take(production, children, span)?;
        return Ok(Expr::BinOp(
            Box::new(build_expr(left)?),
            kind,
            Box::new(build_expr(right)?),
            span,
        ));
    }
    match production {
        Production::Number => {
            let [leaf] = take(production, children, span)?;
            let tok = leaf_token(leaf, TT::NUMBER)?;
            let value = tok.lexeme.parse::<f64>().map_err(|_| {
                CheeseError::syntax(format!("invalid number literal '{}'", tok.lexeme))
                    .at_line(span.line())
            })?;
            Ok(Expr::Number(value, span))
        }
        Production::String => {
            let [leaf] = take(production, children, span)?;
            let tok = leaf_token(leaf, TT::STRING)?;
            Ok(Expr::StringLit(strip_string_delims(&tok)?, span))
        }
        Production::Var | Production::GlynVar => {
            let [leaf] = take(production, children, span)?;
            Ok(Expr::VarRef(leaf_name(leaf)?, span))
        }
        other => Err(CheeseError::syntax(format!(
            "malformed parse tree: {other:?} is not an expression production"
        ))
        .at_line(span.line())),
    }
}

/// Removes the fixed-width delimiter from both ends of a STRING lexeme.
/// A lexeme too short to carry both delimiters is rejected rather than
/// sliced blindly.
fn strip_string_delims(tok: &Token) -> Result<String, CheeseError> {
    let lexeme = &tok.lexeme;
    if lexeme.len() < 2 * STRING_DELIM_LEN
        || !lexeme.starts_with(STRING_DELIM)
        || !lexeme.ends_with(STRING_DELIM)
    {
        return Err(
            CheeseError::syntax(format!("invalid Swiss string literal '{lexeme}'"))
                .at_line(tok.span.line())
                .with_suggestions(SUGGEST_INVALID_SWISS),
        );
    }
    Ok(lexeme[STRING_DELIM_LEN..lexeme.len() - STRING_DELIM_LEN].to_string())
}

fn binop_kind(production: Production) -> Option<BinOpKind> {
    match production {
        Production::Add => Some(BinOpKind::Add),
        Production::Sub => Some(BinOpKind::Sub),
        Production::Mul => Some(BinOpKind::Mul),
        Production::Div => Some(BinOpKind::Div),
        Production::Eq => Some(BinOpKind::Eq),
        Production::Ne => Some(BinOpKind::Ne),
        Production::Gt => Some(BinOpKind::Gt),
        Production::Lt => Some(BinOpKind::Lt),
        Production::Ge => Some(BinOpKind::Ge),
        Production::Le => Some(BinOpKind::Le),
        _ => None,
    }
}

fn take<const N: usize>(
    production: Production,
    children: Vec<ParseTree>,
    span: Span,
) -> Result<[ParseTree; N], CheeseError> {
    let found = children.len();
    <[ParseTree; N]>::try_from(children).map_err(|_| arity_error(production, N, found, span))
}

fn arity_error(production: Production, expected: usize, found: usize, span: Span) -> CheeseError {
    CheeseError::syntax(format!(
        "malformed {production:?} production: expected {expected} part(s), found {found}"
    ))
    .at_line(span.line())
}

fn leaf_token(tree: ParseTree, typ: TT) -> Result<Token, CheeseError> {
    match tree {
        ParseTree::Leaf(tok) if tok.typ == typ => Ok(tok),
        other => Err(CheeseError::syntax(format!(
            "malformed parse tree: expected a {typ:?} token, found {other:?}"
        ))
        .at_line(other.span().line())),
    }
}

fn leaf_name(tree: ParseTree) -> Result<String, CheeseError> {
    leaf_token(tree, TT::NAME).map(|tok| tok.lexeme)
}

fn malformed(expected: Production, found: &ParseTree) -> CheeseError {
    CheeseError::syntax(format!(
        "malformed parse tree: expected a {expected:?} production, found {found:?}"
    ))
    .at_line(found.span().line())
}
