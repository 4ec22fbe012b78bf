mod ast;
mod builder;
mod grammar;
mod locations;
pub mod tokenizer;

pub use ast::{BinOpKind, Expr, Program, Stmt};
pub use locations::{Locatable, Location, Span};

use crate::errors::CheeseError;

/// Parses a complete `Cheese` .. `NoCheese` program. Fails with a lexical
/// or syntax error on malformed input; never returns a partial tree.
pub fn parse(source: &str) -> Result<Program, CheeseError> {
    let tokens = tokenizer::tokenize(source)?;
    let tree = grammar::parse_tokens(&tokens)?;
    builder::build_program(tree)
}

/// Parses a bare statement list, without the program delimiters. Used by
/// the REPL, which feeds one line at a time.
pub fn parse_interactive(source: &str) -> Result<Program, CheeseError> {
    let tokens = tokenizer::tokenize(source)?;
    let tree = grammar::parse_tokens_interactive(&tokens)?;
    builder::build_program(tree)
}
