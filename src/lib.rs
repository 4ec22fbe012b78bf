mod errors;
mod parser;
mod runtime;
mod symbols;

pub use errors::{CheeseError, ErrorInfo, ErrorKind, ErrorReporter};
pub use parser::{parse, parse_interactive, BinOpKind, Expr, Locatable, Location, Program, Span, Stmt};
pub use runtime::{compile_and_run, Runtime, Value, BELGIAN_BANNER, NO_SOURCE_NOTICE};
pub use symbols::{Symbol, SymbolKind, SymbolTable};
