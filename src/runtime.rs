//! Tree-walking evaluator. Walks the AST depth-first, left to right,
//! against a scoped symbol table, buffering printed output in memory. The
//! first runtime error aborts the run; output buffered before the failure
//! stays readable.

use crate::errors::{CheeseError, SUGGEST_UNDEFINED};
use crate::parser::{parse, BinOpKind, Expr, Program, Stmt};
use crate::symbols::{SymbolKind, SymbolTable};
use std::collections::HashMap;

pub const BELGIAN_BANNER: &str = "=== Belgian Mode ===";
pub const NO_SOURCE_NOTICE: &str = "No source available.";

/// A runtime value. The language knows numbers (f64) and strings.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Str(String),
}

impl Value {
    /// Truthiness: non-zero number or non-empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0,
            Self::Str(s) => !s.is_empty(),
        }
    }

    fn from_bool(b: bool) -> Self {
        Self::Number(if b { 1.0 } else { 0.0 })
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Str(_) => "string",
        }
    }
}

impl std::fmt::Display for Value {
    /// Printing policy: integral floats print without a decimal point
    /// (`3`, not `3.0`); anything else uses the default float formatting.
    /// Strings print verbatim.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Self::Number(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One evaluation environment: a symbol table, an append-only output
/// buffer, and the source text for the Belgian statement. Concurrent
/// programs need separate `Runtime` instances.
pub struct Runtime {
    symbols: SymbolTable,
    output: Vec<String>,
    source: Option<String>,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            output: vec![],
            source: None,
        }
    }

    /// Executes a program. `source` is only consulted by the Belgian
    /// statement; pass `None` when no original text exists (the REPL does).
    pub fn run(&mut self, program: &Program, source: Option<&str>) -> Result<(), CheeseError> {
        self.source = source.map(str::to_string);
        for statement in &program.statements {
            self.exec(statement)?;
        }
        Ok(())
    }

    /// Everything printed so far, one line per print, joined by newlines.
    pub fn output(&self) -> String {
        self.output.join("\n")
    }

    pub fn output_lines(&self) -> &[String] {
        &self.output
    }

    /// The post-run environment: visible names and their values.
    pub fn env(&self) -> HashMap<String, Value> {
        self.symbols.snapshot()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn exec(&mut self, statement: &Stmt) -> Result<(), CheeseError> {
        match statement {
            Stmt::Assign(name, expr, span) => {
                let value = self.eval(expr)?;
                // Assignment declares on first use and rebinds afterwards;
                // there is no separate declaration keyword.
                if self.symbols.lookup(name).is_some() {
                    self.symbols.update(name, value);
                } else {
                    self.symbols
                        .define(name, SymbolKind::Variable, value, Some(span.line()));
                }
                Ok(())
            }
            Stmt::Print(expr, _) => {
                let value = self.eval(expr)?;
                self.output.push(value.to_string());
                Ok(())
            }
            Stmt::If(condition, then_block, else_block, _) => {
                // Branches execute in the enclosing scope; the language has
                // no block-local declarations.
                let branch = if self.eval(condition)?.is_truthy() {
                    then_block
                } else {
                    else_block
                };
                for statement in branch {
                    self.exec(statement)?;
                }
                Ok(())
            }
            Stmt::Loop(body, condition, _) => {
                // Post-test: the body runs once before the first check.
                loop {
                    for statement in body {
                        self.exec(statement)?;
                    }
                    if !self.eval(condition)?.is_truthy() {
                        break;
                    }
                }
                Ok(())
            }
            Stmt::DebugDump(_) => {
                // The banner accompanies the source dump; without source
                // only the notice is printed.
                match &self.source {
                    Some(source) => {
                        self.output.push(BELGIAN_BANNER.to_string());
                        self.output.push(source.clone());
                    }
                    None => self.output.push(NO_SOURCE_NOTICE.to_string()),
                }
                Ok(())
            }
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, CheeseError> {
        match expr {
            Expr::Number(n, _) => Ok(Value::Number(*n)),
            Expr::StringLit(s, _) => Ok(Value::Str(s.clone())),
            Expr::VarRef(name, span) => self
                .symbols
                .lookup(name)
                .map(|symbol| symbol.value.clone())
                .ok_or_else(|| {
                    CheeseError::runtime(format!("variable '{name}' is not defined"))
                        .at_line(span.line())
                        .with_suggestions(SUGGEST_UNDEFINED)
                }),
            Expr::BinOp(left, op, right, span) => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                apply(*op, left, right, span.line())
            }
        }
    }
}

fn apply(op: BinOpKind, left: Value, right: Value, line: usize) -> Result<Value, CheeseError> {
    match op {
        BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div => {
            let (l, r) = numeric_operands(op, &left, &right, line)?;
            let result = match op {
                BinOpKind::Add => l + r,
                BinOpKind::Sub => l - r,
                BinOpKind::Mul => l * r,
                BinOpKind::Div => {
                    if r == 0.0 {
                        return Err(CheeseError::runtime("division by zero").at_line(line));
                    }
                    l / r
                }
                _ => unreachable!(),
            };
            Ok(Value::Number(result))
        }
        // Equality is defined across kinds: numbers compare numerically,
        // strings textually, and a number never equals a string.
        BinOpKind::Eq => Ok(Value::from_bool(left == right)),
        BinOpKind::Ne => Ok(Value::from_bool(left != right)),
        BinOpKind::Gt | BinOpKind::Lt | BinOpKind::Ge | BinOpKind::Le => {
            let (l, r) = numeric_operands(op, &left, &right, line)?;
            Ok(Value::from_bool(match op {
                BinOpKind::Gt => l > r,
                BinOpKind::Lt => l < r,
                BinOpKind::Ge => l >= r,
                BinOpKind::Le => l <= r,
                _ => unreachable!(),
            }))
        }
    }
}

fn numeric_operands(
    op: BinOpKind,
    left: &Value,
    right: &Value,
    line: usize,
) -> Result<(f64, f64), CheeseError> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(CheeseError::type_error(format!(
            "invalid operation '{}' between {} and {}",
            op.keyword(),
            left.type_name(),
            right.type_name()
        ))
        .at_line(line)),
    }
}

/// Parses and runs `source` in a fresh runtime, returning the program
/// output.
pub fn compile_and_run(source: &str) -> Result<String, CheeseError> {
    let program = parse(source)?;
    let mut runtime = Runtime::new();
    runtime.run(&program, Some(source))?;
    Ok(runtime.output())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::parser::parse_interactive;

    fn run_program(source: &str) -> String {
        compile_and_run(source).expect("program should run")
    }

    fn run_error(source: &str) -> CheeseError {
        let program = parse(source).expect("program should parse");
        let mut runtime = Runtime::new();
        runtime
            .run(&program, Some(source))
            .expect_err("program should fail")
    }

    #[test]
    fn sum_of_two_variables() {
        let source = "Cheese
Cheddar Glyn(x) 10 Coleraine Brie
Cheddar Glyn(y) 20 Coleraine Brie
Cheddar Glyn(sum) Glyn(x) Gouda Glyn(y) Coleraine Brie
Wensleydale Glyn(sum) Brie
NoCheese";
        assert_eq!(run_program(source), "30");
    }

    #[test]
    fn evaluation_is_deterministic() {
        let source = "Cheese
Cheddar Glyn(x) 3 Coleraine Brie
Cheddar Glyn(x) Glyn(x) Emmental 7 Coleraine Brie
Wensleydale Glyn(x) Brie
NoCheese";
        let program = parse(source).expect("program should parse");
        let mut first = Runtime::new();
        let mut second = Runtime::new();
        first.run(&program, Some(source)).unwrap();
        second.run(&program, Some(source)).unwrap();
        assert_eq!(first.output(), second.output());
        assert_eq!(first.env(), second.env());
    }

    #[test]
    fn post_test_loop_prints_counter() {
        let source = "Cheese
Cheddar Glyn(counter) 0 Coleraine Brie
Caerphilly
Wensleydale counter Brie
Cheddar Glyn(counter) counter Gouda 1 Coleraine Brie
Gruyere counter Tilsit 3 Brie
NoCheese";
        assert_eq!(run_program(source), "0\n1\n2");
    }

    #[test]
    fn loop_body_runs_at_least_once() {
        let source = "Cheese
Caerphilly
Wensleydale SwisstickSwiss Brie
Gruyere 0 Brie
NoCheese";
        assert_eq!(run_program(source), "tick");
    }

    #[test]
    fn true_condition_runs_only_then_branch() {
        let source = "Cheese
Cheddar Glyn(x) 10 Coleraine Brie
Stilton Glyn(x) Windsor 5 Gorgonzola
Wensleydale Swissbig cheeseSwiss Brie
White
Wensleydale Swisssmall cheeseSwiss Brie
Brie
NoCheese";
        assert_eq!(run_program(source), "big cheese");
    }

    #[test]
    fn false_condition_runs_only_else_branch() {
        let source = "Cheese
Cheddar Glyn(x) 1 Coleraine Brie
Stilton Glyn(x) Windsor 5 Gorgonzola
Wensleydale Swissbig cheeseSwiss Brie
White
Wensleydale Swisssmall cheeseSwiss Brie
Brie
NoCheese";
        assert_eq!(run_program(source), "small cheese");
    }

    #[test]
    fn nonempty_string_is_truthy() {
        let source = "Cheese
Stilton SwissxSwiss Gorgonzola
Wensleydale SwissyesSwiss Brie
White
Wensleydale SwissnoSwiss Brie
Brie
NoCheese";
        assert_eq!(run_program(source), "yes");
    }

    #[test]
    fn empty_string_is_falsy() {
        let source = "Cheese
Stilton SwissSwiss Gorgonzola
Wensleydale SwissyesSwiss Brie
White
Wensleydale SwissnoSwiss Brie
Brie
NoCheese";
        assert_eq!(run_program(source), "no");
    }

    #[test]
    fn division_by_zero_is_a_dedicated_error() {
        let err = run_error("Cheese\nWensleydale 1 Camembert 0 Brie\nNoCheese");
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert!(err.message().contains("division by zero"));
    }

    #[test]
    fn undefined_variable_names_the_identifier() {
        let err = run_error("Cheese\nWensleydale mascarpone Brie\nNoCheese");
        assert_eq!(err.kind(), ErrorKind::Runtime);
        assert!(err.message().contains("'mascarpone'"));
    }

    #[test]
    fn mixed_type_arithmetic_names_types_and_operator() {
        let err = run_error("Cheese\nWensleydale 1 Gouda SwisscurdsSwiss Brie\nNoCheese");
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.message().contains("number"));
        assert!(err.message().contains("string"));
        assert!(err.message().contains("Gouda"));
    }

    #[test]
    fn ordering_strings_is_a_type_error() {
        let err = run_error("Cheese\nWensleydale SwissaSwiss Tilsit SwissbSwiss Brie\nNoCheese");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn partial_output_survives_a_failed_run() {
        let source = "Cheese
Wensleydale SwissfirstSwiss Brie
Wensleydale 1 Camembert 0 Brie
Wensleydale SwissneverSwiss Brie
NoCheese";
        let program = parse(source).unwrap();
        let mut runtime = Runtime::new();
        assert!(runtime.run(&program, Some(source)).is_err());
        assert_eq!(runtime.output(), "first");
    }

    #[test]
    fn comparison_results_are_numeric() {
        assert_eq!(
            run_program("Cheese\nWensleydale 2 Windsor 1 Brie\nNoCheese"),
            "1"
        );
        assert_eq!(
            run_program("Cheese\nWensleydale 2 Tilsit 1 Brie\nNoCheese"),
            "0"
        );
    }

    #[test]
    fn equality_spans_both_kinds() {
        assert_eq!(
            run_program("Cheese\nWensleydale SwissaSwiss Cheshire SwissaSwiss Brie\nNoCheese"),
            "1"
        );
        assert_eq!(
            run_program("Cheese\nWensleydale 1 Cheshire SwissaSwiss Brie\nNoCheese"),
            "0"
        );
        assert_eq!(
            run_program("Cheese\nWensleydale 1 Lancashire SwissaSwiss Brie\nNoCheese"),
            "1"
        );
    }

    #[test]
    fn integral_floats_print_without_decimal_point() {
        assert_eq!(
            run_program("Cheese\nWensleydale 4 Camembert 2 Brie\nNoCheese"),
            "2"
        );
        assert_eq!(
            run_program("Cheese\nWensleydale 7 Camembert 2 Brie\nNoCheese"),
            "3.5"
        );
    }

    #[test]
    fn string_literal_round_trips_through_print() {
        assert_eq!(
            run_program("Cheese\nWensleydale Swisscurds and wheySwiss Brie\nNoCheese"),
            "curds and whey"
        );
    }

    #[test]
    fn belgian_dumps_the_source() {
        let source = "Cheese\nBelgian Brie\nNoCheese";
        let output = run_program(source);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], BELGIAN_BANNER);
        assert!(output.contains(source));
    }

    #[test]
    fn belgian_without_source_prints_only_the_notice() {
        let program = parse_interactive("Belgian Brie").unwrap();
        let mut runtime = Runtime::new();
        runtime.run(&program, None).unwrap();
        assert_eq!(runtime.output(), NO_SOURCE_NOTICE);
    }

    #[test]
    fn assignment_rebinds_on_subsequent_use() {
        let source = "Cheese
Cheddar Glyn(x) 1 Coleraine Brie
Cheddar Glyn(x) 2 Coleraine Brie
Wensleydale Glyn(x) Brie
NoCheese";
        assert_eq!(run_program(source), "2");
    }

    #[test]
    fn symbol_table_is_reachable_through_the_runtime() {
        let program = parse_interactive("Cheddar Glyn(x) 5 Coleraine Brie").unwrap();
        let mut runtime = Runtime::new();
        runtime.run(&program, None).unwrap();
        let symbol = runtime.symbols().lookup("x").expect("x should be bound");
        assert_eq!(symbol.value, Value::Number(5.0));
        assert_eq!(symbol.scope_level, 0);
    }

    #[test]
    fn environment_is_queryable_after_the_run() {
        let source = "Cheese
Cheddar Glyn(x) 10 Coleraine Brie
Cheddar Glyn(name) SwissGlynSwiss Coleraine Brie
NoCheese";
        let program = parse(source).unwrap();
        let mut runtime = Runtime::new();
        runtime.run(&program, Some(source)).unwrap();
        let env = runtime.env();
        assert_eq!(env["x"], Value::Number(10.0));
        assert_eq!(env["name"], Value::Str("Glyn".to_string()));
    }

    #[test]
    fn runtime_persists_across_interactive_runs() {
        let mut runtime = Runtime::new();
        let first = parse_interactive("Cheddar Glyn(x) 41 Coleraine Brie").unwrap();
        runtime.run(&first, None).unwrap();
        let second = parse_interactive("Wensleydale Glyn(x) Gouda 1 Brie").unwrap();
        runtime.run(&second, None).unwrap();
        assert_eq!(runtime.output(), "42");
    }

    #[test]
    fn precedence_multiplication_binds_tighter() {
        assert_eq!(
            run_program("Cheese\nWensleydale 2 Gouda 3 Emmental 4 Brie\nNoCheese"),
            "14"
        );
        assert_eq!(
            run_program("Cheese\nWensleydale (2 Gouda 3) Emmental 4 Brie\nNoCheese"),
            "20"
        );
    }

    #[test]
    fn nested_conditionals_share_the_enclosing_scope() {
        let source = "Cheese
Cheddar Glyn(x) 1 Coleraine Brie
Stilton Glyn(x) Gorgonzola
Cheddar Glyn(x) 2 Coleraine Brie
White
Brie
Wensleydale Glyn(x) Brie
NoCheese";
        // Branches run in the enclosing scope, so the rebinding is visible
        // after the conditional.
        assert_eq!(run_program(source), "2");
    }
}
