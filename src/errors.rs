use std::fmt;

/// Phase of the pipeline an error originated from. Callers branch on the
/// kind rather than on distinct error types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
    Type,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        Self::Lexical,
        Self::Syntax,
        Self::Semantic,
        Self::Runtime,
        Self::Type,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Lexical => "LEXICAL",
            Self::Syntax => "SYNTAX",
            Self::Semantic => "SEMANTIC",
            Self::Runtime => "RUNTIME",
            Self::Type => "TYPE",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Lexical => "Lexical",
            Self::Syntax => "Syntax",
            Self::Semantic => "Semantic",
            Self::Runtime => "Runtime",
            Self::Type => "Type",
        }
    }
}

/// Structured error payload: kind, message, optional location, optional
/// context snippet and suggestions.
#[derive(Clone, Debug)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ERROR: {}", self.kind.label(), self.message)?;
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
            if let Some(column) = self.column {
                write!(f, ", column {column}")?;
            }
        }
        if let Some(context) = &self.context {
            write!(f, "\nContext: {context}")?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions: {}", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct CheeseError(pub ErrorInfo);

impl CheeseError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self(ErrorInfo {
            kind,
            message: message.into(),
            line: None,
            column: None,
            context: None,
            suggestions: vec![],
        })
    }

    pub fn lexical(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Lexical, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn semantic(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.0.line = Some(line);
        self.0.column = Some(column);
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.0.line = Some(line);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.0.context = Some(context.into());
        self
    }

    pub fn with_suggestions<S: Into<String>>(
        mut self,
        suggestions: impl IntoIterator<Item = S>,
    ) -> Self {
        self.0.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.0.kind
    }

    pub fn message(&self) -> &str {
        &self.0.message
    }
}

impl fmt::Display for CheeseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for CheeseError {}

pub(crate) const SUGGEST_UNDEFINED: [&str; 2] = [
    "check the spelling of the variable name",
    "assign to the variable before using it",
];
pub(crate) const SUGGEST_MISSING_CHEESE: [&str; 1] =
    ["start the program with 'Cheese'"];
pub(crate) const SUGGEST_MISSING_NOCHEESE: [&str; 1] =
    ["end the program with 'NoCheese'"];
pub(crate) const SUGGEST_MISSING_BRIE: [&str; 1] =
    ["add 'Brie' at the end of the statement"];
pub(crate) const SUGGEST_INVALID_SWISS: [&str; 1] =
    ["write strings as Swiss...Swiss"];

/// Collects errors and warnings across compilation phases. Compilation is
/// expected to stop once `max_errors` is reached.
pub struct ErrorReporter {
    errors: Vec<CheeseError>,
    warnings: Vec<String>,
    max_errors: usize,
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter {
    pub const DEFAULT_MAX_ERRORS: usize = 10;

    pub fn new() -> Self {
        Self {
            errors: vec![],
            warnings: vec![],
            max_errors: Self::DEFAULT_MAX_ERRORS,
        }
    }

    pub fn with_limit(max_errors: usize) -> Self {
        Self {
            max_errors,
            ..Self::new()
        }
    }

    pub fn report(&mut self, error: CheeseError) {
        self.errors.push(error);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn should_stop(&self) -> bool {
        self.errors.len() >= self.max_errors
    }

    pub fn errors(&self) -> &[CheeseError] {
        &self.errors
    }

    pub fn errors_of_kind(&self, kind: ErrorKind) -> Vec<&CheeseError> {
        self.errors.iter().filter(|e| e.kind() == kind).collect()
    }

    pub fn formatted_errors(&self) -> String {
        if self.errors.is_empty() {
            return "No errors found.".to_string();
        }
        let mut result = format!("Found {} error(s):\n", self.errors.len());
        for (i, error) in self.errors.iter().enumerate() {
            result.push_str(&format!("{}. {}\n", i + 1, error));
        }
        result
    }

    pub fn formatted_warnings(&self) -> String {
        if self.warnings.is_empty() {
            return "No warnings found.".to_string();
        }
        let mut result = format!("Found {} warning(s):\n", self.warnings.len());
        for (i, warning) in self.warnings.iter().enumerate() {
            result.push_str(&format!("{}. WARNING: {}\n", i + 1, warning));
        }
        result
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("Compilation Summary:\n");
        summary.push_str(&format!("- Errors: {}\n", self.errors.len()));
        summary.push_str(&format!("- Warnings: {}\n", self.warnings.len()));
        if !self.errors.is_empty() {
            summary.push_str("\nErrors by kind:\n");
            for kind in ErrorKind::ALL {
                let count = self.errors_of_kind(kind).len();
                if count > 0 {
                    summary.push_str(&format!("- {}: {}\n", kind.title(), count));
                }
            }
        }
        summary
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_includes_kind_location_and_suggestions() {
        let err = CheeseError::syntax("unexpected token 'Gouda'")
            .at(3, 7)
            .with_context("Wensleydale Gouda Brie")
            .with_suggestions(SUGGEST_MISSING_BRIE);
        let rendered = err.to_string();
        assert!(rendered.starts_with("SYNTAX ERROR: unexpected token 'Gouda' at line 3, column 7"));
        assert!(rendered.contains("Context: Wensleydale Gouda Brie"));
        assert!(rendered.contains("Suggestions: add 'Brie' at the end of the statement"));
    }

    #[test]
    fn display_without_location() {
        let err = CheeseError::runtime("division by zero");
        assert_eq!(err.to_string(), "RUNTIME ERROR: division by zero");
    }

    #[test]
    fn reporter_counts_and_filters_by_kind() {
        let mut reporter = ErrorReporter::new();
        reporter.report(CheeseError::lexical("unrecognized character '?'"));
        reporter.report(CheeseError::syntax("missing 'Brie'"));
        reporter.report(CheeseError::syntax("missing 'NoCheese'"));
        reporter.warn("unused variable 'x'");
        assert_eq!(reporter.error_count(), 3);
        assert_eq!(reporter.warning_count(), 1);
        assert_eq!(reporter.errors_of_kind(ErrorKind::Syntax).len(), 2);
        assert_eq!(reporter.errors_of_kind(ErrorKind::Runtime).len(), 0);
        assert!(!reporter.should_stop());
    }

    #[test]
    fn reporter_stops_at_limit() {
        let mut reporter = ErrorReporter::with_limit(2);
        reporter.report(CheeseError::syntax("one"));
        assert!(!reporter.should_stop());
        reporter.report(CheeseError::syntax("two"));
        assert!(reporter.should_stop());
    }

    #[test]
    fn default_limit_is_ten() {
        let mut reporter = ErrorReporter::new();
        for i in 0..9 {
            reporter.report(CheeseError::runtime(format!("error {i}")));
        }
        assert!(!reporter.should_stop());
        reporter.report(CheeseError::runtime("error 9"));
        assert!(reporter.should_stop());
    }

    #[test]
    fn summary_lists_kinds() {
        let mut reporter = ErrorReporter::new();
        reporter.report(CheeseError::type_error("invalid operation"));
        reporter.report(CheeseError::runtime("division by zero"));
        reporter.report(CheeseError::runtime("variable 'x' is not defined"));
        let summary = reporter.summary();
        assert!(summary.contains("- Errors: 3"));
        assert!(summary.contains("- Runtime: 2"));
        assert!(summary.contains("- Type: 1"));
    }

    #[test]
    fn formatted_errors_enumerates() {
        let mut reporter = ErrorReporter::new();
        assert_eq!(reporter.formatted_errors(), "No errors found.");
        reporter.report(CheeseError::lexical("bad"));
        assert!(reporter.formatted_errors().starts_with("Found 1 error(s):\n1. LEXICAL ERROR: bad"));
    }
}
