use super::locations::Span;
use crate::errors::{CheeseError, SUGGEST_INVALID_SWISS};
use const_format::concatcp;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Default, Debug)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) span: Span,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum TokenType {
    ENDMARKER,
    NAME,
    NUMBER,
    STRING,
    KEYWORD,
    LPAR,
    RPAR,
    ERRORTOKEN,
}

impl Default for TokenType {
    fn default() -> Self {
        Self::ERRORTOKEN
    }
}

// Program delimiters and statement terminator.
pub(crate) const KW_CHEESE: &str = "Cheese";
pub(crate) const KW_NOCHEESE: &str = "NoCheese";
pub(crate) const KW_BRIE: &str = "Brie";
// Statement keywords.
pub(crate) const KW_WENSLEYDALE: &str = "Wensleydale";
pub(crate) const KW_BELGIAN: &str = "Belgian";
pub(crate) const KW_CHEDDAR: &str = "Cheddar";
pub(crate) const KW_COLERAINE: &str = "Coleraine";
pub(crate) const KW_GLYN: &str = "Glyn";
pub(crate) const KW_STILTON: &str = "Stilton";
pub(crate) const KW_GORGONZOLA: &str = "Gorgonzola";
pub(crate) const KW_WHITE: &str = "White";
pub(crate) const KW_CAERPHILLY: &str = "Caerphilly";
pub(crate) const KW_GRUYERE: &str = "Gruyere";
// Binary operator keywords.
pub(crate) const KW_GOUDA: &str = "Gouda";
pub(crate) const KW_EDAM: &str = "Edam";
pub(crate) const KW_EMMENTAL: &str = "Emmental";
pub(crate) const KW_CAMEMBERT: &str = "Camembert";
pub(crate) const KW_CHESHIRE: &str = "Cheshire";
pub(crate) const KW_LANCASHIRE: &str = "Lancashire";
pub(crate) const KW_WINDSOR: &str = "Windsor";
pub(crate) const KW_TILSIT: &str = "Tilsit";
pub(crate) const KW_JARLSBERG: &str = "Jarlsberg";
pub(crate) const KW_LIPTAUER: &str = "Liptauer";
// String literals are delimited by this marker on both ends, not escaped.
pub(crate) const STRING_DELIM: &str = "Swiss";

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(", alternative!($($ts),+), ")")
    }}
}

macro_rules! word {
    ($t:expr) => {{
        concatcp!(r"\b", $t, r"\b")
    }};
}

const S_WHITESPACE: &str = r"^[ \f\t\r]+";
const S_NAME: &str = r"^\w+";
const S_NUMBER: &str = r"^[0-9]+(?:\.[0-9]+)?";
const S_STRING: &str = concatcp!("^", STRING_DELIM, r".*?", STRING_DELIM);
const S_KEYWORDS: &str = concatcp!(
    "^",
    group!(
        word!(KW_NOCHEESE),
        word!(KW_CHEESE),
        word!(KW_BRIE),
        word!(KW_WENSLEYDALE),
        word!(KW_BELGIAN),
        word!(KW_CHEDDAR),
        word!(KW_COLERAINE),
        word!(KW_GLYN),
        word!(KW_STILTON),
        word!(KW_GORGONZOLA),
        word!(KW_WHITE),
        word!(KW_CAERPHILLY),
        word!(KW_GRUYERE),
        word!(KW_GOUDA),
        word!(KW_EDAM),
        word!(KW_EMMENTAL),
        word!(KW_CAMEMBERT),
        word!(KW_CHESHIRE),
        word!(KW_LANCASHIRE),
        word!(KW_WINDSOR),
        word!(KW_TILSIT),
        word!(KW_JARLSBERG),
        word!(KW_LIPTAUER)
    )
);

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(S_NUMBER).expect("Error compiling regex."));
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(S_STRING).expect("Error compiling regex."));
static KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_KEYWORDS).expect("Error compiling regex."));

pub struct Tokenizer {
    tokens: Vec<Token>,
    last_line: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            tokens: vec![],
            last_line: 1,
        }
    }

    pub fn tokenize(&mut self, source: &str) -> Result<(), CheeseError> {
        for (lineno, line) in source.lines().enumerate() {
            self.tokenize_line(line, lineno + 1)?;
        }
        Ok(())
    }

    pub fn finalize(mut self) -> Vec<Token> {
        self.tokens.push(Token {
            typ: TokenType::ENDMARKER,
            lexeme: "".to_string(),
            span: Span::new(self.last_line, 1, self.last_line, 1),
        });
        self.tokens
    }

    fn tokenize_line(&mut self, line: &str, lineno: usize) -> Result<(), CheeseError> {
        self.last_line = lineno;
        let mut start = 0;
        while start < line.len() {
            let rest = &line[start..];
            if let Some(m) = WHITESPACE.find(rest) {
                start += m.end();
                continue;
            }
            // The delimiter is reserved for string literals, so a Swiss that
            // never closes on the same line is a lexical error, not a NAME.
            if rest.starts_with(STRING_DELIM) {
                match STRING.find(rest) {
                    Some(m) => {
                        self.push(TokenType::STRING, m.as_str(), lineno, start, start + m.end());
                        start += m.end();
                    }
                    None => {
                        return Err(CheeseError::lexical("unterminated Swiss string literal")
                            .at(lineno, start + 1)
                            .with_context(line.trim().to_string())
                            .with_suggestions(SUGGEST_INVALID_SWISS))
                    }
                }
                continue;
            }
            if self.find_by_regex(&KEYWORDS, TokenType::KEYWORD, line, lineno, &mut start) {
                continue;
            }
            if self.find_by_regex(&NUMBER, TokenType::NUMBER, line, lineno, &mut start) {
                continue;
            }
            if self.find_by_regex(&NAME, TokenType::NAME, line, lineno, &mut start) {
                continue;
            }
            if rest.starts_with('(') {
                self.push(TokenType::LPAR, "(", lineno, start, start + 1);
                start += 1;
                continue;
            }
            if rest.starts_with(')') {
                self.push(TokenType::RPAR, ")", lineno, start, start + 1);
                start += 1;
                continue;
            }
            let offending = rest.chars().next().unwrap_or('\0');
            return Err(
                CheeseError::lexical(format!("unrecognized character '{offending}'"))
                    .at(lineno, start + 1)
                    .with_context(line.trim().to_string()),
            );
        }
        Ok(())
    }

    fn push(&mut self, typ: TokenType, lexeme: &str, lineno: usize, start: usize, end: usize) {
        self.tokens.push(Token {
            typ,
            lexeme: lexeme.to_string(),
            span: Span::new(lineno, start + 1, lineno, end + 1),
        });
    }

    fn find_by_regex(
        &mut self,
        regex: &Regex,
        token_type: TokenType,
        line: &str,
        lineno: usize,
        start: &mut usize,
    ) -> bool {
        if let Some(m) = regex.find(&line[*start..]) {
            self.push(token_type, m.as_str(), lineno, *start, *start + m.end());
            *start += m.end();
            return true;
        }
        false
    }
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, CheeseError> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.tokenize(source)?;
    Ok(tokenizer.finalize())
}
