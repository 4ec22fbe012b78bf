// # ===================== START OF THE GRAMMAR =====================
// #
// # program:        'Cheese' statement* 'NoCheese' ENDMARKER
// # interactive:    statement* ENDMARKER
// # statement:      (assignment | print_stmt | if_stmt | loop_stmt
// #                  | belgian_stmt) 'Brie'
// # assignment:     'Cheddar' 'Glyn' '(' NAME ')' expr 'Coleraine'
// # print_stmt:     'Wensleydale' expr
// # if_stmt:        'Stilton' expr 'Gorgonzola' statement* 'White' statement*
// # loop_stmt:      'Caerphilly' statement* 'Gruyere' expr
// # belgian_stmt:   'Belgian'
// # expr:           comparison
// # comparison:     additive (('Cheshire' | 'Lancashire' | 'Windsor'
// #                  | 'Tilsit' | 'Jarlsberg' | 'Liptauer') additive)*
// # additive:       term (('Gouda' | 'Edam') term)*
// # term:           atom (('Emmental' | 'Camembert') atom)*
// # atom:           NUMBER | STRING | 'Glyn' '(' NAME ')' | NAME
// #                  | '(' expr ')'
// #
// # Every alternative is decided by one token of lookahead; the parser
// # never backtracks. The conditional yields its two branches as explicit
// # blocks, so no sentinel statement is needed to separate them.
// #
// # ====================== END OF THE GRAMMAR ======================

use super::locations::{Locatable, Span};
use super::tokenizer::{Token, TokenType as TT};
use super::tokenizer::{
    KW_BELGIAN, KW_BRIE, KW_CAERPHILLY, KW_CAMEMBERT, KW_CHEDDAR, KW_CHEESE, KW_CHESHIRE,
    KW_COLERAINE, KW_EDAM, KW_EMMENTAL, KW_GLYN, KW_GORGONZOLA, KW_GOUDA, KW_GRUYERE,
    KW_JARLSBERG, KW_LANCASHIRE, KW_LIPTAUER, KW_NOCHEESE, KW_STILTON, KW_TILSIT, KW_WENSLEYDALE,
    KW_WHITE, KW_WINDSOR,
};
use crate::errors::{
    CheeseError, SUGGEST_MISSING_BRIE, SUGGEST_MISSING_CHEESE, SUGGEST_MISSING_NOCHEESE,
};

/// Raw parse tree, one rule node per matched production. The builder
/// turns this into the AST.
#[derive(Debug, Clone)]
pub(crate) enum ParseTree {
    Rule(Production, Vec<ParseTree>, Span),
    Leaf(Token),
}

impl Locatable for ParseTree {
    fn span(&self) -> Span {
        match self {
            Self::Rule(_, _, s) => *s,
            Self::Leaf(t) => t.span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Production {
    Program,
    Assignment,
    PrintStmt,
    IfStmt,
    LoopStmt,
    BelgianStmt,
    ThenBlock,
    ElseBlock,
    LoopBody,
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
    Number,
    String,
    Var,
    GlynVar,
}

pub(crate) fn parse_tokens(tokens: &[Token]) -> Result<ParseTree, CheeseError> {
    Parser::new(tokens).program()
}

pub(crate) fn parse_tokens_interactive(tokens: &[Token]) -> Result<ParseTree, CheeseError> {
    Parser::new(tokens).interactive()
}

const STATEMENT_START: [&str; 5] = [
    KW_CHEDDAR,
    KW_WENSLEYDALE,
    KW_STILTON,
    KW_CAERPHILLY,
    KW_BELGIAN,
];

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    // program: 'Cheese' statement* 'NoCheese' ENDMARKER
    fn program(&mut self) -> Result<ParseTree, CheeseError> {
        if !self.at_keyword(KW_CHEESE) {
            return Err(self
                .syntax_here("missing 'Cheese' at the beginning of the program")
                .with_suggestions(SUGGEST_MISSING_CHEESE));
        }
        let open = self.advance();
        let statements = self.statement_list()?;
        if !self.at_keyword(KW_NOCHEESE) {
            if self.peek().typ == TT::ENDMARKER {
                return Err(self
                    .syntax_here("missing 'NoCheese' at the end of the program")
                    .with_suggestions(SUGGEST_MISSING_NOCHEESE));
            }
            return Err(self.unexpected("a statement or 'NoCheese'"));
        }
        let close = self.advance();
        if self.peek().typ != TT::ENDMARKER {
            return Err(self.unexpected("end of input after 'NoCheese'"));
        }
        Ok(ParseTree::Rule(
            Production::Program,
            statements,
            open.span.till(&close),
        ))
    }

    // interactive: statement* ENDMARKER
    fn interactive(&mut self) -> Result<ParseTree, CheeseError> {
        let statements = self.statement_list()?;
        if self.peek().typ != TT::ENDMARKER {
            return Err(self.unexpected("a statement"));
        }
        let span = statements.span();
        Ok(ParseTree::Rule(Production::Program, statements, span))
    }

    // statement: (assignment | print_stmt | if_stmt | loop_stmt | belgian_stmt) 'Brie'
    fn statement(&mut self) -> Result<ParseTree, CheeseError> {
        let statement = if self.at_keyword(KW_CHEDDAR) {
            self.assignment()?
        } else if self.at_keyword(KW_WENSLEYDALE) {
            self.print_stmt()?
        } else if self.at_keyword(KW_STILTON) {
            self.if_stmt()?
        } else if self.at_keyword(KW_CAERPHILLY) {
            self.loop_stmt()?
        } else if self.at_keyword(KW_BELGIAN) {
            self.belgian_stmt()?
        } else {
            return Err(self.unexpected("a statement"));
        };
        if !self.at_keyword(KW_BRIE) {
            return Err(self
                .syntax_here("missing 'Brie' at the end of the statement")
                .with_suggestions(SUGGEST_MISSING_BRIE));
        }
        self.advance();
        Ok(statement)
    }

    fn statement_list(&mut self) -> Result<Vec<ParseTree>, CheeseError> {
        let mut statements = vec![];
        while self.at_statement_start() {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    // assignment: 'Cheddar' 'Glyn' '(' NAME ')' expr 'Coleraine'
    fn assignment(&mut self) -> Result<ParseTree, CheeseError> {
        let open = self.expect_keyword(KW_CHEDDAR)?;
        self.expect_keyword(KW_GLYN)?;
        self.expect(TT::LPAR, "'('")?;
        let name = self.expect(TT::NAME, "a variable name")?;
        self.expect(TT::RPAR, "')'")?;
        let expr = self.expr()?;
        let close = self.expect_keyword(KW_COLERAINE)?;
        Ok(ParseTree::Rule(
            Production::Assignment,
            vec![ParseTree::Leaf(name), expr],
            open.span.till(&close),
        ))
    }

    // print_stmt: 'Wensleydale' expr
    fn print_stmt(&mut self) -> Result<ParseTree, CheeseError> {
        let open = self.expect_keyword(KW_WENSLEYDALE)?;
        let expr = self.expr()?;
        let span = open.span.till(&expr);
        Ok(ParseTree::Rule(Production::PrintStmt, vec![expr], span))
    }

    // if_stmt: 'Stilton' expr 'Gorgonzola' statement* 'White' statement*
    fn if_stmt(&mut self) -> Result<ParseTree, CheeseError> {
        let open = self.expect_keyword(KW_STILTON)?;
        let condition = self.expr()?;
        self.expect_keyword(KW_GORGONZOLA)?;
        let then_block = self.statement_list()?;
        let white = self.expect_keyword(KW_WHITE)?;
        let else_block = self.statement_list()?;
        let end = else_block.last().map(|t| t.span()).unwrap_or(white.span);
        let span = open.span.till(&end);
        let then_span = then_block.span();
        let else_span = else_block.span();
        Ok(ParseTree::Rule(
            Production::IfStmt,
            vec![
                condition,
                ParseTree::Rule(Production::ThenBlock, then_block, then_span),
                ParseTree::Rule(Production::ElseBlock, else_block, else_span),
            ],
            span,
        ))
    }

    // loop_stmt: 'Caerphilly' statement* 'Gruyere' expr
    fn loop_stmt(&mut self) -> Result<ParseTree, CheeseError> {
        let open = self.expect_keyword(KW_CAERPHILLY)?;
        let body = self.statement_list()?;
        self.expect_keyword(KW_GRUYERE)?;
        let condition = self.expr()?;
        let span = open.span.till(&condition);
        let body_span = body.span();
        Ok(ParseTree::Rule(
            Production::LoopStmt,
            vec![
                ParseTree::Rule(Production::LoopBody, body, body_span),
                condition,
            ],
            span,
        ))
    }

    // belgian_stmt: 'Belgian'
    fn belgian_stmt(&mut self) -> Result<ParseTree, CheeseError> {
        let tok = self.expect_keyword(KW_BELGIAN)?;
        Ok(ParseTree::Rule(Production::BelgianStmt, vec![], tok.span))
    }

    // expr: comparison
    fn expr(&mut self) -> Result<ParseTree, CheeseError> {
        self.comparison()
    }

    // comparison: additive (comparison_op additive)*
    fn comparison(&mut self) -> Result<ParseTree, CheeseError> {
        let mut node = self.additive()?;
        while let Some(production) = self.comparison_op() {
            self.advance();
            let rhs = self.additive()?;
            node = Self::binary(production, node, rhs);
        }
        Ok(node)
    }

    // additive: term (('Gouda' | 'Edam') term)*
    fn additive(&mut self) -> Result<ParseTree, CheeseError> {
        let mut node = self.term()?;
        while let Some(production) = self.additive_op() {
            self.advance();
            let rhs = self.term()?;
            node = Self::binary(production, node, rhs);
        }
        Ok(node)
    }

    // term: atom (('Emmental' | 'Camembert') atom)*
    fn term(&mut self) -> Result<ParseTree, CheeseError> {
        let mut node = self.atom()?;
        while let Some(production) = self.multiplicative_op() {
            self.advance();
            let rhs = self.atom()?;
            node = Self::binary(production, node, rhs);
        }
        Ok(node)
    }

    // atom: NUMBER | STRING | 'Glyn' '(' NAME ')' | NAME | '(' expr ')'
    fn atom(&mut self) -> Result<ParseTree, CheeseError> {
        match self.peek().typ {
            TT::NUMBER => {
                let tok = self.advance();
                let span = tok.span;
                Ok(ParseTree::Rule(
                    Production::Number,
                    vec![ParseTree::Leaf(tok)],
                    span,
                ))
            }
            TT::STRING => {
                let tok = self.advance();
                let span = tok.span;
                Ok(ParseTree::Rule(
                    Production::String,
                    vec![ParseTree::Leaf(tok)],
                    span,
                ))
            }
            TT::NAME => {
                let tok = self.advance();
                let span = tok.span;
                Ok(ParseTree::Rule(
                    Production::Var,
                    vec![ParseTree::Leaf(tok)],
                    span,
                ))
            }
            TT::KEYWORD if self.at_keyword(KW_GLYN) => {
                let open = self.advance();
                self.expect(TT::LPAR, "'('")?;
                let name = self.expect(TT::NAME, "a variable name")?;
                let close = self.expect(TT::RPAR, "')'")?;
                Ok(ParseTree::Rule(
                    Production::GlynVar,
                    vec![ParseTree::Leaf(name)],
                    open.span.till(&close),
                ))
            }
            TT::LPAR => {
                self.advance();
                let expr = self.expr()?;
                self.expect(TT::RPAR, "')'")?;
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn binary(production: Production, left: ParseTree, right: ParseTree) -> ParseTree {
        let span = left.span().till(&right);
        ParseTree::Rule(production, vec![left, right], span)
    }

    fn comparison_op(&self) -> Option<Production> {
        let tok = self.peek();
        if tok.typ != TT::KEYWORD {
            return None;
        }
        match tok.lexeme.as_str() {
            KW_CHESHIRE => Some(Production::Eq),
            KW_LANCASHIRE => Some(Production::Ne),
            KW_WINDSOR => Some(Production::Gt),
            KW_TILSIT => Some(Production::Lt),
            KW_JARLSBERG => Some(Production::Ge),
            KW_LIPTAUER => Some(Production::Le),
            _ => None,
        }
    }

    fn additive_op(&self) -> Option<Production> {
        if self.at_keyword(KW_GOUDA) {
            Some(Production::Add)
        } else if self.at_keyword(KW_EDAM) {
            Some(Production::Sub)
        } else {
            None
        }
    }

    fn multiplicative_op(&self) -> Option<Production> {
        if self.at_keyword(KW_EMMENTAL) {
            Some(Production::Mul)
        } else if self.at_keyword(KW_CAMEMBERT) {
            Some(Production::Div)
        } else {
            None
        }
    }

    fn at_statement_start(&self) -> bool {
        STATEMENT_START.iter().any(|kw| self.at_keyword(kw))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        let tok = self.peek();
        tok.typ == TT::KEYWORD && tok.lexeme == keyword
    }

    fn peek(&self) -> &Token {
        // The token stream always ends with ENDMARKER and the cursor never
        // moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.typ != TT::ENDMARKER {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, typ: TT, expected: &str) -> Result<Token, CheeseError> {
        if self.peek().typ == typ {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<Token, CheeseError> {
        if self.at_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    fn syntax_here(&self, message: &str) -> CheeseError {
        let tok = self.peek();
        CheeseError::syntax(message).at(tok.span.start.line, tok.span.start.column)
    }

    fn unexpected(&self, expected: &str) -> CheeseError {
        let tok = self.peek();
        let message = if tok.typ == TT::ENDMARKER {
            format!("unexpected end of input, expected {expected}")
        } else {
            format!("invalid syntax near '{}', expected {expected}", tok.lexeme)
        };
        CheeseError::syntax(message).at(tok.span.start.line, tok.span.start.column)
    }
}
