//! Parser for the coil source language.
//!
//! The parser consumes a pre-lexed token stream and produces the AST defined
//! in [`crate::ast`]. This module holds the parser context and the statement
//! grammar; the expression grammar lives in [`expr`], and the cursor with its
//! indentation normalizer in [`cursor`].
//!
//! Statement coverage is partial by design. The dispatch below names the full
//! grammar surface, but only `while`, `pass`, and suites are currently
//! implemented; every other production fails immediately with a dedicated
//! "unsupported" error so that nothing ever mis-parses silently.

mod cursor;
mod expr;

use crate::ast::{Span, Stmt};
use crate::diagnostics::{to_error_source, CoilError};
use crate::token::{Kw, Token, TokenKind};

use cursor::Cursor;

/// Parses a complete module: a token sequence plus the original source text
/// (used only for diagnostics, never re-lexed). Returns the ordered sequence
/// of top-level statements.
pub fn parse(source: &str, tokens: Vec<Token>) -> Result<Vec<Stmt>, CoilError> {
    let mut parser = Parser::new(source, tokens)?;
    parser.parse_module()
}

/// Parser context for one parse invocation.
///
/// All mutable state (cursor position, indentation stack, bracket flag,
/// comment accumulator) is owned by this value; constructing a fresh parser
/// per invocation is what makes sequential parses independent.
pub struct Parser {
    cursor: Cursor,
}

impl Parser {
    pub fn new(source: &str, tokens: Vec<Token>) -> Result<Self, CoilError> {
        let src = to_error_source(source);
        Ok(Parser {
            cursor: Cursor::new(src, tokens)?,
        })
    }

    /// Parses statements until end of input.
    pub fn parse_module(&mut self) -> Result<Vec<Stmt>, CoilError> {
        let mut module = Vec::new();
        while !self.cursor.at(TokenKind::Eof) {
            module.extend(self.stmt()?);
        }
        Ok(module)
    }

    /// Comment tokens collected during parsing, in source order. Available to
    /// downstream passes that want to carry comments through translation.
    pub fn comments(&self) -> &[Token] {
        self.cursor.comments()
    }

    // ------------------------------------------------------------------------
    // Statement grammar
    // ------------------------------------------------------------------------

    /// `stmt: compound_stmt | simple_stmt`, dispatched on the leading
    /// keyword. A compound statement yields one node; a simple statement
    /// line may yield several (`pass; pass`).
    fn stmt(&mut self) -> Result<Vec<Stmt>, CoilError> {
        match self.cursor.current_kw() {
            Some(Kw::If) => Ok(vec![self.if_stmt()?]),
            Some(Kw::While) => Ok(vec![self.while_stmt()?]),
            Some(Kw::For) => Ok(vec![self.for_stmt()?]),
            Some(Kw::Try) => Ok(vec![self.try_stmt()?]),
            Some(Kw::With) => Ok(vec![self.with_stmt()?]),
            Some(Kw::Def) => Ok(vec![self.funcdef()?]),
            Some(Kw::Class) => Ok(vec![self.classdef()?]),
            _ => self.simple_stmt(),
        }
    }

    /// `simple_stmt: small_stmt (';' small_stmt)* [';'] NEWLINE`
    fn simple_stmt(&mut self) -> Result<Vec<Stmt>, CoilError> {
        let mut stmts = vec![self.small_stmt()?];
        while self.cursor.at_op(";") {
            self.cursor.shift()?;
            if self.cursor.at(TokenKind::NewLine) {
                break;
            }
            stmts.push(self.small_stmt()?);
        }
        self.cursor.expect_newline()?;
        Ok(stmts)
    }

    fn small_stmt(&mut self) -> Result<Stmt, CoilError> {
        match self.cursor.current_kw() {
            Some(Kw::Del) => self.del_stmt(),
            Some(Kw::Pass) => self.pass_stmt(),
            Some(Kw::Break) => self.break_stmt(),
            Some(Kw::Continue) => self.continue_stmt(),
            Some(Kw::Return) => self.return_stmt(),
            Some(Kw::Raise) => self.raise_stmt(),
            Some(Kw::Global) => self.global_stmt(),
            Some(Kw::Nonlocal) => self.nonlocal_stmt(),
            Some(Kw::Import) => self.import_stmt(),
            Some(Kw::Assert) => self.assert_stmt(),
            _ => self.expr_stmt(),
        }
    }

    /// `while_stmt: 'while' test ':' suite ['else' ':' suite]`
    fn while_stmt(&mut self) -> Result<Stmt, CoilError> {
        let start = self.open();
        self.cursor.expect_kw(Kw::While)?;
        let test = self.test()?;
        let body = self.colon_suite()?;
        let orelse = self.orelse()?;
        Ok(Stmt::While {
            test,
            body,
            orelse,
            span: self.close(start),
        })
    }

    fn pass_stmt(&mut self) -> Result<Stmt, CoilError> {
        let start = self.open();
        self.cursor.expect_kw(Kw::Pass)?;
        Ok(Stmt::Pass {
            span: self.close(start),
        })
    }

    /// The optional `else` branch of a compound statement; an empty sequence
    /// when absent.
    fn orelse(&mut self) -> Result<Vec<Stmt>, CoilError> {
        if self.cursor.at_kw(Kw::Else) {
            self.cursor.shift()?;
            return self.colon_suite();
        }
        Ok(Vec::new())
    }

    fn colon_suite(&mut self) -> Result<Vec<Stmt>, CoilError> {
        self.cursor.expect_op(":")?;
        self.suite()
    }

    /// `suite: simple_stmt | NEWLINE INDENT stmt+ DEDENT`
    ///
    /// The normalizer has already pushed the block's width by the time the
    /// indent marker is current, so the stack depth at entry identifies this
    /// block. A dedent landing exactly one level up closes this suite and is
    /// consumed here; a deeper dedent closes enclosing suites too and is left
    /// for them to observe.
    fn suite(&mut self) -> Result<Vec<Stmt>, CoilError> {
        if !self.cursor.at(TokenKind::NewLine) {
            return self.simple_stmt();
        }
        self.cursor.expect_newline()?;
        if !self.cursor.at(TokenKind::Indent) {
            return Err(self.syntax_error("expecting an indented block"));
        }
        let depth = self.cursor.indent_depth();
        self.cursor.shift()?;
        let mut body = self.stmt()?;
        loop {
            if self.cursor.at(TokenKind::Dedent) {
                if self.cursor.indent_depth() == depth - 1 {
                    self.cursor.shift()?;
                }
                break;
            }
            if self.cursor.at(TokenKind::Eof) {
                break;
            }
            body.extend(self.stmt()?);
        }
        Ok(body)
    }

    // ------------------------------------------------------------------------
    // Grammar surface outside current coverage
    // ------------------------------------------------------------------------

    fn if_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("if statement"))
    }

    fn for_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("for statement"))
    }

    fn try_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("try statement"))
    }

    fn with_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("with statement"))
    }

    fn funcdef(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("function definition"))
    }

    fn classdef(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("class definition"))
    }

    fn del_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("del statement"))
    }

    fn break_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("break statement"))
    }

    fn continue_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("continue statement"))
    }

    fn return_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("return statement"))
    }

    fn raise_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("raise statement"))
    }

    fn global_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("global statement"))
    }

    fn nonlocal_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("nonlocal statement"))
    }

    fn import_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("import statement"))
    }

    fn assert_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("assert statement"))
    }

    fn expr_stmt(&mut self) -> Result<Stmt, CoilError> {
        Err(self.unsupported("expression statement"))
    }

    // ------------------------------------------------------------------------
    // Node-span helpers and error constructors
    // ------------------------------------------------------------------------

    /// Opens a node at the current token: its start offset becomes the
    /// node's span start.
    fn open(&self) -> usize {
        self.cursor.peek().start
    }

    /// Closes a node: the span ends at the previously consumed token.
    fn close(&self, start: usize) -> Span {
        Span::new(start, self.cursor.prev().end)
    }

    fn unsupported(&self, construct: &str) -> CoilError {
        CoilError::Unsupported {
            construct: construct.to_string(),
            ctx: self.cursor.error_context(),
        }
    }

    fn syntax_error(&self, message: impl Into<String>) -> CoilError {
        CoilError::Syntax {
            message: message.into(),
            found: self.cursor.found(),
            ctx: self.cursor.error_context(),
        }
    }

    fn expecting(&self, what: &str) -> CoilError {
        CoilError::Grammar {
            expected: what.to_string(),
            found: self.cursor.found(),
            ctx: self.cursor.error_context(),
        }
    }
}
