#![allow(dead_code)]

//! Shared test helpers: a builder for hand-constructed token streams.
//!
//! The front-end consumes pre-lexed tokens, so tests build their inputs
//! token by token. The builder also lays the tokens out in a synthetic
//! source string so that spans are realistic and diagnostics can be
//! rendered against real text.

use coil::ast::{Expr, Stmt};
use coil::{CoilError, Token, TokenKind};

/// Builds a token sequence plus the synthetic source text it spans.
pub struct TokenStream {
    source: String,
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self {
            source: String::new(),
            tokens: Vec::new(),
        }
    }

    fn push(mut self, kind: TokenKind, value: &str, rendered: &str) -> Self {
        let start = self.source.len();
        self.source.push_str(rendered);
        let end = self.source.len();
        self.tokens.push(Token::new(kind, value, start, end));
        if kind != TokenKind::NewLine && kind != TokenKind::Indent {
            self.source.push(' ');
        }
        self
    }

    pub fn id(self, name: &str) -> Self {
        self.push(TokenKind::Id, name, name)
    }

    pub fn num(self, literal: &str) -> Self {
        self.push(TokenKind::Number, literal, literal)
    }

    pub fn str_lit(self, value: &str) -> Self {
        let rendered = format!("\"{}\"", value);
        self.push(TokenKind::String, value, &rendered)
    }

    pub fn kw(self, word: &str) -> Self {
        self.push(TokenKind::Keyword, word, word)
    }

    pub fn op(self, op: &str) -> Self {
        self.push(TokenKind::Op, op, op)
    }

    pub fn nl(self) -> Self {
        self.push(TokenKind::NewLine, "", "\n")
    }

    /// A width-valued indent token at the start of a logical line.
    pub fn ind(self, width: usize) -> Self {
        let spaces = " ".repeat(width);
        self.push(TokenKind::Indent, &width.to_string(), &spaces)
    }

    pub fn comment(self, text: &str) -> Self {
        let rendered = format!("# {}", text);
        self.push(TokenKind::Comment, text, &rendered)
    }

    pub fn err(self, message: &str) -> Self {
        self.push(TokenKind::Error, message, "?")
    }

    pub fn build(self) -> (String, Vec<Token>) {
        (self.source, self.tokens)
    }
}

/// Parses the built stream as a module.
pub fn parse_stream(stream: TokenStream) -> Result<Vec<Stmt>, CoilError> {
    let (source, tokens) = stream.build();
    coil::parse(&source, tokens)
}

/// Wraps an expression in `while <expr> : pass` (the covered statement
/// surface), parses it, and returns the While node's test expression.
pub fn parse_test_expr(build: impl FnOnce(TokenStream) -> TokenStream) -> Expr {
    let stream = build(TokenStream::new().ind(0).kw("while"))
        .op(":")
        .kw("pass")
        .nl();
    let module = parse_stream(stream).expect("parse should succeed");
    assert_eq!(module.len(), 1);
    match module.into_iter().next() {
        Some(Stmt::While { test, .. }) => test,
        other => panic!("expected a While statement, got {:?}", other),
    }
}

/// Like `parse_test_expr`, but for inputs that must fail; returns the error.
pub fn parse_test_expr_err(build: impl FnOnce(TokenStream) -> TokenStream) -> CoilError {
    let stream = build(TokenStream::new().ind(0).kw("while"))
        .op(":")
        .kw("pass")
        .nl();
    match parse_stream(stream) {
        Ok(module) => panic!("expected a parse error, got {:?}", module),
        Err(e) => e,
    }
}
