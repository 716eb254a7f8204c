//! Single-token lookahead cursor over the raw token stream, including the
//! indentation normalizer.
//!
//! The normalizer is the cursor's token-skipping scan: it runs once at
//! construction and again after every `shift`, so indentation structure is
//! always resolved before the grammar layer inspects the current token.
//! Comments are collected into a side accumulator and never surfaced; inside
//! brackets, newlines and indentation are insignificant and skipped.

use crate::ast::Span;
use crate::diagnostics::{CoilError, ErrorContext, SourceArc};
use crate::token::{Kw, Token, TokenKind};

/// Cursor state for one parse invocation. All of it is owned here: a fresh
/// cursor per parse means sequential parses cannot contaminate each other.
#[derive(Debug)]
pub(crate) struct Cursor {
    /// The full token sequence. Read-only during parsing except for the
    /// indent-to-dedent reclassification performed by the scan.
    tokens: Vec<Token>,
    pos: usize,
    /// The previously consumed token; end-of-span for finished nodes.
    prev: Token,
    eof: Token,
    /// Active indentation widths, outermost first. Strictly increasing above
    /// the base entry `0`.
    indent_stack: Vec<usize>,
    /// While true, NewLine and Indent tokens are suppressed entirely.
    in_brackets: bool,
    /// Comment tokens skipped by the scan, in source order.
    comments: Vec<Token>,
    src: SourceArc,
}

impl Cursor {
    pub fn new(src: SourceArc, tokens: Vec<Token>) -> Result<Self, CoilError> {
        let eof = Token::synthetic(TokenKind::Eof, "");
        let prev = tokens.first().cloned().unwrap_or_else(|| eof.clone());
        let mut cursor = Cursor {
            tokens,
            pos: 0,
            prev,
            eof,
            indent_stack: vec![0],
            in_brackets: false,
            comments: Vec::new(),
            src,
        };
        cursor.skip_insignificant()?;
        Ok(cursor)
    }

    /// The current token, or a synthetic end-of-input token past the end.
    pub fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    /// The previously consumed token.
    pub fn prev(&self) -> &Token {
        &self.prev
    }

    /// Consumes the current token and re-runs the normalizer scan.
    pub fn shift(&mut self) -> Result<(), CoilError> {
        self.prev = self.peek().clone();
        self.pos += 1;
        self.skip_insignificant()
    }

    /// The indentation normalizer. Decides, for each raw token from the
    /// current position on, whether to surface it, suppress it, or
    /// reclassify it, and stops at the next significant token.
    fn skip_insignificant(&mut self) -> Result<(), CoilError> {
        while self.pos < self.tokens.len() {
            match self.tokens[self.pos].kind {
                TokenKind::Comment => {
                    self.comments.push(self.tokens[self.pos].clone());
                    self.pos += 1;
                }
                TokenKind::Error => {
                    let message = self.tokens[self.pos].value.clone();
                    return Err(self.lexical_error(message));
                }
                TokenKind::NewLine | TokenKind::Indent if self.in_brackets => {
                    self.pos += 1;
                }
                TokenKind::Indent => return self.resolve_indent(),
                _ => return Ok(()),
            }
        }
        Ok(())
    }

    /// Compares an indent token's width with the top of the indentation
    /// stack. Equal widths are skipped; a greater width is pushed and left as
    /// the current token (it starts a new block); a smaller width is
    /// reclassified as a dedent and must land exactly on an open width.
    fn resolve_indent(&mut self) -> Result<(), CoilError> {
        let width = self.indent_width()?;
        let top = self.indent_top();
        if width == top {
            self.pos += 1;
            return self.skip_insignificant();
        }
        if width > top {
            self.indent_stack.push(width);
            return Ok(());
        }
        self.tokens[self.pos].kind = TokenKind::Dedent;
        loop {
            match self.indent_stack.last().copied() {
                Some(top) if top > width => {
                    self.indent_stack.pop();
                }
                Some(top) if top == width => return Ok(()),
                _ => return Err(self.indentation_error()),
            }
        }
    }

    fn indent_width(&self) -> Result<usize, CoilError> {
        let t = &self.tokens[self.pos];
        t.value.parse::<usize>().map_err(|_| {
            self.lexical_error(format!("malformed indentation width `{}`", t.value))
        })
    }

    fn indent_top(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    /// Number of open indentation levels, including the base level. The
    /// suite parser compares this before and after a dedent to decide which
    /// enclosing block a multi-level dedent closes.
    pub fn indent_depth(&self) -> usize {
        self.indent_stack.len()
    }

    /// Sets the bracket-suppression flag and returns the previous value, so
    /// nested bracketed forms can restore rather than clear it.
    pub fn set_in_brackets(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.in_brackets, value)
    }

    /// Comment tokens skipped so far, in source order.
    pub fn comments(&self) -> &[Token] {
        &self.comments
    }

    // ------------------------------------------------------------------------
    // Grammar-layer queries
    // ------------------------------------------------------------------------

    /// The current operator's spelling, if the current token is an operator.
    pub fn current_op(&self) -> Option<&str> {
        let t = self.peek();
        if t.kind == TokenKind::Op {
            Some(t.value.as_str())
        } else {
            None
        }
    }

    /// The current keyword, if the current token is a keyword in the closed
    /// set.
    pub fn current_kw(&self) -> Option<Kw> {
        let t = self.peek();
        if t.kind == TokenKind::Keyword {
            Kw::lookup(&t.value)
        } else {
            None
        }
    }

    pub fn at_op(&self, op: &str) -> bool {
        self.current_op() == Some(op)
    }

    pub fn at_kw(&self, kw: Kw) -> bool {
        self.current_kw() == Some(kw)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consumes the current token if it matches kind and value exactly, and
    /// fails with an `expecting X near Y` diagnostic otherwise.
    pub fn expect(&mut self, kind: TokenKind, value: &str) -> Result<(), CoilError> {
        let t = self.peek();
        if t.kind != kind || t.value != value {
            return Err(CoilError::Grammar {
                expected: Token::synthetic(kind, value).describe(),
                found: t.describe(),
                ctx: self.error_context(),
            });
        }
        self.shift()
    }

    pub fn expect_kw(&mut self, kw: Kw) -> Result<(), CoilError> {
        self.expect(TokenKind::Keyword, kw.as_str())
    }

    pub fn expect_op(&mut self, op: &str) -> Result<(), CoilError> {
        self.expect(TokenKind::Op, op)
    }

    pub fn expect_newline(&mut self) -> Result<(), CoilError> {
        self.expect(TokenKind::NewLine, "")
    }

    // ------------------------------------------------------------------------
    // Error plumbing
    // ------------------------------------------------------------------------

    /// Error context anchored at the current token.
    pub fn error_context(&self) -> ErrorContext {
        let t = self.peek();
        ErrorContext::with_source_and_span(self.src.clone(), Span::new(t.start, t.end))
    }

    /// The rendered description of the current token.
    pub fn found(&self) -> String {
        self.peek().describe()
    }

    fn lexical_error(&self, message: String) -> CoilError {
        let t = self.tokens.get(self.pos).unwrap_or(&self.eof);
        CoilError::Lexical {
            message,
            found: t.describe(),
            ctx: ErrorContext::with_source_and_span(
                self.src.clone(),
                Span::new(t.start, t.end),
            ),
        }
    }

    fn indentation_error(&self) -> CoilError {
        let t = self.tokens.get(self.pos).unwrap_or(&self.eof);
        CoilError::Indentation {
            found: t.describe(),
            ctx: ErrorContext::with_source_and_span(
                self.src.clone(),
                Span::new(t.start, t.end),
            )
            .with_help("every dedent must return to an indentation width that is still open"),
        }
    }
}
