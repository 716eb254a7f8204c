//! Expression grammar: a precedence-climbing parser over the cursor.
//!
//! Each level recognizes its own operator set and recurses into the next
//! tighter-binding level for operands. The ladder, loosest to tightest:
//! ternary `test`, `or`/`and` chains, `not`, comparisons, the bitwise and
//! arithmetic binary levels, unary factors, `**`, postfix trailers
//! (call/subscript/attribute), and atoms.

use crate::ast::{
    BoolOpKind, CmpOpKind, Expr, KeywordArg, OperatorKind, Slice, Span, UnaryOpKind,
};
use crate::diagnostics::CoilError;
use crate::token::{Kw, TokenKind};

use super::Parser;

type ExprResult = Result<Expr, CoilError>;

/// One parsed call argument, before the positional/keyword split.
enum Argument {
    Positional(Expr),
    Keyword(KeywordArg),
}

/// Which bracketed collection form is being parsed.
#[derive(Clone, Copy)]
enum BracketKind {
    Paren,
    Square,
}

impl BracketKind {
    fn collection(self, elts: Vec<Expr>, span: Span) -> Expr {
        match self {
            BracketKind::Paren => Expr::Tuple { elts, span },
            BracketKind::Square => Expr::List { elts, span },
        }
    }

    fn comprehension_name(self) -> &'static str {
        match self {
            BracketKind::Paren => "generator expression",
            BracketKind::Square => "list comprehension",
        }
    }
}

impl Parser {
    /// `test: or_test ['if' or_test 'else' test] | lambdef`
    pub(crate) fn test(&mut self) -> ExprResult {
        if self.cursor.at_kw(Kw::Lambda) {
            return Err(self.unsupported("lambda"));
        }
        let start = self.open();
        let body = self.or_test()?;
        if self.cursor.at_kw(Kw::If) {
            self.cursor.expect_kw(Kw::If)?;
            let test = self.or_test()?;
            self.cursor.expect_kw(Kw::Else)?;
            let orelse = self.test()?;
            return Ok(Expr::IfExp {
                test: Box::new(test),
                body: Box::new(body),
                orelse: Box::new(orelse),
                span: self.close(start),
            });
        }
        Ok(body)
    }

    fn or_test(&mut self) -> ExprResult {
        self.bool_chain(Kw::Or, BoolOpKind::Or, Self::and_test)
    }

    fn and_test(&mut self) -> ExprResult {
        self.bool_chain(Kw::And, BoolOpKind::And, Self::not_test)
    }

    /// A left-to-right keyword chain. Two or more operands collapse into a
    /// single `BoolOp` holding the ordered operand list, not a nested tree.
    fn bool_chain(
        &mut self,
        kw: Kw,
        op: BoolOpKind,
        operand: fn(&mut Self) -> ExprResult,
    ) -> ExprResult {
        let start = self.open();
        let first = operand(self)?;
        if !self.cursor.at_kw(kw) {
            return Ok(first);
        }
        let mut values = vec![first];
        while self.cursor.at_kw(kw) {
            self.cursor.expect_kw(kw)?;
            values.push(operand(self)?);
        }
        Ok(Expr::BoolOp {
            op,
            values,
            span: self.close(start),
        })
    }

    /// `not_test: 'not' not_test | comparison`
    fn not_test(&mut self) -> ExprResult {
        if self.cursor.at_kw(Kw::Not) {
            let start = self.open();
            self.cursor.shift()?;
            let operand = self.not_test()?;
            return Ok(Expr::UnaryOp {
                op: UnaryOpKind::Not,
                operand: Box::new(operand),
                span: self.close(start),
            });
        }
        self.comparison()
    }

    /// `comparison: expr (comp_op expr)*`. A run of comparison operators
    /// builds one node with parallel op/comparator sequences (chained
    /// comparison semantics).
    fn comparison(&mut self) -> ExprResult {
        let start = self.open();
        let left = self.expr()?;
        if self.current_cmp_op().is_none() {
            return Ok(left);
        }
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(mut op) = self.current_cmp_op() {
            self.cursor.shift()?;
            if op == CmpOpKind::NotIn {
                self.cursor.expect_kw(Kw::In)?;
            } else if op == CmpOpKind::Is && self.cursor.at_kw(Kw::Not) {
                self.cursor.shift()?;
                op = CmpOpKind::IsNot;
            }
            ops.push(op);
            comparators.push(self.expr()?);
        }
        Ok(Expr::Compare {
            left: Box::new(left),
            ops,
            comparators,
            span: self.close(start),
        })
    }

    fn current_cmp_op(&self) -> Option<CmpOpKind> {
        if let Some(op) = self.cursor.current_op() {
            return CmpOpKind::from_op(op);
        }
        match self.cursor.current_kw() {
            Some(Kw::In) => Some(CmpOpKind::In),
            Some(Kw::Not) => Some(CmpOpKind::NotIn),
            Some(Kw::Is) => Some(CmpOpKind::Is),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Binary levels
    // ------------------------------------------------------------------------

    fn expr(&mut self) -> ExprResult {
        self.bin_chain(Self::xor_expr, &[OperatorKind::BitOr])
    }

    fn xor_expr(&mut self) -> ExprResult {
        self.bin_chain(Self::and_expr, &[OperatorKind::BitXor])
    }

    fn and_expr(&mut self) -> ExprResult {
        self.bin_chain(Self::shift_expr, &[OperatorKind::BitAnd])
    }

    fn shift_expr(&mut self) -> ExprResult {
        self.bin_chain(Self::arith_expr, &[OperatorKind::LShift, OperatorKind::RShift])
    }

    fn arith_expr(&mut self) -> ExprResult {
        self.bin_chain(Self::term, &[OperatorKind::Add, OperatorKind::Sub])
    }

    fn term(&mut self) -> ExprResult {
        self.bin_chain(
            Self::factor,
            &[
                OperatorKind::Mult,
                OperatorKind::MatMult,
                OperatorKind::Div,
                OperatorKind::Mod,
                OperatorKind::FloorDiv,
            ],
        )
    }

    /// Shared helper for one binary precedence level. The right operand
    /// recurses into the same level, so chains of operators at one level
    /// associate to the right: `a - b - c` is `a - (b - c)`.
    fn bin_chain(
        &mut self,
        operand: fn(&mut Self) -> ExprResult,
        ops: &'static [OperatorKind],
    ) -> ExprResult {
        let start = self.open();
        let left = operand(self)?;
        let op = match self.cursor.current_op().and_then(OperatorKind::from_op) {
            Some(op) if ops.contains(&op) => op,
            _ => return Ok(left),
        };
        self.cursor.shift()?;
        let right = self.bin_chain(operand, ops)?;
        Ok(Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
            span: self.close(start),
        })
    }

    /// `factor: ('+'|'-'|'~') factor | power`
    fn factor(&mut self) -> ExprResult {
        if let Some(op) = self.cursor.current_op().and_then(UnaryOpKind::from_op) {
            let start = self.open();
            self.cursor.shift()?;
            let operand = self.factor()?;
            return Ok(Expr::UnaryOp {
                op,
                operand: Box::new(operand),
                span: self.close(start),
            });
        }
        self.power()
    }

    /// `power: atom_expr ['**' factor]`, with `**` binding right.
    fn power(&mut self) -> ExprResult {
        let start = self.open();
        let base = self.atom_expr()?;
        if self.cursor.at_op("**") {
            self.cursor.shift()?;
            let right = self.factor()?;
            return Ok(Expr::BinOp {
                left: Box::new(base),
                op: OperatorKind::Pow,
                right: Box::new(right),
                span: self.close(start),
            });
        }
        Ok(base)
    }

    // ------------------------------------------------------------------------
    // Postfix trailers
    // ------------------------------------------------------------------------

    /// `atom_expr: atom trailer*` where
    /// `trailer: '(' [arglist] ')' | '[' subscriptlist ']' | '.' NAME`.
    /// Each trailer re-wraps the accumulated expression and loops.
    fn atom_expr(&mut self) -> ExprResult {
        let start = self.open();
        let mut e = self.atom()?;
        loop {
            if self.cursor.at_op("(") {
                e = self.call_trailer(e, start)?;
            } else if self.cursor.at_op("[") {
                e = self.subscript_trailer(e, start)?;
            } else if self.cursor.at_op(".") {
                self.cursor.shift()?;
                if !self.cursor.at(TokenKind::Id) {
                    return Err(self.syntax_error("expecting attribute name"));
                }
                let attr = self.cursor.peek().value.clone();
                self.cursor.shift()?;
                e = Expr::Attribute {
                    value: Box::new(e),
                    attr,
                    span: self.close(start),
                };
            } else {
                return Ok(e);
            }
        }
    }

    /// Parses a call's argument list and splits it into positional arguments
    /// and keyword arguments. A positional argument may not follow a keyword
    /// argument.
    fn call_trailer(&mut self, func: Expr, start: usize) -> ExprResult {
        let parsed = self.parse_bracketed_list(")", "argument", Self::argument)?;
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        for arg in parsed {
            match arg {
                Argument::Keyword(kw) => keywords.push(kw),
                Argument::Positional(value) => {
                    if !keywords.is_empty() {
                        return Err(
                            self.syntax_error("positional argument follows keyword argument")
                        );
                    }
                    args.push(value);
                }
            }
        }
        Ok(Expr::Call {
            func: Box::new(func),
            args,
            keywords,
            span: self.close(start),
        })
    }

    fn subscript_trailer(&mut self, value: Expr, start: usize) -> ExprResult {
        let ext_start = self.open();
        let mut dims = self.parse_bracketed_list("]", "subscript", Self::subscript)?;
        let slice = match dims.len() {
            0 => return Err(self.syntax_error("need non-empty index list")),
            1 => dims.remove(0),
            _ => Slice::ExtSlice {
                dims,
                span: self.close(ext_start),
            },
        };
        Ok(Expr::Subscript {
            value: Box::new(value),
            slice: Box::new(slice),
            span: self.close(start),
        })
    }

    /// `subscript: test | [test] ':' [test] [':' [test]]`
    fn subscript(&mut self) -> Result<Slice, CoilError> {
        let start = self.open();
        let mut lower = None;
        if !self.cursor.at_op(":") {
            lower = Some(self.test()?);
        }
        if self.cursor.at_op(":") {
            self.cursor.shift()?;
            let mut upper = None;
            if !self.cursor.at_op(":") && !self.cursor.at_op(",") && !self.cursor.at_op("]") {
                upper = Some(self.test()?);
            }
            let mut step = None;
            if self.cursor.at_op(":") {
                self.cursor.shift()?;
                if !self.cursor.at_op(",") && !self.cursor.at_op("]") {
                    step = Some(self.test()?);
                }
            }
            return Ok(Slice::Slice {
                lower,
                upper,
                step,
                span: self.close(start),
            });
        }
        match lower {
            Some(value) => Ok(Slice::Index {
                value,
                span: self.close(start),
            }),
            // Unreachable: a missing lower always enters the slice branch.
            None => Err(self.expecting("subscript")),
        }
    }

    /// One call argument: `test | NAME '=' test | '*' test | '**' test`,
    /// with a generator expression rejected as outside coverage.
    fn argument(&mut self) -> Result<Argument, CoilError> {
        let start = self.open();
        if self.cursor.at_op("*") {
            self.cursor.shift()?;
            let value = self.test()?;
            return Ok(Argument::Positional(Expr::Starred {
                value: Box::new(value),
                span: self.close(start),
            }));
        }
        if self.cursor.at_op("**") {
            self.cursor.shift()?;
            let value = self.test()?;
            return Ok(Argument::Keyword(KeywordArg {
                arg: None,
                value,
                span: self.close(start),
            }));
        }
        let e = self.test()?;
        if self.cursor.at_op("=") {
            let Expr::Name { id, .. } = e else {
                return Err(self.syntax_error("invalid keyword argument; did you mean ==?"));
            };
            self.cursor.shift()?;
            let value = self.test()?;
            return Ok(Argument::Keyword(KeywordArg {
                arg: Some(id),
                value,
                span: self.close(start),
            }));
        }
        if self.cursor.at_kw(Kw::For) {
            return Err(self.unsupported("generator expression"));
        }
        Ok(Argument::Positional(e))
    }

    // ------------------------------------------------------------------------
    // Atoms and bracketed forms
    // ------------------------------------------------------------------------

    /// `atom: '(' ... ')' | '[' ... ']' | '{' ... '}' | NAME | NUMBER |
    /// STRING+ | 'None' | 'True' | 'False'`
    fn atom(&mut self) -> ExprResult {
        let start = self.open();
        let t = self.cursor.peek().clone();
        match t.kind {
            TokenKind::Id => {
                self.cursor.shift()?;
                Ok(Expr::Name {
                    id: t.value,
                    span: self.close(start),
                })
            }
            TokenKind::Number => {
                let n: f64 = t
                    .value
                    .parse()
                    .map_err(|_| self.syntax_error(format!("invalid number `{}`", t.value)))?;
                self.cursor.shift()?;
                Ok(Expr::Num {
                    n,
                    s: t.value,
                    span: self.close(start),
                })
            }
            TokenKind::String => {
                self.cursor.shift()?;
                let mut s = t.value;
                // Adjacent string literals concatenate into one node.
                while self.cursor.at(TokenKind::String) {
                    s.push_str(&self.cursor.peek().value.clone());
                    self.cursor.shift()?;
                }
                Ok(Expr::Str {
                    s,
                    span: self.close(start),
                })
            }
            TokenKind::Keyword => match Kw::lookup(&t.value) {
                Some(Kw::None) => self.name_constant(None, start),
                Some(Kw::True) => self.name_constant(Some(true), start),
                Some(Kw::False) => self.name_constant(Some(false), start),
                _ => Err(self.expecting("atom")),
            },
            TokenKind::Op => match t.value.as_str() {
                "(" => self.parse_parens(")", BracketKind::Paren),
                "[" => self.parse_parens("]", BracketKind::Square),
                "{" => Err(self.unsupported("dict/set literal")),
                _ => Err(self.syntax_error("unexpected operator")),
            },
            _ => Err(self.syntax_error("unexpected token")),
        }
    }

    fn name_constant(&mut self, value: Option<bool>, start: usize) -> ExprResult {
        self.cursor.shift()?;
        Ok(Expr::NameConstant {
            value,
            span: self.close(start),
        })
    }

    /// Unified `(...)` / `[...]` parsing. An empty pair is an empty
    /// tuple/list; a single element with no trailing comma is returned
    /// unwrapped (grouping, so `(x)` is not a 1-tuple); a comma produces a
    /// tuple/list; a `for` after the first element is a comprehension, which
    /// is outside coverage.
    fn parse_parens(&mut self, closer: &'static str, kind: BracketKind) -> ExprResult {
        let saved = self.cursor.set_in_brackets(true);
        let result = self.parse_parens_inner(closer, kind);
        self.cursor.set_in_brackets(saved);
        result
    }

    fn parse_parens_inner(&mut self, closer: &'static str, kind: BracketKind) -> ExprResult {
        let start = self.open();
        self.cursor.shift()?;
        if self.cursor.at_op(closer) {
            self.cursor.shift()?;
            return Ok(kind.collection(Vec::new(), self.close(start)));
        }
        let first = self.star_or_test()?;
        if self.cursor.at_kw(Kw::For) {
            return Err(self.unsupported(kind.comprehension_name()));
        }
        if self.cursor.at_op(",") {
            self.cursor.shift()?;
            let mut elts = self.parse_list(closer, "expression", Self::star_or_test)?;
            elts.insert(0, first);
            return Ok(kind.collection(elts, self.close(start)));
        }
        if self.cursor.at_op(closer) {
            self.cursor.shift()?;
            return Ok(first);
        }
        Err(self.expecting("expression"))
    }

    fn star_or_test(&mut self) -> ExprResult {
        if self.cursor.at_op("*") {
            let start = self.open();
            self.cursor.shift()?;
            let value = self.expr()?;
            return Ok(Expr::Starred {
                value: Box::new(value),
                span: self.close(start),
            });
        }
        self.test()
    }

    /// The shared comma-separated list routine: parse an element, optionally
    /// consume one separating comma, and stop by consuming the closer. A
    /// trailing comma before the closer is accepted; a missing comma between
    /// elements is not.
    fn parse_list<T>(
        &mut self,
        closer: &'static str,
        category: &'static str,
        element: fn(&mut Self) -> Result<T, CoilError>,
    ) -> Result<Vec<T>, CoilError> {
        let mut items = Vec::new();
        if self.cursor.at_op(closer) {
            self.cursor.shift()?;
            return Ok(items);
        }
        loop {
            items.push(element(self)?);
            let had_comma = if self.cursor.at_op(",") {
                self.cursor.shift()?;
                true
            } else {
                false
            };
            if self.cursor.at_op(closer) {
                self.cursor.shift()?;
                return Ok(items);
            }
            if !had_comma {
                return Err(self.expecting(category));
            }
        }
    }

    /// Runs `parse_list` with newline/indent suppression on: the opener is
    /// consumed here, the closer by `parse_list`.
    fn parse_bracketed_list<T>(
        &mut self,
        closer: &'static str,
        category: &'static str,
        element: fn(&mut Self) -> Result<T, CoilError>,
    ) -> Result<Vec<T>, CoilError> {
        let saved = self.cursor.set_in_brackets(true);
        let result = (|| {
            self.cursor.shift()?;
            self.parse_list(closer, category, element)
        })();
        self.cursor.set_in_brackets(saved);
        result
    }
}
