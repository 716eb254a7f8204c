//! AST module for the coil front-end.
//!
//! This module provides the core Abstract Syntax Tree types produced by the
//! parser, with source location tracking on every node. The tree is the sole
//! output of the front-end and the contract with downstream translation
//! passes, so all types here are serde-enabled.

use serde::{Deserialize, Serialize};

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Represents a span in the source code.
///
/// All AST nodes carry a span for source tracking; enables better errors and
/// explainability. `start` is the offset of the node's first token; `end` is
/// the end offset of the last token consumed while building the node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True if `inner` lies entirely within this span.
    pub fn contains(&self, inner: Span) -> bool {
        self.start <= inner.start && inner.end <= self.end
    }
}

// ============================================================================
// OPERATOR ENUMERATIONS
// ============================================================================

/// Boolean chain operators. A chain of two or more operands collapses into a
/// single [`Expr::BoolOp`] holding the full operand list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOpKind {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOpKind {
    Invert,
    Not,
    UAdd,
    USub,
}

/// Binary arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperatorKind {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

/// Comparison operators, including the two-keyword forms `not in` / `is not`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOpKind {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl OperatorKind {
    /// Resolves an operator token's spelling to a binary operator kind.
    pub fn from_op(op: &str) -> Option<Self> {
        let kind = match op {
            "+" => OperatorKind::Add,
            "-" => OperatorKind::Sub,
            "*" => OperatorKind::Mult,
            "@" => OperatorKind::MatMult,
            "/" => OperatorKind::Div,
            "%" => OperatorKind::Mod,
            "**" => OperatorKind::Pow,
            "<<" => OperatorKind::LShift,
            ">>" => OperatorKind::RShift,
            "|" => OperatorKind::BitOr,
            "^" => OperatorKind::BitXor,
            "&" => OperatorKind::BitAnd,
            "//" => OperatorKind::FloorDiv,
            _ => return None,
        };
        Some(kind)
    }
}

impl UnaryOpKind {
    pub fn from_op(op: &str) -> Option<Self> {
        let kind = match op {
            "~" => UnaryOpKind::Invert,
            "-" => UnaryOpKind::USub,
            "+" => UnaryOpKind::UAdd,
            _ => return None,
        };
        Some(kind)
    }
}

impl CmpOpKind {
    /// Resolves the single-token comparison operators. The keyword forms
    /// (`in`, `not in`, `is`, `is not`) are resolved by the grammar layer,
    /// which has to consume the second keyword explicitly.
    pub fn from_op(op: &str) -> Option<Self> {
        let kind = match op {
            "<" => CmpOpKind::Lt,
            ">" => CmpOpKind::Gt,
            "==" => CmpOpKind::Eq,
            ">=" => CmpOpKind::GtE,
            "<=" => CmpOpKind::LtE,
            "!=" => CmpOpKind::NotEq,
            _ => return None,
        };
        Some(kind)
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// A statement node.
///
/// The statement grammar has partial coverage by design: every kind below is
/// part of the model, but only a subset is currently constructed by the
/// parser. Constructs outside the covered subset fail the parse with a
/// dedicated "unsupported" error rather than mis-parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    While {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
        span: Span,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
        span: Span,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
        span: Span,
    },
    Try {
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
        span: Span,
    },
    With {
        items: Vec<WithItem>,
        body: Vec<Stmt>,
        span: Span,
    },
    FunctionDef {
        name: String,
        params: Vec<Param>,
        returns: Option<Expr>,
        body: Vec<Stmt>,
        span: Span,
    },
    ClassDef {
        name: String,
        bases: Vec<Expr>,
        keywords: Vec<KeywordArg>,
        body: Vec<Stmt>,
        span: Span,
    },
    Pass {
        span: Span,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Return {
        value: Option<Expr>,
        span: Span,
    },
    Raise {
        exc: Option<Expr>,
        cause: Option<Expr>,
        span: Span,
    },
    Global {
        names: Vec<String>,
        span: Span,
    },
    Nonlocal {
        names: Vec<String>,
        span: Span,
    },
    Import {
        names: Vec<ImportAlias>,
        span: Span,
    },
    Assert {
        test: Expr,
        msg: Option<Expr>,
        span: Span,
    },
    /// An expression evaluated for its effect.
    Expr {
        value: Expr,
        span: Span,
    },
}

impl Stmt {
    /// Returns the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::While { span, .. }
            | Stmt::If { span, .. }
            | Stmt::For { span, .. }
            | Stmt::Try { span, .. }
            | Stmt::With { span, .. }
            | Stmt::FunctionDef { span, .. }
            | Stmt::ClassDef { span, .. }
            | Stmt::Pass { span }
            | Stmt::Break { span }
            | Stmt::Continue { span }
            | Stmt::Return { span, .. }
            | Stmt::Raise { span, .. }
            | Stmt::Global { span, .. }
            | Stmt::Nonlocal { span, .. }
            | Stmt::Import { span, .. }
            | Stmt::Assert { span, .. }
            | Stmt::Expr { span, .. } => *span,
        }
    }

    /// Returns the kind of this statement as a string, for diagnostics and
    /// test assertions.
    pub fn type_name(&self) -> &'static str {
        match self {
            Stmt::While { .. } => "While",
            Stmt::If { .. } => "If",
            Stmt::For { .. } => "For",
            Stmt::Try { .. } => "Try",
            Stmt::With { .. } => "With",
            Stmt::FunctionDef { .. } => "FunctionDef",
            Stmt::ClassDef { .. } => "ClassDef",
            Stmt::Pass { .. } => "Pass",
            Stmt::Break { .. } => "Break",
            Stmt::Continue { .. } => "Continue",
            Stmt::Return { .. } => "Return",
            Stmt::Raise { .. } => "Raise",
            Stmt::Global { .. } => "Global",
            Stmt::Nonlocal { .. } => "Nonlocal",
            Stmt::Import { .. } => "Import",
            Stmt::Assert { .. } => "Assert",
            Stmt::Expr { .. } => "Expr",
        }
    }
}

/// One `except` clause of a `try` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptHandler {
    pub r#type: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// One `as`-bindable context manager of a `with` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithItem {
    pub context_expr: Expr,
    pub optional_vars: Option<Expr>,
    pub span: Span,
}

/// One name bound by an `import` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportAlias {
    pub name: String,
    pub asname: Option<String>,
    pub span: Span,
}

/// One formal parameter of a function definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
    pub span: Span,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A flattened `and`/`or` chain: `a and b and c` is one node with three
    /// values, not a nested pair.
    BoolOp {
        op: BoolOpKind,
        values: Vec<Expr>,
        span: Span,
    },
    UnaryOp {
        op: UnaryOpKind,
        operand: Box<Expr>,
        span: Span,
    },
    BinOp {
        left: Box<Expr>,
        op: OperatorKind,
        right: Box<Expr>,
        span: Span,
    },
    /// A chained comparison: `a < b < c` is one node whose `ops` and
    /// `comparators` are parallel sequences.
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOpKind>,
        comparators: Vec<Expr>,
        span: Span,
    },
    /// The ternary conditional `body if test else orelse`.
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
        span: Span,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<KeywordArg>,
        span: Span,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Slice>,
        span: Span,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
        span: Span,
    },
    Name {
        id: String,
        span: Span,
    },
    /// A numeric literal. `n` is the parsed floating-point value; `s`
    /// preserves the raw literal text for downstream code generation.
    Num {
        n: f64,
        s: String,
        span: Span,
    },
    /// A string literal. Adjacent literals are concatenated into one node.
    Str {
        s: String,
        span: Span,
    },
    /// `None`, `True`, or `False`.
    NameConstant {
        value: Option<bool>,
        span: Span,
    },
    Tuple {
        elts: Vec<Expr>,
        span: Span,
    },
    List {
        elts: Vec<Expr>,
        span: Span,
    },
    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
        span: Span,
    },
    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
        span: Span,
    },
    /// A starred element in call-argument or collection position.
    Starred {
        value: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    /// Returns the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::BoolOp { span, .. }
            | Expr::UnaryOp { span, .. }
            | Expr::BinOp { span, .. }
            | Expr::Compare { span, .. }
            | Expr::IfExp { span, .. }
            | Expr::Call { span, .. }
            | Expr::Subscript { span, .. }
            | Expr::Attribute { span, .. }
            | Expr::Name { span, .. }
            | Expr::Num { span, .. }
            | Expr::Str { span, .. }
            | Expr::NameConstant { span, .. }
            | Expr::Tuple { span, .. }
            | Expr::List { span, .. }
            | Expr::GeneratorExp { span, .. }
            | Expr::ListComp { span, .. }
            | Expr::Starred { span, .. } => *span,
        }
    }

    /// Returns the kind of this expression as a string, for diagnostics and
    /// test assertions.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expr::BoolOp { .. } => "BoolOp",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::BinOp { .. } => "BinOp",
            Expr::Compare { .. } => "Compare",
            Expr::IfExp { .. } => "IfExp",
            Expr::Call { .. } => "Call",
            Expr::Subscript { .. } => "Subscript",
            Expr::Attribute { .. } => "Attribute",
            Expr::Name { .. } => "Name",
            Expr::Num { .. } => "Num",
            Expr::Str { .. } => "Str",
            Expr::NameConstant { .. } => "NameConstant",
            Expr::Tuple { .. } => "Tuple",
            Expr::List { .. } => "List",
            Expr::GeneratorExp { .. } => "GeneratorExp",
            Expr::ListComp { .. } => "ListComp",
            Expr::Starred { .. } => "Starred",
        }
    }
}

/// A keyword argument in a call. `arg` is `None` for `**kwargs` unpacking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordArg {
    pub arg: Option<String>,
    pub value: Expr,
    pub span: Span,
}

/// A subscript item. Two or more items in one subscript collapse into
/// [`Slice::ExtSlice`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slice {
    Index {
        value: Expr,
        span: Span,
    },
    Slice {
        lower: Option<Expr>,
        upper: Option<Expr>,
        step: Option<Expr>,
        span: Span,
    },
    ExtSlice {
        dims: Vec<Slice>,
        span: Span,
    },
}

impl Slice {
    pub fn span(&self) -> Span {
        match self {
            Slice::Index { span, .. }
            | Slice::Slice { span, .. }
            | Slice::ExtSlice { span, .. } => *span,
        }
    }
}

/// One `for ... in ... [if ...]` clause of a comprehension. Present in the
/// model for downstream consumers; the comprehension grammar itself is not in
/// current coverage and fails the parse when reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    pub ifs: Vec<Expr>,
    pub span: Span,
}
