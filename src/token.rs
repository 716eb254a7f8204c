//! Token model for the coil front-end.
//!
//! Tokens are produced by an external lexer and consumed here as an opaque,
//! ordered sequence. The parser never re-lexes: everything it knows about the
//! source arrives through this type. Indentation is encoded by the lexer as
//! width-valued `Indent` tokens at the start of each logical line; the parser's
//! cursor turns those into structural indent/dedent decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a single lexical unit.
///
/// `Dedent` is never produced by the lexer; the cursor reclassifies an
/// `Indent` token in place when its width closes one or more open blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Id,
    Number,
    String,
    Keyword,
    Op,
    Comment,
    NewLine,
    Indent,
    Dedent,
    Error,
    Eof,
}

/// A classified lexical unit: kind, literal value, and source span.
///
/// Operator tokens carry their source spelling (`"("`, `"**"`, `";"`, ...);
/// `Indent` tokens carry the decimal indentation width; `NewLine` tokens carry
/// an empty value. Tokens are immutable once produced, with the single
/// exception of the indent-to-dedent reclassification noted above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            start,
            end,
        }
    }

    /// A zero-span token not backed by any source position. Used for the
    /// synthetic end-of-input token and for rendering "expected" tokens in
    /// diagnostics.
    pub fn synthetic(kind: TokenKind, value: impl Into<String>) -> Self {
        Self::new(kind, value, 0, 0)
    }

    /// Human-readable rendering used in every diagnostic message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Id => format!("identifier `{}`", self.value),
            TokenKind::Number => format!("number `{}`", self.value),
            TokenKind::String => "string literal".to_string(),
            TokenKind::Keyword => format!("keyword `{}`", self.value),
            TokenKind::Op => format!("`{}`", self.value),
            TokenKind::Comment => "comment".to_string(),
            TokenKind::NewLine => "end of line".to_string(),
            TokenKind::Indent => "indent".to_string(),
            TokenKind::Dedent => "dedent".to_string(),
            TokenKind::Error => format!("invalid token `{}`", self.value),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// The closed keyword set of the source language.
///
/// The grammar layer never dispatches on raw keyword strings: a `Keyword`
/// token's literal is resolved to `Option<Kw>` once, and all statement and
/// operator dispatch is a `match` over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kw {
    False,
    None,
    True,
    And,
    As,
    Assert,
    Async,
    Await,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    Try,
    While,
    With,
    Yield,
}

impl Kw {
    /// Resolves a keyword literal. Returns `None` for anything outside the
    /// closed set, which the grammar then treats as a non-keyword.
    pub fn lookup(s: &str) -> Option<Kw> {
        let kw = match s {
            "False" => Kw::False,
            "None" => Kw::None,
            "True" => Kw::True,
            "and" => Kw::And,
            "as" => Kw::As,
            "assert" => Kw::Assert,
            "async" => Kw::Async,
            "await" => Kw::Await,
            "break" => Kw::Break,
            "class" => Kw::Class,
            "continue" => Kw::Continue,
            "def" => Kw::Def,
            "del" => Kw::Del,
            "elif" => Kw::Elif,
            "else" => Kw::Else,
            "except" => Kw::Except,
            "finally" => Kw::Finally,
            "for" => Kw::For,
            "from" => Kw::From,
            "global" => Kw::Global,
            "if" => Kw::If,
            "import" => Kw::Import,
            "in" => Kw::In,
            "is" => Kw::Is,
            "lambda" => Kw::Lambda,
            "nonlocal" => Kw::Nonlocal,
            "not" => Kw::Not,
            "or" => Kw::Or,
            "pass" => Kw::Pass,
            "raise" => Kw::Raise,
            "return" => Kw::Return,
            "try" => Kw::Try,
            "while" => Kw::While,
            "with" => Kw::With,
            "yield" => Kw::Yield,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kw::False => "False",
            Kw::None => "None",
            Kw::True => "True",
            Kw::And => "and",
            Kw::As => "as",
            Kw::Assert => "assert",
            Kw::Async => "async",
            Kw::Await => "await",
            Kw::Break => "break",
            Kw::Class => "class",
            Kw::Continue => "continue",
            Kw::Def => "def",
            Kw::Del => "del",
            Kw::Elif => "elif",
            Kw::Else => "else",
            Kw::Except => "except",
            Kw::Finally => "finally",
            Kw::For => "for",
            Kw::From => "from",
            Kw::Global => "global",
            Kw::If => "if",
            Kw::Import => "import",
            Kw::In => "in",
            Kw::Is => "is",
            Kw::Lambda => "lambda",
            Kw::Nonlocal => "nonlocal",
            Kw::Not => "not",
            Kw::Or => "or",
            Kw::Pass => "pass",
            Kw::Raise => "raise",
            Kw::Return => "return",
            Kw::Try => "try",
            Kw::While => "while",
            Kw::With => "with",
            Kw::Yield => "yield",
        }
    }
}

impl fmt::Display for Kw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
