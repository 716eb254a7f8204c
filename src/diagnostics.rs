//! Unified, `miette`-based diagnostic system for the coil front-end.
//!
//! Every failure mode of the parser is represented by [`CoilError`], one
//! variant per error class. Parsing stops at the first error: there is no
//! recovery, no partial AST, and no multi-error accumulation. Callers that
//! need to branch programmatically (for example, treating an unsupported
//! construct as skip-this-file while a malformed input is a hard failure)
//! use [`CoilError::error_type`] rather than matching on message text.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

use crate::ast::Span;

// Type alias for clarity and brevity
pub type SourceArc = Arc<NamedSource<String>>;

/// Type-safe error classification that corresponds to `CoilError` variants.
/// This replaces fragile string-based error matching in caller and test code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// An error token emitted by the lexer, surfaced verbatim.
    Lexical,
    /// A dedent that matches no open indentation width.
    Indentation,
    /// A structural mismatch: the current token is not what the grammar
    /// requires here.
    Grammar,
    /// A syntax-adjacent legality check enforced during parsing, such as a
    /// positional argument following a keyword argument.
    Syntax,
    /// A grammar production outside the current coverage. Always fails,
    /// regardless of input validity.
    Unsupported,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Lexical => "Lexical",
            ErrorType::Indentation => "Indentation",
            ErrorType::Grammar => "Grammar",
            ErrorType::Syntax => "Syntax",
            ErrorType::Unsupported => "Unsupported",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics: where the error is and
/// how to help.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source the span points into (if any).
    pub source: Option<SourceArc>,
    /// The span of the offending token (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with both source and span.
    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }

    /// Attaches a help message to this context.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Unified error type for all parse failure modes.
///
/// Every message renders as `<reason> near <token-description>`, except for
/// unsupported constructs, which render the distinct shape
/// `<construct> not supported yet` so that callers and humans can tell
/// "outside coverage" apart from "malformed input" at a glance.
#[derive(Debug, Error)]
pub enum CoilError {
    #[error("{message} near {found}")]
    Lexical {
        message: String,
        found: String,
        ctx: ErrorContext,
    },
    #[error("inconsistent indentation near {found}")]
    Indentation { found: String, ctx: ErrorContext },
    #[error("expecting {expected} near {found}")]
    Grammar {
        expected: String,
        found: String,
        ctx: ErrorContext,
    },
    #[error("{message} near {found}")]
    Syntax {
        message: String,
        found: String,
        ctx: ErrorContext,
    },
    #[error("{construct} not supported yet")]
    Unsupported { construct: String, ctx: ErrorContext },
}

impl CoilError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            CoilError::Lexical { ctx, .. } => ctx,
            CoilError::Indentation { ctx, .. } => ctx,
            CoilError::Grammar { ctx, .. } => ctx,
            CoilError::Syntax { ctx, .. } => ctx,
            CoilError::Unsupported { ctx, .. } => ctx,
        }
    }

    /// Returns the type-safe classification of this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            CoilError::Lexical { .. } => ErrorType::Lexical,
            CoilError::Indentation { .. } => ErrorType::Indentation,
            CoilError::Grammar { .. } => ErrorType::Grammar,
            CoilError::Syntax { .. } => ErrorType::Syntax,
            CoilError::Unsupported { .. } => ErrorType::Unsupported,
        }
    }
}

impl Diagnostic for CoilError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "coil::parse::{}",
            self.error_type().as_str().to_lowercase()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        let span = ctx.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a source string into an `Arc<NamedSource<String>>` for use in
/// error contexts.
pub fn to_error_source<S: AsRef<str>>(source: S) -> SourceArc {
    Arc::new(NamedSource::new("source", source.as_ref().to_string()))
}
