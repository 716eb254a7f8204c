//! Coil: a syntactic front-end for a Python-like language.
//!
//! Coil consumes a pre-lexed token stream together with its original source
//! text and produces an abstract syntax tree suitable for downstream
//! translation into a statically-typed target language. Lexing, semantic
//! analysis, and code generation are external collaborators; this crate is
//! only the grammar layer, and it is deliberately partial: constructs outside
//! current coverage fail loudly with a dedicated error class instead of
//! mis-parsing.
//!
//! The usual entry point is [`parse`]:
//!
//! ```ignore
//! let module = coil::parse(&source, tokens)?;
//! ```

pub use crate::diagnostics::{to_error_source, CoilError, ErrorContext, ErrorType, SourceArc};
pub use crate::parser::{parse, Parser};
pub use crate::token::{Kw, Token, TokenKind};

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod parser;
pub mod token;
