//! Indentation normalizer and statement grammar tests: suites, dedent
//! bookkeeping, bracket suppression, and simple-statement lines.

mod common;

use coil::ast::Stmt;
use coil::{ErrorType, Parser};
use common::{parse_stream, TokenStream};

/// `while x:` / indented `pass` / `else:` / indented `pass` parses to one
/// While whose body and else-branch each hold a single Pass.
#[test]
fn while_block_with_else_branch() {
    let module = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("x")
            .op(":")
            .nl()
            .ind(4)
            .kw("pass")
            .nl()
            .ind(0)
            .kw("else")
            .op(":")
            .nl()
            .ind(4)
            .kw("pass")
            .nl(),
    )
    .expect("parse should succeed");
    assert_eq!(module.len(), 1);
    let Stmt::While { body, orelse, .. } = &module[0] else {
        panic!("expected While");
    };
    assert_eq!(body.len(), 1);
    assert!(matches!(body[0], Stmt::Pass { .. }));
    assert_eq!(orelse.len(), 1);
    assert!(matches!(orelse[0], Stmt::Pass { .. }));
}

#[test]
fn while_with_inline_suite() {
    let module = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("x")
            .op(":")
            .kw("pass")
            .nl(),
    )
    .expect("parse should succeed");
    let Stmt::While { body, orelse, .. } = &module[0] else {
        panic!("expected While");
    };
    assert_eq!(body.len(), 1);
    assert!(orelse.is_empty());
}

#[test]
fn block_with_several_statements() {
    let module = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("x")
            .op(":")
            .nl()
            .ind(4)
            .kw("pass")
            .nl()
            .ind(4)
            .kw("pass")
            .nl()
            .ind(0)
            .kw("pass")
            .nl(),
    )
    .expect("parse should succeed");
    assert_eq!(module.len(), 2);
    let Stmt::While { body, .. } = &module[0] else {
        panic!("expected While");
    };
    assert_eq!(body.len(), 2);
    assert!(matches!(module[1], Stmt::Pass { .. }));
}

/// A dedent past several levels at once closes each enclosing suite in turn.
#[test]
fn multi_level_dedent_closes_nested_suites() {
    let module = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("a")
            .op(":")
            .nl()
            .ind(4)
            .kw("while")
            .id("b")
            .op(":")
            .nl()
            .ind(8)
            .kw("pass")
            .nl()
            .ind(0)
            .kw("pass")
            .nl(),
    )
    .expect("parse should succeed");
    assert_eq!(module.len(), 2);
    let Stmt::While { body, .. } = &module[0] else {
        panic!("expected outer While");
    };
    assert_eq!(body.len(), 1);
    let Stmt::While { body: inner, .. } = &body[0] else {
        panic!("expected inner While");
    };
    assert_eq!(inner.len(), 1);
    assert!(matches!(module[1], Stmt::Pass { .. }));
}

/// A dedent to a width that was never pushed is an inconsistent-indentation
/// failure.
#[test]
fn dedent_to_unknown_width_fails() {
    let err = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("x")
            .op(":")
            .nl()
            .ind(8)
            .kw("pass")
            .nl()
            .ind(4)
            .kw("pass")
            .nl(),
    )
    .expect_err("parse should fail");
    assert_eq!(err.error_type(), ErrorType::Indentation);
    assert!(err.to_string().contains("inconsistent indentation"));
}

#[test]
fn body_at_same_width_is_not_a_block() {
    let err = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("x")
            .op(":")
            .nl()
            .ind(0)
            .kw("pass")
            .nl(),
    )
    .expect_err("parse should fail");
    assert_eq!(err.error_type(), ErrorType::Syntax);
    assert!(err.to_string().contains("expecting an indented block"));
}

/// Newlines and indentation are insignificant inside brackets, so a test
/// expression may span lines.
#[test]
fn brackets_suppress_newline_and_indent() {
    let module = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("while")
            .op("(")
            .id("a")
            .kw("and")
            .nl()
            .ind(4)
            .id("b")
            .op(")")
            .op(":")
            .kw("pass")
            .nl(),
    )
    .expect("parse should succeed");
    let Stmt::While { body, .. } = &module[0] else {
        panic!("expected While");
    };
    assert_eq!(body.len(), 1);
}

#[test]
fn semicolons_separate_small_statements() {
    let module = parse_stream(
        TokenStream::new()
            .ind(0)
            .kw("pass")
            .op(";")
            .kw("pass")
            .nl(),
    )
    .expect("parse should succeed");
    assert_eq!(module.len(), 2);

    // A trailing semicolon before the newline is allowed.
    let module = parse_stream(
        TokenStream::new().ind(0).kw("pass").op(";").nl(),
    )
    .expect("parse should succeed");
    assert_eq!(module.len(), 1);
}

#[test]
fn empty_token_stream_is_an_empty_module() {
    let module = parse_stream(TokenStream::new()).expect("parse should succeed");
    assert!(module.is_empty());
}

#[test]
fn comments_are_collected_for_downstream_use() {
    let (source, tokens) = TokenStream::new()
        .ind(0)
        .comment("loop forever")
        .kw("while")
        .id("x")
        .op(":")
        .kw("pass")
        .nl()
        .build();
    let mut parser = Parser::new(&source, tokens).expect("construct");
    let module = parser.parse_module().expect("parse should succeed");
    assert_eq!(module.len(), 1);
    assert_eq!(parser.comments().len(), 1);
    assert_eq!(parser.comments()[0].value, "loop forever");
}

/// Two parses in a row share nothing: the second input sees a fresh
/// indentation stack and comment accumulator.
#[test]
fn sequential_parses_are_independent() {
    let build = || {
        TokenStream::new()
            .ind(0)
            .kw("while")
            .id("x")
            .op(":")
            .nl()
            .ind(4)
            .kw("pass")
            .nl()
    };
    let first = parse_stream(build()).expect("first parse");
    let second = parse_stream(build()).expect("second parse");
    assert_eq!(first, second);
}
