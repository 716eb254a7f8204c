//! Command-line interface for the coil front-end.
//!
//! The CLI works on token-stream files: JSON documents holding the original
//! source text plus the lexer's token sequence. That keeps the binary inside
//! the front-end's contract (it never lexes), while still giving a way to
//! inspect ASTs and diagnostics from the shell.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser as ClapParser, Subcommand};
use serde::{Deserialize, Serialize};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Stmt;
use crate::diagnostics::CoilError;
use crate::token::Token;

// ============================================================================
// CLI ARGUMENTS - Command-line argument definitions
// ============================================================================

/// The main CLI argument structure.
#[derive(Debug, ClapParser)]
#[command(
    name = "coil",
    version,
    about = "A syntactic front-end for a Python-like language."
)]
pub struct CoilArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Parse a token-stream file and print the AST.
    Ast {
        /// The path to the token-stream file to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Emit the AST as JSON instead of debug formatting.
        #[arg(long)]
        json: bool,
    },
    /// Parse a token-stream file and report success or failure.
    Check {
        /// The path to the token-stream file to check.
        #[arg(required = true)]
        file: PathBuf,
    },
}

// ============================================================================
// INPUT FORMAT
// ============================================================================

/// On-disk input: the original source text plus its token sequence, exactly
/// as produced by the external lexer.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenFile {
    pub source: String,
    pub tokens: Vec<Token>,
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = CoilArgs::parse();

    match args.command {
        ArgsCommand::Ast { file, json } => {
            let input = read_token_file_or_exit(&file);
            let module = parse_or_exit(input);
            if json {
                print_json(&module);
            } else {
                print_ast(&module);
            }
        }

        ArgsCommand::Check { file } => {
            let input = read_token_file_or_exit(&file);
            let module = parse_or_exit(input);
            print_check_summary(module.len());
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS - Common patterns extracted
// ============================================================================

fn read_token_file_or_exit(path: &Path) -> TokenFile {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: cannot read {}: {}", path.display(), e);
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!(
            "error: {} is not a valid token-stream file: {}",
            path.display(),
            e
        );
        process::exit(1);
    })
}

fn parse_or_exit(input: TokenFile) -> Vec<Stmt> {
    crate::parser::parse(&input.source, input.tokens).unwrap_or_else(|e| {
        print_error(e);
        process::exit(1);
    })
}

/// Prints a parse error with full miette diagnostics: source spans, labels,
/// and help text.
pub fn print_error(error: CoilError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// OUTPUT FUNCTIONS - Simple, direct output
// ============================================================================

fn print_ast(module: &[Stmt]) {
    if module.is_empty() {
        println!("(empty module)");
        return;
    }

    for (node_index, node) in module.iter().enumerate() {
        if module.len() > 1 {
            println!("\nNode {}:", node_index + 1);
        }
        println!("{node:#?}");
    }
}

fn print_json(module: &[Stmt]) {
    match serde_json::to_string_pretty(module) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to serialize AST: {}", e);
            process::exit(1);
        }
    }
}

fn print_check_summary(count: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(&mut stdout, "ok");
    let _ = stdout.reset();
    println!(": {} top-level statement(s)", count);
}
