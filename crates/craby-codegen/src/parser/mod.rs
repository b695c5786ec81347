//! Module spec parsing: logos lexer, then recursive descent into an owned AST.
//!
//! The parser never stops at the first problem: it records diagnostics, resynchronizes at
//! the next member or declaration, and keeps going so a single run reports everything.

pub mod ast;
mod core;
mod grammar;
mod lexer;
mod syntax_kind;


pub use ast::*;
pub use core::Parser;
pub use lexer::{Token, lex, token_text};
pub use syntax_kind::SyntaxKind;

use crate::diagnostics::Diagnostics;

/// Parse one spec unit. The tree is returned even when diagnostics were reported.
pub fn parse(source: &str) -> (SourceFile, Diagnostics) {
    Parser::new(source, lex(source)).parse()
}
