#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Lexer and parser for kol source files.
//!
//! `parse_str` is the strict entry point; `parse_with` is the recovering
//! one that also hands back the partial tree.

mod diag;
mod expr;
mod lexer;
mod limits;
mod parser;
mod stream;
mod token;

pub use diag::{Diagnostic, DiagnosticKind, Diagnostics, LexError};
pub use lexer::tokenize;
pub use limits::ParseLimits;
pub use parser::{parse_str, parse_with, ParseOutput};
pub use token::{Tok, TokKind};
