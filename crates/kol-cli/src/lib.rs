//! Library side of the `kol` binary: loading, rendering and formatting,
//! kept out of `main.rs` so the commands can be driven without a process.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use kol_ast::ast::SourceFile;
use kol_ast::print::{to_sexpr, to_source};
use kol_parse::{parse_with, tokenize, Diagnostics, ParseLimits};

/// AST dump format for `kol parse`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Sexpr,
    Json,
    Debug,
}

/// Read a source file, refusing anything over `limits.max_input_size`.
pub fn load_source(path: &str, limits: &ParseLimits) -> Result<String> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("failed to read '{}'", path))?
        .len();
    if len > limits.max_input_size as u64 {
        bail!(
            "source file exceeds {} byte limit ({} bytes)",
            limits.max_input_size,
            len
        );
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))
}

/// Full parse under `limits`; any diagnostic fails the whole file.
pub fn parse_source(src: &str, limits: &ParseLimits) -> Result<SourceFile, Diagnostics> {
    let out = parse_with(src, limits);
    log::debug!(
        "{} definitions, {} diagnostics",
        out.file.definitions.len(),
        out.diagnostics.len()
    );
    out.into_result()
}

pub fn render_ast(file: &SourceFile, format: Format) -> Result<String> {
    Ok(match format {
        Format::Sexpr => to_sexpr(file),
        Format::Json => serde_json::to_string_pretty(file)?,
        Format::Debug => format!("{:#?}", file),
    })
}

/// One `line:column kind lexeme` line per token, `Eof` included.
pub fn render_tokens(src: &str, all: bool) -> String {
    let mut out = String::new();
    for tok in tokenize(src) {
        if tok.kind.is_extra() && !all {
            continue;
        }
        out.push_str(&format!(
            "{}:{} {:?} {:?}\n",
            tok.line, tok.column, tok.kind, tok.lexeme
        ));
    }
    out
}

/// The same token selection as [`render_tokens`], as a JSON array of
/// `{ kind, lexeme, span, line, column }` objects.
pub fn render_tokens_json(src: &str, all: bool) -> Result<String> {
    let toks: Vec<_> = tokenize(src)
        .into_iter()
        .filter(|tok| all || !tok.kind.is_extra())
        .collect();
    Ok(serde_json::to_string_pretty(&toks)?)
}

pub fn format_source(src: &str, limits: &ParseLimits) -> Result<String, Diagnostics> {
    parse_source(src, limits).map(|file| to_source(&file))
}
