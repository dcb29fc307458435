use kol_ast::span::Span;
use serde::Serialize;
use thiserror::Error;

/// Why a stretch of source text could not become a token.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LexError {
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("number literal out of range")]
    NumberOutOfRange,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("lexical error: {0}")]
    Lexical(LexError),
    #[error("expected {}, found {found}", one_of(.expected))]
    Syntax { expected: Vec<String>, found: String },
    #[error("nesting depth limit of {limit} exceeded")]
    TooDeep { limit: usize },
    #[error("{what} exceeds limit of {limit}")]
    TooLarge { what: &'static str, limit: usize },
}

fn one_of(expected: &[String]) -> String {
    match expected {
        [] => "something else".to_string(),
        [only] => only.clone(),
        [init @ .., last] => format!("one of {}, {}", init.join(", "), last),
    }
}

/// A single problem found while parsing, positioned for `line:column` output.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{line}:{column}: {kind}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn is_lexical(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Lexical(_))
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Syntax { .. })
    }
}

/// Non-empty, source-ordered list of diagnostics from one failed parse.
#[derive(Error, Debug, Clone)]
#[error("{}", render(.0))]
pub struct Diagnostics(pub(crate) Vec<Diagnostic>);

fn render(diags: &[Diagnostic]) -> String {
    diags
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
