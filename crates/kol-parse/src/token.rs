use kol_ast::span::Span;
use serde::Serialize;

use crate::diag::LexError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokKind {
    // extras / eof / error
    Eof,
    Whitespace,
    Comment,
    /// Source text matching no token rule; reported when the parser reaches it
    Invalid(LexError),
    // punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    // assignment
    Eq,
    // arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    // equality
    EqEq,
    BangEq,
    // relational
    Lt,
    Le,
    Gt,
    Ge,
    // logical
    AndAnd,
    OrOr,
    // unary
    Bang,
    // idents / keywords
    Ident(String),
    KwFun,
    KwStruct,
    KwLet,
    KwMut,
    KwReturn,
    KwBreak,
    KwIf,
    KwElse,
    KwFor,
    KwTrue,
    KwFalse,
    // type keywords
    KwBool,
    KwInt,
    KwFloat,
    KwStr,
    KwVoid,
    KwArray,
    KwMap,
    KwFn,
    // literals
    Int(u64),
    Float(f64),
    Str(String),
}

impl TokKind {
    pub fn keyword(word: &str) -> Option<TokKind> {
        let kind = match word {
            "fun" => TokKind::KwFun,
            "struct" => TokKind::KwStruct,
            "let" => TokKind::KwLet,
            "mut" => TokKind::KwMut,
            "return" => TokKind::KwReturn,
            "break" => TokKind::KwBreak,
            "if" => TokKind::KwIf,
            "else" => TokKind::KwElse,
            "for" => TokKind::KwFor,
            "true" => TokKind::KwTrue,
            "false" => TokKind::KwFalse,
            "bool" => TokKind::KwBool,
            "int" => TokKind::KwInt,
            "float" => TokKind::KwFloat,
            "str" => TokKind::KwStr,
            "void" => TokKind::KwVoid,
            "array" => TokKind::KwArray,
            "map" => TokKind::KwMap,
            "fn" => TokKind::KwFn,
            _ => return None,
        };
        Some(kind)
    }

    /// Comments and whitespace: legal between any two significant tokens.
    pub fn is_extra(&self) -> bool {
        matches!(self, TokKind::Whitespace | TokKind::Comment)
    }

    /// Short human description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokKind::Eof => "end of input".to_string(),
            TokKind::Whitespace => "whitespace".to_string(),
            TokKind::Comment => "comment".to_string(),
            TokKind::Invalid(e) => e.to_string(),
            TokKind::Ident(s) => format!("identifier `{s}`"),
            TokKind::Int(v) => format!("integer `{v}`"),
            TokKind::Float(v) => format!("float `{v}`"),
            TokKind::Str(_) => "string literal".to_string(),
            other => format!("`{}`", other.fixed_text().unwrap_or("?")),
        }
    }

    /// Source text of punctuation, operators and keywords.
    pub fn fixed_text(&self) -> Option<&'static str> {
        let text = match self {
            TokKind::LParen => "(",
            TokKind::RParen => ")",
            TokKind::LBrace => "{",
            TokKind::RBrace => "}",
            TokKind::Comma => ",",
            TokKind::Colon => ":",
            TokKind::Semicolon => ";",
            TokKind::Dot => ".",
            TokKind::Eq => "=",
            TokKind::Plus => "+",
            TokKind::Minus => "-",
            TokKind::Star => "*",
            TokKind::Slash => "/",
            TokKind::Percent => "%",
            TokKind::EqEq => "==",
            TokKind::BangEq => "!=",
            TokKind::Lt => "<",
            TokKind::Le => "<=",
            TokKind::Gt => ">",
            TokKind::Ge => ">=",
            TokKind::AndAnd => "&&",
            TokKind::OrOr => "||",
            TokKind::Bang => "!",
            TokKind::KwFun => "fun",
            TokKind::KwStruct => "struct",
            TokKind::KwLet => "let",
            TokKind::KwMut => "mut",
            TokKind::KwReturn => "return",
            TokKind::KwBreak => "break",
            TokKind::KwIf => "if",
            TokKind::KwElse => "else",
            TokKind::KwFor => "for",
            TokKind::KwTrue => "true",
            TokKind::KwFalse => "false",
            TokKind::KwBool => "bool",
            TokKind::KwInt => "int",
            TokKind::KwFloat => "float",
            TokKind::KwStr => "str",
            TokKind::KwVoid => "void",
            TokKind::KwArray => "array",
            TokKind::KwMap => "map",
            TokKind::KwFn => "fn",
            _ => return None,
        };
        Some(text)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Tok {
    pub kind: TokKind,
    /// Exact source slice
    pub lexeme: String,
    pub span: Span,
    /// 1-based
    pub line: u32,
    /// 1-based, counted in chars
    pub column: u32,
}
