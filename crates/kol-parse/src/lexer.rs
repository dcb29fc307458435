use crate::diag::LexError;
use crate::token::{Tok, TokKind};
use kol_ast::span::Span;

/// Scan the whole buffer, extras included. The last token is always `Eof`.
/// Never fails: bad input becomes `TokKind::Invalid`.
pub fn tokenize(src: &str) -> Vec<Tok> {
    let mut lex = Lexer::new(src);
    let mut toks = Vec::new();
    loop {
        let tok = lex.next_tok();
        let done = tok.kind == TokKind::Eof;
        toks.push(tok);
        if done {
            break;
        }
    }
    log::trace!("scanned {} tokens from {} bytes", toks.len(), src.len());
    toks
}

pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.src[self.pos..].chars();
        it.next();
        it.next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
    }

    pub fn next_tok(&mut self) -> Tok {
        let (start, line, column) = (self.pos, self.line, self.col);
        let kind = self.scan(start);
        Tok {
            kind,
            lexeme: self.src[start..self.pos].to_string(),
            span: Span::new(start as u32, self.pos as u32),
            line,
            column,
        }
    }

    fn scan(&mut self, start: usize) -> TokKind {
        let Some(c) = self.bump() else {
            return TokKind::Eof;
        };

        if is_space(c) {
            self.eat_while(is_space);
            return TokKind::Whitespace;
        }

        match c {
            '/' if self.eat('/') => {
                self.eat_while(|c| !is_line_terminator(c));
                TokKind::Comment
            }
            '/' if self.eat('*') => self.block_comment(),
            '(' => TokKind::LParen,
            ')' => TokKind::RParen,
            '{' => TokKind::LBrace,
            '}' => TokKind::RBrace,
            ',' => TokKind::Comma,
            ':' => TokKind::Colon,
            ';' => TokKind::Semicolon,
            '.' => TokKind::Dot,
            '+' => TokKind::Plus,
            '-' => TokKind::Minus,
            '*' => TokKind::Star,
            '/' => TokKind::Slash,
            '%' => TokKind::Percent,
            '=' if self.eat('=') => TokKind::EqEq,
            '=' => TokKind::Eq,
            '!' if self.eat('=') => TokKind::BangEq,
            '!' => TokKind::Bang,
            '<' if self.eat('=') => TokKind::Le,
            '<' => TokKind::Lt,
            '>' if self.eat('=') => TokKind::Ge,
            '>' => TokKind::Gt,
            '&' if self.eat('&') => TokKind::AndAnd,
            '|' if self.eat('|') => TokKind::OrOr,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(start),
            c if c.is_ascii_alphabetic() => {
                self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let word = &self.src[start..self.pos];
                TokKind::keyword(word).unwrap_or_else(|| TokKind::Ident(word.to_string()))
            }
            other => TokKind::Invalid(LexError::UnexpectedChar(other)),
        }
    }

    /// Non-nesting; the opening `/*` is already consumed.
    fn block_comment(&mut self) -> TokKind {
        loop {
            match self.bump() {
                None => return TokKind::Invalid(LexError::UnterminatedBlockComment),
                Some('*') if self.eat('/') => return TokKind::Comment,
                Some(_) => {}
            }
        }
    }

    fn string(&mut self) -> TokKind {
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return TokKind::Invalid(LexError::UnterminatedString),
                Some('"') => return TokKind::Str(s),
                Some('\\') => {
                    let Some(esc) = self.bump() else {
                        return TokKind::Invalid(LexError::UnterminatedString);
                    };
                    s.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                }
                Some(ch) => s.push(ch),
            }
        }
    }

    /// `[0-9]+` or `[0-9]+.[0-9]+`; `1.` and `1.x` leave the dot for the parser.
    fn number(&mut self, start: usize) -> TokKind {
        self.eat_while(|c| c.is_ascii_digit());
        let is_float = self.peek() == Some('.') && matches!(self.peek2(), Some(c) if c.is_ascii_digit());
        if is_float {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        let text = &self.src[start..self.pos];
        if is_float {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => TokKind::Float(v),
                _ => TokKind::Invalid(LexError::NumberOutOfRange),
            }
        } else {
            match text.parse::<u64>() {
                Ok(v) => TokKind::Int(v),
                Err(_) => TokKind::Invalid(LexError::NumberOutOfRange),
            }
        }
    }
}

/// Unicode `White_Space` plus BOM, word joiner and zero-width space.
fn is_space(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\u{FEFF}' | '\u{2060}' | '\u{200B}')
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
