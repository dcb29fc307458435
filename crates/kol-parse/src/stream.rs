use crate::token::{Tok, TokKind};

/// Cursor over significant tokens. Extras are dropped up front; every
/// kept token still carries its original span, line and column.
pub struct TokenStream {
    toks: Vec<Tok>,
    pos: usize,
    /// One entry per `{` consumed and not yet closed; `true` when the
    /// brace opened a field list rather than a block
    open: Vec<bool>,
    prev_end: u32,
}

impl TokenStream {
    /// `all` must end with `Eof`, as [`tokenize`](crate::tokenize) output does.
    pub fn new(all: Vec<Tok>) -> Self {
        Self {
            toks: all.into_iter().filter(|t| !t.kind.is_extra()).collect(),
            pos: 0,
            open: Vec::new(),
            prev_end: 0,
        }
    }

    pub fn peek(&self) -> &Tok {
        &self.toks[self.pos]
    }

    /// `peek_nth(0) == peek()`; saturates at `Eof`.
    pub fn peek_nth(&self, n: usize) -> &Tok {
        let last = self.toks.len() - 1;
        &self.toks[(self.pos + n).min(last)]
    }

    /// Consume the current token. At `Eof` the cursor stays put.
    pub fn bump(&mut self) -> Tok {
        let tok = self.toks[self.pos].clone();
        match tok.kind {
            TokKind::Eof => return tok,
            TokKind::LBrace => self.open.push(false),
            TokKind::RBrace => {
                self.open.pop();
            }
            _ => {}
        }
        self.prev_end = tok.span.end;
        self.pos += 1;
        tok
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn brace_depth(&self) -> u32 {
        self.open.len() as u32
    }

    /// Tag the innermost open brace as a field list.
    pub fn mark_list(&mut self) {
        if let Some(top) = self.open.last_mut() {
            *top = true;
        }
    }

    /// Whether the innermost open brace belongs to a field list.
    pub fn in_list(&self) -> bool {
        self.open.last() == Some(&true)
    }

    /// End offset of the last consumed token.
    pub fn prev_end(&self) -> u32 {
        self.prev_end
    }

    /// Significant tokens, `Eof` excluded.
    pub fn len(&self) -> usize {
        self.toks.len() - 1
    }
}
