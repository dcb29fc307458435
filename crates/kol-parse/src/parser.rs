use std::collections::HashSet;

use crate::diag::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::lexer::tokenize;
use crate::limits::ParseLimits;
use crate::stream::TokenStream;
use crate::token::{Tok, TokKind};
use kol_ast::ast::{
    Block, Definition, FieldDecl, FunctionDef, Ident, Param, SourceFile, Stmt, StructDef, Type,
    TypeKind,
};
use kol_ast::span::Span;
use log::debug;

pub(crate) type PResult<T> = Result<T, Diagnostic>;

/// Parse one complete buffer with default limits.
pub fn parse_str(src: &str) -> Result<SourceFile, Diagnostics> {
    parse_with(src, &ParseLimits::default()).into_result()
}

/// Recovering parse: always yields a best-effort tree alongside every
/// diagnostic collected in the single pass.
pub fn parse_with(src: &str, limits: &ParseLimits) -> ParseOutput {
    if src.len() > limits.max_input_size {
        return ParseOutput::rejected(DiagnosticKind::TooLarge {
            what: "input size in bytes",
            limit: limits.max_input_size,
        });
    }
    let ts = TokenStream::new(tokenize(src));
    if ts.len() > limits.max_token_count {
        return ParseOutput::rejected(DiagnosticKind::TooLarge {
            what: "token count",
            limit: limits.max_token_count,
        });
    }

    let mut p = Parser::new(ts, limits.clone());
    let file = p.parse_source_file();
    debug!(
        "parsed {} top-level definitions, {} diagnostics",
        file.definitions.len(),
        p.diags.len()
    );
    ParseOutput {
        file,
        diagnostics: p.diags,
    }
}

#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub file: SourceFile,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    fn rejected(kind: DiagnosticKind) -> Self {
        ParseOutput {
            file: SourceFile {
                definitions: Vec::new(),
                span: Span::default(),
            },
            diagnostics: vec![Diagnostic {
                kind,
                span: Span::default(),
                line: 1,
                column: 1,
            }],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_result(self) -> Result<SourceFile, Diagnostics> {
        if self.diagnostics.is_empty() {
            Ok(self.file)
        } else {
            Err(Diagnostics(self.diagnostics))
        }
    }
}

pub(crate) struct Parser {
    pub(crate) ts: TokenStream,
    diags: Vec<Diagnostic>,
    /// Stream positions of `Invalid` tokens already reported
    reported: HashSet<usize>,
    limits: ParseLimits,
    depth: usize,
}

impl Parser {
    fn new(ts: TokenStream, limits: ParseLimits) -> Self {
        Self {
            ts,
            diags: Vec::new(),
            reported: HashSet::new(),
            limits,
            depth: 0,
        }
    }

    // ======= token helpers =======

    pub(crate) fn cur(&self) -> &Tok {
        self.ts.peek()
    }

    pub(crate) fn bump(&mut self) -> Tok {
        self.ts.bump()
    }

    pub(crate) fn at(&self, k: &TokKind) -> bool {
        std::mem::discriminant(&self.cur().kind) == std::mem::discriminant(k)
    }

    pub(crate) fn eat(&mut self, k: &TokKind) -> bool {
        if self.at(k) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, k: TokKind) -> PResult<Tok> {
        if self.at(&k) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(vec![k.describe()]))
        }
    }

    /// Diagnostic for the current token. An `Invalid` token reports its own
    /// lexical error instead of a syntax error.
    pub(crate) fn unexpected(&mut self, expected: Vec<String>) -> Diagnostic {
        let tok = self.cur().clone();
        let kind = match &tok.kind {
            TokKind::Invalid(e) => {
                self.reported.insert(self.ts.position());
                DiagnosticKind::Lexical(e.clone())
            }
            other => DiagnosticKind::Syntax {
                expected,
                found: other.describe(),
            },
        };
        diag_at(&tok, kind)
    }

    /// Run `f` one nesting level deeper, failing once the limit is reached.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.limits.max_depth {
            let limit = self.limits.max_depth;
            return Err(diag_at(self.cur(), DiagnosticKind::TooDeep { limit }));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.ts.prev_end())
    }

    // ======= recovery =======

    fn report(&mut self, d: Diagnostic) {
        // nested constructs running into the same end of input fail alike
        if self.diags.last() == Some(&d) {
            return;
        }
        debug!("recovering after: {}", d);
        self.diags.push(d);
    }

    fn skip_token(&mut self) {
        if let TokKind::Invalid(e) = self.cur().kind.clone() {
            let pos = self.ts.position();
            if self.reported.insert(pos) {
                let d = diag_at(self.cur(), DiagnosticKind::Lexical(e));
                self.report(d);
            }
        }
        self.bump();
    }

    /// Skip to the next definition boundary at brace depth `floor`: a
    /// `fun`/`struct`/`let`/`return`/`break` keyword, just past a `;`, or
    /// before the `}` closing the enclosing block. Braces opened while
    /// skipping are skipped through their matching `}`. A field list left
    /// open by the failed construct does not hide the keyword boundaries.
    fn synchronize(&mut self, floor: u32) {
        loop {
            let shallow = self.ts.brace_depth() <= floor;
            let in_list = !shallow && self.ts.in_list();
            match self.cur().kind {
                TokKind::Eof => break,
                TokKind::KwFun
                | TokKind::KwStruct
                | TokKind::KwLet
                | TokKind::KwReturn
                | TokKind::KwBreak
                    if shallow || in_list =>
                {
                    break
                }
                TokKind::RBrace if shallow => break,
                TokKind::Semicolon if shallow => {
                    self.bump();
                    break;
                }
                _ => self.skip_token(),
            }
        }
        let at = self.cur();
        debug!("resynchronized at {}:{} before {}", at.line, at.column, at.kind.describe());
    }

    // ======= source file / definitions =======

    fn parse_source_file(&mut self) -> SourceFile {
        let definitions = self.parse_definitions(false);
        SourceFile {
            definitions,
            span: Span::new(0, self.cur().span.end),
        }
    }

    /// Definitions up to end of input, or up to the closing `}` when
    /// `in_block`. Failed definitions are reported and skipped.
    fn parse_definitions(&mut self, in_block: bool) -> Vec<Definition> {
        let floor = self.ts.brace_depth();
        let mut defs = Vec::new();
        loop {
            match self.cur().kind {
                TokKind::Eof => break,
                TokKind::RBrace if in_block => break,
                _ => {}
            }
            let before = self.ts.position();
            match self.parse_definition() {
                Ok(def) => defs.push(def),
                Err(d) => {
                    self.report(d);
                    self.synchronize(floor);
                    if self.ts.position() == before {
                        self.skip_token();
                    }
                }
            }
        }
        defs
    }

    pub(crate) fn parse_definition(&mut self) -> PResult<Definition> {
        match self.cur().kind {
            TokKind::KwFun => Ok(Definition::Function(self.parse_function()?)),
            TokKind::KwStruct => Ok(Definition::Struct(self.parse_struct()?)),
            TokKind::KwReturn | TokKind::KwBreak => Ok(Definition::Stmt(self.parse_jump()?)),
            TokKind::KwLet => Ok(Definition::Stmt(self.parse_let()?)),
            TokKind::Ident(_) if self.ts.peek_nth(1).kind == TokKind::Eq => {
                Ok(Definition::Stmt(self.parse_reassign()?))
            }
            _ if can_start_expr(&self.cur().kind) => {
                let expr = self.parse_expr(true)?;
                self.eat(&TokKind::Semicolon);
                Ok(Definition::Expr(expr))
            }
            _ => Err(self.unexpected(vec![
                "`fun`".into(),
                "`struct`".into(),
                "`let`".into(),
                "`return`".into(),
                "`break`".into(),
                "expression".into(),
            ])),
        }
    }

    pub(crate) fn parse_ident(&mut self) -> PResult<Ident> {
        match &self.cur().kind {
            TokKind::Ident(s) => {
                let id = Ident {
                    text: s.clone(),
                    span: self.cur().span,
                };
                self.bump();
                Ok(id)
            }
            _ => Err(self.unexpected(vec!["identifier".into()])),
        }
    }

    /// `item (, item)* ,?` up to and including `close`; may be empty.
    pub(crate) fn comma_list<T>(
        &mut self,
        close: TokKind,
        mut item: impl FnMut(&mut Self) -> PResult<T>,
    ) -> PResult<(Vec<T>, Tok)> {
        let mut items = Vec::new();
        loop {
            if self.at(&close) {
                return Ok((items, self.bump()));
            }
            items.push(item(self)?);
            if !self.eat(&TokKind::Comma) {
                if self.at(&close) {
                    return Ok((items, self.bump()));
                }
                return Err(self.unexpected(vec!["`,`".into(), close.describe()]));
            }
        }
    }

    // ======= functions / structs / types =======

    fn parse_function(&mut self) -> PResult<FunctionDef> {
        let start = self.expect(TokKind::KwFun)?.span.start;
        let name = self.parse_ident()?;

        self.expect(TokKind::LParen)?;
        let (params, _) = self.comma_list(TokKind::RParen, Self::parse_param)?;

        let ret_ty = if type_kind(&self.cur().kind).is_some() {
            Some(self.parse_type()?)
        } else if self.at(&TokKind::LBrace) {
            None
        } else {
            return Err(self.unexpected(vec!["type".into(), "`{`".into()]));
        };

        let body = self.parse_block()?;
        Ok(FunctionDef {
            name,
            params,
            ret_ty,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_param(&mut self) -> PResult<Param> {
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param {
            span: name.span.to(ty.span),
            name,
            ty,
        })
    }

    fn parse_struct(&mut self) -> PResult<StructDef> {
        let start = self.expect(TokKind::KwStruct)?.span.start;
        let name = self.parse_ident()?;
        self.expect(TokKind::LBrace)?;
        self.ts.mark_list();
        let (fields, close) = self.comma_list(TokKind::RBrace, Self::parse_field_decl)?;
        Ok(StructDef {
            name,
            fields,
            span: Span::new(start, close.span.end),
        })
    }

    fn parse_field_decl(&mut self) -> PResult<FieldDecl> {
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let ty = self.parse_type()?;
        Ok(FieldDecl {
            span: name.span.to(ty.span),
            name,
            ty,
        })
    }

    fn parse_type(&mut self) -> PResult<Type> {
        match type_kind(&self.cur().kind) {
            Some(kind) => {
                let span = self.bump().span;
                Ok(Type { kind, span })
            }
            None => Err(self.unexpected(vec!["type".into()])),
        }
    }

    // ======= blocks and statements =======

    /// Parse a block: `{ definition* }`
    pub(crate) fn parse_block(&mut self) -> PResult<Block> {
        self.nested(|p| {
            let start = p.expect(TokKind::LBrace)?.span.start;
            let definitions = p.parse_definitions(true);
            let end = p.expect(TokKind::RBrace)?.span.end;
            Ok(Block {
                definitions,
                span: Span::new(start, end),
            })
        })
    }

    /// `return expr ;?` and `break expr ;?`
    fn parse_jump(&mut self) -> PResult<Stmt> {
        let kw = self.bump();
        let value = self.parse_expr(true)?;
        self.eat(&TokKind::Semicolon);
        let span = self.span_from(kw.span.start);
        Ok(match kw.kind {
            TokKind::KwBreak => Stmt::Break { value, span },
            _ => Stmt::Return { value, span },
        })
    }

    /// `let mut? name = expr ;?`
    fn parse_let(&mut self) -> PResult<Stmt> {
        let start = self.expect(TokKind::KwLet)?.span.start;
        let mutable = self.eat(&TokKind::KwMut);
        let name = self.parse_ident()?;
        self.expect(TokKind::Eq)?;
        let value = self.parse_expr(true)?;
        self.eat(&TokKind::Semicolon);
        Ok(Stmt::Let {
            mutable,
            name,
            value,
            span: self.span_from(start),
        })
    }

    /// `name = expr ;?`
    fn parse_reassign(&mut self) -> PResult<Stmt> {
        let name = self.parse_ident()?;
        self.expect(TokKind::Eq)?;
        let value = self.parse_expr(true)?;
        self.eat(&TokKind::Semicolon);
        Ok(Stmt::Reassign {
            span: self.span_from(name.span.start),
            name,
            value,
        })
    }
}

pub(crate) fn diag_at(tok: &Tok, kind: DiagnosticKind) -> Diagnostic {
    Diagnostic {
        kind,
        span: tok.span,
        line: tok.line,
        column: tok.column,
    }
}

fn type_kind(k: &TokKind) -> Option<TypeKind> {
    let kind = match k {
        TokKind::KwBool => TypeKind::Bool,
        TokKind::KwInt => TypeKind::Int,
        TokKind::KwFloat => TypeKind::Float,
        TokKind::KwStr => TypeKind::Str,
        TokKind::KwVoid => TypeKind::Void,
        TokKind::KwArray => TypeKind::Array,
        TokKind::KwMap => TypeKind::Map,
        TokKind::KwFn => TypeKind::Fn,
        _ => return None,
    };
    Some(kind)
}

fn can_start_expr(k: &TokKind) -> bool {
    matches!(
        k,
        TokKind::Ident(_)
            | TokKind::Int(_)
            | TokKind::Float(_)
            | TokKind::Str(_)
            | TokKind::KwTrue
            | TokKind::KwFalse
            | TokKind::KwIf
            | TokKind::KwFor
            | TokKind::Minus
            | TokKind::Bang
    )
}
