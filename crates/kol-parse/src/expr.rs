// Expression parsing (Pratt / precedence climbing).
//
// Binary tiers, low -> high, all left-associative:
//   0: == != && ||   (one shared tier, unlike most C-like languages)
//   1: < > <= >=
//   2: + -
//   3: * / %
// Above those: prefix - and !, whose operand is a postfix chain, then the
// postfix forms themselves: `.member`, `(args)` and `Name { fields }`.
//
// `struct_ok` is false only while parsing the condition of `if`/`for`, so
// that `if x { ... }` reads `{` as the start of the block. Delimited
// subexpressions (call arguments, struct field values, blocks) turn it
// back on.

use crate::parser::{PResult, Parser};
use crate::token::TokKind;
use kol_ast::ast::{BinOp, Block, Expr, FieldInit, Ident, Lit, UnOp};
use kol_ast::span::Span;

impl Parser {
    pub(crate) fn parse_expr(&mut self, struct_ok: bool) -> PResult<Expr> {
        self.parse_expr_bp(0, struct_ok)
    }

    fn parse_expr_bp(&mut self, min_bp: u8, struct_ok: bool) -> PResult<Expr> {
        self.nested(|p| {
            let mut lhs = p.parse_unary(struct_ok)?;

            loop {
                let Some(op) = binary_op(&p.cur().kind) else {
                    break;
                };
                let (lbp, rbp) = binding_power(op);
                if lbp < min_bp {
                    break;
                }
                p.bump(); // consume operator
                let rhs = p.parse_expr_bp(rbp, struct_ok)?;
                let span = lhs.span().to(rhs.span());
                lhs = Expr::Binary {
                    lhs: Box::new(lhs),
                    op,
                    rhs: Box::new(rhs),
                    span,
                };
            }

            Ok(lhs)
        })
    }

    fn parse_unary(&mut self, struct_ok: bool) -> PResult<Expr> {
        let op = match self.cur().kind {
            TokKind::Minus => UnOp::Neg,
            TokKind::Bang => UnOp::Not,
            _ => return self.parse_postfix(struct_ok),
        };
        let start = self.bump().span.start;
        let inner = self.nested(|p| p.parse_unary(struct_ok))?;
        Ok(Expr::Unary {
            op,
            span: Span::new(start, inner.span().end),
            expr: Box::new(inner),
        })
    }

    /// A primary followed by any run of `.name`, `(args)` and, directly
    /// after a bare identifier, `{ field: value, ... }`.
    fn parse_postfix(&mut self, struct_ok: bool) -> PResult<Expr> {
        let mut lhs = self.parse_primary()?;
        loop {
            match self.cur().kind {
                TokKind::Dot => {
                    self.bump();
                    let property = self.parse_ident()?;
                    lhs = Expr::Dot {
                        span: lhs.span().to(property.span),
                        object: Box::new(lhs),
                        property,
                    };
                }
                TokKind::LParen => {
                    self.bump();
                    let (args, close) = self.nested(|p| {
                        p.comma_list(TokKind::RParen, |p| p.parse_expr(true))
                    })?;
                    lhs = Expr::Call {
                        span: lhs.span().to(close.span),
                        callee: Box::new(lhs),
                        args,
                    };
                }
                TokKind::LBrace if struct_ok => match lhs {
                    Expr::Ident(ty) => lhs = self.parse_struct_init(ty)?,
                    other => {
                        lhs = other;
                        break;
                    }
                },
                _ => break,
            }
        }
        Ok(lhs)
    }

    fn parse_struct_init(&mut self, ty: Ident) -> PResult<Expr> {
        self.nested(|p| {
            p.expect(TokKind::LBrace)?;
            p.ts.mark_list();
            let (fields, close) = p.comma_list(TokKind::RBrace, Self::parse_field_init)?;
            Ok(Expr::StructInit {
                span: ty.span.to(close.span),
                ty,
                fields,
            })
        })
    }

    fn parse_field_init(&mut self) -> PResult<FieldInit> {
        let name = self.parse_ident()?;
        self.expect(TokKind::Colon)?;
        let value = self.parse_expr(true)?;
        Ok(FieldInit {
            span: name.span.to(value.span()),
            name,
            value,
        })
    }

    fn parse_primary(&mut self) -> PResult<Expr> {
        // Snapshot current token to avoid borrow issues when bumping
        let tok = self.cur().clone();

        match tok.kind {
            TokKind::Int(v) => {
                self.bump();
                Ok(Expr::Lit(Lit::Int(v), tok.span))
            }
            TokKind::Float(v) => {
                self.bump();
                Ok(Expr::Lit(Lit::Float(v), tok.span))
            }
            TokKind::Str(s) => {
                self.bump();
                Ok(Expr::Lit(Lit::Str(s), tok.span))
            }
            TokKind::KwTrue => {
                self.bump();
                Ok(Expr::Lit(Lit::Bool(true), tok.span))
            }
            TokKind::KwFalse => {
                self.bump();
                Ok(Expr::Lit(Lit::Bool(false), tok.span))
            }
            TokKind::Ident(_) => Ok(Expr::Ident(self.parse_ident()?)),
            TokKind::KwIf => {
                let (cond, then_, else_) = self.parse_conditional()?;
                Ok(Expr::If {
                    span: Span::new(tok.span.start, self.ts.prev_end()),
                    cond,
                    then_,
                    else_,
                })
            }
            TokKind::KwFor => {
                let (cond, body, else_) = self.parse_conditional()?;
                Ok(Expr::For {
                    span: Span::new(tok.span.start, self.ts.prev_end()),
                    cond,
                    body,
                    else_,
                })
            }
            _ => Err(self.unexpected(vec!["expression".into()])),
        }
    }

    /// Shared tail of `if` and `for`: `cond block (else block)?`, with the
    /// keyword still current.
    fn parse_conditional(&mut self) -> PResult<(Box<Expr>, Block, Option<Block>)> {
        self.nested(|p| {
            p.bump(); // `if` / `for`
            let cond = p.parse_expr(false)?;
            let body = p.parse_block()?;
            let else_ = if p.eat(&TokKind::KwElse) {
                Some(p.parse_block()?)
            } else {
                None
            };
            Ok((Box::new(cond), body, else_))
        })
    }
}

fn binary_op(k: &TokKind) -> Option<BinOp> {
    let op = match k {
        TokKind::EqEq => BinOp::Eq,
        TokKind::BangEq => BinOp::Ne,
        TokKind::AndAnd => BinOp::And,
        TokKind::OrOr => BinOp::Or,
        TokKind::Lt => BinOp::Lt,
        TokKind::Le => BinOp::Le,
        TokKind::Gt => BinOp::Gt,
        TokKind::Ge => BinOp::Ge,
        TokKind::Plus => BinOp::Add,
        TokKind::Minus => BinOp::Sub,
        TokKind::Star => BinOp::Mul,
        TokKind::Slash => BinOp::Div,
        TokKind::Percent => BinOp::Rem,
        _ => return None,
    };
    Some(op)
}

/// `(lbp, rbp)` with `rbp = lbp + 1`, which makes every tier left-associative.
fn binding_power(op: BinOp) -> (u8, u8) {
    let lbp = op.level() * 2 + 1;
    (lbp, lbp + 1)
}
