//! Canonical re-serialization and the span-free s-expression dump.
//!
//! `to_source` does not preserve formatting, only structure: reparsing its
//! output yields the same tree. The grammar has no grouping token, so the
//! printer never inserts any and relies on the tree already respecting
//! precedence and left-associativity.

use crate::ast::{
    Block, Definition, Expr, FieldDecl, FunctionDef, Lit, Param, SourceFile, Stmt, StructDef,
    UnOp,
};

const INDENT: &str = "    ";

pub fn to_source(file: &SourceFile) -> String {
    let mut p = SourcePrinter::default();
    for def in &file.definitions {
        p.definition(def);
        p.out.push('\n');
    }
    p.out
}

/// Source text for a single expression.
pub fn expr_to_source(e: &Expr) -> String {
    let mut p = SourcePrinter::default();
    p.expr(e);
    p.out
}

#[derive(Default)]
struct SourcePrinter {
    out: String,
    depth: usize,
}

impl SourcePrinter {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn definition(&mut self, def: &Definition) {
        self.indent();
        match def {
            Definition::Function(f) => self.function(f),
            Definition::Struct(s) => self.structure(s),
            Definition::Stmt(s) => {
                self.stmt(s);
                self.out.push(';');
            }
            // `;` keeps `a` and a following `-b` from merging on reparse
            Definition::Expr(e) => {
                self.expr(e);
                self.out.push(';');
            }
        }
    }

    fn function(&mut self, f: &FunctionDef) {
        self.out.push_str("fun ");
        self.out.push_str(&f.name.text);
        self.out.push('(');
        for (i, Param { name, ty, .. }) in f.params.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&name.text);
            self.out.push_str(": ");
            self.out.push_str(ty.kind.keyword());
        }
        self.out.push_str(") ");
        if let Some(ty) = &f.ret_ty {
            self.out.push_str(ty.kind.keyword());
            self.out.push(' ');
        }
        self.block(&f.body);
    }

    fn structure(&mut self, s: &StructDef) {
        self.out.push_str("struct ");
        self.out.push_str(&s.name.text);
        if s.fields.is_empty() {
            self.out.push_str(" {}");
            return;
        }
        self.out.push_str(" {\n");
        self.depth += 1;
        for FieldDecl { name, ty, .. } in &s.fields {
            self.indent();
            self.out.push_str(&name.text);
            self.out.push_str(": ");
            self.out.push_str(ty.kind.keyword());
            self.out.push_str(",\n");
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn block(&mut self, b: &Block) {
        if b.definitions.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.depth += 1;
        for def in &b.definitions {
            self.definition(def);
            self.out.push('\n');
        }
        self.depth -= 1;
        self.indent();
        self.out.push('}');
    }

    fn stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Return { value, .. } => {
                self.out.push_str("return ");
                self.expr(value);
            }
            Stmt::Break { value, .. } => {
                self.out.push_str("break ");
                self.expr(value);
            }
            Stmt::Let {
                mutable,
                name,
                value,
                ..
            } => {
                self.out.push_str(if *mutable { "let mut " } else { "let " });
                self.out.push_str(&name.text);
                self.out.push_str(" = ");
                self.expr(value);
            }
            Stmt::Reassign { name, value, .. } => {
                self.out.push_str(&name.text);
                self.out.push_str(" = ");
                self.expr(value);
            }
        }
    }

    fn expr(&mut self, e: &Expr) {
        match e {
            Expr::Ident(id) => self.out.push_str(&id.text),
            Expr::Lit(lit, _) => self.lit(lit),
            Expr::Unary { op, expr, .. } => {
                self.out.push_str(op.symbol());
                self.expr(expr);
            }
            Expr::Binary { lhs, op, rhs, .. } => {
                self.expr(lhs);
                self.out.push(' ');
                self.out.push_str(op.symbol());
                self.out.push(' ');
                self.expr(rhs);
            }
            Expr::Dot {
                object, property, ..
            } => {
                self.expr(object);
                self.out.push('.');
                self.out.push_str(&property.text);
            }
            Expr::Call { callee, args, .. } => {
                self.expr(callee);
                self.out.push('(');
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(a);
                }
                self.out.push(')');
            }
            Expr::If {
                cond, then_, else_, ..
            } => self.conditional("if ", cond, then_, else_.as_ref()),
            Expr::For {
                cond, body, else_, ..
            } => self.conditional("for ", cond, body, else_.as_ref()),
            Expr::StructInit { ty, fields, .. } => {
                self.out.push_str(&ty.text);
                if fields.is_empty() {
                    self.out.push_str(" {}");
                    return;
                }
                self.out.push_str(" { ");
                for (i, f) in fields.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&f.name.text);
                    self.out.push_str(": ");
                    self.expr(&f.value);
                }
                self.out.push_str(" }");
            }
        }
    }

    fn conditional(&mut self, kw: &str, cond: &Expr, body: &Block, else_: Option<&Block>) {
        self.out.push_str(kw);
        self.expr(cond);
        self.out.push(' ');
        self.block(body);
        if let Some(alt) = else_ {
            self.out.push_str(" else ");
            self.block(alt);
        }
    }

    fn lit(&mut self, lit: &Lit) {
        match lit {
            Lit::Int(v) => self.out.push_str(&v.to_string()),
            Lit::Float(v) => self.out.push_str(&float_text(*v)),
            Lit::Str(s) => {
                self.out.push('"');
                self.out.push_str(&escape(s));
                self.out.push('"');
            }
            Lit::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
        }
    }
}

/// `f64` text that still lexes as `digits.digits`.
fn float_text(v: f64) -> String {
    let s = v.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(c),
        }
    }
    out
}

// ======= s-expression dump =======

/// Structural dump without spans, one top-level definition per line.
pub fn to_sexpr(file: &SourceFile) -> String {
    let mut out = String::from("(source_file");
    for def in &file.definitions {
        out.push_str("\n  ");
        sexpr_definition(&mut out, def);
    }
    out.push(')');
    out
}

pub fn expr_to_sexpr(e: &Expr) -> String {
    let mut out = String::new();
    sexpr_expr(&mut out, e);
    out
}

fn sexpr_definition(out: &mut String, def: &Definition) {
    match def {
        Definition::Function(f) => {
            out.push_str("(fun ");
            out.push_str(&f.name.text);
            out.push_str(" (params");
            for p in &f.params {
                out.push_str(&format!(" ({} {})", p.name.text, p.ty.kind.keyword()));
            }
            out.push(')');
            if let Some(ty) = &f.ret_ty {
                out.push(' ');
                out.push_str(ty.kind.keyword());
            }
            out.push(' ');
            sexpr_block(out, &f.body);
            out.push(')');
        }
        Definition::Struct(s) => {
            out.push_str("(struct ");
            out.push_str(&s.name.text);
            out.push_str(" (fields");
            for fd in &s.fields {
                out.push_str(&format!(" ({} {})", fd.name.text, fd.ty.kind.keyword()));
            }
            out.push_str("))");
        }
        Definition::Stmt(s) => sexpr_stmt(out, s),
        Definition::Expr(e) => sexpr_expr(out, e),
    }
}

fn sexpr_block(out: &mut String, b: &Block) {
    out.push_str("(block");
    for def in &b.definitions {
        out.push(' ');
        sexpr_definition(out, def);
    }
    out.push(')');
}

fn sexpr_stmt(out: &mut String, s: &Stmt) {
    let (head, value) = match s {
        Stmt::Return { value, .. } => ("return".to_string(), value),
        Stmt::Break { value, .. } => ("break".to_string(), value),
        Stmt::Let {
            mutable,
            name,
            value,
            ..
        } => {
            let head = if *mutable {
                format!("let mut {}", name.text)
            } else {
                format!("let {}", name.text)
            };
            (head, value)
        }
        Stmt::Reassign { name, value, .. } => (format!("set {}", name.text), value),
    };
    out.push('(');
    out.push_str(&head);
    out.push(' ');
    sexpr_expr(out, value);
    out.push(')');
}

fn sexpr_expr(out: &mut String, e: &Expr) {
    match e {
        Expr::Ident(id) => {
            out.push_str("(ident ");
            out.push_str(&id.text);
            out.push(')');
        }
        Expr::Lit(Lit::Int(v), _) => out.push_str(&format!("(int {v})")),
        Expr::Lit(Lit::Float(v), _) => out.push_str(&format!("(float {})", float_text(*v))),
        Expr::Lit(Lit::Str(s), _) => out.push_str(&format!("(str {s:?})")),
        Expr::Lit(Lit::Bool(b), _) => out.push_str(&format!("(bool {b})")),
        Expr::Unary { op, expr, .. } => {
            out.push_str(match op {
                UnOp::Neg => "(neg ",
                UnOp::Not => "(not ",
            });
            sexpr_expr(out, expr);
            out.push(')');
        }
        Expr::Binary { lhs, op, rhs, .. } => {
            out.push('(');
            out.push_str(op.symbol());
            out.push(' ');
            sexpr_expr(out, lhs);
            out.push(' ');
            sexpr_expr(out, rhs);
            out.push(')');
        }
        Expr::Dot {
            object, property, ..
        } => {
            out.push_str("(. ");
            sexpr_expr(out, object);
            out.push(' ');
            out.push_str(&property.text);
            out.push(')');
        }
        Expr::Call { callee, args, .. } => {
            out.push_str("(call ");
            sexpr_expr(out, callee);
            for a in args {
                out.push(' ');
                sexpr_expr(out, a);
            }
            out.push(')');
        }
        Expr::If {
            cond, then_, else_, ..
        } => sexpr_conditional(out, "if", cond, then_, else_.as_ref()),
        Expr::For {
            cond, body, else_, ..
        } => sexpr_conditional(out, "for", cond, body, else_.as_ref()),
        Expr::StructInit { ty, fields, .. } => {
            out.push_str("(struct_init ");
            out.push_str(&ty.text);
            for f in fields {
                out.push_str(&format!(" ({} ", f.name.text));
                sexpr_expr(out, &f.value);
                out.push(')');
            }
            out.push(')');
        }
    }
}

fn sexpr_conditional(out: &mut String, head: &str, cond: &Expr, body: &Block, else_: Option<&Block>) {
    out.push('(');
    out.push_str(head);
    out.push(' ');
    sexpr_expr(out, cond);
    out.push(' ');
    sexpr_block(out, body);
    if let Some(alt) = else_ {
        out.push(' ');
        sexpr_block(out, alt);
    }
    out.push(')');
}
