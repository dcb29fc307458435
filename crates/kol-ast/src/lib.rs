pub mod print;

pub mod span {
    use serde::Serialize;

    /// Half-open byte range `[start, end)` into the source buffer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
    pub struct Span {
        pub start: u32,
        pub end: u32,
    }

    impl Span {
        pub fn new(start: u32, end: u32) -> Self {
            Self { start, end }
        }

        /// Span covering `self` through `other`.
        pub fn to(self, other: Span) -> Span {
            Span {
                start: self.start,
                end: other.end,
            }
        }
    }
}

pub mod ast {
    use super::span::Span;
    use serde::Serialize;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct SourceFile {
        pub definitions: Vec<Definition>,
        pub span: Span,
    }

    /// Anything that may appear at top level or inside a block.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Definition {
        Function(FunctionDef),
        Struct(StructDef),
        Stmt(Stmt),
        Expr(Expr),
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FunctionDef {
        pub name: Ident,
        pub params: Vec<Param>,
        pub ret_ty: Option<Type>,
        pub body: Block,
        pub span: Span,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Param {
        pub name: Ident,
        pub ty: Type,
        pub span: Span,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct StructDef {
        pub name: Ident,
        pub fields: Vec<FieldDecl>,
        pub span: Span,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FieldDecl {
        pub name: Ident,
        pub ty: Type,
        pub span: Span,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct Type {
        pub kind: TypeKind,
        pub span: Span,
    }

    /// The closed set of type names; types take no parameters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub enum TypeKind {
        Bool,
        Int,
        Float,
        Str,
        Void,
        Array,
        Map,
        Fn,
    }

    impl TypeKind {
        pub fn keyword(self) -> &'static str {
            match self {
                TypeKind::Bool => "bool",
                TypeKind::Int => "int",
                TypeKind::Float => "float",
                TypeKind::Str => "str",
                TypeKind::Void => "void",
                TypeKind::Array => "array",
                TypeKind::Map => "map",
                TypeKind::Fn => "fn",
            }
        }
    }

    /// `{ definition* }`. There is no trailing value slot: a block only
    /// produces a value through `return` or `break`.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Block {
        pub definitions: Vec<Definition>,
        pub span: Span,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Stmt {
        Return {
            value: Expr,
            span: Span,
        },
        Break {
            value: Expr,
            span: Span,
        },
        Let {
            mutable: bool,
            name: Ident,
            value: Expr,
            span: Span,
        },
        Reassign {
            name: Ident,
            value: Expr,
            span: Span,
        },
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Ident {
        pub text: String,
        pub span: Span,
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Expr {
        Ident(Ident),
        Lit(Lit, Span),
        Unary {
            op: UnOp,
            expr: Box<Expr>,
            span: Span,
        },
        Binary {
            lhs: Box<Expr>,
            op: BinOp,
            rhs: Box<Expr>,
            span: Span,
        },
        Dot {
            object: Box<Expr>,
            property: Ident,
            span: Span,
        },
        Call {
            callee: Box<Expr>,
            args: Vec<Expr>,
            span: Span,
        },
        If {
            cond: Box<Expr>,
            then_: Block,
            else_: Option<Block>,
            span: Span,
        },
        For {
            cond: Box<Expr>,
            body: Block,
            else_: Option<Block>,
            span: Span,
        },
        StructInit {
            ty: Ident,
            fields: Vec<FieldInit>,
            span: Span,
        },
    }

    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FieldInit {
        pub name: Ident,
        pub value: Expr,
        pub span: Span,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum UnOp {
        Neg,
        Not,
    }

    /// String payloads hold the decoded text (escapes already resolved).
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub enum Lit {
        Int(u64),
        Float(f64),
        Str(String),
        Bool(bool),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
    pub enum BinOp {
        // level 0: equality and logical share one tier
        Eq,
        Ne,
        And,
        Or,
        // level 1
        Lt,
        Le,
        Gt,
        Ge,
        // level 2
        Add,
        Sub,
        // level 3
        Mul,
        Div,
        Rem,
    }

    impl BinOp {
        /// Binding tier, 0 (loosest) to 3 (tightest). Every tier is
        /// left-associative.
        pub fn level(self) -> u8 {
            match self {
                BinOp::Eq | BinOp::Ne | BinOp::And | BinOp::Or => 0,
                BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 1,
                BinOp::Add | BinOp::Sub => 2,
                BinOp::Mul | BinOp::Div | BinOp::Rem => 3,
            }
        }

        pub fn symbol(self) -> &'static str {
            match self {
                BinOp::Eq => "==",
                BinOp::Ne => "!=",
                BinOp::And => "&&",
                BinOp::Or => "||",
                BinOp::Lt => "<",
                BinOp::Le => "<=",
                BinOp::Gt => ">",
                BinOp::Ge => ">=",
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Rem => "%",
            }
        }
    }

    impl UnOp {
        pub fn symbol(self) -> &'static str {
            match self {
                UnOp::Neg => "-",
                UnOp::Not => "!",
            }
        }
    }

    // ======= span lookup =======

    impl Expr {
        pub fn span(&self) -> Span {
            match self {
                Expr::Ident(id) => id.span,
                Expr::Lit(_, sp) => *sp,
                Expr::Unary { span, .. }
                | Expr::Binary { span, .. }
                | Expr::Dot { span, .. }
                | Expr::Call { span, .. }
                | Expr::If { span, .. }
                | Expr::For { span, .. }
                | Expr::StructInit { span, .. } => *span,
            }
        }
    }

    impl Stmt {
        pub fn span(&self) -> Span {
            match self {
                Stmt::Return { span, .. }
                | Stmt::Break { span, .. }
                | Stmt::Let { span, .. }
                | Stmt::Reassign { span, .. } => *span,
            }
        }
    }

    impl Definition {
        pub fn span(&self) -> Span {
            match self {
                Definition::Function(f) => f.span,
                Definition::Struct(s) => s.span,
                Definition::Stmt(s) => s.span(),
                Definition::Expr(e) => e.span(),
            }
        }
    }
}
