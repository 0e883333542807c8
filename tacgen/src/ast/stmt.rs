//! Statement AST nodes

use super::{Expr, Span, Spanned, SymbolId, Type};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Expression evaluated for its side effects
    Expr(Expr),

    /// Local variable declaration
    Decl(VarDecl),

    /// `{ s1; s2; ... }`
    Compound(Vec<Spanned<Stmt>>),

    /// `if (cond) then_branch else else_branch`. A missing `else` is an
    /// empty compound.
    If {
        cond: Expr,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Box<Spanned<Stmt>>,
    },

    While {
        cond: Expr,
        body: Box<Spanned<Stmt>>,
    },

    DoWhile {
        body: Box<Spanned<Stmt>>,
        cond: Expr,
    },

    For(ForStmt),

    Break,

    Continue,

    Return(Expr),
}

/// `for (init; cond; update) body`
///
/// At most one of `expr_init` and `decl_init` is set; the front end
/// guarantees it and lowering rejects nodes that break it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    #[serde(default)]
    pub expr_init: Option<Expr>,
    #[serde(default)]
    pub decl_init: Option<VarDecl>,
    #[serde(default)]
    pub cond: Option<Expr>,
    #[serde(default)]
    pub update: Option<Expr>,
    pub body: Box<Spanned<Stmt>>,
}

impl ForStmt {
    pub fn new(body: Spanned<Stmt>) -> Self {
        Self {
            expr_init: None,
            decl_init: None,
            cond: None,
            update: None,
            body: Box::new(body),
        }
    }

    pub fn with_expr_init(mut self, init: Expr) -> Self {
        self.expr_init = Some(init);
        self
    }

    pub fn with_decl_init(mut self, init: VarDecl) -> Self {
        self.decl_init = Some(init);
        self
    }

    pub fn with_cond(mut self, cond: Expr) -> Self {
        self.cond = Some(cond);
        self
    }

    pub fn with_update(mut self, update: Expr) -> Self {
        self.update = Some(update);
        self
    }
}

/// Variable declaration, also used for formal parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub sym: SymbolId,
    pub name: String,
    #[serde(default)]
    pub ty: Type,
    #[serde(default)]
    pub init: Option<Expr>,
    #[serde(default)]
    pub span: Span,
}

impl VarDecl {
    pub fn new(sym: SymbolId, name: impl Into<String>) -> Self {
        Self {
            sym,
            name: name.into(),
            ty: Type::Int,
            init: None,
            span: Span::default(),
        }
    }

    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(init);
        self
    }
}

/// Constructors returning statements without source positions
impl Stmt {
    pub fn expr(expr: Expr) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::Expr(expr))
    }

    pub fn decl(decl: VarDecl) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::Decl(decl))
    }

    pub fn block(stmts: Vec<Spanned<Stmt>>) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::Compound(stmts))
    }

    pub fn empty() -> Spanned<Stmt> {
        Self::block(Vec::new())
    }

    pub fn if_then(cond: Expr, then_branch: Spanned<Stmt>) -> Spanned<Stmt> {
        Self::if_else(cond, then_branch, Self::empty())
    }

    pub fn if_else(cond: Expr, then_branch: Spanned<Stmt>, else_branch: Spanned<Stmt>) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::If {
            cond,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    pub fn while_loop(cond: Expr, body: Spanned<Stmt>) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::While {
            cond,
            body: Box::new(body),
        })
    }

    pub fn do_while(body: Spanned<Stmt>, cond: Expr) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::DoWhile {
            body: Box::new(body),
            cond,
        })
    }

    pub fn for_loop(for_stmt: ForStmt) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::For(for_stmt))
    }

    pub fn brk() -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::Break)
    }

    pub fn cont() -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::Continue)
    }

    pub fn ret(expr: Expr) -> Spanned<Stmt> {
        Spanned::synthetic(Stmt::Return(expr))
    }
}
