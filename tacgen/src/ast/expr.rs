//! Expression AST nodes

use super::{Span, SymbolId, Type};
use serde::{Deserialize, Serialize};

/// Expression with its resolved static type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    #[serde(default)]
    pub ty: Type,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Integer literal
    IntLit(i32),

    /// Variable reference (an lvalue read for its value)
    Lvalue(Lvalue),

    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Unary operation
    Unary { op: UnOp, expr: Box<Expr> },

    /// Assignment; its value is the assigned value
    Assign { target: Lvalue, value: Box<Expr> },

    /// Conditional: cond ? then_expr : else_expr
    Cond {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
}

/// Assignable storage location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lvalue {
    pub kind: LvalueKind,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LvalueKind {
    /// Plain variable
    Var(SymbolId),
    /// Element of an array variable. Produced by the front end but never
    /// lowerable here.
    Index { base: SymbolId, index: Box<Expr> },
}

impl Lvalue {
    pub fn var(sym: SymbolId) -> Self {
        Self {
            kind: LvalueKind::Var(sym),
            span: Span::default(),
        }
    }
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self {
            kind,
            ty,
            span: Span::default(),
        }
    }

    pub fn int(value: i32) -> Self {
        Self::new(ExprKind::IntLit(value), Type::Int)
    }

    pub fn var(sym: SymbolId) -> Self {
        Self::lvalue(Lvalue::var(sym))
    }

    pub fn lvalue(lvalue: Lvalue) -> Self {
        Self::new(ExprKind::Lvalue(lvalue), Type::Int)
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            op.result_type(),
        )
    }

    pub fn unary(op: UnOp, expr: Expr) -> Self {
        let ty = match op {
            UnOp::Not => Type::Bool,
            UnOp::Neg | UnOp::BitNot => Type::Int,
        };
        Self::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            ty,
        )
    }

    /// `sym = value`
    pub fn assign(sym: SymbolId, value: Expr) -> Self {
        Self::assign_to(Lvalue::var(sym), value)
    }

    pub fn assign_to(target: Lvalue, value: Expr) -> Self {
        let ty = value.ty;
        Self::new(
            ExprKind::Assign {
                target,
                value: Box::new(value),
            },
            ty,
        )
    }

    pub fn cond(cond: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        let ty = then_expr.ty;
        Self::new(
            ExprKind::Cond {
                cond: Box::new(cond),
                then_expr: Box::new(then_expr),
                else_expr: Box::new(else_expr),
            },
            ty,
        )
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,

    // Logical, evaluated eagerly
    And,
    Or,
}

impl BinOp {
    pub fn result_type(self) -> Type {
        match self {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => Type::Int,
            _ => Type::Bool,
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
    /// Logical not (!)
    Not,
    /// Bitwise not (~)
    BitNot,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "!"),
            UnOp::BitNot => write!(f, "~"),
        }
    }
}
