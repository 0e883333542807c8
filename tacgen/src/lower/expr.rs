//! Expression lowering
//!
//! Every expression yields the temp holding its value. Variable references
//! yield the variable's own bound temp and emit nothing.

use super::{Lowerer, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::ast::{Expr, ExprKind, Lvalue, LvalueKind};
use crate::error::{CompileError, Result};
use crate::tac::{TacBuilder, Temp};

impl Lowerer<'_> {
    /// Lower an expression with automatic stack growth for deep nesting
    pub(super) fn lower_expr(&mut self, b: &mut TacBuilder, expr: &Expr) -> Result<Temp> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.lower_expr_inner(b, expr))
    }

    fn lower_expr_inner(&mut self, b: &mut TacBuilder, expr: &Expr) -> Result<Temp> {
        match &expr.kind {
            ExprKind::IntLit(value) => Ok(b.gen_load_imm(&mut self.alloc, *value)),

            ExprKind::Lvalue(lvalue) => self.lvalue_temp(lvalue),

            // Both operands are always evaluated, `&&` and `||` included
            ExprKind::Binary { op, left, right } => {
                let l = self.lower_expr(b, left)?;
                let r = self.lower_expr(b, right)?;
                Ok(b.gen_binary(&mut self.alloc, (*op).into(), l, r))
            }

            ExprKind::Unary { op, expr: operand } => {
                let src = self.lower_expr(b, operand)?;
                Ok(b.gen_unary(&mut self.alloc, (*op).into(), src))
            }

            ExprKind::Assign { target, value } => {
                let dst = self.lvalue_temp(target)?;
                let v = self.lower_expr(b, value)?;
                b.gen_assign(dst, v);
                Ok(v)
            }

            ExprKind::Cond {
                cond,
                then_expr,
                else_expr,
            } => {
                let else_entry = self.alloc.new_label();
                let join = self.alloc.new_label();

                let c = self.lower_expr(b, cond)?;
                let result = self.alloc.new_temp();
                b.gen_jump_on_zero(c, else_entry);

                let t = self.lower_expr(b, then_expr)?;
                b.gen_assign(result, t);
                b.gen_jump(join);

                b.gen_mark_label(else_entry);
                let f = self.lower_expr(b, else_expr)?;
                b.gen_assign(result, f);
                b.gen_mark_label(join);

                Ok(result)
            }
        }
    }

    /// Storage temp of an lvalue; only plain variables have one
    fn lvalue_temp(&self, lvalue: &Lvalue) -> Result<Temp> {
        match &lvalue.kind {
            LvalueKind::Var(sym) => self.storage.lookup(self.symbols, *sym, lvalue.span),
            LvalueKind::Index { base, .. } => Err(CompileError::invalid_lvalue(
                format!("element of `{}` is not a plain variable", self.symbols.name_of(*base)),
                lvalue.span,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinOp, Expr, FuncDef, Lvalue, LvalueKind, Program, Span, Stmt, SymbolTable, UnOp, VarDecl};
    use crate::config::LowerConfig;
    use crate::error::CompileError;
    use crate::lower::lower_program;
    use crate::tac::{BinaryOp, Tac, Temp, UnaryOp};

    /// Lower `int p; ...; return <expr>` with `p` as the only formal
    fn lower_return(build: impl FnOnce(&mut SymbolTable) -> (VarDecl, Expr)) -> Result<Vec<Tac>, CompileError> {
        let mut symbols = SymbolTable::new();
        let f = symbols.function("f");
        let (formal, expr) = build(&mut symbols);
        let program = Program::new(
            vec![FuncDef::new(f, "f", vec![formal], vec![Stmt::ret(expr)])],
            symbols,
        );
        let tac = lower_program(&program, &LowerConfig::default())?;
        Ok(tac.pieces[0].instrs.clone())
    }

    #[test]
    fn test_binary_evaluates_left_then_right() {
        let instrs = lower_return(|s| {
            let p = s.variable("p");
            (
                VarDecl::new(p, "p"),
                Expr::binary(BinOp::Mul, Expr::int(6), Expr::var(p)),
            )
        })
        .unwrap();
        assert_eq!(instrs[1], Tac::LoadImm { dst: Temp(1), value: 6 });
        assert_eq!(
            instrs[2],
            Tac::Binary {
                op: BinaryOp::Mul,
                dst: Temp(2),
                lhs: Temp(1),
                rhs: Temp(0),
            }
        );
        assert_eq!(instrs[3], Tac::Return(Temp(2)));
    }

    #[test]
    fn test_logical_ops_are_eager() {
        let instrs = lower_return(|s| {
            let p = s.variable("p");
            (
                VarDecl::new(p, "p"),
                Expr::binary(BinOp::And, Expr::var(p), Expr::int(1)),
            )
        })
        .unwrap();
        assert!(!instrs.iter().any(|t| t.jump_target().is_some()));
        assert!(matches!(instrs[2], Tac::Binary { op: BinaryOp::LAnd, .. }));
    }

    #[test]
    fn test_unary_ops() {
        let instrs = lower_return(|s| {
            let p = s.variable("p");
            (
                VarDecl::new(p, "p"),
                Expr::unary(UnOp::BitNot, Expr::unary(UnOp::Not, Expr::var(p))),
            )
        })
        .unwrap();
        assert_eq!(
            &instrs[1..3],
            &[
                Tac::Unary { op: UnaryOp::LNot, dst: Temp(1), src: Temp(0) },
                Tac::Unary { op: UnaryOp::BNot, dst: Temp(2), src: Temp(1) },
            ]
        );
    }

    #[test]
    fn test_assignment_yields_right_value() {
        let instrs = lower_return(|s| {
            let p = s.variable("p");
            (VarDecl::new(p, "p"), Expr::assign(p, Expr::int(9)))
        })
        .unwrap();
        assert_eq!(instrs[1], Tac::LoadImm { dst: Temp(1), value: 9 });
        assert_eq!(instrs[2], Tac::Assign { dst: Temp(0), src: Temp(1) });
        assert_eq!(instrs[3], Tac::Return(Temp(1)));
    }

    #[test]
    fn test_indexed_lvalue_is_rejected() {
        let err = lower_return(|s| {
            let p = s.variable("p");
            let arr = s.variable("arr");
            let target = Lvalue {
                kind: LvalueKind::Index {
                    base: arr,
                    index: Box::new(Expr::int(0)),
                },
                span: Span::new(3, 9),
            };
            (VarDecl::new(p, "p"), Expr::assign_to(target, Expr::int(1)))
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidLvalue { ref message, span } if message.contains("arr") && span == Span::new(3, 9)
        ));
    }

    #[test]
    fn test_unbound_variable_is_rejected() {
        let err = lower_return(|s| {
            let p = s.variable("p");
            let ghost = s.variable("ghost");
            (VarDecl::new(p, "p"), Expr::var(ghost))
        })
        .unwrap_err();
        assert!(matches!(err, CompileError::UnboundSymbol { ref name, .. } if name == "ghost"));
    }

    #[test]
    fn test_conditional_shape() {
        let instrs = lower_return(|s| {
            let p = s.variable("p");
            (
                VarDecl::new(p, "p"),
                Expr::cond(Expr::var(p), Expr::int(10), Expr::int(20)),
            )
        })
        .unwrap();
        let text: Vec<_> = instrs.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            text[1..10],
            [
                "    BEQZ _T0, _L0",
                "    _T2 <- 10",
                "    _T1 <- _T2",
                "    JUMP _L1",
                "_L0:",
                "    _T3 <- 20",
                "    _T1 <- _T3",
                "_L1:",
                "    RETURN _T1",
            ]
        );
    }
}
