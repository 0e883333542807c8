//! Statement lowering

use log::trace;

use super::{Lowerer, LoopTargets, STACK_GROW_SIZE, STACK_RED_ZONE};
use crate::ast::{ForStmt, Span, Spanned, Stmt, VarDecl};
use crate::error::{CompileError, Result};
use crate::tac::TacBuilder;

impl Lowerer<'_> {
    /// Lower a statement with automatic stack growth for deep nesting
    pub(super) fn lower_stmt(&mut self, b: &mut TacBuilder, stmt: &Spanned<Stmt>) -> Result<()> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.lower_stmt_inner(b, stmt))
    }

    fn lower_stmt_inner(&mut self, b: &mut TacBuilder, stmt: &Spanned<Stmt>) -> Result<()> {
        match &stmt.node {
            Stmt::Expr(expr) => {
                self.lower_expr(b, expr)?;
                Ok(())
            }

            Stmt::Decl(decl) => self.lower_decl(b, decl),

            Stmt::Compound(stmts) => {
                for s in stmts {
                    self.lower_stmt(b, s)?;
                }
                Ok(())
            }

            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let else_entry = self.alloc.new_label();
                let join = self.alloc.new_label();

                let c = self.lower_expr(b, cond)?;
                b.gen_jump_on_zero(c, else_entry);
                self.lower_stmt(b, then_branch)?;
                b.gen_jump(join);
                b.gen_mark_label(else_entry);
                self.lower_stmt(b, else_branch)?;
                b.gen_mark_label(join);
                Ok(())
            }

            Stmt::While { cond, body } => {
                let entry = self.alloc.new_label();
                let exit = self.alloc.new_label();
                let cont = self.alloc.new_label();
                trace!("while at {}: entry {entry}, exit {exit}, continue {cont}", stmt.span);

                b.gen_mark_label(entry);
                self.with_loop(b, LoopTargets { exit, cont }, |this, b| {
                    let c = this.lower_expr(b, cond)?;
                    b.gen_jump_on_zero(c, exit);
                    this.lower_stmt(b, body)?;
                    b.gen_mark_label(cont);
                    b.gen_jump(entry);
                    Ok(())
                })?;
                b.gen_mark_label(exit);
                Ok(())
            }

            Stmt::DoWhile { body, cond } => {
                let body_entry = self.alloc.new_label();
                let exit = self.alloc.new_label();
                let cont = self.alloc.new_label();
                trace!("do-while at {}: body {body_entry}, exit {exit}, continue {cont}", stmt.span);

                b.gen_mark_label(body_entry);
                self.with_loop(b, LoopTargets { exit, cont }, |this, b| {
                    this.lower_stmt(b, body)?;
                    b.gen_mark_label(cont);
                    let c = this.lower_expr(b, cond)?;
                    b.gen_jump_on_zero(c, exit);
                    b.gen_jump(body_entry);
                    Ok(())
                })?;
                b.gen_mark_label(exit);
                Ok(())
            }

            Stmt::For(for_stmt) => self.lower_for(b, for_stmt, stmt.span),

            Stmt::Break => {
                let target = self.control.break_target(stmt.span)?;
                b.gen_jump(target);
                Ok(())
            }

            Stmt::Continue => {
                let target = self.control.continue_target(stmt.span)?;
                b.gen_jump(target);
                Ok(())
            }

            Stmt::Return(expr) => {
                let value = self.lower_expr(b, expr)?;
                b.gen_return(value);
                Ok(())
            }
        }
    }

    fn lower_for(&mut self, b: &mut TacBuilder, for_stmt: &ForStmt, span: Span) -> Result<()> {
        if for_stmt.expr_init.is_some() && for_stmt.decl_init.is_some() {
            return Err(CompileError::ConflictingForInit { span });
        }

        let entry = self.alloc.new_label();
        let exit = self.alloc.new_label();
        let cont = self.alloc.new_label();
        trace!("for at {span}: entry {entry}, exit {exit}, continue {cont}");

        if let Some(init) = &for_stmt.expr_init {
            self.lower_expr(b, init)?;
        }
        if let Some(decl) = &for_stmt.decl_init {
            self.lower_decl(b, decl)?;
        }

        b.gen_mark_label(entry);
        self.with_loop(b, LoopTargets { exit, cont }, |this, b| {
            // No condition means no test: the loop only ends through `break`
            if let Some(cond) = &for_stmt.cond {
                let c = this.lower_expr(b, cond)?;
                b.gen_jump_on_zero(c, exit);
            }
            this.lower_stmt(b, &for_stmt.body)?;
            b.gen_mark_label(cont);
            if let Some(update) = &for_stmt.update {
                this.lower_expr(b, update)?;
            }
            b.gen_jump(entry);
            Ok(())
        })?;
        b.gen_mark_label(exit);
        Ok(())
    }

    /// Bind a fresh temp to the declared symbol and store the initializer
    pub(super) fn lower_decl(&mut self, b: &mut TacBuilder, decl: &VarDecl) -> Result<()> {
        let temp = self.alloc.new_temp();
        self.storage.bind(self.symbols, decl.sym, temp, decl.span)?;
        if let Some(init) = &decl.init {
            let value = self.lower_expr(b, init)?;
            b.gen_assign(temp, value);
        }
        Ok(())
    }
}
