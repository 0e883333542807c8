//! AST to TAC lowering
//!
//! A single depth-first pass over the annotated AST. Each function becomes one
//! `Piece`; statements and expressions are translated in `stmt.rs` and
//! `expr.rs`. The `Lowerer` owns every piece of per-run state: the
//! temp/label allocator, the symbol storage map and the break/continue
//! stack. One `Lowerer` serves exactly one compilation unit.

mod control;
mod expr;
mod stmt;
mod storage;

pub use control::{ControlStack, LoopTargets};
pub use storage::StorageMap;

use log::debug;

use crate::ast::{FuncDef, Program, SymbolTable};
use crate::config::LowerConfig;
use crate::error::Result;
use crate::tac::{verify_program, Allocator, EntryLabel, Frame, ParamSlot, Piece, TacBuilder, TacProgram};

/// Stack growth parameters for deeply nested ASTs
const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Lower a whole program, verifying the result when configured to
pub fn lower_program(program: &Program, config: &LowerConfig) -> Result<TacProgram> {
    let tac = Lowerer::new(&program.symbols, config).lower(program)?;
    if config.verify {
        verify_program(&tac)?;
        debug!("verified {} piece(s)", tac.pieces.len());
    }
    Ok(tac)
}

pub struct Lowerer<'a> {
    symbols: &'a SymbolTable,
    config: &'a LowerConfig,
    alloc: Allocator,
    storage: StorageMap,
    control: ControlStack,
}

impl<'a> Lowerer<'a> {
    pub fn new(symbols: &'a SymbolTable, config: &'a LowerConfig) -> Self {
        Self {
            symbols,
            config,
            alloc: Allocator::new(),
            storage: StorageMap::new(),
            control: ControlStack::new(),
        }
    }

    /// Lower every function in source order. Consumes the engine so its
    /// counters are never reused for another unit.
    pub fn lower(mut self, program: &Program) -> Result<TacProgram> {
        let mut pieces = Vec::with_capacity(program.functions.len());
        for (order, func) in program.functions.iter().enumerate() {
            pieces.push(self.lower_function(order, func)?);
        }
        debug!(
            "lowered {} function(s): {} temps, {} labels",
            pieces.len(),
            self.alloc.temps_allocated(),
            self.alloc.labels_allocated()
        );
        Ok(TacProgram { pieces })
    }

    fn lower_function(&mut self, order: usize, func: &FuncDef) -> Result<Piece> {
        let frame = self.frame_function(order, func)?;
        debug!(
            "lowering `{}` (order {}, offset {}, {} param(s))",
            func.name,
            frame.order,
            frame.offset,
            frame.params.len()
        );

        let mut b = TacBuilder::start(&func.name, frame);
        for stmt in &func.body {
            self.lower_stmt(&mut b, stmt)?;
        }

        // Default return, emitted even after an explicit one
        let zero = b.gen_load_imm(&mut self.alloc, 0);
        b.gen_return(zero);

        let piece = b.finish();
        debug!("`{}`: {} instruction(s)", piece.name, piece.len());
        Ok(piece)
    }

    /// Assign entry label, function offset and parameter slots
    fn frame_function(&mut self, order: usize, func: &FuncDef) -> Result<Frame> {
        let mut params = Vec::with_capacity(func.formals.len());
        let mut offset = 0u32;

        for (index, formal) in func.formals.iter().enumerate() {
            let temp = self.alloc.new_temp();
            self.storage.bind(self.symbols, formal.sym, temp, formal.span)?;
            params.push(ParamSlot {
                symbol: formal.sym,
                name: formal.name.clone(),
                order: index,
                offset,
                temp,
            });
            offset += self.config.pointer_size;
        }

        Ok(Frame {
            entry: EntryLabel::for_function(&func.name),
            order,
            offset: order as u32 * self.config.pointer_size,
            params,
        })
    }

    /// Run `f` with `targets` as the innermost loop. The stack is popped on
    /// the error path as well.
    fn with_loop<R>(
        &mut self,
        b: &mut TacBuilder,
        targets: LoopTargets,
        f: impl FnOnce(&mut Self, &mut TacBuilder) -> Result<R>,
    ) -> Result<R> {
        self.control.push(targets);
        let result = f(self, b);
        self.control.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Stmt, VarDecl};
    use crate::tac::{Tac, Temp};

    fn program_with(build: impl FnOnce(&mut SymbolTable) -> Vec<FuncDef>) -> Program {
        let mut symbols = SymbolTable::new();
        let functions = build(&mut symbols);
        Program::new(functions, symbols)
    }

    #[test]
    fn test_empty_function_returns_zero() {
        let program = program_with(|s| vec![FuncDef::new(s.function("f"), "f", vec![], vec![])]);
        let tac = lower_program(&program, &LowerConfig::default()).unwrap();
        let piece = &tac.pieces[0];
        assert_eq!(
            piece.instrs,
            vec![
                Tac::FuncEnter(EntryLabel("_f".to_string())),
                Tac::LoadImm { dst: Temp(0), value: 0 },
                Tac::Return(Temp(0)),
                Tac::FuncExit,
            ]
        );
    }

    #[test]
    fn test_framing_orders_and_offsets() {
        let program = program_with(|s| {
            let first = FuncDef::new(s.function("first"), "first", vec![], vec![]);
            let a = s.variable("a");
            let b = s.variable("b");
            let c = s.variable("c");
            let second = FuncDef::new(
                s.function("second"),
                "second",
                vec![VarDecl::new(a, "a"), VarDecl::new(b, "b"), VarDecl::new(c, "c")],
                vec![Stmt::ret(Expr::var(b))],
            );
            vec![first, second]
        });
        let config = LowerConfig::default().with_pointer_size(8);
        let tac = lower_program(&program, &config).unwrap();

        let second = tac.piece("second").unwrap();
        assert_eq!(second.frame.entry, EntryLabel("_second".to_string()));
        assert_eq!(second.frame.order, 1);
        assert_eq!(second.frame.offset, 8);
        let slots: Vec<_> = second
            .frame
            .params
            .iter()
            .map(|p| (p.name.as_str(), p.order, p.offset))
            .collect();
        assert_eq!(slots, vec![("a", 0, 0), ("b", 1, 8), ("c", 2, 16)]);

        // `first` used _T0 for its default return
        assert_eq!(second.param_temps(), vec![Temp(1), Temp(2), Temp(3)]);
        assert_eq!(second.instrs[1], Tac::Return(Temp(2)));
    }

    #[test]
    fn test_counters_continue_across_functions() {
        let program = program_with(|s| {
            vec![
                FuncDef::new(s.function("f"), "f", vec![], vec![]),
                FuncDef::new(s.function("g"), "g", vec![], vec![]),
            ]
        });
        let tac = lower_program(&program, &LowerConfig::default()).unwrap();
        assert_eq!(tac.pieces[1].instrs[1], Tac::LoadImm { dst: Temp(1), value: 0 });
    }

    #[test]
    fn test_rebinding_a_formal_is_rejected() {
        let program = program_with(|s| {
            let x = s.variable("x");
            vec![FuncDef::new(
                s.function("f"),
                "f",
                vec![VarDecl::new(x, "x")],
                vec![Stmt::decl(VarDecl::new(x, "x"))],
            )]
        });
        let err = lower_program(&program, &LowerConfig::default()).unwrap_err();
        assert!(err.is_precondition_violation());
    }
}
