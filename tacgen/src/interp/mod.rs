//! TAC executor
//!
//! Runs a single piece on 32-bit integers. Used to observe what lowered code
//! does at run time; calls between pieces are not part of the IR, so each
//! piece runs in isolation with its parameters bound from the caller.

mod error;

pub use error::{ErrorKind, InterpResult, RuntimeError};

use std::collections::HashMap;

use log::trace;

use crate::tac::{BinaryOp, Label, Piece, Tac, TacProgram, Temp, UnaryOp};

/// The executor
#[derive(Debug, Clone)]
pub struct Machine {
    step_limit: u64,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

impl Machine {
    pub fn new(step_limit: u64) -> Self {
        Self { step_limit }
    }

    /// Run the piece called `name` from `program`
    pub fn run_named(&self, program: &TacProgram, name: &str, args: &[i32]) -> InterpResult<i32> {
        let piece = program
            .piece(name)
            .ok_or_else(|| RuntimeError::undefined_function(name))?;
        self.run(piece, args)
    }

    /// Execute `piece` with `args` bound to its parameters in order
    pub fn run(&self, piece: &Piece, args: &[i32]) -> InterpResult<i32> {
        let params = piece.param_temps();
        if params.len() != args.len() {
            return Err(RuntimeError::arity_mismatch(&piece.name, params.len(), args.len()));
        }

        let labels: HashMap<Label, usize> = piece
            .instrs
            .iter()
            .enumerate()
            .filter_map(|(i, t)| match t {
                Tac::Mark(l) => Some((*l, i)),
                _ => None,
            })
            .collect();

        let mut temps: HashMap<Temp, i32> = params.into_iter().zip(args.iter().copied()).collect();
        let read = |temps: &HashMap<Temp, i32>, t: Temp, pc: usize| {
            temps
                .get(&t)
                .copied()
                .ok_or_else(|| RuntimeError::uninitialized_temp(t, pc))
        };
        let jump = |l: Label| {
            labels
                .get(&l)
                .copied()
                .ok_or_else(|| RuntimeError::undefined_label(l))
        };

        let mut pc = 0usize;
        let mut steps = 0u64;
        while let Some(instr) = piece.instrs.get(pc) {
            steps += 1;
            if steps > self.step_limit {
                return Err(RuntimeError::step_limit_exceeded(self.step_limit));
            }
            trace!("{}[{pc}] {}", piece.name, instr.to_string().trim());

            let mut next = pc + 1;
            match instr {
                Tac::LoadImm { dst, value } => {
                    temps.insert(*dst, *value);
                }
                Tac::Binary { op, dst, lhs, rhs } => {
                    let l = read(&temps, *lhs, pc)?;
                    let r = read(&temps, *rhs, pc)?;
                    temps.insert(*dst, eval_binary(*op, l, r)?);
                }
                Tac::Unary { op, dst, src } => {
                    let v = read(&temps, *src, pc)?;
                    temps.insert(*dst, eval_unary(*op, v));
                }
                Tac::Assign { dst, src } => {
                    let v = read(&temps, *src, pc)?;
                    temps.insert(*dst, v);
                }
                Tac::Jump(label) => next = jump(*label)?,
                Tac::JumpOnZero { cond, target } => {
                    if read(&temps, *cond, pc)? == 0 {
                        next = jump(*target)?;
                    }
                }
                Tac::Mark(_) | Tac::FuncEnter(_) => {}
                Tac::Return(t) => return read(&temps, *t, pc),
                Tac::FuncExit => break,
            }
            pc = next;
        }

        Err(RuntimeError::missing_return(&piece.name))
    }
}

fn eval_binary(op: BinaryOp, l: i32, r: i32) -> InterpResult<i32> {
    let value = match op {
        BinaryOp::Add => l.wrapping_add(r),
        BinaryOp::Sub => l.wrapping_sub(r),
        BinaryOp::Mul => l.wrapping_mul(r),
        BinaryOp::Div | BinaryOp::Mod if r == 0 => return Err(RuntimeError::division_by_zero()),
        BinaryOp::Div => l.wrapping_div(r),
        BinaryOp::Mod => l.wrapping_rem(r),
        BinaryOp::Lt => (l < r) as i32,
        BinaryOp::Gt => (l > r) as i32,
        BinaryOp::Le => (l <= r) as i32,
        BinaryOp::Ge => (l >= r) as i32,
        BinaryOp::Eq => (l == r) as i32,
        BinaryOp::Ne => (l != r) as i32,
        BinaryOp::LAnd => (l != 0 && r != 0) as i32,
        BinaryOp::LOr => (l != 0 || r != 0) as i32,
    };
    Ok(value)
}

fn eval_unary(op: UnaryOp, v: i32) -> i32 {
    match op {
        UnaryOp::Neg => v.wrapping_neg(),
        UnaryOp::LNot => (v == 0) as i32,
        UnaryOp::BNot => !v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::SymbolId;
    use crate::tac::{EntryLabel, Frame, ParamSlot};

    fn piece(params: usize, body: Vec<Tac>) -> Piece {
        let mut instrs = vec![Tac::FuncEnter(EntryLabel::for_function("t"))];
        instrs.extend(body);
        instrs.push(Tac::FuncExit);
        Piece {
            name: "t".to_string(),
            frame: Frame {
                entry: EntryLabel::for_function("t"),
                order: 0,
                offset: 0,
                params: (0..params)
                    .map(|i| ParamSlot {
                        symbol: SymbolId(i as u32),
                        name: format!("p{i}"),
                        order: i,
                        offset: 4 * i as u32,
                        temp: Temp(i as u32),
                    })
                    .collect(),
            },
            instrs,
        }
    }

    #[test]
    fn test_arithmetic_wraps() {
        let p = piece(
            1,
            vec![
                Tac::LoadImm { dst: Temp(1), value: 1 },
                Tac::Binary { op: BinaryOp::Add, dst: Temp(2), lhs: Temp(0), rhs: Temp(1) },
                Tac::Return(Temp(2)),
            ],
        );
        assert_eq!(Machine::default().run(&p, &[i32::MAX]).unwrap(), i32::MIN);
    }

    #[test]
    fn test_division_by_zero() {
        let p = piece(
            2,
            vec![
                Tac::Binary { op: BinaryOp::Mod, dst: Temp(2), lhs: Temp(0), rhs: Temp(1) },
                Tac::Return(Temp(2)),
            ],
        );
        assert_eq!(Machine::default().run(&p, &[7, 3]).unwrap(), 1);
        let err = Machine::default().run(&p, &[7, 0]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_relational_and_logical_yield_bits() {
        assert_eq!(eval_binary(BinaryOp::Le, 3, 3).unwrap(), 1);
        assert_eq!(eval_binary(BinaryOp::Ne, 3, 3).unwrap(), 0);
        assert_eq!(eval_binary(BinaryOp::LOr, 0, -5).unwrap(), 1);
        assert_eq!(eval_binary(BinaryOp::LAnd, 2, 0).unwrap(), 0);
        assert_eq!(eval_unary(UnaryOp::LNot, 9), 0);
        assert_eq!(eval_unary(UnaryOp::BNot, 0), -1);
    }

    #[test]
    fn test_uninitialized_read() {
        let p = piece(0, vec![Tac::Return(Temp(4))]);
        let err = Machine::default().run(&p, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UninitializedTemp);
    }

    #[test]
    fn test_step_limit_stops_infinite_loop() {
        let p = piece(0, vec![Tac::Mark(Label(0)), Tac::Jump(Label(0))]);
        let err = Machine::new(50).run(&p, &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::StepLimitExceeded);
    }

    #[test]
    fn test_arity_and_missing_return() {
        let p = piece(1, vec![]);
        assert_eq!(Machine::default().run(&p, &[]).unwrap_err().kind, ErrorKind::ArityMismatch);
        assert_eq!(Machine::default().run(&p, &[1]).unwrap_err().kind, ErrorKind::MissingReturn);

        let program = TacProgram { pieces: vec![p] };
        let err = Machine::default().run_named(&program, "nope", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedFunction);
    }
}
