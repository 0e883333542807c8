//! Per-function IR builder
//!
//! A `TacBuilder` accumulates the instructions of one piece. Instructions are
//! only ever appended; nothing is patched after emission. Operations that
//! produce a value take the run's `Allocator` and return the fresh temp that
//! holds the result.

use super::{Allocator, BinaryOp, Frame, Label, Piece, Tac, Temp, UnaryOp};

#[derive(Debug)]
pub struct TacBuilder {
    name: String,
    frame: Frame,
    instrs: Vec<Tac>,
}

impl TacBuilder {
    /// Open a piece and emit its `FuncEnter` marker
    pub fn start(name: impl Into<String>, frame: Frame) -> Self {
        let instrs = vec![Tac::FuncEnter(frame.entry.clone())];
        Self {
            name: name.into(),
            frame,
            instrs,
        }
    }

    pub fn gen_load_imm(&mut self, alloc: &mut Allocator, value: i32) -> Temp {
        let dst = alloc.new_temp();
        self.emit(Tac::LoadImm { dst, value });
        dst
    }

    pub fn gen_binary(&mut self, alloc: &mut Allocator, op: BinaryOp, lhs: Temp, rhs: Temp) -> Temp {
        let dst = alloc.new_temp();
        self.emit(Tac::Binary { op, dst, lhs, rhs });
        dst
    }

    pub fn gen_unary(&mut self, alloc: &mut Allocator, op: UnaryOp, src: Temp) -> Temp {
        let dst = alloc.new_temp();
        self.emit(Tac::Unary { op, dst, src });
        dst
    }

    pub fn gen_assign(&mut self, dst: Temp, src: Temp) {
        self.emit(Tac::Assign { dst, src });
    }

    pub fn gen_jump(&mut self, target: Label) {
        self.emit(Tac::Jump(target));
    }

    pub fn gen_jump_on_zero(&mut self, cond: Temp, target: Label) {
        self.emit(Tac::JumpOnZero { cond, target });
    }

    pub fn gen_mark_label(&mut self, label: Label) {
        self.emit(Tac::Mark(label));
    }

    pub fn gen_return(&mut self, value: Temp) {
        self.emit(Tac::Return(value));
    }

    /// Close the piece with `FuncExit`
    pub fn finish(mut self) -> Piece {
        self.emit(Tac::FuncExit);
        Piece {
            name: self.name,
            frame: self.frame,
            instrs: self.instrs,
        }
    }

    fn emit(&mut self, instr: Tac) {
        self.instrs.push(instr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tac::EntryLabel;

    fn frame(name: &str) -> Frame {
        Frame {
            entry: EntryLabel::for_function(name),
            order: 0,
            offset: 0,
            params: Vec::new(),
        }
    }

    #[test]
    fn test_piece_is_bracketed() {
        let mut alloc = Allocator::new();
        let mut b = TacBuilder::start("f", frame("f"));
        let t = b.gen_load_imm(&mut alloc, 0);
        b.gen_return(t);
        let piece = b.finish();

        assert_eq!(piece.name, "f");
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
    fn test_value_ops_allocate_fresh_temps() {
        let mut alloc = Allocator::new();
        let mut b = TacBuilder::start("g", frame("g"));
        let a = b.gen_load_imm(&mut alloc, 2);
        let c = b.gen_load_imm(&mut alloc, 3);
        let sum = b.gen_binary(&mut alloc, BinaryOp::Add, a, c);
        let neg = b.gen_unary(&mut alloc, UnaryOp::Neg, sum);
        b.gen_assign(a, neg);
        assert_eq!((a, c, sum, neg), (Temp(0), Temp(1), Temp(2), Temp(3)));
        assert_eq!(b.finish().len(), 7);
    }
}
