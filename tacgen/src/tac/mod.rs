//! Three-address code (TAC)
//!
//! TAC is the linear IR produced by lowering. Each function becomes one
//! `Piece`: an ordered, append-only list of instructions whose operands are
//! temporaries, labels, or immediates. Control flow is expressed with
//! `Mark`ed labels and (conditional) jumps; there are no basic blocks at
//! this level.

mod alloc;
mod builder;
pub mod verify;

pub use alloc::Allocator;
pub use builder::TacBuilder;
pub use verify::{verify_piece, verify_program, VerifyError};

use serde::{Deserialize, Serialize};

use crate::ast::{BinOp, SymbolId, UnOp};

/// Virtual register of one machine word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Temp(pub u32);

impl std::fmt::Display for Temp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_T{}", self.0)
    }
}

/// Branch target inside a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(pub u32);

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_L{}", self.0)
    }
}

/// Named entry point of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryLabel(pub String);

impl EntryLabel {
    pub fn for_function(name: &str) -> Self {
        EntryLabel(format!("_{name}"))
    }
}

impl std::fmt::Display for EntryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Binary TAC operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    LAnd,
    LOr,
}

impl BinaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "ADD",
            BinaryOp::Sub => "SUB",
            BinaryOp::Mul => "MUL",
            BinaryOp::Div => "DIV",
            BinaryOp::Mod => "MOD",
            BinaryOp::Lt => "LT",
            BinaryOp::Gt => "GT",
            BinaryOp::Le => "LEQ",
            BinaryOp::Ge => "GEQ",
            BinaryOp::Eq => "EQU",
            BinaryOp::Ne => "NEQ",
            BinaryOp::LAnd => "LAND",
            BinaryOp::LOr => "LOR",
        }
    }
}

impl From<BinOp> for BinaryOp {
    fn from(op: BinOp) -> Self {
        match op {
            BinOp::Add => BinaryOp::Add,
            BinOp::Sub => BinaryOp::Sub,
            BinOp::Mul => BinaryOp::Mul,
            BinOp::Div => BinaryOp::Div,
            BinOp::Mod => BinaryOp::Mod,
            BinOp::Lt => BinaryOp::Lt,
            BinOp::Gt => BinaryOp::Gt,
            BinOp::Le => BinaryOp::Le,
            BinOp::Ge => BinaryOp::Ge,
            BinOp::Eq => BinaryOp::Eq,
            BinOp::Ne => BinaryOp::Ne,
            BinOp::And => BinaryOp::LAnd,
            BinOp::Or => BinaryOp::LOr,
        }
    }
}

/// Unary TAC operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    LNot,
    BNot,
}

impl UnaryOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            UnaryOp::Neg => "NEG",
            UnaryOp::LNot => "LNOT",
            UnaryOp::BNot => "BNOT",
        }
    }
}

impl From<UnOp> for UnaryOp {
    fn from(op: UnOp) -> Self {
        match op {
            UnOp::Neg => UnaryOp::Neg,
            UnOp::Not => UnaryOp::LNot,
            UnOp::BitNot => UnaryOp::BNot,
        }
    }
}

/// TAC instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tac {
    /// dst = value
    LoadImm { dst: Temp, value: i32 },
    /// dst = op lhs, rhs
    Binary {
        op: BinaryOp,
        dst: Temp,
        lhs: Temp,
        rhs: Temp,
    },
    /// dst = op src
    Unary { op: UnaryOp, dst: Temp, src: Temp },
    /// dst = src
    Assign { dst: Temp, src: Temp },
    /// goto target
    Jump(Label),
    /// if cond == 0 goto target
    JumpOnZero { cond: Temp, target: Label },
    /// target:
    Mark(Label),
    FuncEnter(EntryLabel),
    FuncExit,
    Return(Temp),
}

impl Tac {
    /// Temp written by this instruction
    pub fn defined_temp(&self) -> Option<Temp> {
        match self {
            Tac::LoadImm { dst, .. }
            | Tac::Binary { dst, .. }
            | Tac::Unary { dst, .. }
            | Tac::Assign { dst, .. } => Some(*dst),
            _ => None,
        }
    }

    /// Temps read by this instruction
    pub fn used_temps(&self) -> Vec<Temp> {
        match self {
            Tac::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
            Tac::Unary { src, .. } | Tac::Assign { src, .. } => vec![*src],
            Tac::JumpOnZero { cond, .. } => vec![*cond],
            Tac::Return(t) => vec![*t],
            _ => Vec::new(),
        }
    }

    pub fn jump_target(&self) -> Option<Label> {
        match self {
            Tac::Jump(l) | Tac::JumpOnZero { target: l, .. } => Some(*l),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tac {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tac::LoadImm { dst, value } => write!(f, "    {dst} <- {value}"),
            Tac::Binary { op, dst, lhs, rhs } => {
                write!(f, "    {dst} <- ({lhs} {} {rhs})", op.mnemonic())
            }
            Tac::Unary { op, dst, src } => write!(f, "    {dst} <- {} {src}", op.mnemonic()),
            Tac::Assign { dst, src } => write!(f, "    {dst} <- {src}"),
            Tac::Jump(l) => write!(f, "    JUMP {l}"),
            Tac::JumpOnZero { cond, target } => write!(f, "    BEQZ {cond}, {target}"),
            Tac::Mark(l) => write!(f, "{l}:"),
            Tac::FuncEnter(entry) => write!(f, "FUNCTION<{entry}>:"),
            Tac::FuncExit => write!(f, "END"),
            Tac::Return(t) => write!(f, "    RETURN {t}"),
        }
    }
}

/// Storage assigned to one formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSlot {
    pub symbol: SymbolId,
    pub name: String,
    /// Position in the formal list
    pub order: usize,
    /// Byte offset in the parameter area
    pub offset: u32,
    pub temp: Temp,
}

/// Calling-convention facts of a lowered function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub entry: EntryLabel,
    /// Position of the function in the program
    pub order: usize,
    pub offset: u32,
    pub params: Vec<ParamSlot>,
}

/// Lowered body of one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub name: String,
    pub frame: Frame,
    pub instrs: Vec<Tac>,
}

impl Piece {
    pub fn param_temps(&self) -> Vec<Temp> {
        self.frame.params.iter().map(|p| p.temp).collect()
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self
            .frame
            .params
            .iter()
            .map(|p| format!("{}@{}={}", p.name, p.offset, p.temp))
            .collect();
        writeln!(f, "# {}({})", self.name, params.join(", "))?;
        for instr in &self.instrs {
            writeln!(f, "{instr}")?;
        }
        Ok(())
    }
}

/// All pieces of one compilation unit, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacProgram {
    pub pieces: Vec<Piece>,
}

impl TacProgram {
    pub fn piece(&self, name: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.name == name)
    }
}

/// Render a program as text, one piece after another
pub fn format_tac(program: &TacProgram) -> String {
    let mut output = String::new();

    for (i, piece) in program.pieces.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&piece.to_string());
    }

    output
}
