//! Structural checks on lowered pieces
//!
//! Verification runs over the instruction list as a control-flow graph whose
//! nodes are instruction indices. Besides the bracketing and label checks it
//! performs a forward must-be-defined dataflow: a temp may only be read if it
//! was written on every path from the entry to the read.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use super::{Label, Piece, Tac, TacProgram, Temp};
use crate::error::{CompileError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("piece does not start with FuncEnter")]
    MissingEnter,

    #[error("piece does not end with FuncExit")]
    MissingExit,

    #[error("function marker in the middle of the piece at instruction {index}")]
    MisplacedMarker { index: usize },

    #[error("label {label} is marked more than once")]
    DuplicateMark { label: Label },

    #[error("jump at instruction {index} targets unmarked label {label}")]
    UnmarkedTarget { label: Label, index: usize },

    #[error("temp {temp} read at instruction {index} may be undefined")]
    UndefinedTemp { temp: Temp, index: usize },
}

/// Check one piece, returning every violation found
pub fn verify_piece(piece: &Piece) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let instrs = &piece.instrs;

    if !matches!(instrs.first(), Some(Tac::FuncEnter(_))) {
        errors.push(VerifyError::MissingEnter);
    }
    if !matches!(instrs.last(), Some(Tac::FuncExit)) || instrs.len() < 2 {
        errors.push(VerifyError::MissingExit);
    }
    let last = instrs.len().saturating_sub(1);
    for (index, instr) in instrs.iter().enumerate() {
        let misplaced = match instr {
            Tac::FuncEnter(_) => index != 0,
            Tac::FuncExit => index != last,
            _ => false,
        };
        if misplaced {
            errors.push(VerifyError::MisplacedMarker { index });
        }
    }

    let mut marks: HashMap<Label, usize> = HashMap::new();
    for (index, instr) in instrs.iter().enumerate() {
        if let Tac::Mark(label) = instr {
            if marks.insert(*label, index).is_some() {
                errors.push(VerifyError::DuplicateMark { label: *label });
            }
        }
    }

    for (index, instr) in instrs.iter().enumerate() {
        match instr.jump_target() {
            Some(label) if !marks.contains_key(&label) => {
                errors.push(VerifyError::UnmarkedTarget { label, index });
            }
            _ => {}
        }
    }

    // Dataflow needs a well-formed graph
    if errors.is_empty() {
        errors.extend(check_definitions(piece, &marks));
    }

    errors
}

/// Check every piece; the first failing piece is reported with all of its
/// violations
pub fn verify_program(program: &TacProgram) -> Result<()> {
    for piece in &program.pieces {
        let errors = verify_piece(piece);
        if !errors.is_empty() {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CompileError::verify(&piece.name, message));
        }
    }
    Ok(())
}

fn successors(instrs: &[Tac], marks: &HashMap<Label, usize>, index: usize) -> Vec<usize> {
    let fallthrough = index + 1;
    match &instrs[index] {
        Tac::Jump(label) => marks.get(label).copied().into_iter().collect(),
        Tac::JumpOnZero { target, .. } => {
            let mut succ = vec![fallthrough];
            if let Some(&t) = marks.get(target) {
                succ.push(t);
            }
            succ
        }
        Tac::Return(_) | Tac::FuncExit => Vec::new(),
        _ if fallthrough < instrs.len() => vec![fallthrough],
        _ => Vec::new(),
    }
}

fn check_definitions(piece: &Piece, marks: &HashMap<Label, usize>) -> Vec<VerifyError> {
    let instrs = &piece.instrs;
    if instrs.is_empty() {
        return Vec::new();
    }

    // `None` means the instruction has not been reached yet
    let mut defined_in: Vec<Option<BTreeSet<Temp>>> = vec![None; instrs.len()];
    defined_in[0] = Some(piece.param_temps().into_iter().collect());

    let mut worklist = vec![0usize];
    let mut queued: HashSet<usize> = HashSet::from([0]);

    while let Some(index) = worklist.pop() {
        queued.remove(&index);
        let Some(mut out) = defined_in[index].clone() else {
            continue;
        };
        if let Some(dst) = instrs[index].defined_temp() {
            out.insert(dst);
        }

        for succ in successors(instrs, marks, index) {
            let merged = match &defined_in[succ] {
                None => out.clone(),
                Some(current) => current.intersection(&out).copied().collect(),
            };
            if defined_in[succ].as_ref() != Some(&merged) {
                defined_in[succ] = Some(merged);
                if queued.insert(succ) {
                    worklist.push(succ);
                }
            }
        }
    }

    let mut errors = Vec::new();
    for (index, instr) in instrs.iter().enumerate() {
        let Some(defined) = &defined_in[index] else {
            continue;
        };
        for temp in instr.used_temps() {
            if !defined.contains(&temp) {
                errors.push(VerifyError::UndefinedTemp { temp, index });
            }
        }
    }
    errors
}
