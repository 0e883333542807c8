//! Break/continue resolution
//!
//! Every loop pushes its targets before its body is lowered and pops them
//! afterwards, so the top of the stack is always the innermost loop that
//! lexically encloses the statement being lowered.

use crate::ast::Span;
use crate::error::{CompileError, Result};
use crate::tac::Label;

/// Jump targets of one enclosing loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    /// Where `break` goes
    pub exit: Label,
    /// Where `continue` goes
    pub cont: Label,
}

#[derive(Debug, Default)]
pub struct ControlStack {
    loops: Vec<LoopTargets>,
}

impl ControlStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, targets: LoopTargets) {
        self.loops.push(targets);
    }

    pub fn pop(&mut self) -> Option<LoopTargets> {
        self.loops.pop()
    }

    pub fn current(&self) -> Option<LoopTargets> {
        self.loops.last().copied()
    }

    pub fn break_target(&self, span: Span) -> Result<Label> {
        self.current()
            .map(|t| t.exit)
            .ok_or(CompileError::BreakOutsideLoop { span })
    }

    pub fn continue_target(&self, span: Span) -> Result<Label> {
        self.current()
            .map(|t| t.cont)
            .ok_or(CompileError::ContinueOutsideLoop { span })
    }
}
