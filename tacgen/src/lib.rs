//! Three-address code generation
//!
//! Lowers a type- and symbol-annotated AST with structured control flow
//! (`if`, `while`, `do`/`while`, `for`, `break`, `continue`) into one linear
//! TAC piece per function, ready for instruction selection.

pub mod ast;
pub mod config;
pub mod error;
pub mod interp;
pub mod logging;
pub mod lower;
pub mod tac;

pub use ast::Span;
pub use config::LowerConfig;
pub use error::{CompileError, Result};
pub use lower::lower_program;
pub use tac::{Piece, Tac, TacProgram};

/// Decode a JSON AST and lower it
pub fn translate_json(text: &str, config: &LowerConfig) -> Result<TacProgram> {
    let program = ast::Program::from_json(text)?;
    lower_program(&program, config)
}
