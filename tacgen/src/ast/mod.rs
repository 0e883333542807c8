//! Abstract Syntax Tree definitions
//!
//! The tree handed to lowering is already type- and symbol-annotated:
//! every expression carries its `Type` and every declaration or variable
//! reference carries a `SymbolId` into `Program::symbols`.

mod expr;
mod span;
mod stmt;
mod symbol;
mod types;

pub use expr::*;
pub use span::*;
pub use stmt::*;
pub use symbol::*;
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

/// A compilation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<FuncDef>,
    #[serde(default)]
    pub symbols: SymbolTable,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDef {
    pub sym: SymbolId,
    pub name: String,
    #[serde(default)]
    pub formals: Vec<VarDecl>,
    pub body: Vec<Spanned<Stmt>>,
    #[serde(default)]
    pub span: Span,
}

impl FuncDef {
    pub fn new(sym: SymbolId, name: impl Into<String>, formals: Vec<VarDecl>, body: Vec<Spanned<Stmt>>) -> Self {
        Self {
            sym,
            name: name.into(),
            formals,
            body,
            span: Span::default(),
        }
    }
}

impl Program {
    pub fn new(functions: Vec<FuncDef>, symbols: SymbolTable) -> Self {
        Self { functions, symbols }
    }

    /// Decode the JSON form written by the front end
    pub fn from_json(text: &str) -> Result<Program> {
        serde_json::from_str(text).map_err(|e| CompileError::decode(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| CompileError::decode(e.to_string()))
    }

    pub fn function(&self, name: &str) -> Option<&FuncDef> {
        self.functions.iter().find(|f| f.name == name)
    }
}
