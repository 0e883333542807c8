//! Resolved symbols
//!
//! Name resolution runs before lowering and leaves every declaration and
//! reference pointing at an entry of the program's `SymbolTable`. The
//! lowering pass only ever refers to symbols through `SymbolId`.

use serde::{Deserialize, Serialize};

/// Opaque handle of a resolved symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    Variable,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

/// Arena of all symbols of one compilation unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a symbol and return its handle. Handles are dense and
    /// assigned in declaration order.
    pub fn declare(&mut self, name: impl Into<String>, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.into(),
            kind,
        });
        id
    }

    pub fn variable(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(name, SymbolKind::Variable)
    }

    pub fn function(&mut self, name: impl Into<String>) -> SymbolId {
        self.declare(name, SymbolKind::Function)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    /// Name for diagnostics; falls back to the raw id for unknown handles
    pub fn name_of(&self, id: SymbolId) -> String {
        self.get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_assigns_dense_ids() {
        let mut table = SymbolTable::new();
        let main = table.function("main");
        let x = table.variable("x");
        assert_eq!(main, SymbolId(0));
        assert_eq!(x, SymbolId(1));
        assert_eq!(table.get(x).map(|s| s.kind), Some(SymbolKind::Variable));
    }

    #[test]
    fn test_name_of_unknown_symbol() {
        let table = SymbolTable::new();
        assert_eq!(table.name_of(SymbolId(7)), "#7");
    }
}
