//! Symbol storage bindings

use std::collections::HashMap;

use crate::ast::{Span, SymbolId, SymbolKind, SymbolTable};
use crate::error::{CompileError, Result};
use crate::tac::Temp;

/// Temp bound to each variable symbol; a symbol is bound at most once per run
#[derive(Debug, Default)]
pub struct StorageMap {
    slots: HashMap<SymbolId, Temp>,
}

impl StorageMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, symbols: &SymbolTable, sym: SymbolId, temp: Temp, span: Span) -> Result<()> {
        expect_variable(symbols, sym, span)?;
        if self.slots.contains_key(&sym) {
            return Err(CompileError::symbol_rebound(symbols.name_of(sym), span));
        }
        self.slots.insert(sym, temp);
        Ok(())
    }

    pub fn lookup(&self, symbols: &SymbolTable, sym: SymbolId, span: Span) -> Result<Temp> {
        expect_variable(symbols, sym, span)?;
        self.slots
            .get(&sym)
            .copied()
            .ok_or_else(|| CompileError::unbound_symbol(symbols.name_of(sym), span))
    }
}

/// Functions have no storage of their own
fn expect_variable(symbols: &SymbolTable, sym: SymbolId, span: Span) -> Result<()> {
    match symbols.get(sym) {
        Some(symbol) if symbol.kind != SymbolKind::Variable => Err(CompileError::invalid_lvalue(
            format!("`{}` is not a variable", symbol.name),
            span,
        )),
        _ => Ok(()),
    }
}
