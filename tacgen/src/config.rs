//! Lowering configuration
//!
//! Settings can come from a TOML file:
//!
//! ```toml
//! pointer_size = 8
//! verify = true
//! entry = "main"
//! step_limit = 500000
//! ```
//!
//! Missing keys keep their defaults; CLI flags are applied on top.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LowerConfig {
    /// Unit used for function offsets
    pub pointer_size: u32,
    /// Run the IR verifier on every lowered piece
    pub verify: bool,
    /// Function executed by `run`
    pub entry: String,
    /// Instruction budget of the executor
    pub step_limit: u64,
}

impl Default for LowerConfig {
    fn default() -> Self {
        Self {
            pointer_size: 4,
            verify: false,
            entry: "main".to_string(),
            step_limit: 1_000_000,
        }
    }
}

impl LowerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LowerConfig = toml::from_str(text).map_err(|e| CompileError::config(e.to_string()))?;
        if config.pointer_size == 0 {
            return Err(CompileError::config("pointer_size must be positive"));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CompileError::config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn with_pointer_size(mut self, pointer_size: u32) -> Self {
        self.pointer_size = pointer_size;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LowerConfig::default();
        assert_eq!(config.pointer_size, 4);
        assert!(!config.verify);
        assert_eq!(config.entry, "main");
        assert_eq!(config.step_limit, 1_000_000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = LowerConfig::from_toml_str("pointer_size = 8\nverify = true\n").unwrap();
        assert_eq!(config.pointer_size, 8);
        assert!(config.verify);
        assert_eq!(config.entry, "main");
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            LowerConfig::from_toml_str("pointer_size = 0"),
            Err(CompileError::Config { .. })
        ));
        assert!(matches!(
            LowerConfig::from_toml_str("colour = \"blue\""),
            Err(CompileError::Config { .. })
        ));
    }
}
