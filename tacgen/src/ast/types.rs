//! Static types attached to expressions by the checker

use serde::{Deserialize, Serialize};

/// Type representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Type {
    /// 32-bit signed integer
    #[default]
    Int,
    /// Result of relational and logical operators (0 or 1 at run time)
    Bool,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
        }
    }
}
