//! Executable statement descriptors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One store-side operation to run when a command is executed
///
/// `name` selects the operation; `params` are bound positionally and are
/// never spliced into statement text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutableStatement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
}

impl ExecutableStatement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append one bound parameter
    pub fn param(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }
}

impl std::fmt::Display for ExecutableStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str(")")
    }
}
