//! Translation options.

use serde::{Deserialize, Serialize};

use crate::error::{TranslateError, TranslateResult};

/// Default circuit variable name.
pub const DEFAULT_VARIABLE_NAME: &str = "qc";

/// Default custom-gate expansion depth limit.
pub const DEFAULT_MAX_EXPANSION_DEPTH: usize = 64;

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Options controlling the generated Python code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Name of the `QuantumCircuit` variable.
    pub variable_name: String,
    /// Emit `from qiskit import QuantumCircuit` first.
    pub include_imports: bool,
    /// Custom gates nested deeper than this are treated as cyclic.
    pub max_expansion_depth: usize,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            variable_name: DEFAULT_VARIABLE_NAME.into(),
            include_imports: true,
            max_expansion_depth: DEFAULT_MAX_EXPANSION_DEPTH,
        }
    }
}

impl TranslateOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the circuit variable name.
    #[must_use]
    pub fn with_variable_name(mut self, name: impl Into<String>) -> Self {
        self.variable_name = name.into();
        self
    }

    /// Enable or disable the import line.
    #[must_use]
    pub fn with_imports(mut self, include: bool) -> Self {
        self.include_imports = include;
        self
    }

    /// Set the expansion depth limit.
    #[must_use]
    pub fn with_max_expansion_depth(mut self, depth: usize) -> Self {
        self.max_expansion_depth = depth;
        self
    }

    /// Check that the options can produce valid Python.
    pub fn validate(&self) -> TranslateResult<()> {
        if !is_python_identifier(&self.variable_name) {
            return Err(TranslateError::InvalidOption(format!(
                "variable name '{}' is not a Python identifier",
                self.variable_name
            )));
        }
        if PYTHON_KEYWORDS.contains(&self.variable_name.as_str()) {
            return Err(TranslateError::InvalidOption(format!(
                "variable name '{}' is a Python keyword",
                self.variable_name
            )));
        }
        if self.max_expansion_depth == 0 {
            return Err(TranslateError::InvalidOption(
                "max_expansion_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn is_python_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
