//! Error types for QASM translation.

use thiserror::Error;

/// Errors that can occur while translating QASM into Python.
///
/// Every error aborts the translation: no partial output is ever produced.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TranslateError {
    /// Unbalanced braces or a statement without its terminating `;`.
    #[error("Malformed source at line {line}: {message}")]
    MalformedSource { line: usize, message: String },

    /// Lexer error (a character sequence that is not QASM).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Statement does not match the accepted QASM surface.
    #[error("Syntax error at line {line}: expected {expected}, found {found}")]
    Syntax {
        line: usize,
        expected: String,
        found: String,
    },

    /// Invalid version header.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// A register is used but never declared.
    #[error("Undeclared register '{name}' at line {line}")]
    UnknownDeclaration { name: String, line: usize },

    /// Duplicate register declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// A custom gate collides with a standard gate or an earlier custom gate.
    #[error("Duplicate gate name: {0}")]
    DuplicateGateName(String),

    /// Invocation names neither a standard nor a custom gate.
    #[error("Unknown gate '{name}' in statement {statement} (line {line})")]
    UnknownGate {
        name: String,
        statement: usize,
        line: usize,
    },

    /// Wrong number of qubit, parameter or bit arguments.
    #[error("Gate '{gate}' expects {expected} {what} argument(s), got {got}")]
    ArityMismatch {
        gate: String,
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A gate body references a name that is not one of the gate's formals.
    #[error("Gate '{gate}' references undefined formal '{name}'")]
    UndefinedFormal { gate: String, name: String },

    /// A parameter expression names something that is not a constant.
    #[error("Unresolved parameter '{name}' at line {line}")]
    UnresolvedParameter { name: String, line: usize },

    /// Custom gate expansion exceeded the recursion-depth guard.
    #[error("Cyclic gate definition: expanding '{gate}' exceeded depth {depth}")]
    CyclicGateDefinition { gate: String, depth: usize },

    /// Recognised QASM construct that the translator does not model.
    #[error("Unsupported construct at line {line}: {construct}")]
    Unsupported { line: usize, construct: String },

    /// Invalid translation options.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Result type for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;
