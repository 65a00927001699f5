//! `OpenQASM` 2/3 to Qiskit Python Translator
//!
//! This crate turns `OpenQASM` 2.0 and 3.0 source into Python code that
//! builds the same circuit with Qiskit's `QuantumCircuit`, one method call
//! per gate.
//!
//! # Pipeline
//!
//! 1. **Preprocess**: strip comments and `include` lines, read the version
//!    header, split the text into statements and `{ ... }` blocks.
//! 2. **Sanitize**: drop `ctrl @`, `negctrl @`, `inv @` and `pow(k) @`
//!    modifiers (logged as a warning).
//! 3. **Parse**: turn statements into a small syntax tree.
//! 4. **Declarations**: assign flat qubit and bit indices to registers.
//! 5. **Gates**: collect custom `gate` definitions next to the built-in table.
//! 6. **Translate**: expand custom gates and buffer one operation per call.
//! 7. **Emit**: render the buffer as Python.
//!
//! Any error aborts the whole translation; partial output is never returned.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 3.0;` |
//! | Qubit declarations | ✅ | `qubit[5] q;`, `qreg q[5];` |
//! | Classical bits | ✅ | `bit[5] c;`, `creg c[5];` |
//! | Standard gates | ✅ | `h q[0];`, `cx q[0], q[1];` |
//! | Parameterized gates | ✅ | `rx(pi/4) q[0];` |
//! | Custom gates | ✅ (inlined) | `gate bell a, b { h a; cx a, b; }` |
//! | Measurements | ✅ | `c[0] = measure q[0];`, `measure q -> c;` |
//! | Barriers | ✅ | `barrier q;` |
//! | Reset | ✅ | `reset q[0];` |
//! | Gate modifiers | ⚠️ dropped | `ctrl @ x a, b;` |
//! | Control flow | ❌ | `if (c == 1) { ... }` |
//!
//! # Example
//!
//! ```rust
//! use qasm2py::{translate, TranslateOptions};
//!
//! let qasm = r#"
//!     OPENQASM 3.0;
//!     qubit[2] q;
//!     h q[0];
//!     cx q[0], q[1];
//! "#;
//!
//! let code = translate(qasm, &TranslateOptions::default()).unwrap();
//! assert_eq!(
//!     code,
//!     "from qiskit import QuantumCircuit\n\nqc = QuantumCircuit(2, 0)\nqc.h(0)\nqc.cx(0, 1)"
//! );
//! ```
//!
//! # Example: Report
//!
//! ```rust
//! use qasm2py::{translate_with_report, TranslateOptions};
//!
//! let options = TranslateOptions::new().with_variable_name("circ");
//! let report = translate_with_report("qubit[3] q; h q;", &options).unwrap();
//! assert_eq!(report.num_qubits, 3);
//! assert_eq!(report.num_operations, 3);
//! assert!(report.code.contains("circ.h(2)"));
//! ```

mod ast;
mod config;
mod emitter;
mod error;
mod gates;
mod lexer;
mod parser;
mod preprocess;
mod registers;
mod sanitize;
mod translator;

use serde::Serialize;
use tracing::{debug, instrument};

pub use config::{DEFAULT_MAX_EXPANSION_DEPTH, DEFAULT_VARIABLE_NAME, TranslateOptions};
pub use emitter::{IMPORT_LINE, emit};
pub use error::{TranslateError, TranslateResult};
pub use gates::{GateTable, GateTemplate, Resolved, StandardGateSpec, standard_gate, standard_gates};
pub use parser::parse_program;
pub use preprocess::{Preprocessed, QasmVersion, SourceStatement, preprocess};
pub use registers::{Register, RegisterKind, RegisterTable, extract_registers};
pub use sanitize::{sanitize, strip_modifiers};
pub use translator::{Operation, Translator, render_param};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}

/// Result of a translation together with circuit statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// Generated Python code.
    pub code: String,
    pub num_qubits: u64,
    pub num_clbits: u64,
    /// Number of emitted gate, measure, reset and barrier calls.
    pub num_operations: usize,
    /// Statements whose gate modifiers were dropped.
    pub stripped_modifiers: usize,
    pub version: QasmVersion,
}

/// Translate QASM source into Python code.
pub fn translate(source: &str, options: &TranslateOptions) -> TranslateResult<String> {
    translate_with_report(source, options).map(|t| t.code)
}

/// Translate QASM source and report circuit statistics.
#[instrument(skip_all)]
pub fn translate_with_report(
    source: &str,
    options: &TranslateOptions,
) -> TranslateResult<Translation> {
    options.validate()?;

    let Preprocessed {
        version,
        statements,
    } = preprocess(source)?;
    let (statements, stripped_modifiers) = sanitize(statements);
    let program = parse_program(version, &statements)?;

    let registers = extract_registers(&program)?;
    let gates = GateTable::build(&program)?;
    let operations = Translator::new(&registers, &gates, options).translate(&program)?;

    let num_qubits = registers.num_qubits();
    let num_clbits = registers.num_clbits();
    let code = emit(&operations, num_qubits, num_clbits, options);

    debug!(
        %version,
        num_qubits,
        num_clbits,
        operations = operations.len(),
        "Translation complete"
    );

    Ok(Translation {
        code,
        num_qubits,
        num_clbits,
        num_operations: operations.len(),
        stripped_modifiers,
        version,
    })
}
