//! Register declarations and flat-index resolution.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{Operand, Program, StatementKind};
use crate::error::{TranslateError, TranslateResult};

/// Which index space a register lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegisterKind {
    Qubit,
    Classical,
}

impl std::fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterKind::Qubit => write!(f, "qubit"),
            RegisterKind::Classical => write!(f, "bit"),
        }
    }
}

/// A declared register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    pub name: String,
    pub kind: RegisterKind,
    pub size: u32,
    /// Sum of the sizes of all earlier registers of the same kind.
    ///
    /// Flat indices are `u64` so that `offset + index` never overflows for
    /// any `u32` size or index.
    pub offset: u64,
}

impl Register {
    /// Flat indices covered by this register.
    pub fn indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.offset..self.offset + u64::from(self.size)
    }
}

/// All registers of a program, in declaration order per kind.
#[derive(Debug, Clone, Default)]
pub struct RegisterTable {
    qubits: Vec<Register>,
    clbits: Vec<Register>,
    qubit_index: FxHashMap<String, usize>,
    clbit_index: FxHashMap<String, usize>,
}

impl RegisterTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a register, assigning it the next free offset of its kind.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        kind: RegisterKind,
        size: u32,
    ) -> TranslateResult<&Register> {
        let name = name.into();
        let (registers, index) = match kind {
            RegisterKind::Qubit => (&mut self.qubits, &mut self.qubit_index),
            RegisterKind::Classical => (&mut self.clbits, &mut self.clbit_index),
        };

        if index.contains_key(&name) {
            return Err(TranslateError::DuplicateDeclaration(format!("{kind} register '{name}'")));
        }

        let offset = registers.last().map_or(0, |r| r.offset + u64::from(r.size));
        index.insert(name.clone(), registers.len());
        registers.push(Register {
            name,
            kind,
            size,
            offset,
        });

        Ok(&registers[registers.len() - 1])
    }

    /// Look up a register by kind and name.
    pub fn get(&self, kind: RegisterKind, name: &str) -> Option<&Register> {
        match kind {
            RegisterKind::Qubit => self.qubit_index.get(name).map(|&i| &self.qubits[i]),
            RegisterKind::Classical => self.clbit_index.get(name).map(|&i| &self.clbits[i]),
        }
    }

    /// Qubit registers in declaration order.
    pub fn qubit_registers(&self) -> &[Register] {
        &self.qubits
    }

    /// Classical registers in declaration order.
    pub fn clbit_registers(&self) -> &[Register] {
        &self.clbits
    }

    /// Total number of qubits.
    pub fn num_qubits(&self) -> u64 {
        self.qubits.iter().map(|r| u64::from(r.size)).sum()
    }

    /// Total number of classical bits.
    pub fn num_clbits(&self) -> u64 {
        self.clbits.iter().map(|r| u64::from(r.size)).sum()
    }

    /// Flat index of `name[index]`.
    pub fn flat_index(
        &self,
        kind: RegisterKind,
        name: &str,
        index: u32,
        line: usize,
    ) -> TranslateResult<u64> {
        let register = self.lookup(kind, name, line)?;
        Ok(register.offset + u64::from(index))
    }

    /// Flat indices an operand refers to: one for `q[i]`, all of `q` for a
    /// whole register.
    pub fn resolve(
        &self,
        kind: RegisterKind,
        operand: &Operand,
        line: usize,
    ) -> TranslateResult<Vec<u64>> {
        let register = self.lookup(kind, &operand.register, line)?;
        Ok(match operand.index {
            Some(i) => vec![register.offset + u64::from(i)],
            None => register.indices().collect(),
        })
    }

    fn lookup(&self, kind: RegisterKind, name: &str, line: usize) -> TranslateResult<&Register> {
        self.get(kind, name)
            .ok_or_else(|| TranslateError::UnknownDeclaration {
                name: name.to_string(),
                line,
            })
    }
}

/// Collect every register declaration of a program.
pub fn extract_registers(program: &Program) -> TranslateResult<RegisterTable> {
    let mut table = RegisterTable::new();

    for statement in &program.statements {
        match &statement.kind {
            StatementKind::QubitDecl { name, size } => {
                table.declare(name.as_str(), RegisterKind::Qubit, *size)?;
            }
            StatementKind::BitDecl { name, size } => {
                table.declare(name.as_str(), RegisterKind::Classical, *size)?;
            }
            _ => {}
        }
    }

    debug!(
        qubits = table.num_qubits(),
        clbits = table.num_clbits(),
        "Extracted registers"
    );
    Ok(table)
}
