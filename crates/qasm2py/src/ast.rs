//! Syntax tree for the QASM statements the translator understands.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::preprocess::QasmVersion;

/// A parsed QASM program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// QASM version from the header.
    pub version: QasmVersion,
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// A top-level statement with its source line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

/// The statement forms accepted by the translator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatementKind {
    /// Qubit register: `qubit[n] name;`, `qubit name;`, `qreg name[n];`
    QubitDecl { name: String, size: u32 },

    /// Classical register: `bit[n] name;`, `bit name;`, `creg name[n];`
    BitDecl { name: String, size: u32 },

    /// Custom gate definition.
    GateDef(GateDef),

    /// Gate application.
    Gate(GateCall),

    /// Measurement: `c[i] = measure q[j];` or `measure q[j] -> c[i];`
    Measure {
        qubits: Vec<Operand>,
        bits: Vec<Operand>,
    },

    /// Reset: `reset q;`
    Reset { qubits: Vec<Operand> },

    /// Barrier: `barrier q;` or `barrier;`
    Barrier { qubits: Vec<Operand> },
}

/// `gate <name>(<params>) <qubits> { <body> }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDef {
    pub name: String,
    /// Angle formals.
    pub params: Vec<String>,
    /// Qubit formals.
    pub qubits: Vec<String>,
    pub body: Vec<GateCall>,
}

/// A gate invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name.
    pub name: String,
    /// Gate parameters (angles, etc.).
    pub params: Vec<Expression>,
    /// Qubit arguments.
    pub qubits: Vec<Operand>,
    /// Source line of the invocation.
    pub line: usize,
}

/// A register reference: `q` (whole register or gate formal) or `q[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub register: String,
    pub index: Option<u32>,
}

impl Operand {
    /// Reference a single element of a register.
    pub fn single(register: impl Into<String>, index: u32) -> Self {
        Operand {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Reference an entire register, or a gate formal.
    pub fn register(register: impl Into<String>) -> Self {
        Operand {
            register: register.into(),
            index: None,
        }
    }
}

/// A parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Numeric literal, kept as written.
    Number(String),
    /// Identifier (angle formal inside a gate body).
    Identifier(String),
    /// Pi constant.
    Pi,
    /// Tau constant (2π).
    Tau,
    /// Euler's number.
    Euler,
    /// Negation.
    Neg(Box<Expression>),
    /// Binary operation.
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    /// Function call: `sin(x)`, `sqrt(2)`, ...
    FnCall { name: String, args: Vec<Expression> },
    /// Parenthesized expression.
    Paren(Box<Expression>),
}

impl Expression {
    /// Try to evaluate as a constant f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expression::Number(text) => text.parse().ok(),
            Expression::Pi => Some(std::f64::consts::PI),
            Expression::Tau => Some(std::f64::consts::TAU),
            Expression::Euler => Some(std::f64::consts::E),
            Expression::Neg(e) => e.as_f64().map(|v| -v),
            Expression::BinOp { left, op, right } => {
                let l = left.as_f64()?;
                let r = right.as_f64()?;
                Some(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                    BinOp::Mod => l % r,
                })
            }
            Expression::FnCall { name, args } => {
                let [arg] = args.as_slice() else {
                    return None;
                };
                let v = arg.as_f64()?;
                match name.as_str() {
                    "sin" => Some(v.sin()),
                    "cos" => Some(v.cos()),
                    "tan" => Some(v.tan()),
                    "arcsin" | "asin" => Some(v.asin()),
                    "arccos" | "acos" => Some(v.acos()),
                    "arctan" | "atan" => Some(v.atan()),
                    "exp" => Some(v.exp()),
                    "ln" | "log" => Some(v.ln()),
                    "sqrt" => Some(v.sqrt()),
                    _ => None,
                }
            }
            Expression::Paren(e) => e.as_f64(),
            Expression::Identifier(_) => None,
        }
    }

    /// First identifier that is not bound to a value, if any.
    pub fn free_identifier(&self) -> Option<&str> {
        match self {
            Expression::Identifier(name) => Some(name.as_str()),
            Expression::Neg(e) | Expression::Paren(e) => e.free_identifier(),
            Expression::BinOp { left, right, .. } => {
                left.free_identifier().or_else(|| right.free_identifier())
            }
            Expression::FnCall { args, .. } => args.iter().find_map(Expression::free_identifier),
            Expression::Number(_) | Expression::Pi | Expression::Tau | Expression::Euler => None,
        }
    }

    /// Replace identifiers by the expressions bound to them.
    pub fn substitute(&self, bindings: &FxHashMap<&str, &Expression>) -> Expression {
        match self {
            Expression::Identifier(name) => bindings
                .get(name.as_str())
                .map_or_else(|| self.clone(), |bound| (*bound).clone()),
            Expression::Neg(e) => Expression::Neg(Box::new(e.substitute(bindings))),
            Expression::Paren(e) => Expression::Paren(Box::new(e.substitute(bindings))),
            Expression::BinOp { left, op, right } => Expression::BinOp {
                left: Box::new(left.substitute(bindings)),
                op: *op,
                right: Box::new(right.substitute(bindings)),
            },
            Expression::FnCall { name, args } => Expression::FnCall {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            Expression::Number(_) | Expression::Pi | Expression::Tau | Expression::Euler => {
                self.clone()
            }
        }
    }
}

/// Arithmetic operators allowed in gate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_expression_eval() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Pi),
            op: BinOp::Div,
            right: Box::new(Expression::Number("2".into())),
        };

        let result = expr.as_f64().unwrap();
        assert!((result - PI / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_function_eval() {
        let expr = Expression::FnCall {
            name: "sqrt".into(),
            args: vec![Expression::Number("4".into())],
        };
        assert_eq!(expr.as_f64(), Some(2.0));
    }

    #[test]
    fn test_substitute_formal() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Identifier("theta".into())),
            op: BinOp::Mul,
            right: Box::new(Expression::Number("2".into())),
        };
        assert_eq!(expr.free_identifier(), Some("theta"));
        assert_eq!(expr.as_f64(), None);

        let actual = Expression::Number("0.25".into());
        let mut bindings = FxHashMap::default();
        bindings.insert("theta", &actual);

        let bound = expr.substitute(&bindings);
        assert_eq!(bound.free_identifier(), None);
        assert_eq!(bound.as_f64(), Some(0.5));
    }

    #[test]
    fn test_operand_constructors() {
        assert_eq!(Operand::single("q", 1).index, Some(1));
        assert_eq!(Operand::register("a").index, None);
    }
}
