//! Statement translation into circuit operations.
//!
//! The translator walks top-level statements in source order and appends one
//! [`Operation`] per target method call. Custom gates are inlined: each call
//! is replaced by its template body with formals bound to the actual flat
//! qubit indices and parameter expressions, recursively.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, trace};

use crate::ast::{Expression, GateCall, Operand, Program, StatementKind};
use crate::config::TranslateOptions;
use crate::error::{TranslateError, TranslateResult};
use crate::gates::{GateTable, GateTemplate, Resolved, StandardGateSpec};
use crate::registers::{RegisterKind, RegisterTable};

/// One `QuantumCircuit` method call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub method: &'static str,
    /// Rendered arguments: parameters first, then flat indices.
    pub args: Vec<String>,
}

impl Operation {
    fn new(method: &'static str, args: Vec<String>) -> Self {
        Self { method, args }
    }
}

/// Translates a parsed program against its register and gate tables.
pub struct Translator<'a> {
    registers: &'a RegisterTable,
    gates: &'a GateTable,
    options: &'a TranslateOptions,
    buffer: Vec<Operation>,
    /// 1-based position of the top-level statement being translated.
    statement: usize,
}

impl<'a> Translator<'a> {
    /// Create a translator with an empty buffer.
    pub fn new(
        registers: &'a RegisterTable,
        gates: &'a GateTable,
        options: &'a TranslateOptions,
    ) -> Self {
        Self {
            registers,
            gates,
            options,
            buffer: Vec::new(),
            statement: 0,
        }
    }

    /// Translate every statement and return the buffered operations.
    pub fn translate(mut self, program: &Program) -> TranslateResult<Vec<Operation>> {
        for (position, statement) in program.statements.iter().enumerate() {
            self.statement = position + 1;
            let line = statement.line;

            match &statement.kind {
                StatementKind::QubitDecl { .. }
                | StatementKind::BitDecl { .. }
                | StatementKind::GateDef(_) => {}
                StatementKind::Gate(call) => self.translate_call(call)?,
                StatementKind::Measure { qubits, bits } => {
                    self.translate_measure(qubits, bits, line)?;
                }
                StatementKind::Reset { qubits } => {
                    for j in self.flatten(RegisterKind::Qubit, qubits, line)? {
                        self.push(Operation::new("reset", vec![j.to_string()]));
                    }
                }
                StatementKind::Barrier { qubits } => {
                    let indices = self.flatten(RegisterKind::Qubit, qubits, line)?;
                    let args = if indices.is_empty() {
                        vec![]
                    } else {
                        vec![format!("[{}]", join(&indices))]
                    };
                    self.push(Operation::new("barrier", args));
                }
            }
        }

        debug!(operations = self.buffer.len(), "Translated statements");
        Ok(self.buffer)
    }

    fn push(&mut self, operation: Operation) {
        trace!(method = operation.method, args = ?operation.args, "Emit");
        self.buffer.push(operation);
    }

    /// Measurements pair qubits and bits element-wise.
    fn translate_measure(
        &mut self,
        qubits: &[Operand],
        bits: &[Operand],
        line: usize,
    ) -> TranslateResult<()> {
        let qubits = self.flatten(RegisterKind::Qubit, qubits, line)?;
        let bits = self.flatten(RegisterKind::Classical, bits, line)?;

        if qubits.len() != bits.len() {
            return Err(TranslateError::ArityMismatch {
                gate: "measure".into(),
                what: "bit",
                expected: qubits.len(),
                got: bits.len(),
            });
        }

        for (q, c) in qubits.into_iter().zip(bits) {
            self.push(Operation::new("measure", vec![q.to_string(), c.to_string()]));
        }
        Ok(())
    }

    /// Resolve and concatenate operands.
    fn flatten(
        &self,
        kind: RegisterKind,
        operands: &[Operand],
        line: usize,
    ) -> TranslateResult<Vec<u64>> {
        let mut indices = Vec::new();
        for operand in operands {
            indices.extend(self.registers.resolve(kind, operand, line)?);
        }
        Ok(indices)
    }

    /// Translate a top-level gate call, broadcasting over whole registers.
    fn translate_call(&mut self, call: &GateCall) -> TranslateResult<()> {
        let gate = self.resolve(call)?;

        for expr in &call.params {
            if let Some(name) = expr.free_identifier() {
                return Err(TranslateError::UnresolvedParameter {
                    name: name.to_string(),
                    line: call.line,
                });
            }
        }

        for qubits in self.broadcast(call)? {
            self.apply(gate, &call.name, &call.params, &qubits, 0, call.line)?;
        }
        Ok(())
    }

    fn resolve(&self, call: &GateCall) -> TranslateResult<Resolved<'a>> {
        self.gates
            .resolve(&call.name)
            .ok_or_else(|| TranslateError::UnknownGate {
                name: call.name.clone(),
                statement: self.statement,
                line: call.line,
            })
    }

    /// Expand whole-register operands into one row of flat indices per
    /// element. All whole-register operands must have the same size.
    fn broadcast(&self, call: &GateCall) -> TranslateResult<Vec<Vec<u64>>> {
        let resolved = call
            .qubits
            .iter()
            .map(|op| self.registers.resolve(RegisterKind::Qubit, op, call.line))
            .collect::<TranslateResult<Vec<_>>>()?;

        let mut width = None;
        for (operand, indices) in call.qubits.iter().zip(&resolved) {
            if operand.index.is_some() {
                continue;
            }
            match width {
                None => width = Some(indices.len()),
                Some(n) if n != indices.len() => {
                    return Err(TranslateError::ArityMismatch {
                        gate: call.name.clone(),
                        what: "broadcast register",
                        expected: n,
                        got: indices.len(),
                    });
                }
                Some(_) => {}
            }
        }

        let rows = width.unwrap_or(1);
        Ok((0..rows)
            .map(|row| {
                call.qubits
                    .iter()
                    .zip(&resolved)
                    .map(|(operand, indices)| {
                        if operand.index.is_some() {
                            indices[0]
                        } else {
                            indices[row]
                        }
                    })
                    .collect()
            })
            .collect())
    }

    /// Apply a resolved gate to concrete qubits with closed parameters.
    fn apply(
        &mut self,
        gate: Resolved<'a>,
        name: &str,
        params: &[Expression],
        qubits: &[u64],
        depth: usize,
        line: usize,
    ) -> TranslateResult<()> {
        match gate {
            Resolved::Standard(spec) => self.apply_standard(spec, name, params, qubits, line),
            Resolved::Custom(template) => {
                if depth >= self.options.max_expansion_depth {
                    return Err(TranslateError::CyclicGateDefinition {
                        gate: template.name.clone(),
                        depth: self.options.max_expansion_depth,
                    });
                }
                self.expand(template, params, qubits, depth)
            }
        }
    }

    fn apply_standard(
        &mut self,
        spec: &'static StandardGateSpec,
        name: &str,
        params: &[Expression],
        qubits: &[u64],
        line: usize,
    ) -> TranslateResult<()> {
        check_arity(name, "qubit", spec.num_qubits, qubits.len())?;
        check_arity(name, "parameter", spec.num_params, params.len())?;

        let mut args = spec
            .method_params(params)
            .iter()
            .map(|p| render_param(p, line))
            .collect::<TranslateResult<Vec<_>>>()?;
        args.extend(qubits.iter().map(ToString::to_string));

        self.push(Operation::new(spec.method, args));
        Ok(())
    }

    /// Inline a custom gate body.
    fn expand(
        &mut self,
        template: &'a GateTemplate,
        params: &[Expression],
        qubits: &[u64],
        depth: usize,
    ) -> TranslateResult<()> {
        check_arity(&template.name, "qubit", template.qubits.len(), qubits.len())?;
        check_arity(&template.name, "parameter", template.params.len(), params.len())?;

        let qubit_bindings: FxHashMap<&str, u64> = template
            .qubits
            .iter()
            .map(String::as_str)
            .zip(qubits.iter().copied())
            .collect();
        let param_bindings: FxHashMap<&str, &Expression> =
            template.params.iter().map(String::as_str).zip(params).collect();

        for call in &template.body {
            let gate = self.resolve(call)?;

            let actual_qubits = call
                .qubits
                .iter()
                .map(|operand| {
                    qubit_bindings
                        .get(operand.register.as_str())
                        .copied()
                        .ok_or_else(|| TranslateError::UndefinedFormal {
                            gate: template.name.clone(),
                            name: operand.register.clone(),
                        })
                })
                .collect::<TranslateResult<Vec<_>>>()?;

            let actual_params = call
                .params
                .iter()
                .map(|expr| {
                    let bound = expr.substitute(&param_bindings);
                    match bound.free_identifier() {
                        Some(name) => Err(TranslateError::UndefinedFormal {
                            gate: template.name.clone(),
                            name: name.to_string(),
                        }),
                        None => Ok(bound),
                    }
                })
                .collect::<TranslateResult<Vec<_>>>()?;

            self.apply(
                gate,
                &call.name,
                &actual_params,
                &actual_qubits,
                depth + 1,
                call.line,
            )?;
        }
        Ok(())
    }
}

fn check_arity(gate: &str, what: &'static str, expected: usize, got: usize) -> TranslateResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(TranslateError::ArityMismatch {
            gate: gate.to_string(),
            what,
            expected,
            got,
        })
    }
}

/// Render a closed parameter expression as a Python literal.
///
/// Literals (and negated literals) keep their source text; anything else is
/// folded to a float.
pub fn render_param(expr: &Expression, line: usize) -> TranslateResult<String> {
    match expr {
        Expression::Number(text) => return Ok(python_literal(text)),
        Expression::Neg(inner) => {
            if let Expression::Number(text) = inner.as_ref() {
                return Ok(format!("-{}", python_literal(text)));
            }
        }
        _ => {}
    }

    let value = expr
        .as_f64()
        .ok_or_else(|| TranslateError::UnresolvedParameter {
            name: unevaluable_name(expr).unwrap_or("expression").to_string(),
            line,
        })?;
    Ok(format_float(value))
}

/// Python rejects leading zeros on integer literals (`007`); floats such as
/// `007.5` are fine as written.
fn python_literal(text: &str) -> String {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return text.to_string();
    }
    match text.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Format like Python's `repr(float)`: always a valid float literal.
fn format_float(value: f64) -> String {
    if value.is_nan() {
        "float('nan')".into()
    } else if value.is_infinite() {
        if value > 0.0 {
            "float('inf')".into()
        } else {
            "-float('inf')".into()
        }
    } else {
        format!("{value:?}")
    }
}

/// The function or identifier that prevents constant folding.
fn unevaluable_name(expr: &Expression) -> Option<&str> {
    if expr.as_f64().is_some() {
        return None;
    }
    match expr {
        Expression::Identifier(name) => Some(name.as_str()),
        Expression::FnCall { name, args } => args
            .iter()
            .find_map(unevaluable_name)
            .or(Some(name.as_str())),
        Expression::Neg(e) | Expression::Paren(e) => unevaluable_name(e),
        Expression::BinOp { left, right, .. } => {
            unevaluable_name(left).or_else(|| unevaluable_name(right))
        }
        Expression::Number(_) | Expression::Pi | Expression::Tau | Expression::Euler => None,
    }
}

fn join(indices: &[u64]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;
    use crate::preprocess::preprocess;
    use crate::registers::extract_registers;

    fn operations(source: &str, options: &TranslateOptions) -> TranslateResult<Vec<Operation>> {
        let pre = preprocess(source)?;
        let program = parse_program(pre.version, &pre.statements)?;
        let registers = extract_registers(&program)?;
        let gates = GateTable::build(&program)?;
        Translator::new(&registers, &gates, options).translate(&program)
    }

    fn ops(source: &str) -> Vec<(String, Vec<String>)> {
        operations(source, &TranslateOptions::default())
            .unwrap()
            .into_iter()
            .map(|op| (op.method.to_string(), op.args))
            .collect()
    }

    fn op(method: &str, args: &[&str]) -> (String, Vec<String>) {
        (
            method.to_string(),
            args.iter().map(ToString::to_string).collect(),
        )
    }

    #[test]
    fn test_flat_indices_across_registers() {
        let result = ops("OPENQASM 3; qubit[2] q; qubit[3] r; x r[1];");
        assert_eq!(result, vec![op("x", &["3"])]);
    }

    #[test]
    fn test_template_expansion() {
        let result = ops("OPENQASM 3; qubit[2] q; gate bell a, b { h a; cx a, b; } bell q[0], q[1];");
        assert_eq!(result, vec![op("h", &["0"]), op("cx", &["0", "1"])]);
    }

    #[test]
    fn test_nested_templates_with_angles() {
        let result = ops(
            r"
            OPENQASM 3;
            qubit[3] q;
            gate twist(theta) a { rz(theta) a; rx(-theta) a; }
            gate pair(phi) a, b { twist(phi) b; cx a, b; }
            pair(0.25) q[2], q[0];
        ",
        );
        assert_eq!(
            result,
            vec![
                op("rz", &["0.25", "0"]),
                op("rx", &["-0.25", "0"]),
                op("cx", &["2", "0"]),
            ]
        );
    }

    #[test]
    fn test_parameter_rendering() {
        let result = ops("OPENQASM 3; qubit q; rz(0.5) q; rz(-1e-3) q; rx(pi/2) q; ry(2*pi) q;");
        assert_eq!(
            result,
            vec![
                op("rz", &["0.5", "0"]),
                op("rz", &["-1e-3", "0"]),
                op("rx", &["1.5707963267948966", "0"]),
                op("ry", &["6.283185307179586", "0"]),
            ]
        );
    }

    #[test]
    fn test_cycle_detected() {
        let err = operations(
            "OPENQASM 3; qubit q; gate loop a { loop a; } loop q;",
            &TranslateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::CyclicGateDefinition { depth: 64, .. }));
    }

    #[test]
    fn test_mutual_recursion_detected() {
        let options = TranslateOptions::default().with_max_expansion_depth(4);
        let err = operations(
            "OPENQASM 3; qubit q; gate a x { b x; } gate b x { a x; } a q[0];",
            &options,
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::CyclicGateDefinition { depth: 4, .. }));
    }

    #[test]
    fn test_broadcast() {
        let result = ops("OPENQASM 3; qubit[2] q; qubit[2] r; qubit t; h q; cx q, r; cx t[0], q;");
        assert_eq!(
            result,
            vec![
                op("h", &["0"]),
                op("h", &["1"]),
                op("cx", &["0", "2"]),
                op("cx", &["1", "3"]),
                op("cx", &["4", "0"]),
                op("cx", &["4", "1"]),
            ]
        );
    }

    #[test]
    fn test_broadcast_size_mismatch() {
        let err = operations(
            "OPENQASM 3; qubit[2] q; qubit[3] r; cx q, r;",
            &TranslateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::ArityMismatch { expected: 2, got: 3, .. }));
    }

    #[test]
    fn test_measure_reset_barrier() {
        let result = ops(
            "OPENQASM 3; qubit[2] q; bit[2] c; reset q[1]; barrier q; barrier; c = measure q;",
        );
        assert_eq!(
            result,
            vec![
                op("reset", &["1"]),
                op("barrier", &["[0, 1]"]),
                op("barrier", &[]),
                op("measure", &["0", "0"]),
                op("measure", &["1", "1"]),
            ]
        );
    }

    #[test]
    fn test_arity_errors() {
        let options = TranslateOptions::default();

        let err = operations("OPENQASM 3; qubit[2] q; h q[0], q[1];", &options).unwrap_err();
        assert!(matches!(err, TranslateError::ArityMismatch { what: "qubit", expected: 1, got: 2, .. }));

        let err = operations("OPENQASM 3; qubit q; rz q;", &options).unwrap_err();
        assert!(matches!(err, TranslateError::ArityMismatch { what: "parameter", .. }));

        let err = operations("OPENQASM 3; qubit[2] q; bit c; c = measure q;", &options).unwrap_err();
        assert!(matches!(err, TranslateError::ArityMismatch { what: "bit", .. }));
    }

    #[test]
    fn test_undefined_formal() {
        let err = operations(
            "OPENQASM 3; qubit[2] q; gate g a { cx a, b; } g q[0];",
            &TranslateOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TranslateError::UndefinedFormal {
                gate: "g".into(),
                name: "b".into()
            }
        );

        let err = operations(
            "OPENQASM 3; qubit q; gate g(theta) a { rz(phi) a; } g(1) q;",
            &TranslateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::UndefinedFormal { name, .. } if name == "phi"));
    }

    #[test]
    fn test_unknown_gate_position() {
        let err = operations(
            "OPENQASM 3;\nqubit q;\nh q;\nfoo q;",
            &TranslateOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            TranslateError::UnknownGate {
                name: "foo".into(),
                statement: 3,
                line: 4
            }
        );
    }

    #[test]
    fn test_unresolved_parameter() {
        let err = operations("OPENQASM 3; qubit q; rz(theta) q;", &TranslateOptions::default())
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnresolvedParameter { name, .. } if name == "theta"));

        let err = operations("OPENQASM 3; qubit q; rz(foo(1)) q;", &TranslateOptions::default())
            .unwrap_err();
        assert!(matches!(err, TranslateError::UnresolvedParameter { name, .. } if name == "foo"));
    }

    #[test]
    fn test_integer_literals_lose_leading_zeros() {
        let result = ops("OPENQASM 3; qubit q; rz(007) q; rz(-00) q; rz(007.5) q;");
        assert_eq!(
            result,
            vec![
                op("rz", &["7", "0"]),
                op("rz", &["-0", "0"]),
                op("rz", &["007.5", "0"]),
            ]
        );
    }

    #[test]
    fn test_qelib1_lowering() {
        let result = ops(
            "OPENQASM 2.0; qreg q[2]; u2(0,pi) q[0]; cu1(pi/2) q[0],q[1]; \
             cu3(1,2,3) q[0],q[1]; csx q[0],q[1];",
        );
        assert_eq!(
            result,
            vec![
                op("u", &["1.5707963267948966", "0", "3.141592653589793", "0"]),
                op("cp", &["1.5707963267948966", "0", "1"]),
                op("cu", &["1", "2", "3", "0", "0", "1"]),
                op("csx", &["0", "1"]),
            ]
        );
    }

    #[test]
    fn test_qelib1_arity_is_qasm_side() {
        let err = operations(
            "OPENQASM 2.0; qreg q[1]; u2(0,0,0) q[0];",
            &TranslateOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TranslateError::ArityMismatch { what: "parameter", expected: 2, got: 3, .. }
        ));
    }

    #[test]
    fn test_indices_beyond_u32() {
        let result = ops("OPENQASM 3; qubit q; qubit r; x r[4294967295];");
        assert_eq!(result, vec![op("x", &["4294967296"])]);

        let result = ops("OPENQASM 3; qubit[4294967295] q; qubit[2] r; x r[0];");
        assert_eq!(result, vec![op("x", &["4294967295"])]);
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(f64::INFINITY), "float('inf')");
    }
}
