//! Standard gate table and custom gate templates.
//!
//! Standard gates map a QASM gate name onto a single `QuantumCircuit`
//! method. Custom gates come from `gate` blocks in the source and are
//! expanded by the translator into standard-gate calls.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

use crate::ast::{BinOp, Expression, GateCall, Program, StatementKind};
use crate::error::{TranslateError, TranslateResult};

/// How the QASM parameters of a standard gate map onto method arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamLayout {
    /// Passed through unchanged.
    Direct,
    /// `u2(phi, lambda)` becomes `u(pi/2, phi, lambda)`.
    LeadingHalfPi,
    /// `cu3(theta, phi, lambda)` becomes `cu(theta, phi, lambda, 0)`.
    TrailingZero,
}

/// A gate with a direct `QuantumCircuit` method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StandardGateSpec {
    /// QASM name (aliases have their own entry).
    pub name: &'static str,
    /// Target method name.
    pub method: &'static str,
    pub num_qubits: usize,
    /// Parameter count on the QASM side.
    pub num_params: usize,
    pub layout: ParamLayout,
}

impl StandardGateSpec {
    const fn new(
        name: &'static str,
        method: &'static str,
        num_qubits: usize,
        num_params: usize,
    ) -> Self {
        Self {
            name,
            method,
            num_qubits,
            num_params,
            layout: ParamLayout::Direct,
        }
    }

    const fn with_layout(mut self, layout: ParamLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Method arguments for the given QASM parameters.
    pub fn method_params(&self, params: &[Expression]) -> Vec<Expression> {
        let mut out = Vec::with_capacity(params.len() + 1);
        if self.layout == ParamLayout::LeadingHalfPi {
            out.push(Expression::BinOp {
                left: Box::new(Expression::Pi),
                op: BinOp::Div,
                right: Box::new(Expression::Number("2".into())),
            });
        }
        out.extend_from_slice(params);
        if self.layout == ParamLayout::TrailingZero {
            out.push(Expression::Number("0".into()));
        }
        out
    }

    /// Whether the gate takes exactly one angle.
    pub fn has_angle_param(&self) -> bool {
        self.num_params == 1
    }
}

static STANDARD_GATES: &[StandardGateSpec] = &[
    // Single-qubit
    StandardGateSpec::new("id", "id", 1, 0),
    StandardGateSpec::new("i", "id", 1, 0),
    StandardGateSpec::new("x", "x", 1, 0),
    StandardGateSpec::new("y", "y", 1, 0),
    StandardGateSpec::new("z", "z", 1, 0),
    StandardGateSpec::new("h", "h", 1, 0),
    StandardGateSpec::new("s", "s", 1, 0),
    StandardGateSpec::new("sdg", "sdg", 1, 0),
    StandardGateSpec::new("t", "t", 1, 0),
    StandardGateSpec::new("tdg", "tdg", 1, 0),
    StandardGateSpec::new("sx", "sx", 1, 0),
    StandardGateSpec::new("sxdg", "sxdg", 1, 0),
    StandardGateSpec::new("rx", "rx", 1, 1),
    StandardGateSpec::new("ry", "ry", 1, 1),
    StandardGateSpec::new("rz", "rz", 1, 1),
    StandardGateSpec::new("p", "p", 1, 1),
    StandardGateSpec::new("phase", "p", 1, 1),
    StandardGateSpec::new("u1", "p", 1, 1),
    StandardGateSpec::new("u2", "u", 1, 2).with_layout(ParamLayout::LeadingHalfPi),
    StandardGateSpec::new("u", "u", 1, 3),
    StandardGateSpec::new("u3", "u", 1, 3),
    StandardGateSpec::new("U", "u", 1, 3),
    // Two-qubit
    StandardGateSpec::new("cx", "cx", 2, 0),
    StandardGateSpec::new("CX", "cx", 2, 0),
    StandardGateSpec::new("cnot", "cx", 2, 0),
    StandardGateSpec::new("cy", "cy", 2, 0),
    StandardGateSpec::new("cz", "cz", 2, 0),
    StandardGateSpec::new("ch", "ch", 2, 0),
    StandardGateSpec::new("csx", "csx", 2, 0),
    StandardGateSpec::new("swap", "swap", 2, 0),
    StandardGateSpec::new("iswap", "iswap", 2, 0),
    StandardGateSpec::new("ecr", "ecr", 2, 0),
    StandardGateSpec::new("cp", "cp", 2, 1),
    StandardGateSpec::new("cphase", "cp", 2, 1),
    StandardGateSpec::new("cu1", "cp", 2, 1),
    StandardGateSpec::new("crx", "crx", 2, 1),
    StandardGateSpec::new("cry", "cry", 2, 1),
    StandardGateSpec::new("crz", "crz", 2, 1),
    StandardGateSpec::new("cu", "cu", 2, 4),
    StandardGateSpec::new("cu3", "cu", 2, 3).with_layout(ParamLayout::TrailingZero),
    StandardGateSpec::new("rxx", "rxx", 2, 1),
    StandardGateSpec::new("ryy", "ryy", 2, 1),
    StandardGateSpec::new("rzz", "rzz", 2, 1),
    StandardGateSpec::new("rzx", "rzx", 2, 1),
    // Three-qubit
    StandardGateSpec::new("ccx", "ccx", 3, 0),
    StandardGateSpec::new("toffoli", "ccx", 3, 0),
    StandardGateSpec::new("cswap", "cswap", 3, 0),
    StandardGateSpec::new("fredkin", "cswap", 3, 0),
];

static STANDARD_INDEX: LazyLock<FxHashMap<&'static str, &'static StandardGateSpec>> =
    LazyLock::new(|| STANDARD_GATES.iter().map(|g| (g.name, g)).collect());

/// Look up a standard gate by QASM name.
pub fn standard_gate(name: &str) -> Option<&'static StandardGateSpec> {
    STANDARD_INDEX.get(name).copied()
}

/// Every standard gate, aliases included, in table order.
pub fn standard_gates() -> &'static [StandardGateSpec] {
    STANDARD_GATES
}

/// A parsed `gate` block.
#[derive(Debug, Clone, PartialEq)]
pub struct GateTemplate {
    pub name: String,
    /// Angle formals.
    pub params: Vec<String>,
    /// Qubit formals.
    pub qubits: Vec<String>,
    pub body: Vec<GateCall>,
    pub line: usize,
}

/// What a gate name refers to.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Custom(&'a GateTemplate),
    Standard(&'static StandardGateSpec),
}

/// Custom gates of one program plus the standard table.
#[derive(Debug, Clone, Default)]
pub struct GateTable {
    custom: FxHashMap<String, GateTemplate>,
}

impl GateTable {
    /// Collect the `gate` definitions of a program.
    ///
    /// Body calls are not resolved here, so a template may call a gate
    /// defined later in the file.
    pub fn build(program: &Program) -> TranslateResult<Self> {
        let mut table = Self::default();

        for statement in &program.statements {
            let StatementKind::GateDef(def) = &statement.kind else {
                continue;
            };

            table.define(GateTemplate {
                name: def.name.clone(),
                params: def.params.clone(),
                qubits: def.qubits.clone(),
                body: def.body.clone(),
                line: statement.line,
            })?;
        }

        debug!(custom_gates = table.custom.len(), "Built gate table");
        Ok(table)
    }

    /// Register a custom gate.
    pub fn define(&mut self, template: GateTemplate) -> TranslateResult<()> {
        if standard_gate(&template.name).is_some() || self.custom.contains_key(&template.name) {
            return Err(TranslateError::DuplicateGateName(template.name));
        }
        self.custom.insert(template.name.clone(), template);
        Ok(())
    }

    /// Resolve a gate name, custom definitions first.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        self.custom
            .get(name)
            .map(Resolved::Custom)
            .or_else(|| standard_gate(name).map(Resolved::Standard))
    }

    /// Number of custom gates.
    pub fn num_custom(&self) -> usize {
        self.custom.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operand;
    use crate::parser::parse_program;
    use crate::preprocess::preprocess;

    fn table(source: &str) -> TranslateResult<GateTable> {
        let pre = preprocess(source)?;
        GateTable::build(&parse_program(pre.version, &pre.statements)?)
    }

    #[test]
    fn test_standard_lookup() {
        let cx = standard_gate("cx").unwrap();
        assert_eq!(cx.num_qubits, 2);
        assert!(!cx.has_angle_param());

        let rz = standard_gate("rz").unwrap();
        assert!(rz.has_angle_param());

        assert_eq!(standard_gate("toffoli").unwrap().method, "ccx");
        assert_eq!(standard_gate("u1").unwrap().method, "p");
        assert!(standard_gate("foo").is_none());
    }

    #[test]
    fn test_required_gates_present() {
        for name in [
            "h", "x", "y", "z", "s", "t", "cx", "cz", "ccx", "swap", "rx", "ry", "rz",
        ] {
            assert!(standard_gate(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_qelib1_gates_present() {
        for name in ["u1", "u2", "u3", "cu1", "cu3", "csx", "crz", "cswap"] {
            assert!(standard_gate(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_method_params_layout() {
        let params = vec![Expression::Number("1".into()), Expression::Number("2".into())];

        let u2 = standard_gate("u2").unwrap().method_params(&params);
        assert_eq!(u2.len(), 3);
        assert_eq!(u2[0].as_f64(), Some(std::f64::consts::FRAC_PI_2));
        assert_eq!(u2[1..], params[..]);

        let cu3 = standard_gate("cu3")
            .unwrap()
            .method_params(&[params[0].clone(), params[1].clone(), Expression::Pi]);
        assert_eq!(cu3.last(), Some(&Expression::Number("0".into())));
        assert_eq!(cu3.len(), 4);

        assert_eq!(standard_gate("rz").unwrap().method_params(&params[..1]), params[..1]);
    }

    #[test]
    fn test_table_names_unique() {
        assert_eq!(STANDARD_INDEX.len(), STANDARD_GATES.len());
    }

    #[test]
    fn test_build_custom() {
        let gates = table("OPENQASM 3; gate bell a, b { h a; cx a, b; }").unwrap();
        assert_eq!(gates.num_custom(), 1);

        let Some(Resolved::Custom(template)) = gates.resolve("bell") else {
            panic!("expected custom gate");
        };
        assert_eq!(template.qubits, vec!["a", "b"]);
        assert_eq!(template.body.len(), 2);
        assert_eq!(
            template.body[1],
            GateCall {
                name: "cx".into(),
                params: vec![],
                qubits: vec![Operand::register("a"), Operand::register("b")],
                line: 1,
            }
        );
        assert!(matches!(gates.resolve("h"), Some(Resolved::Standard(_))));
        assert!(gates.resolve("nope").is_none());
    }

    #[test]
    fn test_forward_reference_allowed() {
        let gates = table(
            "OPENQASM 3; gate outer a { inner a; } gate inner a { x a; }",
        )
        .unwrap();
        assert_eq!(gates.num_custom(), 2);
    }

    #[test]
    fn test_duplicate_gate_name() {
        let err = table("OPENQASM 3; gate h a { x a; }").unwrap_err();
        assert_eq!(err, TranslateError::DuplicateGateName("h".into()));

        let err = table("OPENQASM 3; gate g a { x a; } gate g b { y b; }").unwrap_err();
        assert_eq!(err, TranslateError::DuplicateGateName("g".into()));
    }
}
