//! Python code emitter.

use crate::config::TranslateOptions;
use crate::translator::Operation;

/// Import line placed at the top of the generated code.
pub const IMPORT_LINE: &str = "from qiskit import QuantumCircuit";

/// Render the buffered operations as Python source.
///
/// Lines are separated by `\n`; there is no trailing newline.
pub fn emit(
    operations: &[Operation],
    num_qubits: u64,
    num_clbits: u64,
    options: &TranslateOptions,
) -> String {
    let mut emitter = Emitter::new(&options.variable_name);
    emitter.emit_program(operations, num_qubits, num_clbits, options.include_imports)
}

struct Emitter<'a> {
    output: String,
    var: &'a str,
}

impl<'a> Emitter<'a> {
    fn new(var: &'a str) -> Self {
        Self {
            output: String::new(),
            var,
        }
    }

    fn emit_program(
        &mut self,
        operations: &[Operation],
        num_qubits: u64,
        num_clbits: u64,
        include_imports: bool,
    ) -> String {
        if include_imports {
            self.writeln(IMPORT_LINE);
            self.writeln("");
        }

        self.writeln(&format!(
            "{} = QuantumCircuit({num_qubits}, {num_clbits})",
            self.var
        ));

        for operation in operations {
            self.emit_operation(operation);
        }

        let len = self.output.trim_end_matches('\n').len();
        self.output.truncate(len);
        std::mem::take(&mut self.output)
    }

    fn emit_operation(&mut self, operation: &Operation) {
        let line = format!(
            "{}.{}({})",
            self.var,
            operation.method,
            operation.args.join(", ")
        );
        self.writeln(&line);
    }

    fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(method: &'static str, args: &[&str]) -> Operation {
        Operation {
            method,
            args: args.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_emit_with_imports() {
        let ops = vec![operation("h", &["0"]), operation("cx", &["0", "1"])];
        let code = emit(&ops, 2, 0, &TranslateOptions::default());
        assert_eq!(
            code,
            "from qiskit import QuantumCircuit\n\nqc = QuantumCircuit(2, 0)\nqc.h(0)\nqc.cx(0, 1)"
        );
    }

    #[test]
    fn test_emit_without_imports() {
        let options = TranslateOptions::new()
            .with_imports(false)
            .with_variable_name("circ");
        let code = emit(&[operation("barrier", &[])], 1, 1, &options);
        assert_eq!(code, "circ = QuantumCircuit(1, 1)\ncirc.barrier()");
    }

    #[test]
    fn test_emit_empty_circuit() {
        let options = TranslateOptions::new().with_imports(false);
        assert_eq!(emit(&[], 0, 0, &options), "qc = QuantumCircuit(0, 0)");
    }
}
