//! Gates command implementation.

use console::style;

use qasm2py::standard_gates;

/// Execute the gates command.
pub fn execute() {
    println!("{}", style("Standard gates:").bold());
    println!(
        "  {:<10} {:<8} {:>6} {:>6}",
        style("QASM").dim(),
        style("method").dim(),
        style("qubits").dim(),
        style("params").dim()
    );

    for gate in standard_gates() {
        println!(
            "  {:<10} {:<8} {:>6} {:>6}",
            style(gate.name).cyan(),
            gate.method,
            gate.num_qubits,
            gate.num_params
        );
    }

    println!();
    println!(
        "Custom gates declared with {} are expanded inline.",
        style("gate name(params) qubits { ... }").yellow()
    );
}
