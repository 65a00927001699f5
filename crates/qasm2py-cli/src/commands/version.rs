//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - OpenQASM 2/3 to Qiskit Python translator",
        style("qasm2py").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qasm2py      Translation library");
    println!("  qasm2py-cli  Command-line interface");
    println!();
    println!("Target:     {}", style("qiskit.QuantumCircuit").underlined());
    println!("License:    {}", style("Apache-2.0").dim());
}
