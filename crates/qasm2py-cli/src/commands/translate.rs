//! Translate command implementation.

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qasm2py::translate_with_report;

use super::common::{load_options, read_source, write_output};

/// Execute the translate command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    var_name: Option<&str>,
    no_imports: bool,
    max_depth: Option<usize>,
    config: Option<&str>,
    format: &str,
) -> Result<()> {
    let mut options = load_options(config)?;
    if let Some(name) = var_name {
        options = options.with_variable_name(name);
    }
    if no_imports {
        options = options.with_imports(false);
    }
    if let Some(depth) = max_depth {
        options = options.with_max_expansion_depth(depth);
    }

    let source = read_source(input)?;
    info!(input, bytes = source.len(), "Read QASM source");

    let report = translate_with_report(&source, &options)
        .with_context(|| format!("Failed to translate {input}"))?;

    let content = match format.to_lowercase().as_str() {
        "text" | "py" | "python" => report.code.clone(),
        "json" => serde_json::to_string_pretty(&report)?,
        other => anyhow::bail!("Unknown format: '{other}'. Available: text, json"),
    };

    write_output(output, &content)?;

    if let Some(path) = output {
        eprintln!(
            "{} Translated {} → {}",
            style("✓").green().bold(),
            style(input).green(),
            style(path).green()
        );
        eprintln!(
            "  QASM {}: {} qubits, {} clbits, {} operations",
            report.version, report.num_qubits, report.num_clbits, report.num_operations
        );
    }
    if report.stripped_modifiers > 0 {
        eprintln!(
            "  {} {} statement(s) had gate modifiers dropped",
            style("!").yellow().bold(),
            report.stripped_modifiers
        );
    }

    Ok(())
}
