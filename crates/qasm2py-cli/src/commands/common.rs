//! Shared helpers for CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use qasm2py::TranslateOptions;

/// Read QASM source from a file, or from stdin when `path` is `-`.
pub fn read_source(path: &str) -> Result<String> {
    if path == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read from stdin")?;
        return Ok(source);
    }

    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Write generated content to a file, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, format!("{content}\n"))
                .with_context(|| format!("Failed to write file: {path}"))
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{content}").context("Failed to write to stdout")
        }
    }
}

/// Load translation options from a YAML file, or defaults when no file is given.
pub fn load_options(path: Option<&str>) -> Result<TranslateOptions> {
    let Some(path) = path else {
        return Ok(TranslateOptions::default());
    };

    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    serde_yaml_ng::from_str(&text).with_context(|| format!("Invalid config file: {path}"))
}
