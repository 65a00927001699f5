//! qasm2py Command-Line Interface
//!
//! Translates `OpenQASM` 2/3 files into Python code that builds a Qiskit
//! `QuantumCircuit`.
//!
//! ```text
//! qasm2py translate -i bell.qasm -o bell.py
//! qasm2py translate -i - --var-name circuit --no-imports < bell.qasm
//! qasm2py gates
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{gates, translate, version};

/// qasm2py - translate OpenQASM into Qiskit Python code
#[derive(Parser)]
#[command(name = "qasm2py")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a QASM file into Python
    Translate {
        /// Input file (QASM2 or QASM3), or `-` for stdin
        #[arg(short, long)]
        input: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Name of the circuit variable
        #[arg(long)]
        var_name: Option<String>,

        /// Omit the `from qiskit import QuantumCircuit` line
        #[arg(long)]
        no_imports: bool,

        /// Maximum custom gate nesting depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// YAML file with translation options
        #[arg(short, long, env = "QASM2PY_CONFIG")]
        config: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the built-in gate table
    Gates,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Translate {
            input,
            output,
            var_name,
            no_imports,
            max_depth,
            config,
            format,
        } => translate::execute(
            &input,
            output.as_deref(),
            var_name.as_deref(),
            no_imports,
            max_depth,
            config.as_deref(),
            &format,
        ),

        Commands::Gates => {
            gates::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
