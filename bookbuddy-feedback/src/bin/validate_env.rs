//! Frontend environment validator
//!
//! Checks a `.env` file against the frontend build contract before the
//! bundler runs. Exits non-zero when the file is missing or any variable
//! fails validation; warnings alone do not fail the run.
//!
//! **Usage:**
//! ```bash
//! validate-env [PATH]        # defaults to ./.env
//! validate-env --list        # print recognized variables
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use bookbuddy_common::env_check::{frontend_env_spec, load_env_file, validate, ConfigSpec};
use bookbuddy_common::ConfigError;
use clap::Parser;

/// Frontend environment validator
#[derive(Parser, Debug)]
#[command(name = "validate-env")]
#[command(about = "Validate a .env file against the BookBuddy frontend contract")]
struct Args {
    /// Path to the .env file
    #[arg(default_value = ".env")]
    env_file: PathBuf,

    /// List recognized variables and exit
    #[arg(long)]
    list: bool,
}

fn print_spec(spec: &ConfigSpec) {
    println!("Recognized variables ({}):", spec.name());
    for var in spec.vars() {
        let req = if var.required { "required" } else { "optional" };
        println!("  {:<36} {:<8} {:<8} {}", var.name, var.kind, req, var.description);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let spec = frontend_env_spec();

    if args.list {
        print_spec(&spec);
        return ExitCode::SUCCESS;
    }

    let source = match load_env_file(&args.env_file) {
        Ok(source) => source,
        Err(ConfigError::EnvFileNotFound(path)) => {
            eprintln!("✗ .env file not found: {}", path.display());
            eprintln!("ℹ Create one based on .env.example");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = validate(&spec, &source);

    if !report.is_ok() {
        eprintln!("\n✗ Environment validation failed:");
        for e in &report.errors {
            eprintln!("  - {}", e);
        }
        return ExitCode::FAILURE;
    }

    if !report.warnings.is_empty() {
        eprintln!("\n⚠ Warnings:");
        for w in &report.warnings {
            eprintln!("  - {}", w);
        }
    }

    println!("\n✓ Environment validation passed");
    ExitCode::SUCCESS
}
