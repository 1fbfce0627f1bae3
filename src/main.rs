//! depprobe - requirements compatibility checker CLI tool
//!
//! Verifies that every dependency in a Python manifest imports, and that
//! well-known packages actually work, in a target interpreter.

use clap::Parser;
use depprobe::cli::CliArgs;
use depprobe::orchestrator::Orchestrator;
use depprobe::output::{create_formatter, OutputConfig};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if args.no_color {
        colored::control::set_override(false);
    }

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("depprobe v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Manifest: {}", args.manifest.display());
    }

    let orchestrator = Orchestrator::new(args.clone())?;
    if args.verbose {
        let settings = orchestrator.settings();
        if let Some(path) = &settings.config_path {
            eprintln!("Config: {}", path.display());
        }
        eprintln!(
            "Interpreter: {} (timeout {}s)",
            settings.python,
            settings.timeout.as_secs()
        );
        eprintln!(
            "Name overrides: {}, skipped packages: {}",
            settings.resolver.override_count(),
            settings.skip.len()
        );
    }

    let report = orchestrator.run().await?;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.no_color);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.passed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
