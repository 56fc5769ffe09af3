//! bumplog - record bumped workspace dependencies in CHANGELOG.md
//!
//! Compares every package.json of an npm workspace against a baseline
//! revision and adds a "Bumped dependencies" note to the Unreleased
//! release of the changelog.

use bumplog::cli::CliArgs;
use bumplog::config::Settings;
use bumplog::orchestrator::Orchestrator;
use bumplog::output::{create_formatter, write_github_outputs, OutputConfig, GITHUB_OUTPUT_ENV};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Console logging on stderr, controlled by RUST_LOG (default: warn, debug with --verbose)
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // Print version info in verbose mode
    if args.verbose {
        eprintln!("bumplog v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let settings = Settings::resolve(&args).await?;
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);

    // Create and run the orchestrator
    let orchestrator = Orchestrator::new(settings);
    let result = orchestrator
        .run_with_progress(output_config.show_progress())
        .await?;

    // Output results
    let formatter = create_formatter(output_config);
    {
        let mut stdout = io::stdout().lock();
        formatter.format(&result, &mut stdout)?;
        stdout.flush()?;

        let mut stderr = io::stderr().lock();
        formatter.format_summary(&result, &mut stderr)?;
    }

    // GitHub Actions step outputs
    if let Some(path) = std::env::var_os(GITHUB_OUTPUT_ENV).filter(|p| !p.is_empty()) {
        write_github_outputs(&PathBuf::from(path), &result.outputs).await?;
    }

    Ok(ExitCode::SUCCESS)
}
