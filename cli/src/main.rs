//! hassfest CLI entrypoint.
//!
//! Validates the integrations of a Home Assistant checkout and prints a
//! report to stdout. Diagnostics go to stderr through `tracing`.

use std::io::Write;

use clap::Parser;
use hassfest::{SharedConfig, validate_repository};
use hassfest_cli::cli::Cli;
use hassfest_cli::error::Result;
use hassfest_cli::output::{format_human, format_json, invalid_integrations};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = installed {
        write_stderr_line(&mut std::io::stderr(), format!("logging disabled: {err}"));
    }
}

/// Validates the repository and writes the report, returning the number of
/// reported integrations with errors.
fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<usize> {
    let shared = match &cli.config {
        Some(path) => {
            debug!("loading configuration from {path}");
            SharedConfig::load_from(path)?
        }
        None => SharedConfig::load(&cli.root)?,
    };

    let mut config = cli.run_config();
    shared.apply(&mut config);

    let integrations = validate_repository(&config, &shared)?;

    for name in &cli.integrations {
        if !integrations.contains_key(name) {
            warn!("integration {name} is not part of the catalog");
        }
    }

    let report = if cli.json {
        format_json(&integrations, &config)
    } else {
        format_human(&integrations, &config)
    };
    writeln!(stdout, "{report}")?;

    Ok(invalid_integrations(&integrations, &config).count())
}

fn exit_code_for_run_result(result: Result<usize>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(0) => 0,
        Ok(_) => 1,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
