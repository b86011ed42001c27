//! relbump CLI application.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use miette::{Result, miette};
use relbump::{Cli, execute_release};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "relbump=debug" } else { "relbump=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let outcome = execute_release(&cli)?;
    print!("{}", outcome.report);
    if !outcome.report.ends_with('\n') {
        println!();
    }

    if !outcome.failures.is_empty() {
        for failure in &outcome.failures {
            eprintln!("{}: {}", failure.module, failure.message);
        }
        return Err(miette!(
            code = "relbump::unresolved_modules",
            help = "Check the version history of these modules",
            "{} module(s) could not be resolved",
            outcome.failures.len()
        ));
    }
    Ok(())
}
