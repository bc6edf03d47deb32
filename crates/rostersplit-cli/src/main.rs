//! Rostersplit CLI - split personnel rosters by gender.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Split {
            source,
            template,
            output,
            format,
            prefix,
            locale,
            unresolved,
            config,
            json,
        } => commands::split::run(commands::split::SplitArgs {
            source,
            template,
            output,
            format: format.into(),
            prefix,
            locale: locale.map(Into::into),
            unresolved: unresolved.map(Into::into),
            config,
            json,
        }),

        Commands::Inspect {
            source,
            config,
            json,
        } => commands::inspect::run(source, config, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "warn,rostersplit=debug" } else { "warn" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}
