use anyhow::Result;
use clap::Parser;
use spygen::cli::{Cli, Commands};
use spygen::commands::generate::{generate_spies, GenerateConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            inputs,
            output,
            format,
            guard,
            isolate_failures,
            overloads,
            config,
            ignore,
        } => generate_spies(GenerateConfig {
            inputs,
            output,
            format: format.map(Into::into),
            guard,
            isolate_failures,
            overloads: overloads.map(Into::into),
            config,
            ignore,
        }),
        Commands::Init { force } => spygen::commands::init::init_config(force),
    }
}

// SPYGEN_LOG wins over RUST_LOG; -v only changes the fallback level
fn init_logging(verbose: bool) {
    let fallback = if verbose { "spygen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("SPYGEN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
