use clap::Parser;
use tracing::info;

use patchmatrix_cli::cli::{Cli, Commands};
use patchmatrix_cli::commands;
use patchmatrix_cli::error::CliError;
use patchmatrix_cli::logging;
use patchmatrix_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // `config validate` reports a broken file itself, so logging falls back
    // to defaults instead of failing here.
    let loaded = commands::load_config(&cli.config).await;
    let mut general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_default();
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Command(e.to_string()))?;
    patchmatrix_core::metrics::describe_all();

    info!(config = %cli.config.display(), "patchmatrix starting");

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
        Commands::Validate => commands::validate::execute(&loaded?, &writer).await,
        Commands::Suites => {
            let ctx = commands::build_context(&loaded?).await?;
            commands::suites::execute(&ctx, &writer)
        }
        Commands::Templates => {
            let ctx = commands::build_context(&loaded?).await?;
            commands::templates::execute(&ctx, &writer)
        }
        Commands::Generate(args) => {
            let ctx = commands::build_context(&loaded?).await?;
            commands::generate::execute(args, &ctx, &writer)
        }
    }
}
