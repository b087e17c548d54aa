//! Biothings CLI
//!
//! Batched access to BioThings annotation services from the shell.

use anyhow::Result;
use biothings_core::error::exit_codes;
use biothings_core::BiothingsError;
use clap::Parser;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};
use commands::ClientOptions;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let opts = ClientOptions {
        url: cli.url.clone(),
        cache: cli.cache,
        step: None,
    };
    let (format, verbose) = (cli.format, cli.verbose);

    match cli.command {
        Commands::Clients => commands::clients::run(format).await,
        Commands::Get(args) => commands::get::run(args, &opts, format).await,
        Commands::GetMany(args) => commands::get::run_many(args, &opts, format, verbose).await,
        Commands::Query(args) => commands::query::run(args, &opts, format, verbose).await,
        Commands::QueryMany(args) => commands::query::run_many(args, &opts, format, verbose).await,
        Commands::Metadata(args) => commands::metadata::run(args, &opts, format).await,
        Commands::Fields(args) => commands::metadata::run_fields(args, &opts, format).await,
        Commands::Cache(args) => commands::cache::run(args, &opts).await,
        Commands::Call(args) => commands::call::run(args, &opts, format, verbose).await,
        Commands::Hgvs(args) => commands::hgvs::run(args, format).await,
    }
}

fn exit_code(e: &anyhow::Error) -> i32 {
    e.downcast_ref::<BiothingsError>()
        .map(BiothingsError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
