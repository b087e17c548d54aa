//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "biothings")]
#[command(
    author,
    version,
    about = "Query BioThings annotation services (mygene.info, myvariant.info, mychem.info, ...)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output (progress logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Service base URL, overriding the built-in default
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Serve repeated requests from the local response cache
    #[arg(long, global = true)]
    pub cache: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List built-in clients
    Clients,

    /// Fetch one annotation by id
    Get(GetArgs),

    /// Fetch many annotations by id, in batches
    GetMany(GetManyArgs),

    /// Run a search query
    Query(QueryArgs),

    /// Match many query terms against the given scopes
    QueryMany(QueryManyArgs),

    /// Show service metadata
    Metadata(EntityArgs),

    /// List available fields
    Fields(FieldsArgs),

    /// Manage the local response cache
    Cache(CacheArgs),

    /// Call a client method by name (e.g. getgenes, getvariant, findgenes)
    Call(CallArgs),

    /// Convert a VCF file into genomic HGVS ids
    Hgvs(HgvsArgs),
}

#[derive(Args)]
pub struct EntityArgs {
    /// Entity name (gene, variant, chem, ...) or a service URL to discover
    pub entity: String,
}

#[derive(Args)]
pub struct GetArgs {
    /// Entity name or service URL
    pub entity: String,

    /// Identifier, e.g. 1017 or NCBIGene:1017
    pub id: String,

    /// Comma-separated fields to return
    #[arg(long)]
    pub fields: Option<String>,
}

#[derive(Args)]
pub struct GetManyArgs {
    /// Entity name or service URL
    pub entity: String,

    /// Identifiers; read from stdin (one per line) when omitted
    pub ids: Vec<String>,

    /// Comma-separated fields to return
    #[arg(long)]
    pub fields: Option<String>,

    /// Ids per request
    #[arg(long)]
    pub step: Option<usize>,

    /// Print hits as they arrive instead of collecting them
    #[arg(long)]
    pub stream: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Entity name or service URL
    pub entity: String,

    /// Query string
    pub q: String,

    /// Comma-separated fields to return
    #[arg(long)]
    pub fields: Option<String>,

    /// Maximum number of hits (capped at 1000)
    #[arg(long)]
    pub size: Option<usize>,

    /// Number of hits to skip
    #[arg(long)]
    pub skip: Option<usize>,

    /// Comma-separated sort fields
    #[arg(long)]
    pub sort: Option<String>,

    /// Retrieve every hit by scrolling
    #[arg(long)]
    pub fetch_all: bool,
}

#[derive(Args)]
pub struct QueryManyArgs {
    /// Entity name or service URL
    pub entity: String,

    /// Query terms; read from stdin (one per line) when omitted
    pub terms: Vec<String>,

    /// Comma-separated fields to match the terms against
    #[arg(long)]
    pub scopes: Option<String>,

    /// Comma-separated fields to return
    #[arg(long)]
    pub fields: Option<String>,

    /// Include duplicate and missing terms in the output
    #[arg(long)]
    pub returnall: bool,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Entity name or service URL
    pub entity: String,

    /// Case-insensitive search term
    pub search: Option<String>,
}

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand)]
pub enum CacheAction {
    /// Print the cache database location
    Path(EntityArgs),

    /// Delete every cached response
    Clear(EntityArgs),
}

#[derive(Args)]
pub struct CallArgs {
    /// Entity name or service URL
    pub entity: String,

    /// Method name
    pub method: String,

    /// Method arguments
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct HgvsArgs {
    /// VCF file
    pub vcf: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Cli,
    Json,
    Csv,
}

/// Split a comma-separated option into its non-empty parts
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("symbol, name,,")), vec!["symbol", "name"]);
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_parse_query_many() {
        let cli = Cli::parse_from([
            "biothings",
            "query-many",
            "gene",
            "cdk2",
            "tp53",
            "--scopes",
            "symbol",
            "--returnall",
            "--format",
            "json",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::QueryMany(args) => {
                assert_eq!(args.terms, vec!["cdk2", "tp53"]);
                assert!(args.returnall);
            }
            _ => panic!("expected query-many"),
        }
    }
}
