//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// graft - add contract data sources to subgraph manifests
#[derive(Parser)]
#[command(name = "graft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a contract data source to a subgraph manifest
    Add(AddArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Contract address
    pub address: Option<String>,

    /// Path to the subgraph manifest (defaults to subgraph.yaml)
    pub manifest: Option<PathBuf>,

    /// Path to the contract ABI (fetched from the block explorer if omitted)
    #[arg(long)]
    pub abi: Option<PathBuf>,

    /// Name of the contract, used for the data source, ABI and renamed entities
    #[arg(long, default_value = "Contract")]
    pub contract_name: String,

    /// Reuse the entities of the first data source when names collide
    #[arg(long)]
    pub merge_entities: bool,

    /// Generate entities and handlers for the contract's events
    /// (`--index-events=false` declares a single counter entity instead)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub index_events: bool,

    /// Network of the contract (defaults to the manifest's network)
    #[arg(long)]
    pub network: Option<String>,

    /// Do not run `codegen` after updating the manifest
    #[arg(long)]
    pub skip_codegen: bool,

    /// Etherscan API key
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,
}
