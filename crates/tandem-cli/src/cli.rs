use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tandem",
    about = "Tandem — dual-store record service",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the deployment config (TOML); defaults to ./tandem.toml
    /// when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,
    /// Create a record from a JSON object payload
    Create(CreateArgs),
    /// Fetch a record by id from the blob store of record
    Get(GetArgs),
    /// Query records (seeds the embedded index from the blob store first)
    Search(SearchArgs),
    /// Delete a record from both stores
    Delete(DeleteArgs),
    /// Rebuild the search index from the blob store
    Reindex,
    /// Remove every document from the index; blobs are untouched
    Purge,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Payload as a JSON object, e.g. '{"name": "a"}'
    pub json: String,
}

#[derive(Args)]
pub struct GetArgs {
    /// Record id
    pub id: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Query string; omit for everything
    pub query: Option<String>,

    /// Maximum number of results
    #[arg(short, long, default_value_t = 25)]
    pub size: usize,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Record id
    pub id: String,
}
