use std::path::Path;

use colored::Colorize;
use serde_json::Value;

use tandem_index::Query;
use tandem_records::Collection;
use tandem_server::{ServerConfig, TandemServer};
use tandem_types::RecordId;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Serve => cmd_serve(config).await,
        Command::Create(args) => cmd_create(config, args).await,
        Command::Get(args) => cmd_get(config, args).await,
        Command::Search(args) => cmd_search(config, args).await,
        Command::Delete(args) => cmd_delete(config, args).await,
        Command::Reindex => cmd_reindex(config).await,
        Command::Purge => cmd_purge(config).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => Ok(ServerConfig::from_toml_file(path)?),
        None if Path::new("tandem.toml").exists() => {
            Ok(ServerConfig::from_toml_file("tandem.toml")?)
        }
        None => Ok(ServerConfig::default()),
    }
}

fn open_collection(config: &ServerConfig) -> anyhow::Result<Collection> {
    Ok(config.build_state()?.collection)
}

async fn cmd_serve(config: ServerConfig) -> anyhow::Result<()> {
    let server = TandemServer::new(config)?;
    server.serve().await?;
    Ok(())
}

async fn cmd_create(config: ServerConfig, args: CreateArgs) -> anyhow::Result<()> {
    let body: Value = serde_json::from_str(&args.json)?;
    let Value::Object(map) = body else {
        anyhow::bail!("payload must be a JSON object");
    };
    let collection = open_collection(&config)?;
    collection.ensure_ready().await?;
    let mut record = collection.new_record();
    record.payload = map.into_iter().collect();
    collection.save(&mut record).await?;
    println!(
        "{} Created {} (epoch {})",
        "✓".green().bold(),
        record.id().to_string().yellow(),
        record.epoch()
    );
    Ok(())
}

async fn cmd_get(config: ServerConfig, args: GetArgs) -> anyhow::Result<()> {
    let id = RecordId::parse(&args.id)?;
    let collection = open_collection(&config)?;
    // The CLI's embedded index is empty per invocation; the blob store is
    // the durable copy, so point reads go straight there.
    let record = collection.get_raw(id).await?;
    println!("{}", serde_json::to_string_pretty(&record.to_document())?);
    Ok(())
}

async fn cmd_search(config: ServerConfig, args: SearchArgs) -> anyhow::Result<()> {
    let collection = open_collection(&config)?;
    collection.reindex().await?;
    let query = match args.query {
        Some(text) => Query::text(text),
        None => Query::match_all(),
    }
    .with_size(args.size);
    let results = collection.search(&query).await?;
    if results.is_empty() {
        println!("No records matched.");
        return Ok(());
    }
    for record in &results {
        println!(
            "{}  {}",
            record.id().to_string().yellow(),
            serde_json::to_string(&record.to_document())?
        );
    }
    println!("{} {} record(s)", "✓".green(), results.len());
    Ok(())
}

async fn cmd_delete(config: ServerConfig, args: DeleteArgs) -> anyhow::Result<()> {
    let id = RecordId::parse(&args.id)?;
    let collection = open_collection(&config)?;
    collection.ensure_ready().await?;
    collection.delete(id).await?;
    println!("{} Deleted {}", "✓".green().bold(), args.id.yellow());
    Ok(())
}

async fn cmd_reindex(config: ServerConfig) -> anyhow::Result<()> {
    let collection = open_collection(&config)?;
    let report = collection.reindex().await?;
    println!(
        "{} Reindexed {}: {} scanned, {} indexed, {} skipped",
        "✓".green().bold(),
        collection.name().bold(),
        report.scanned,
        report.indexed,
        report.skipped
    );
    Ok(())
}

async fn cmd_purge(config: ServerConfig) -> anyhow::Result<()> {
    let collection = open_collection(&config)?;
    let purged = collection.purge().await?;
    println!(
        "{} Purged {} document(s) from the index; blobs untouched",
        "✓".green().bold(),
        purged
    );
    Ok(())
}
