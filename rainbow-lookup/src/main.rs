use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rainbow_lookup::{Config, Engine, SqliteStore, StoreLocation, StoreMeta, TableName, handle};
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rainbow-lookup")]
#[command(about = "Look up password digests in a precomputed rainbow table")]
struct Args {
    /// SQLite database holding the table (overrides RAINBOW_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Table name inside the database (overrides RAINBOW_TABLE)
    #[arg(long, global = true)]
    table: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a newline-delimited JSON table produced by rainbow-gen
    Import {
        /// Table file to load
        table_file: PathBuf,
    },

    /// Crack one or more digests
    Query {
        /// Digest algorithm, e.g. md5, sha1, ntlm
        #[arg(short, long)]
        algorithm: String,

        /// Treat arguments as files with one digest per line
        #[arg(short, long)]
        files: bool,

        /// Digests (or files, with --files)
        #[arg(required = true)]
        hashes: Vec<String>,
    },

    /// Read a JSON request from stdin and print the JSON response
    Request,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(db) = args.db {
        config.store.location = StoreLocation::from_path(db);
    }
    if let Some(table) = args.table {
        config.store.table = TableName::new(table)?;
    }

    let store = connect(&config.store).await?;

    match args.command {
        Command::Import { table_file } => {
            let summary = store
                .import_ndjson(&table_file)
                .await
                .with_context(|| format!("failed to import {}", table_file.display()))?;
            println!(
                "Imported {} entries into '{}' ({} malformed lines skipped)",
                summary.imported,
                store.table(),
                summary.skipped
            );
        }
        Command::Query { algorithm, files, hashes } => {
            let hashes = if files { read_hash_files(&hashes).await? } else { hashes };
            let engine = Engine::new(&store, config.store.table, config.algorithms)
                .with_max_hashes(config.max_hashes);
            let query = rainbow_lookup::validate(
                &algorithm,
                &hashes,
                engine.algorithms(),
                engine.max_hashes(),
            )?;
            let cracked = engine.execute(&query).await?;

            println!("Cracked {} of {} hashes", cracked.results.len(), query.len());
            for result in &cracked.results {
                println!(" {} -> {}", result.hash, result.preimage);
            }
        }
        Command::Request => {
            let mut body = Vec::new();
            tokio::io::stdin().read_to_end(&mut body).await.context("failed to read stdin")?;
            let engine = Engine::new(&store, config.store.table, config.algorithms)
                .with_max_hashes(config.max_hashes);
            let response = handle(&engine, &body).await;
            println!("{}", response.body);
            if response.status != 200 {
                store.close().await;
                std::process::exit(1);
            }
        }
    }

    store.close().await;
    Ok(())
}

async fn connect(meta: &StoreMeta) -> anyhow::Result<SqliteStore> {
    SqliteStore::connect(meta).await.with_context(|| match &meta.location {
        StoreLocation::Memory => "failed to open in-memory store".to_string(),
        StoreLocation::File(path) => format!("failed to open store at {}", path.display()),
    })
}

async fn read_hash_files(paths: &[String]) -> anyhow::Result<Vec<String>> {
    let mut hashes = Vec::new();
    for path in paths {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read hashes from {path}"))?;
        let before = hashes.len();
        hashes.extend(contents.lines().map(str::to_string));
        eprintln!("Read {} line(s) from {}", hashes.len() - before, path);
    }
    Ok(hashes)
}
