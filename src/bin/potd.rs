//! Data-management CLI for the proverb database.
//!
//! Bulk-loads proverbs from a line-oriented text file, inspects stored
//! entries, and checks database connectivity. Runs against the same
//! `DATABASE_URL` as the bot; a bot token is not required.

use anyhow::{anyhow, Result};
use std::env;
use std::path::Path;

use proverb_bot::config::Config;
use proverb_bot::database::connection::DatabaseManager;
use proverb_bot::database::store::{ProverbStore, StoreError};
use proverb_bot::loader;

#[tokio::main]
async fn main() -> Result<()> {
    // Basic logging for the CLI; the bot binary uses tracing-subscriber
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match command {
        "upgrade" => upgrade(file_arg(&args)?).await,
        "load" => load(file_arg(&args)?).await,
        "dry-run" => dry_run(file_arg(&args)?),
        "get" => get(id_arg(&args)?).await,
        "random" => random().await,
        "check" => check().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn file_arg(args: &[String]) -> Result<&str> {
    args.get(2)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("expected a proverb file path"))
}

fn id_arg(args: &[String]) -> Result<i64> {
    let raw = args.get(2).ok_or_else(|| anyhow!("expected a proverb id"))?;
    raw.parse().map_err(|_| anyhow!("invalid proverb id: {raw}"))
}

async fn open_store() -> Result<ProverbStore> {
    dotenvy::dotenv().ok();
    let database_url = Config::database_url_from_env();
    println!("Database: {}", mask_url(&database_url));

    let db_manager = DatabaseManager::new(&database_url)
        .await
        .map_err(|e| anyhow!("Failed to connect to database: {e}"))?;
    db_manager.run_migrations().await?;
    Ok(ProverbStore::new(db_manager.pool.clone()))
}

/// Wipes the database and reloads it with the contents of `file`.
async fn upgrade(file: &str) -> Result<()> {
    let entries = loader::load_from_file(file)?;
    if entries.is_empty() {
        return Err(anyhow!("no proverbs found in {file}"));
    }

    let store = open_store().await?;
    store.wipe_and_reload(&entries).await?;

    println!("Reloaded {} proverbs:", entries.len());
    for entry in store.all().await? {
        println!(
            "  [{}] {}: {}",
            entry.id, entry.proverb, entry.meaning
        );
    }
    Ok(())
}

/// Appends the contents of `file` to the existing entries.
async fn load(file: &str) -> Result<()> {
    let entries = loader::load_from_file(file)?;
    if entries.is_empty() {
        return Err(anyhow!("no proverbs found in {file}"));
    }

    let store = open_store().await?;
    store.add(&entries).await?;
    println!(
        "Stored {} proverbs ({} total)",
        entries.len(),
        store.count().await?
    );
    Ok(())
}

/// Parses `file` and prints the entries without storing them.
fn dry_run(file: &str) -> Result<()> {
    let entries = loader::load_from_file(file)?;
    println!("Parsed {} proverbs:", entries.len());
    for entry in &entries {
        println!("  {} :: {} [{}]", entry.proverb, entry.meaning, entry.hash);
    }
    Ok(())
}

async fn get(id: i64) -> Result<()> {
    let store = open_store().await?;
    match store.get(id).await? {
        Some(entry) => println!("[{}] {}: {}", entry.id, entry.proverb, entry.meaning),
        None => println!("No proverb with id {id}"),
    }
    Ok(())
}

async fn random() -> Result<()> {
    let store = open_store().await?;
    match store.get_random().await {
        Ok(entry) => println!("[{}] {}: {}", entry.id, entry.proverb, entry.meaning),
        Err(StoreError::Empty) => println!("The store is empty"),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn check() -> Result<()> {
    let store = open_store().await?;
    println!("Database connection successful!");
    println!("Stored proverbs: {}", store.count().await?);
    Ok(())
}

fn mask_url(url: &str) -> String {
    // Don't print full filesystem paths in shared terminals
    if let Some(path) = url.strip_prefix("sqlite:") {
        if let Some(filename) = Path::new(path).file_name() {
            return format!("sqlite:.../{}", filename.to_string_lossy());
        }
    }
    url.to_string()
}

fn print_help() {
    println!("Proverb of the Day Bot - Data Management Tool");
    println!();
    println!("USAGE:");
    println!("    potd [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    upgrade <file>   Wipe the database and reload it from <file>");
    println!("    load <file>      Append the proverbs in <file>");
    println!("    dry-run <file>   Parse <file> and print entries without storing");
    println!("    get <id>         Print the proverb with the given id");
    println!("    random           Print one random proverb");
    println!("    check            Check database connectivity");
    println!("    help             Show this help message");
    println!();
    println!("FORMAT:");
    println!("    One proverb per line: `<proverb>: <meaning>`, split at the first colon.");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATABASE_URL     Database connection string (default: sqlite:./data/proverbs.db)");
}
