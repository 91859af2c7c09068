//! Store commands: init and status

use super::config::etymos_home;
use super::output::print_json;
use super::{open_store, runtime};
use etymos_db::TableCounts;
use serde::Serialize;

/// Arguments for the init command
#[derive(Debug)]
pub struct InitArgs {
    pub json: bool,
    pub database_url: String,
}

/// Arguments for the status command
#[derive(Debug)]
pub struct StatusArgs {
    pub json: bool,
    pub database_url: String,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    home: String,
    database_url: String,
    tables: TableCounts,
}

/// Create the store and its tables if they are missing
pub fn run_init(args: InitArgs) -> anyhow::Result<()> {
    let rt = runtime()?;
    rt.block_on(async { init_async(args).await })
}

async fn init_async(args: InitArgs) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    db.ping().await?;
    db.close().await;

    if args.json {
        return print_json(&serde_json::json!({
            "database_url": args.database_url,
            "initialized": true,
        }));
    }
    println!("Store ready: {}", args.database_url);
    Ok(())
}

/// Show where the store lives and how many rows each table holds
pub fn run_status(args: StatusArgs) -> anyhow::Result<()> {
    let rt = runtime()?;
    rt.block_on(async { status_async(args).await })
}

async fn status_async(args: StatusArgs) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    db.ping().await?;
    let tables = db.table_counts().await?;
    db.close().await;

    let report = StatusReport {
        home: etymos_home().display().to_string(),
        database_url: args.database_url,
        tables,
    };

    if args.json {
        return print_json(&report);
    }

    println!("ETYMOS STATUS");
    println!("=============");
    println!();
    println!("Home:      {}", report.home);
    println!("Database:  {}", report.database_url);
    println!();
    println!("Words:        {}", report.tables.words);
    println!("Etymologies:  {}", report.tables.etymologies);
    println!("Cognates:     {}", report.tables.cognates);
    println!("Examples:     {}", report.tables.examples);
    println!("Synonyms:     {}", report.tables.synonyms);
    Ok(())
}
