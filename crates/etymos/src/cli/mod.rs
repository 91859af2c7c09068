//! CLI command implementations for Etymos

pub mod config;
pub mod error;
pub mod import;
pub mod output;
pub mod status;
pub mod words;

use anyhow::Context;
use error::HelpfulError;
use etymos_db::EtymosDb;
use uuid::Uuid;

/// Open the store, turning failures into a helpful error
pub(crate) async fn open_store(database_url: &str) -> anyhow::Result<EtymosDb> {
    EtymosDb::connect(database_url)
        .await
        .map_err(|e| HelpfulError::database_unavailable(database_url, &e).into())
}

/// Parse a word id given on the command line
pub(crate) fn parse_word_id(raw: &str) -> Result<Uuid, HelpfulError> {
    Uuid::parse_str(raw.trim()).map_err(|_| HelpfulError::invalid_id(raw))
}

/// Runtime for a single command; the store is async underneath
pub(crate) fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}
