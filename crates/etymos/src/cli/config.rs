//! Configuration paths for Etymos
//!
//! Everything lives under `$ETYMOS_HOME` (default `~/.etymos/`).

use std::path::PathBuf;

/// Environment variable overriding the home directory
pub const HOME_ENV: &str = "ETYMOS_HOME";

/// Environment variable holding the store location
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DB_FILE_NAME: &str = "etymos.sqlite3";

/// Get the Etymos home directory
pub fn etymos_home() -> PathBuf {
    if let Some(override_path) = std::env::var_os(HOME_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(override_path);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".etymos"),
        None => PathBuf::from(".").join(".etymos"),
    }
}

/// Get logs directory: ~/.etymos/logs
pub fn logs_dir() -> PathBuf {
    etymos_home().join("logs")
}

/// Ensure the logs directory exists
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let dir = logs_dir();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default store file: ~/.etymos/etymos.sqlite3
pub fn default_db_path() -> PathBuf {
    etymos_home().join(DB_FILE_NAME)
}

/// Default store URL (sqlite: path).
pub fn default_database_url() -> String {
    format!("sqlite:{}", default_db_path().display())
}

/// Pick the store URL.
///
/// Priority:
/// 1. `--database-url` / `DATABASE_URL` (clap folds both into `explicit`)
/// 2. The SQLite file under the home directory
pub fn resolve_database_url(explicit: Option<&str>) -> String {
    match explicit.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => default_database_url(),
    }
}
