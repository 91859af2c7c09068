//! Import command: load one YAML document into the store

use super::error::HelpfulError;
use super::output::print_json;
use super::{open_store, runtime};
use etymos_db::sample::HOUSEHOLD_YAML;
use etymos_db::DependentCounts;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

/// Arguments for the import command
#[derive(Debug)]
pub struct ImportArgs {
    /// Document path, or "-" for stdin
    pub file: Option<PathBuf>,
    pub sample: bool,
    pub json: bool,
    pub database_url: String,
}

/// Where the document text came from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    File(PathBuf),
    Stdin,
    Sample,
}

impl Source {
    fn from_args(args: &ImportArgs) -> Result<Self, HelpfulError> {
        match (&args.file, args.sample) {
            (Some(_), true) => Err(HelpfulError::new("Both a file and --sample were given")
                .with_suggestion("TRY: Pass either a file or --sample, not both")),
            (None, true) => Ok(Source::Sample),
            (Some(path), false) if path.as_os_str() == "-" => Ok(Source::Stdin),
            (Some(path), false) => Ok(Source::File(path.clone())),
            (None, false) => Err(HelpfulError::new("No document to import")
                .with_context("import needs a YAML file, '-' for stdin, or --sample")
                .with_suggestions([
                    "TRY: etymos import word.yaml",
                    "TRY: etymos import --sample",
                ])),
        }
    }

    fn label(&self) -> String {
        match self {
            Source::File(path) => path.display().to_string(),
            Source::Stdin => "stdin".to_string(),
            Source::Sample => "sample".to_string(),
        }
    }

    fn read(&self) -> Result<String, HelpfulError> {
        match self {
            Source::Sample => Ok(HOUSEHOLD_YAML.to_string()),
            Source::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|e| HelpfulError::new("Cannot read stdin").with_context(e.to_string()))?;
                Ok(text)
            }
            Source::File(path) => {
                if !path.exists() {
                    return Err(HelpfulError::file_not_found(path));
                }
                std::fs::read_to_string(path).map_err(|e| HelpfulError::cannot_read_file(path, &e))
            }
        }
    }
}

/// Result printed after a successful import
#[derive(Debug, Serialize)]
struct ImportReport {
    id: Uuid,
    lemma: Option<String>,
    source: String,
    dependents: DependentCounts,
}

/// Run the import command
pub fn run(args: ImportArgs) -> anyhow::Result<()> {
    let source = Source::from_args(&args)?;
    let text = source.read()?;

    let rt = runtime()?;
    rt.block_on(async { run_async(&args, &source, &text).await })
}

async fn run_async(args: &ImportArgs, source: &Source, text: &str) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    let label = source.label();

    let word = db
        .import_yaml(text)
        .await
        .map_err(|e| HelpfulError::import_failed(&label, &e))?;
    let dependents = db.dependent_counts(word.id).await?;
    db.close().await;

    info!(word_id = %word.id, source = %label, "Import finished");

    let report = ImportReport {
        id: word.id,
        lemma: word.lemma,
        source: label,
        dependents,
    };

    if args.json {
        return print_json(&report);
    }

    println!(
        "Imported '{}' ({})",
        report.lemma.as_deref().unwrap_or("<no lemma>"),
        report.id
    );
    println!("  Source:     {}", report.source);
    println!("  Cognates:   {}", report.dependents.cognates);
    println!("  Examples:   {}", report.dependents.examples);
    println!("  Synonyms:   {}", report.dependents.synonyms);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: Option<&str>, sample: bool) -> ImportArgs {
        ImportArgs {
            file: file.map(PathBuf::from),
            sample,
            json: false,
            database_url: "sqlite::memory:".to_string(),
        }
    }

    #[test]
    fn test_source_selection() {
        assert_eq!(Source::from_args(&args(None, true)).unwrap(), Source::Sample);
        assert_eq!(Source::from_args(&args(Some("-"), false)).unwrap(), Source::Stdin);
        assert_eq!(
            Source::from_args(&args(Some("word.yaml"), false)).unwrap(),
            Source::File(PathBuf::from("word.yaml"))
        );
        assert!(Source::from_args(&args(None, false)).is_err());
        assert!(Source::from_args(&args(Some("word.yaml"), true)).is_err());
    }

    #[test]
    fn test_missing_file_is_helpful() {
        let err = Source::File(PathBuf::from("/nonexistent/word.yaml")).read().unwrap_err();
        assert!(err.message.contains("File not found"));
    }
}
