//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use etymos_db::DbError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion for fixing the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add multiple suggestions
    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Input document does not exist
    pub fn file_not_found(path: &Path) -> Self {
        Self::new(format!("File not found: {}", path.display()))
            .with_context("The YAML document to import does not exist")
            .with_suggestions([
                format!("TRY: Check if the file exists: ls -la {}", path.display()),
                "TRY: Pipe the document on stdin instead: etymos import - < word.yaml".to_string(),
            ])
    }

    /// Input document exists but could not be read
    pub fn cannot_read_file(path: &Path, err: &std::io::Error) -> Self {
        Self::new(format!("Cannot read file: {}", path.display()))
            .with_context(err.to_string())
            .with_suggestion("TRY: Verify you have read permissions for this file")
    }

    /// Store could not be opened
    pub fn database_unavailable(url: &str, err: &DbError) -> Self {
        let hint = match err {
            DbError::UnsupportedUrl(_) => {
                "TRY: Use a SQLite location, e.g. --database-url sqlite:/path/to/etymos.sqlite3"
            }
            _ => "TRY: etymos init   # Create the store at the default location",
        };
        Self::new("Failed to open the vocabulary store")
            .with_context(format!("Database: {}", url))
            .with_suggestions([format!("Error: {}", err), hint.to_string()])
    }

    /// No word with this id
    pub fn word_not_found(id: &str) -> Self {
        Self::new(format!("Word not found: {}", id))
            .with_context("No word in the store has this id")
            .with_suggestions([
                "TRY: List stored words: etymos list".to_string(),
                "TRY: Look a word up by lemma: etymos check <WORD>".to_string(),
            ])
    }

    /// Argument is not a UUID
    pub fn invalid_id(raw: &str) -> Self {
        Self::new(format!("Invalid word id: '{}'", raw))
            .with_context("Word ids are UUIDs, as printed by 'etymos import' and 'etymos list'")
            .with_suggestion("TRY: Copy the id column from: etymos list")
    }

    /// Import was rejected; nothing was written
    pub fn import_failed(source: &str, err: &DbError) -> Self {
        let context = match err {
            DbError::InvalidDocument(_) | DbError::Yaml(_) => {
                "The document does not have the expected section layout"
            }
            DbError::Constraint(_) => "A required field is missing (cognate word/logic, example sentence, synonym word)",
            _ => "The store rejected the import",
        };
        Self::new(format!("Import failed for {}: {}", source, err))
            .with_context(context)
            .with_suggestions([
                "TRY: Compare the document against the bundled sample: etymos import --sample".to_string(),
                "TRY: No rows were written; fix the document and import it again".to_string(),
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// JSON body for a failed command
pub fn json_error(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": {
                "message": helpful.message,
                "context": helpful.context,
                "suggestions": helpful.suggestions,
            }
        }),
        None => serde_json::json!({
            "error": {
                "message": format!("{:#}", err),
                "context": null,
                "suggestions": [],
            }
        }),
    }
}

/// Print a failed command as JSON on stdout
pub fn print_json_error(err: &anyhow::Error) {
    let body = json_error(err);
    match serde_json::to_string_pretty(&body) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_helpful_error_display() {
        let err = HelpfulError::new("Something went wrong")
            .with_context("While importing")
            .with_suggestion("Try again");

        let display = format!("{}", err);
        assert!(display.contains("ERROR: Something went wrong"));
        assert!(display.contains("CONTEXT: While importing"));
        assert!(display.contains("Try again"));
    }

    #[test]
    fn test_file_not_found() {
        let path = PathBuf::from("/nonexistent/word.yaml");
        let err = HelpfulError::file_not_found(&path);

        let display = format!("{}", err);
        assert!(display.contains("/nonexistent/word.yaml"));
        assert!(display.contains("TRY:"));
    }

    #[test]
    fn test_import_failed_mentions_required_fields() {
        let err = HelpfulError::import_failed("stdin", &DbError::constraint("NOT NULL constraint failed"));
        assert!(err.message.contains("stdin"));
        assert!(err.context.as_deref().unwrap_or_default().contains("required field"));
    }

    #[test]
    fn test_json_error_shape() {
        let err: anyhow::Error = HelpfulError::invalid_id("abc").into();
        let body = json_error(&err);
        assert_eq!(body["error"]["message"], "Invalid word id: 'abc'");
        assert!(body["error"]["suggestions"].as_array().is_some_and(|s| !s.is_empty()));

        let plain = anyhow::anyhow!("boom");
        assert_eq!(json_error(&plain)["error"]["message"], "boom");
    }
}
