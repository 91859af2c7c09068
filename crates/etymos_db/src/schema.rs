//! Database schema creation for the vocabulary tables.
//!
//! All CREATE TABLE statements live here - single source of truth.

use crate::error::Result;
use crate::EtymosDb;
use tracing::info;

/// Tables owned by this crate, parent first.
pub(crate) const TABLES: [&str; 5] = ["words", "etymologies", "cognates", "examples", "synonyms"];

impl EtymosDb {
    /// Ensure all tables exist.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        self.create_word_tables().await?;
        self.create_dependent_tables().await?;

        info!("Database schema verified");
        Ok(())
    }

    /// Create the root `words` table
    async fn create_word_tables(&self) -> Result<()> {
        // Timestamps come from column defaults so the store, not the caller, stamps rows.
        // lemma_key holds the lemma folded in Rust; SQLite's lower() only folds ASCII.
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS words (
                id TEXT PRIMARY KEY,
                user_word TEXT,
                lemma TEXT,
                lemma_key TEXT,
                syllabification TEXT,
                part_of_speech TEXT,
                user_context_sentence TEXT,
                contextual_meaning_en TEXT,
                contextual_meaning_zh TEXT,
                other_common_meanings TEXT NOT NULL DEFAULT '[]'
                    CHECK (json_valid(other_common_meanings)),
                image_differentiation_zh TEXT,
                original_yaml TEXT NOT NULL CHECK (json_valid(original_yaml)),
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_words_lemma_key ON words(lemma_key)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_words_created ON words(created_at DESC)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create the tables that hang off a word
    async fn create_dependent_tables(&self) -> Result<()> {
        // Etymology shares its key with the word: at most one per word
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS etymologies (
                word_id TEXT PRIMARY KEY REFERENCES words(id) ON DELETE CASCADE,
                prefix TEXT,
                root TEXT,
                suffix TEXT,
                structure_analysis TEXT,
                history_myth TEXT,
                source_word TEXT,
                pie_root TEXT,
                visual_imagery_zh TEXT,
                meaning_evolution_zh TEXT
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS cognates (
                id TEXT PRIMARY KEY,
                word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
                cognate_word TEXT NOT NULL,
                logic TEXT NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS examples (
                id TEXT PRIMARY KEY,
                word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
                example_type TEXT,
                sentence TEXT NOT NULL,
                translation_zh TEXT
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS synonyms (
                id TEXT PRIMARY KEY,
                word_id TEXT NOT NULL REFERENCES words(id) ON DELETE CASCADE,
                synonym_word TEXT NOT NULL,
                meaning_zh TEXT
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cognates_word ON cognates(word_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_examples_word ON examples(word_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_synonyms_word ON synonyms(word_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_creates_all_tables() {
        let db = EtymosDb::open_in_memory().await.unwrap();

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        for table in TABLES {
            assert!(names.iter().any(|n| n == table), "missing table {}", table);
        }
    }

    #[tokio::test]
    async fn test_ensure_schema_is_repeatable() {
        let db = EtymosDb::open_in_memory().await.unwrap();
        db.ensure_schema().await.unwrap();
        db.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let db = EtymosDb::open_in_memory().await.unwrap();

        let result = sqlx::query(
            "INSERT INTO cognates (id, word_id, cognate_word, logic) VALUES ('c1', 'missing', 'w', 'l')",
        )
        .execute(db.pool())
        .await;

        assert!(result.is_err(), "orphan cognate must be rejected");
    }

    #[tokio::test]
    async fn test_original_yaml_must_be_json() {
        let db = EtymosDb::open_in_memory().await.unwrap();

        let result = sqlx::query("INSERT INTO words (id, original_yaml) VALUES ('w1', 'not json')")
            .execute(db.pool())
            .await;
        assert!(result.is_err());

        sqlx::query("INSERT INTO words (id, original_yaml) VALUES ('w2', '{}')")
            .execute(db.pool())
            .await
            .unwrap();
        let created: String = sqlx::query_scalar("SELECT created_at FROM words WHERE id = 'w2'")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert!(created.ends_with('Z'));
    }
}
