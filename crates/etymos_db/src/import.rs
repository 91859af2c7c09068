//! Document import: one word and its dependents in one transaction.

use crate::document::{parse_yaml, ImportPlan};
use crate::error::{DbError, Result};
use crate::types::{lemma_key, Word};
use crate::EtymosDb;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteConnection;
use sqlx::Row;
use tracing::{debug, info, warn};
use uuid::Uuid;

impl EtymosDb {
    /// Parse YAML text and import it.
    pub async fn import_yaml(&self, text: &str) -> Result<Word> {
        let document = parse_yaml(text)?;
        self.import_document(&document).await
    }

    /// Import a parsed document tree.
    ///
    /// Malformed documents fail before anything is written.
    pub async fn import_document(&self, document: &Value) -> Result<Word> {
        let plan = ImportPlan::from_document(document)?;
        self.import_plan(&plan).await
    }

    /// Write a word and its dependent rows atomically.
    ///
    /// The word row goes in first so its id can be referenced by the etymology,
    /// cognates, examples and synonyms. Any failure rolls the whole call back and
    /// is returned unchanged; nothing from a failed call stays visible.
    pub async fn import_plan(&self, plan: &ImportPlan) -> Result<Word> {
        let original_json = serde_json::to_string(&plan.word.original)?;
        let meanings_json = serde_json::to_string(&plan.word.other_common_meanings)?;

        let mut tx = self.pool.begin().await?;

        let written = write_plan(&mut *tx, plan, &original_json, &meanings_json).await;
        let (word_id, created_at, updated_at) = match written {
            Ok(stamped) => stamped,
            Err(err) => {
                warn!(error = %err, lemma = ?plan.word.lemma, "Import failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                return Err(err);
            }
        };

        tx.commit().await?;

        info!(
            word_id = %word_id,
            lemma = plan.word.lemma.as_deref().unwrap_or("<none>"),
            cognates = plan.cognates.len(),
            examples = plan.examples.len(),
            synonyms = plan.synonyms.len(),
            "Imported word"
        );

        Ok(Word {
            id: word_id,
            user_word: plan.word.user_word.clone(),
            lemma: plan.word.lemma.clone(),
            syllabification: plan.word.syllabification.clone(),
            part_of_speech: plan.word.part_of_speech.clone(),
            user_context_sentence: plan.word.user_context_sentence.clone(),
            contextual_meaning_en: plan.word.contextual_meaning_en.clone(),
            contextual_meaning_zh: plan.word.contextual_meaning_zh.clone(),
            other_common_meanings: plan.word.other_common_meanings.clone(),
            image_differentiation_zh: plan.word.image_differentiation_zh.clone(),
            original_yaml: plan.word.original.clone(),
            created_at,
            updated_at,
        })
    }
}

/// Insert every row of the plan on one connection. Returns the new word id and the
/// timestamps the store assigned.
async fn write_plan(
    conn: &mut SqliteConnection,
    plan: &ImportPlan,
    original_json: &str,
    meanings_json: &str,
) -> Result<(Uuid, DateTime<Utc>, DateTime<Utc>)> {
    let word_id = Uuid::new_v4();
    let word_key = word_id.to_string();
    let word = &plan.word;

    let row = sqlx::query(
        r#"
        INSERT INTO words (
            id, user_word, lemma, lemma_key, syllabification, part_of_speech,
            user_context_sentence, contextual_meaning_en, contextual_meaning_zh,
            other_common_meanings, image_differentiation_zh, original_yaml
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING created_at, updated_at
        "#,
    )
    .bind(&word_key)
    .bind(&word.user_word)
    .bind(&word.lemma)
    .bind(word.lemma.as_deref().map(lemma_key))
    .bind(&word.syllabification)
    .bind(&word.part_of_speech)
    .bind(&word.user_context_sentence)
    .bind(&word.contextual_meaning_en)
    .bind(&word.contextual_meaning_zh)
    .bind(meanings_json)
    .bind(&word.image_differentiation_zh)
    .bind(original_json)
    .fetch_one(&mut *conn)
    .await
    .map_err(DbError::from_write)?;

    // Parsed here so a bad stamp fails the transaction instead of a committed import
    let created_at = EtymosDb::parse_timestamp(&row.get::<String, _>("created_at"))?;
    let updated_at = EtymosDb::parse_timestamp(&row.get::<String, _>("updated_at"))?;

    let etym = &plan.etymology;
    sqlx::query(
        r#"
        INSERT INTO etymologies (
            word_id, prefix, root, suffix, structure_analysis,
            history_myth, source_word, pie_root,
            visual_imagery_zh, meaning_evolution_zh
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&word_key)
    .bind(&etym.prefix)
    .bind(&etym.root)
    .bind(&etym.suffix)
    .bind(&etym.structure_analysis)
    .bind(&etym.history_myth)
    .bind(&etym.source_word)
    .bind(&etym.pie_root)
    .bind(&etym.visual_imagery_zh)
    .bind(&etym.meaning_evolution_zh)
    .execute(&mut *conn)
    .await
    .map_err(DbError::from_write)?;

    for cognate in &plan.cognates {
        sqlx::query("INSERT INTO cognates (id, word_id, cognate_word, logic) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&word_key)
            .bind(&cognate.cognate_word)
            .bind(&cognate.logic)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from_write)?;
    }
    debug!(word_id = %word_id, count = plan.cognates.len(), "Cognates written");

    for example in &plan.examples {
        sqlx::query(
            "INSERT INTO examples (id, word_id, example_type, sentence, translation_zh) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&word_key)
        .bind(&example.example_type)
        .bind(&example.sentence)
        .bind(&example.translation_zh)
        .execute(&mut *conn)
        .await
        .map_err(DbError::from_write)?;
    }
    debug!(word_id = %word_id, count = plan.examples.len(), "Examples written");

    for synonym in &plan.synonyms {
        sqlx::query("INSERT INTO synonyms (id, word_id, synonym_word, meaning_zh) VALUES (?, ?, ?, ?)")
            .bind(Uuid::new_v4().to_string())
            .bind(&word_key)
            .bind(&synonym.synonym_word)
            .bind(&synonym.meaning_zh)
            .execute(&mut *conn)
            .await
            .map_err(DbError::from_write)?;
    }
    debug!(word_id = %word_id, count = plan.synonyms.len(), "Synonyms written");

    Ok((word_id, created_at, updated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::HOUSEHOLD_YAML;
    use serde_json::json;

    #[tokio::test]
    async fn test_import_returns_stored_word() {
        let db = EtymosDb::open_in_memory().await.unwrap();

        let word = db.import_yaml(HOUSEHOLD_YAML).await.unwrap();
        assert_eq!(word.lemma.as_deref(), Some("household"));
        assert_eq!(word.created_at, word.updated_at);

        let stored = db.get_word(word.id).await.unwrap().unwrap();
        assert_eq!(stored, word);
    }

    #[tokio::test]
    async fn test_not_null_violation_is_constraint_error() {
        let db = EtymosDb::open_in_memory().await.unwrap();
        let doc = json!({
            "yield": { "lemma": "broken" },
            "nuance": { "synonyms": [ { "meaning_zh": "no word" } ] }
        });

        let err = db.import_document(&doc).await.unwrap_err();
        assert!(err.is_constraint(), "unexpected error: {:?}", err);
        assert_eq!(db.table_counts().await.unwrap().words, 0);
    }

    #[tokio::test]
    async fn test_import_stores_folded_lemma_key() {
        let db = EtymosDb::open_in_memory().await.unwrap();
        let id = db.import_yaml("yield:\n  lemma: \" Über \"\n").await.unwrap().id;

        let key: Option<String> = sqlx::query_scalar("SELECT lemma_key FROM words WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(key.as_deref(), Some("über"));

        let id = db.import_yaml("yield:\n  user_word: nameless\n").await.unwrap().id;
        let key: Option<String> = sqlx::query_scalar("SELECT lemma_key FROM words WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(key, None);
    }

    #[tokio::test]
    async fn test_unreadable_timestamp_rolls_back() {
        let db = EtymosDb::open_in_memory().await.unwrap();

        // Rebuild `words` with a default the importer cannot parse
        for table in ["synonyms", "examples", "cognates", "etymologies", "words"] {
            sqlx::query(&format!("DROP TABLE {}", table))
                .execute(db.pool())
                .await
                .unwrap();
        }
        sqlx::query(
            r#"CREATE TABLE words (
                id TEXT PRIMARY KEY,
                user_word TEXT,
                lemma TEXT,
                lemma_key TEXT,
                syllabification TEXT,
                part_of_speech TEXT,
                user_context_sentence TEXT,
                contextual_meaning_en TEXT,
                contextual_meaning_zh TEXT,
                other_common_meanings TEXT NOT NULL DEFAULT '[]',
                image_differentiation_zh TEXT,
                original_yaml TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT 'yesterday',
                updated_at TEXT NOT NULL DEFAULT 'yesterday'
            )"#,
        )
        .execute(db.pool())
        .await
        .unwrap();
        db.ensure_schema().await.unwrap();

        let err = db.import_yaml(HOUSEHOLD_YAML).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidState(_)), "unexpected error: {:?}", err);
        assert_eq!(db.table_counts().await.unwrap(), Default::default());
    }

    #[tokio::test]
    async fn test_malformed_document_writes_nothing() {
        let db = EtymosDb::open_in_memory().await.unwrap();

        let err = db.import_yaml("yield: just a string\n").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidDocument(_)));
        assert_eq!(db.table_counts().await.unwrap(), Default::default());
    }
}
