//! Word read and delete operations

use crate::error::{DbError, Result};
use crate::schema::TABLES;
use crate::types::*;
use crate::EtymosDb;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

const WORD_COLUMNS: &str = "id, user_word, lemma, syllabification, part_of_speech, \
    user_context_sentence, contextual_meaning_en, contextual_meaning_zh, \
    other_common_meanings, image_differentiation_zh, original_yaml, created_at, updated_at";

const SUMMARY_COLUMNS: &str =
    "id, lemma, part_of_speech, syllabification, contextual_meaning_en, created_at";

impl EtymosDb {
    // ========================================================================
    // Lookups
    // ========================================================================

    /// Get a word by ID
    pub async fn get_word(&self, id: Uuid) -> Result<Option<Word>> {
        let row = sqlx::query(&format!("SELECT {} FROM words WHERE id = ?", WORD_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_word(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a word with its etymology, cognates, examples and synonyms
    pub async fn get_word_detail(&self, id: Uuid) -> Result<Option<WordDetail>> {
        let word = match self.get_word(id).await? {
            Some(word) => word,
            None => return Ok(None),
        };
        let key = id.to_string();

        let etymology = sqlx::query(
            "SELECT word_id, prefix, root, suffix, structure_analysis, history_myth, source_word, \
             pie_root, visual_imagery_zh, meaning_evolution_zh FROM etymologies WHERE word_id = ?",
        )
        .bind(&key)
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row_to_etymology(&row))
        .transpose()?;

        // Dependents come back in insertion order
        let cognates = sqlx::query(
            "SELECT id, word_id, cognate_word, logic FROM cognates WHERE word_id = ? ORDER BY rowid",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_cognate)
        .collect::<Result<Vec<_>>>()?;

        let examples = sqlx::query(
            "SELECT id, word_id, example_type, sentence, translation_zh FROM examples \
             WHERE word_id = ? ORDER BY rowid",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_example)
        .collect::<Result<Vec<_>>>()?;

        let synonyms = sqlx::query(
            "SELECT id, word_id, synonym_word, meaning_zh FROM synonyms WHERE word_id = ? ORDER BY rowid",
        )
        .bind(&key)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(row_to_synonym)
        .collect::<Result<Vec<_>>>()?;

        Ok(Some(WordDetail {
            word,
            etymology,
            cognates,
            examples,
            synonyms,
        }))
    }

    /// Find words whose lemma equals `word`, ignoring case.
    ///
    /// Imports never deduplicate, so several rows can share a lemma.
    pub async fn find_by_lemma(&self, word: &str) -> Result<Vec<WordSummary>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM words WHERE lemma_key = ? ORDER BY created_at DESC, rowid DESC",
            SUMMARY_COLUMNS
        ))
        .bind(lemma_key(word))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_summary).collect()
    }

    /// List words page by page
    pub async fn list_words(&self, query: &WordQuery) -> Result<WordPage> {
        let page = query.effective_page();
        let limit = query.effective_limit();
        let offset = (i64::from(page) - 1) * i64::from(limit);
        let pattern = query.search_pattern();

        let where_sql = if pattern.is_some() {
            r"WHERE lemma_key LIKE ? ESCAPE '\'"
        } else {
            ""
        };

        let count_sql = format!("SELECT COUNT(*) FROM words {}", where_sql);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(ref p) = pattern {
            count_query = count_query.bind(p);
        }
        let total = count_query.fetch_one(&self.pool).await?.max(0) as u64;

        let data_sql = format!(
            "SELECT {} FROM words {} ORDER BY {} LIMIT ? OFFSET ?",
            SUMMARY_COLUMNS,
            where_sql,
            query.sort.order_by()
        );
        let mut data_query = sqlx::query(&data_sql);
        if let Some(ref p) = pattern {
            data_query = data_query.bind(p);
        }
        let rows = data_query
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let items = rows.iter().map(row_to_summary).collect::<Result<Vec<_>>>()?;
        let total_pages = total.div_ceil(u64::from(limit)).max(1);

        Ok(WordPage {
            items,
            page,
            limit,
            total,
            total_pages,
        })
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Delete a word; its dependents go with it through ON DELETE CASCADE.
    ///
    /// Returns false when no word has this ID.
    pub async fn delete_word(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM words WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Count the rows a word owns in each dependent table
    pub async fn dependent_counts(&self, id: Uuid) -> Result<DependentCounts> {
        let key = id.to_string();
        let mut counts = DependentCounts::default();

        for (table, slot) in [
            ("etymologies", &mut counts.etymologies),
            ("cognates", &mut counts.cognates),
            ("examples", &mut counts.examples),
            ("synonyms", &mut counts.synonyms),
        ] {
            let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE word_id = ?", table))
                .bind(&key)
                .fetch_one(&self.pool)
                .await?;
            *slot = n.max(0) as u64;
        }

        Ok(counts)
    }

    /// Count rows in every table
    pub async fn table_counts(&self) -> Result<TableCounts> {
        let mut totals = [0u64; 5];
        for (table, total) in TABLES.iter().zip(totals.iter_mut()) {
            let n: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&self.pool)
                .await?;
            *total = n.max(0) as u64;
        }

        let [words, etymologies, cognates, examples, synonyms] = totals;
        Ok(TableCounts {
            words,
            etymologies,
            cognates,
            examples,
            synonyms,
        })
    }
}

// ============================================================================
// Row Mapping
// ============================================================================

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| DbError::invalid_state(format!("bad id '{}': {}", raw, e)))
}

fn row_to_word(row: &SqliteRow) -> Result<Word> {
    let id: String = row.get("id");
    let meanings: String = row.get("other_common_meanings");
    let original: String = row.get("original_yaml");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Word {
        id: parse_id(&id)?,
        user_word: row.get("user_word"),
        lemma: row.get("lemma"),
        syllabification: row.get("syllabification"),
        part_of_speech: row.get("part_of_speech"),
        user_context_sentence: row.get("user_context_sentence"),
        contextual_meaning_en: row.get("contextual_meaning_en"),
        contextual_meaning_zh: row.get("contextual_meaning_zh"),
        other_common_meanings: serde_json::from_str(&meanings)?,
        image_differentiation_zh: row.get("image_differentiation_zh"),
        original_yaml: serde_json::from_str(&original)?,
        created_at: EtymosDb::parse_timestamp(&created_at)?,
        updated_at: EtymosDb::parse_timestamp(&updated_at)?,
    })
}

fn row_to_summary(row: &SqliteRow) -> Result<WordSummary> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");

    Ok(WordSummary {
        id: parse_id(&id)?,
        lemma: row.get("lemma"),
        part_of_speech: row.get("part_of_speech"),
        syllabification: row.get("syllabification"),
        contextual_meaning_en: row.get("contextual_meaning_en"),
        created_at: EtymosDb::parse_timestamp(&created_at)?,
    })
}

fn row_to_etymology(row: &SqliteRow) -> Result<Etymology> {
    let word_id: String = row.get("word_id");

    Ok(Etymology {
        word_id: parse_id(&word_id)?,
        prefix: row.get("prefix"),
        root: row.get("root"),
        suffix: row.get("suffix"),
        structure_analysis: row.get("structure_analysis"),
        history_myth: row.get("history_myth"),
        source_word: row.get("source_word"),
        pie_root: row.get("pie_root"),
        visual_imagery_zh: row.get("visual_imagery_zh"),
        meaning_evolution_zh: row.get("meaning_evolution_zh"),
    })
}

fn row_to_cognate(row: &SqliteRow) -> Result<Cognate> {
    let id: String = row.get("id");
    let word_id: String = row.get("word_id");

    Ok(Cognate {
        id: parse_id(&id)?,
        word_id: parse_id(&word_id)?,
        cognate_word: row.get("cognate_word"),
        logic: row.get("logic"),
    })
}

fn row_to_example(row: &SqliteRow) -> Result<Example> {
    let id: String = row.get("id");
    let word_id: String = row.get("word_id");

    Ok(Example {
        id: parse_id(&id)?,
        word_id: parse_id(&word_id)?,
        example_type: row.get("example_type"),
        sentence: row.get("sentence"),
        translation_zh: row.get("translation_zh"),
    })
}

fn row_to_synonym(row: &SqliteRow) -> Result<Synonym> {
    let id: String = row.get("id");
    let word_id: String = row.get("word_id");

    Ok(Synonym {
        id: parse_id(&id)?,
        word_id: parse_id(&word_id)?,
        synonym_word: row.get("synonym_word"),
        meaning_zh: row.get("meaning_zh"),
    })
}
