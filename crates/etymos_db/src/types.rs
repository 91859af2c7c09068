//! Row types for the vocabulary tables.
//!
//! Field names follow the column names so JSON output reads the same as the schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Stored Entities
// ============================================================================

/// One vocabulary item (row of `words`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: Uuid,
    /// Surface form the user looked up
    pub user_word: Option<String>,
    /// Canonical dictionary form
    pub lemma: Option<String>,
    pub syllabification: Option<String>,
    pub part_of_speech: Option<String>,
    /// Sentence the user met the word in
    pub user_context_sentence: Option<String>,
    pub contextual_meaning_en: Option<String>,
    pub contextual_meaning_zh: Option<String>,
    pub other_common_meanings: Vec<String>,
    pub image_differentiation_zh: Option<String>,
    /// Verbatim source document, kept for audit
    pub original_yaml: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Structural and historical origin of a word (row of `etymologies`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etymology {
    pub word_id: Uuid,
    pub prefix: Option<String>,
    pub root: Option<String>,
    pub suffix: Option<String>,
    pub structure_analysis: Option<String>,
    pub history_myth: Option<String>,
    pub source_word: Option<String>,
    /// Reconstructed Proto-Indo-European root
    pub pie_root: Option<String>,
    pub visual_imagery_zh: Option<String>,
    pub meaning_evolution_zh: Option<String>,
}

/// Related word from the same root family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cognate {
    pub id: Uuid,
    pub word_id: Uuid,
    pub cognate_word: String,
    pub logic: String,
}

/// Usage sentence for a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub id: Uuid,
    pub word_id: Uuid,
    pub example_type: Option<String>,
    pub sentence: String,
    pub translation_zh: Option<String>,
}

/// Near-meaning word with a distinguishing note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub id: Uuid,
    pub word_id: Uuid,
    pub synonym_word: String,
    pub meaning_zh: Option<String>,
}

/// A word together with everything it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetail {
    #[serde(flatten)]
    pub word: Word,
    pub etymology: Option<Etymology>,
    pub cognates: Vec<Cognate>,
    pub examples: Vec<Example>,
    pub synonyms: Vec<Synonym>,
}

// ============================================================================
// Listing
// ============================================================================

/// Compact row for listings and lemma lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSummary {
    pub id: Uuid,
    pub lemma: Option<String>,
    pub part_of_speech: Option<String>,
    pub syllabification: Option<String>,
    pub contextual_meaning_en: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Sort order for word listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSort {
    /// Most recently imported first
    #[default]
    Newest,
    Oldest,
    /// Lemma ascending
    Az,
    /// Lemma descending
    Za,
}

impl WordSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Az => "az",
            Self::Za => "za",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "az" => Some(Self::Az),
            "za" => Some(Self::Za),
            _ => None,
        }
    }

    /// ORDER BY clause; rowid breaks ties between rows stamped in the same millisecond.
    /// Lemma orders compare the folded key, so case does not split the alphabet.
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            Self::Newest => "created_at DESC, rowid DESC",
            Self::Oldest => "created_at ASC, rowid ASC",
            Self::Az => "lemma_key ASC, rowid ASC",
            Self::Za => "lemma_key DESC, rowid DESC",
        }
    }
}

impl std::fmt::Display for WordSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WordSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown sort '{}', expected newest, oldest, az or za", s))
    }
}

/// Filter and paging for [`crate::EtymosDb::list_words`]
#[derive(Debug, Clone, Default)]
pub struct WordQuery {
    /// Case-insensitive substring of the lemma
    pub search: Option<String>,
    pub sort: WordSort,
    /// 1-based page number, 0 is treated as 1
    pub page: u32,
    /// Page size, clamped to 1..=200; 0 means the default of 20
    pub limit: u32,
}

impl WordQuery {
    pub const DEFAULT_LIMIT: u32 = 20;
    pub const MAX_LIMIT: u32 = 200;

    pub(crate) fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    pub(crate) fn effective_limit(&self) -> u32 {
        if self.limit == 0 {
            Self::DEFAULT_LIMIT
        } else {
            self.limit.clamp(1, Self::MAX_LIMIT)
        }
    }

    /// LIKE pattern over `lemma_key`; `%`, `_` and backslash in the search match literally.
    pub(crate) fn search_pattern(&self) -> Option<String> {
        let needle = lemma_key(self.search.as_deref()?);
        if needle.is_empty() {
            return None;
        }
        let mut pattern = String::with_capacity(needle.len() + 2);
        pattern.push('%');
        for c in needle.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        Some(pattern)
    }
}

/// Case-folded lemma used for lookups, search and alphabetical order.
pub(crate) fn lemma_key(lemma: &str) -> String {
    lemma.trim().to_lowercase()
}

/// One page of word summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordPage {
    pub items: Vec<WordSummary>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

// ============================================================================
// Counts
// ============================================================================

/// Rows owned by one word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentCounts {
    pub etymologies: u64,
    pub cognates: u64,
    pub examples: u64,
    pub synonyms: u64,
}

impl DependentCounts {
    pub fn total(&self) -> u64 {
        self.etymologies + self.cognates + self.examples + self.synonyms
    }
}

/// Row counts for every table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub words: u64,
    pub etymologies: u64,
    pub cognates: u64,
    pub examples: u64,
    pub synonyms: u64,
}
