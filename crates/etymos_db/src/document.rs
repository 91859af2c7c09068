//! Vocabulary document mapping.
//!
//! A document is parsed into a generic tree (`serde_json::Value`) first. That tree is
//! what gets stored as the audit payload, and it is also the input to
//! [`ImportPlan::from_document`], which picks the fields each table needs.
//!
//! Expected shape (every field optional):
//!
//! ```yaml
//! yield:
//!   user_word, lemma, syllabification, user_context_sentence, part_of_speech
//!   contextual_meaning: { en, zh }
//!   other_common_meanings: [ ... ]
//! etymology:
//!   root_and_affixes: { prefix, root, suffix, structure_analysis }
//!   historical_origins: { history_myth, source_word, pie_root }
//!   visual_imagery_zh, meaning_evolution_zh
//! cognate_family:
//!   cognates: [ { word, logic } ]
//! application:
//!   selected_examples: [ { type, sentence, translation_zh } ]
//! nuance:
//!   synonyms: [ { word, meaning_zh } ]
//!   image_differentiation_zh
//! ```
//!
//! Scalars are read leniently: numbers and booleans become their text form, null or a
//! missing key becomes `None`. A mapping or list where text is expected is an error.

use crate::error::{DbError, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Parse YAML text into a generic document tree.
///
/// The root must be a mapping.
pub fn parse_yaml(text: &str) -> Result<Value> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    let tree = serde_json::to_value(&yaml)?;
    if !tree.is_object() {
        return Err(DbError::invalid_document(format!(
            "document root must be a mapping, found {}",
            kind(&tree)
        )));
    }
    Ok(tree)
}

// ============================================================================
// Import Plan
// ============================================================================

/// Everything one import writes, minus the identifiers the store hands out.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPlan {
    pub word: NewWord,
    pub etymology: NewEtymology,
    pub cognates: Vec<NewCognate>,
    pub examples: Vec<NewExample>,
    pub synonyms: Vec<NewSynonym>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWord {
    pub user_word: Option<String>,
    pub lemma: Option<String>,
    pub syllabification: Option<String>,
    pub part_of_speech: Option<String>,
    pub user_context_sentence: Option<String>,
    pub contextual_meaning_en: Option<String>,
    pub contextual_meaning_zh: Option<String>,
    pub other_common_meanings: Vec<String>,
    pub image_differentiation_zh: Option<String>,
    /// The whole source document
    pub original: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEtymology {
    pub prefix: Option<String>,
    pub root: Option<String>,
    pub suffix: Option<String>,
    pub structure_analysis: Option<String>,
    pub history_myth: Option<String>,
    pub source_word: Option<String>,
    pub pie_root: Option<String>,
    pub visual_imagery_zh: Option<String>,
    pub meaning_evolution_zh: Option<String>,
}

// Required columns stay optional here; the NOT NULL constraint is the only check.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCognate {
    pub cognate_word: Option<String>,
    pub logic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExample {
    pub example_type: Option<String>,
    pub sentence: Option<String>,
    pub translation_zh: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSynonym {
    pub synonym_word: Option<String>,
    pub meaning_zh: Option<String>,
}

impl ImportPlan {
    /// Map a document tree onto the five tables.
    pub fn from_document(document: &Value) -> Result<Self> {
        let root = document.as_object().ok_or_else(|| {
            DbError::invalid_document(format!(
                "document root must be a mapping, found {}",
                kind(document)
            ))
        })?;

        let yield_section: YieldSection = section(root, "yield")?;
        let etymology: EtymologySection = section(root, "etymology")?;
        let cognate_family: CognateFamilySection = section(root, "cognate_family")?;
        let application: ApplicationSection = section(root, "application")?;
        let nuance: NuanceSection = section(root, "nuance")?;

        let meaning = yield_section.contextual_meaning.unwrap_or_default();
        let word = NewWord {
            user_word: yield_section.user_word,
            lemma: yield_section.lemma,
            syllabification: yield_section.syllabification,
            part_of_speech: yield_section.part_of_speech,
            user_context_sentence: yield_section.user_context_sentence,
            contextual_meaning_en: meaning.en,
            contextual_meaning_zh: meaning.zh,
            other_common_meanings: yield_section.other_common_meanings,
            image_differentiation_zh: nuance.image_differentiation_zh,
            original: document.clone(),
        };

        let roots = etymology.root_and_affixes.unwrap_or_default();
        let origins = etymology.historical_origins.unwrap_or_default();
        let etymology = NewEtymology {
            prefix: roots.prefix,
            root: roots.root,
            suffix: roots.suffix,
            structure_analysis: roots.structure_analysis,
            history_myth: origins.history_myth,
            source_word: origins.source_word,
            pie_root: origins.pie_root,
            visual_imagery_zh: etymology.visual_imagery_zh,
            meaning_evolution_zh: etymology.meaning_evolution_zh,
        };

        let cognates = cognate_family
            .cognates
            .unwrap_or_default()
            .into_iter()
            .map(|c| NewCognate {
                cognate_word: c.word,
                logic: c.logic,
            })
            .collect();

        let examples = application
            .selected_examples
            .unwrap_or_default()
            .into_iter()
            .map(|e| NewExample {
                example_type: e.example_type,
                sentence: e.sentence,
                translation_zh: e.translation_zh,
            })
            .collect();

        let synonyms = nuance
            .synonyms
            .unwrap_or_default()
            .into_iter()
            .map(|s| NewSynonym {
                synonym_word: s.word,
                meaning_zh: s.meaning_zh,
            })
            .collect();

        Ok(Self {
            word,
            etymology,
            cognates,
            examples,
            synonyms,
        })
    }
}

// ============================================================================
// Document Sections
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct YieldSection {
    #[serde(default, deserialize_with = "text")]
    user_word: Option<String>,
    #[serde(default, deserialize_with = "text")]
    lemma: Option<String>,
    #[serde(default, deserialize_with = "text")]
    syllabification: Option<String>,
    #[serde(default, deserialize_with = "text")]
    user_context_sentence: Option<String>,
    #[serde(default, deserialize_with = "text")]
    part_of_speech: Option<String>,
    #[serde(default)]
    contextual_meaning: Option<BilingualText>,
    #[serde(default, deserialize_with = "text_list")]
    other_common_meanings: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BilingualText {
    #[serde(default, deserialize_with = "text")]
    en: Option<String>,
    #[serde(default, deserialize_with = "text")]
    zh: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EtymologySection {
    #[serde(default)]
    root_and_affixes: Option<RootAndAffixes>,
    #[serde(default)]
    historical_origins: Option<HistoricalOrigins>,
    #[serde(default, deserialize_with = "text")]
    visual_imagery_zh: Option<String>,
    #[serde(default, deserialize_with = "text")]
    meaning_evolution_zh: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RootAndAffixes {
    #[serde(default, deserialize_with = "text")]
    prefix: Option<String>,
    #[serde(default, deserialize_with = "text")]
    root: Option<String>,
    #[serde(default, deserialize_with = "text")]
    suffix: Option<String>,
    #[serde(default, deserialize_with = "text")]
    structure_analysis: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoricalOrigins {
    #[serde(default, deserialize_with = "text")]
    history_myth: Option<String>,
    #[serde(default, deserialize_with = "text")]
    source_word: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pie_root: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CognateFamilySection {
    #[serde(default)]
    cognates: Option<Vec<CognateEntry>>,
}

#[derive(Debug, Deserialize)]
struct CognateEntry {
    #[serde(default, deserialize_with = "text")]
    word: Option<String>,
    #[serde(default, deserialize_with = "text")]
    logic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApplicationSection {
    #[serde(default)]
    selected_examples: Option<Vec<ExampleEntry>>,
}

#[derive(Debug, Deserialize)]
struct ExampleEntry {
    #[serde(rename = "type", default, deserialize_with = "text")]
    example_type: Option<String>,
    #[serde(default, deserialize_with = "text")]
    sentence: Option<String>,
    #[serde(default, deserialize_with = "text")]
    translation_zh: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NuanceSection {
    #[serde(default)]
    synonyms: Option<Vec<SynonymEntry>>,
    #[serde(default, deserialize_with = "text")]
    image_differentiation_zh: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SynonymEntry {
    #[serde(default, deserialize_with = "text")]
    word: Option<String>,
    #[serde(default, deserialize_with = "text")]
    meaning_zh: Option<String>,
}

/// Read a top-level section; absent or null means an empty section.
fn section<T: DeserializeOwned + Default>(root: &Map<String, Value>, key: &str) -> Result<T> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value)
            .map_err(|e| DbError::invalid_document(format!("section '{}': {}", key, e))),
    }
}

fn scalar_text(value: Value) -> std::result::Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(format!("expected text, found {}", kind(&other))),
    }
}

fn text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    scalar_text(value).map_err(D::Error::custom)
}

fn text_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match scalar_text(item) {
                Ok(Some(s)) => Ok(s),
                Ok(None) => Err(D::Error::custom("list entries must not be null")),
                Err(msg) => Err(D::Error::custom(msg)),
            })
            .collect(),
        other => Err(D::Error::custom(format!(
            "expected a list of text, found {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
