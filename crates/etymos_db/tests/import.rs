use etymos_db::document::parse_yaml;
use etymos_db::sample::HOUSEHOLD_YAML;
use etymos_db::{DbError, EtymosDb, TableCounts};
use serde_json::json;
use tempfile::TempDir;

async fn open_temp_db() -> (TempDir, EtymosDb) {
    let tmp = TempDir::new().expect("create temp dir");
    let db = EtymosDb::open(tmp.path().join("etymos.sqlite3"))
        .await
        .expect("open database");
    (tmp, db)
}

#[tokio::test]
async fn test_household_scenario() {
    let (_tmp, db) = open_temp_db().await;

    let word = db.import_yaml(HOUSEHOLD_YAML).await.unwrap();
    assert_eq!(word.lemma.as_deref(), Some("household"));

    let counts = db.dependent_counts(word.id).await.unwrap();
    assert_eq!(counts.etymologies, 1);
    assert_eq!(counts.cognates, 3);
    assert_eq!(counts.examples, 3);
    assert_eq!(counts.synonyms, 2);

    let detail = db.get_word_detail(word.id).await.unwrap().unwrap();
    let cognates: Vec<&str> = detail.cognates.iter().map(|c| c.cognate_word.as_str()).collect();
    assert_eq!(cognates, ["Husband", "Behold", "Hide"]);
    let synonyms: Vec<&str> = detail.synonyms.iter().map(|s| s.synonym_word.as_str()).collect();
    assert_eq!(synonyms, ["Family", "Residence"]);
    assert_eq!(detail.examples.len(), 3);

    let etymology = detail.etymology.expect("etymology row");
    assert_eq!(etymology.word_id, word.id);
    assert_eq!(etymology.prefix.as_deref(), Some("N/A"));
    assert!(etymology.pie_root.as_deref().unwrap().contains("*(s)keu-"));
}

#[tokio::test]
async fn test_word_fields_round_trip() {
    let (_tmp, db) = open_temp_db().await;
    let document = parse_yaml(HOUSEHOLD_YAML).unwrap();

    let id = db.import_document(&document).await.unwrap().id;
    let stored = db.get_word(id).await.unwrap().unwrap();

    let section = &document["yield"];
    assert_eq!(stored.user_word.as_deref(), section["user_word"].as_str());
    assert_eq!(stored.lemma.as_deref(), section["lemma"].as_str());
    assert_eq!(stored.syllabification.as_deref(), section["syllabification"].as_str());
    assert_eq!(stored.part_of_speech.as_deref(), section["part_of_speech"].as_str());
    assert_eq!(
        stored.user_context_sentence.as_deref(),
        section["user_context_sentence"].as_str()
    );
    assert_eq!(
        stored.contextual_meaning_en.as_deref(),
        section["contextual_meaning"]["en"].as_str()
    );
    assert_eq!(
        stored.contextual_meaning_zh.as_deref(),
        section["contextual_meaning"]["zh"].as_str()
    );
    assert_eq!(
        json!(stored.other_common_meanings),
        section["other_common_meanings"]
    );
    assert_eq!(
        stored.image_differentiation_zh.as_deref(),
        document["nuance"]["image_differentiation_zh"].as_str()
    );
    assert_eq!(stored.original_yaml, document);
}

#[tokio::test]
async fn test_absent_fields_are_null_or_empty() {
    let (_tmp, db) = open_temp_db().await;

    let id = db
        .import_yaml("yield:\n  lemma: sparse\n")
        .await
        .unwrap()
        .id;
    let detail = db.get_word_detail(id).await.unwrap().unwrap();

    assert_eq!(detail.word.lemma.as_deref(), Some("sparse"));
    assert_eq!(detail.word.user_word, None);
    assert_eq!(detail.word.contextual_meaning_en, None);
    assert_eq!(detail.word.image_differentiation_zh, None);
    assert!(detail.word.other_common_meanings.is_empty());

    // The etymology row exists even when the section is missing
    let etymology = detail.etymology.expect("etymology row");
    assert_eq!(etymology.root, None);
    assert!(detail.cognates.is_empty());
    assert!(detail.examples.is_empty());
    assert!(detail.synonyms.is_empty());
}

#[tokio::test]
async fn test_dependent_rows_match_their_entries() {
    let (_tmp, db) = open_temp_db().await;
    let document = json!({
        "yield": { "lemma": "kin" },
        "cognate_family": { "cognates": [
            { "word": "Kind", "logic": "same root" },
            { "word": "Kindred", "logic": "kin + -red" }
        ]},
        "application": { "selected_examples": [
            { "type": "Current Context", "sentence": "Next of kin.", "translation_zh": "近亲" },
            { "sentence": "Kith and kin." }
        ]},
        "nuance": { "synonyms": [ { "word": "Family" } ] }
    });

    let id = db.import_document(&document).await.unwrap().id;
    let detail = db.get_word_detail(id).await.unwrap().unwrap();

    assert_eq!(detail.cognates.len(), 2);
    assert_eq!(detail.cognates[1].cognate_word, "Kindred");
    assert_eq!(detail.cognates[1].logic, "kin + -red");

    assert_eq!(detail.examples.len(), 2);
    assert_eq!(detail.examples[0].example_type.as_deref(), Some("Current Context"));
    assert_eq!(detail.examples[0].translation_zh.as_deref(), Some("近亲"));
    assert_eq!(detail.examples[1].example_type, None);
    assert_eq!(detail.examples[1].sentence, "Kith and kin.");

    assert_eq!(detail.synonyms.len(), 1);
    assert_eq!(detail.synonyms[0].meaning_zh, None);

    assert!(detail.cognates.iter().all(|c| c.word_id == id));
    assert!(detail.examples.iter().all(|e| e.word_id == id));
    assert!(detail.synonyms.iter().all(|s| s.word_id == id));
}

#[tokio::test]
async fn test_delete_cascades_to_dependents() {
    let (_tmp, db) = open_temp_db().await;
    let keep = db.import_yaml(HOUSEHOLD_YAML).await.unwrap().id;
    let doomed = db.import_yaml(HOUSEHOLD_YAML).await.unwrap().id;

    assert!(db.delete_word(doomed).await.unwrap());

    assert!(db.get_word(doomed).await.unwrap().is_none());
    assert_eq!(db.dependent_counts(doomed).await.unwrap().total(), 0);

    let counts = db.table_counts().await.unwrap();
    assert_eq!(
        counts,
        TableCounts {
            words: 1,
            etymologies: 1,
            cognates: 3,
            examples: 3,
            synonyms: 2,
        }
    );
    assert_eq!(db.dependent_counts(keep).await.unwrap().cognates, 3);
}

#[tokio::test]
async fn test_failure_on_third_cognate_rolls_back_everything() {
    let (_tmp, db) = open_temp_db().await;
    let document = json!({
        "yield": { "lemma": "household" },
        "etymology": { "root_and_affixes": { "root": "House + Hold" } },
        "cognate_family": { "cognates": [
            { "word": "Husband", "logic": "house + bond" },
            { "word": "Behold", "logic": "be- + hold" },
            { "word": "Hide" }
        ]},
        "application": { "selected_examples": [ { "sentence": "A household name." } ] },
        "nuance": { "synonyms": [ { "word": "Family" } ] }
    });

    let err = db.import_document(&document).await.unwrap_err();
    assert!(matches!(err, DbError::Constraint(_)), "unexpected error: {:?}", err);

    assert_eq!(db.table_counts().await.unwrap(), TableCounts::default());
    assert!(db.find_by_lemma("household").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_example_sentence_rolls_back() {
    let (_tmp, db) = open_temp_db().await;
    let document = json!({
        "yield": { "lemma": "orphan" },
        "application": { "selected_examples": [ { "type": "Literal" } ] }
    });

    assert!(db.import_document(&document).await.is_err());
    assert_eq!(db.table_counts().await.unwrap(), TableCounts::default());
}

#[tokio::test]
async fn test_reimport_creates_independent_words() {
    let (_tmp, db) = open_temp_db().await;

    let first = db.import_yaml(HOUSEHOLD_YAML).await.unwrap();
    let second = db.import_yaml(HOUSEHOLD_YAML).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(db.find_by_lemma("household").await.unwrap().len(), 2);
    assert_eq!(db.table_counts().await.unwrap().cognates, 6);
}

#[tokio::test]
async fn test_store_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("etymos.sqlite3");

    let id = {
        let db = EtymosDb::open(&path).await.unwrap();
        let id = db.import_yaml(HOUSEHOLD_YAML).await.unwrap().id;
        db.close().await;
        id
    };

    let db = EtymosDb::open(&path).await.unwrap();
    let detail = db.get_word_detail(id).await.unwrap().unwrap();
    assert_eq!(detail.cognates.len(), 3);
}
