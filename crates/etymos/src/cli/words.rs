//! Word commands: list, show, check, delete

use super::error::HelpfulError;
use super::output::{format_time_absolute, or_dash, print_json, print_table, truncate};
use super::{open_store, parse_word_id, runtime};
use etymos_db::{WordDetail, WordQuery, WordSort, WordSummary};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

const MEANING_WIDTH: usize = 48;

/// Arguments for the list command
#[derive(Debug)]
pub struct ListArgs {
    pub search: Option<String>,
    pub sort: WordSort,
    pub page: u32,
    pub limit: u32,
    pub json: bool,
    pub database_url: String,
}

/// Arguments for the show command
#[derive(Debug)]
pub struct ShowArgs {
    pub id: String,
    pub json: bool,
    pub database_url: String,
}

/// Arguments for the check command
#[derive(Debug)]
pub struct CheckArgs {
    pub word: String,
    pub json: bool,
    pub database_url: String,
}

/// Arguments for the delete command
#[derive(Debug)]
pub struct DeleteArgs {
    pub id: String,
    pub json: bool,
    pub database_url: String,
}

pub fn run_list(args: ListArgs) -> anyhow::Result<()> {
    let rt = runtime()?;
    rt.block_on(async { list_async(args).await })
}

async fn list_async(args: ListArgs) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    let query = WordQuery {
        search: args.search,
        sort: args.sort,
        page: args.page,
        limit: args.limit,
    };
    let page = db.list_words(&query).await?;
    db.close().await;

    if args.json {
        return print_json(&page);
    }

    if page.items.is_empty() {
        println!("No words found.");
        return Ok(());
    }

    print_table(
        &["ID", "LEMMA", "POS", "MEANING", "IMPORTED"],
        page.items.iter().map(summary_row).collect(),
    );
    println!(
        "Page {} of {} ({} word{}, sorted {})",
        page.page,
        page.total_pages,
        page.total,
        if page.total == 1 { "" } else { "s" },
        query.sort
    );
    Ok(())
}

fn summary_row(item: &WordSummary) -> Vec<String> {
    vec![
        item.id.to_string(),
        or_dash(item.lemma.as_deref()),
        or_dash(item.part_of_speech.as_deref()),
        truncate(&or_dash(item.contextual_meaning_en.as_deref()), MEANING_WIDTH),
        format_time_absolute(&item.created_at),
    ]
}

pub fn run_show(args: ShowArgs) -> anyhow::Result<()> {
    let id = parse_word_id(&args.id)?;
    let rt = runtime()?;
    rt.block_on(async { show_async(args, id).await })
}

async fn show_async(args: ShowArgs, id: Uuid) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    let detail = db
        .get_word_detail(id)
        .await?
        .ok_or_else(|| HelpfulError::word_not_found(&args.id))?;
    db.close().await;

    if args.json {
        return print_json(&detail);
    }

    print_detail(&detail);
    Ok(())
}

fn print_detail(detail: &WordDetail) {
    let word = &detail.word;
    println!("{}", or_dash(word.lemma.as_deref()).to_uppercase());
    println!("  Id:              {}", word.id);
    println!("  Looked up as:    {}", or_dash(word.user_word.as_deref()));
    println!("  Syllables:       {}", or_dash(word.syllabification.as_deref()));
    println!("  Part of speech:  {}", or_dash(word.part_of_speech.as_deref()));
    println!("  Context:         {}", or_dash(word.user_context_sentence.as_deref()));
    println!("  Meaning (en):    {}", or_dash(word.contextual_meaning_en.as_deref()));
    println!("  Meaning (zh):    {}", or_dash(word.contextual_meaning_zh.as_deref()));
    if !word.other_common_meanings.is_empty() {
        println!("  Other meanings:");
        for meaning in &word.other_common_meanings {
            println!("    - {}", meaning);
        }
    }
    println!("  Imported:        {}", format_time_absolute(&word.created_at));

    if let Some(etym) = &detail.etymology {
        println!();
        println!("ETYMOLOGY");
        println!(
            "  {} + {} + {}",
            or_dash(etym.prefix.as_deref()),
            or_dash(etym.root.as_deref()),
            or_dash(etym.suffix.as_deref())
        );
        println!("  Structure:  {}", or_dash(etym.structure_analysis.as_deref()));
        println!("  Source:     {}", or_dash(etym.source_word.as_deref()));
        println!("  PIE root:   {}", or_dash(etym.pie_root.as_deref()));
        println!("  History:    {}", or_dash(etym.history_myth.as_deref()));
    }

    if !detail.cognates.is_empty() {
        println!();
        print_table(
            &["COGNATE", "LOGIC"],
            detail
                .cognates
                .iter()
                .map(|c| vec![c.cognate_word.clone(), c.logic.clone()])
                .collect(),
        );
    }

    if !detail.examples.is_empty() {
        println!();
        print_table(
            &["TYPE", "SENTENCE", "TRANSLATION"],
            detail
                .examples
                .iter()
                .map(|e| {
                    vec![
                        or_dash(e.example_type.as_deref()),
                        e.sentence.clone(),
                        or_dash(e.translation_zh.as_deref()),
                    ]
                })
                .collect(),
        );
    }

    if !detail.synonyms.is_empty() {
        println!();
        print_table(
            &["SYNONYM", "DIFFERENCE"],
            detail
                .synonyms
                .iter()
                .map(|s| vec![s.synonym_word.clone(), or_dash(s.meaning_zh.as_deref())])
                .collect(),
        );
    }

    if let Some(image) = word.image_differentiation_zh.as_deref() {
        println!();
        println!("NUANCE");
        println!("  {}", image.trim());
    }
}

/// Result of a lemma lookup
#[derive(Debug, Serialize)]
struct CheckReport {
    word: String,
    exists: bool,
    matches: Vec<WordSummary>,
}

pub fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let rt = runtime()?;
    rt.block_on(async { check_async(args).await })
}

async fn check_async(args: CheckArgs) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    let matches = db.find_by_lemma(&args.word).await?;
    db.close().await;

    let report = CheckReport {
        word: args.word,
        exists: !matches.is_empty(),
        matches,
    };

    if args.json {
        return print_json(&report);
    }

    if !report.exists {
        println!("'{}' is not in the store.", report.word);
        return Ok(());
    }
    println!(
        "'{}' is stored {} time{}:",
        report.word,
        report.matches.len(),
        if report.matches.len() == 1 { "" } else { "s" }
    );
    print_table(
        &["ID", "LEMMA", "POS", "MEANING", "IMPORTED"],
        report.matches.iter().map(summary_row).collect(),
    );
    Ok(())
}

pub fn run_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let id = parse_word_id(&args.id)?;
    let rt = runtime()?;
    rt.block_on(async { delete_async(args, id).await })
}

async fn delete_async(args: DeleteArgs, id: Uuid) -> anyhow::Result<()> {
    let db = open_store(&args.database_url).await?;
    let deleted = db.delete_word(id).await?;
    db.close().await;

    if !deleted {
        return Err(HelpfulError::word_not_found(&args.id).into());
    }
    info!(word_id = %id, "Deleted word");

    if args.json {
        return print_json(&serde_json::json!({ "id": id, "deleted": true }));
    }
    println!("Deleted word {}", id);
    Ok(())
}
