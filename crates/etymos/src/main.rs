//! Etymos command-line interface
//!
//! Imports structured YAML vocabulary documents into the relational store and
//! inspects what is stored.

use clap::{Parser, Subcommand};
use etymos_db::WordSort;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "etymos", about = "Vocabulary importer for etymology study notes")]
struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Store location (sqlite:<path>); defaults to the file under ETYMOS_HOME
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the store and its tables
    Init {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import one YAML vocabulary document
    Import {
        /// Document to import ("-" reads stdin)
        #[arg(conflicts_with = "sample")]
        file: Option<PathBuf>,

        /// Import the bundled "household" sample instead of a file
        #[arg(long)]
        sample: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored words
    List {
        /// Case-insensitive lemma substring
        #[arg(short, long)]
        search: Option<String>,

        /// newest, oldest, az or za
        #[arg(long, default_value = "newest")]
        sort: WordSort,

        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Words per page (max 200)
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a word with its etymology, cognates, examples and synonyms
    Show {
        /// Word id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a lemma is already stored
    Check {
        /// Lemma to look up (case-insensitive)
        word: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a word and everything it owns
    Delete {
        /// Word id
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store location and row counts
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn command_wants_json(command: &Commands) -> bool {
    match command {
        Commands::Init { json } => *json,
        Commands::Import { json, .. } => *json,
        Commands::List { json, .. } => *json,
        Commands::Show { json, .. } => *json,
        Commands::Check { json, .. } => *json,
        Commands::Delete { json, .. } => *json,
        Commands::Status { json } => *json,
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    let database_url = cli::config::resolve_database_url(cli.database_url.as_deref());

    match cli.command {
        Commands::Init { json } => cli::status::run_init(cli::status::InitArgs { json, database_url }),
        Commands::Import { file, sample, json } => cli::import::run(cli::import::ImportArgs {
            file,
            sample,
            json,
            database_url,
        }),
        Commands::List {
            search,
            sort,
            page,
            limit,
            json,
        } => cli::words::run_list(cli::words::ListArgs {
            search,
            sort,
            page,
            limit,
            json,
            database_url,
        }),
        Commands::Show { id, json } => cli::words::run_show(cli::words::ShowArgs {
            id,
            json,
            database_url,
        }),
        Commands::Check { word, json } => cli::words::run_check(cli::words::CheckArgs {
            word,
            json,
            database_url,
        }),
        Commands::Delete { id, json } => cli::words::run_delete(cli::words::DeleteArgs {
            id,
            json,
            database_url,
        }),
        Commands::Status { json } => cli::status::run_status(cli::status::StatusArgs { json, database_url }),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let json_mode = command_wants_json(&cli.command);
    let default_filter = if cli.verbose {
        "etymos=debug,etymos_db=debug"
    } else {
        "etymos=info,etymos_db=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let mut _log_guard: Option<tracing_appender::non_blocking::WorkerGuard> = None;
    let file_layer = match cli::config::ensure_logs_dir() {
        Ok(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "etymos.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            _log_guard = Some(guard);
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_filter(env_filter.clone()),
            )
        }
        Err(err) => {
            eprintln!("Warning: failed to create logs directory: {}", err);
            None
        }
    };

    // JSON output owns stdout, so console logs move to stderr
    let console_writer = if json_mode {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr)
    } else {
        tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stdout)
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(console_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:#}", err);
            }
            ExitCode::from(1)
        }
    }
}
