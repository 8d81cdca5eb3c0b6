// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use faq_assistant::{
    AnswerMode, Config, IngestionPipeline, QueryEngine, Snapshot, SnapshotStore, SynthesisClient,
    utils::logging,
    utils::{HealthCheck, HealthReport, HealthStatus},
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "faq_assistant")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Offline retrieval FAQ assistant for plain-text corpora", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the corpus directory and build a fresh snapshot
    Ingest {
        #[arg(long, value_name = "DIR")]
        input: Option<PathBuf>,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Answer a single question against the persisted snapshot
    Query {
        /// Question text
        query: String,

        #[arg(short, long, value_name = "NUM")]
        k: Option<usize>,

        /// Skip answer synthesis even when an API key is configured
        #[arg(long)]
        retrieval_only: bool,
    },

    /// Interactive question loop (type 'exit' to quit)
    Interactive {
        #[arg(short, long, value_name = "NUM")]
        k: Option<usize>,
    },

    /// Verify snapshot artifacts on disk
    Verify,

    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);

    info!("FAQ Assistant");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Ingest { input, limit } => {
            cmd_ingest(config, input, limit).await?;
        }
        Commands::Query {
            query,
            k,
            retrieval_only,
        } => {
            cmd_query(&config, &query, k, retrieval_only).await?;
        }
        Commands::Interactive { k } => {
            cmd_interactive(&config, k).await?;
        }
        Commands::Verify => {
            cmd_verify(&config)?;
        }
        Commands::Stats => {
            cmd_stats(&config)?;
        }
    }

    Ok(())
}

async fn cmd_ingest(
    mut config: Config,
    input: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<()> {
    if let Some(dir) = input {
        config.corpus.input_dir = dir;
    }

    info!(
        "Ingesting corpus from {}",
        config.corpus.input_dir.display()
    );

    let pipeline = IngestionPipeline::new(config).context("Failed to create pipeline")?;
    let stats = pipeline.run(limit).await.context("Ingestion failed")?;

    println!(
        "{}",
        logging::format_success(&format!(
            "Ingested {} documents into {} chunks ({} terms)",
            stats.documents_loaded, stats.chunks_created, stats.vocabulary_size
        ))
    );

    if stats.documents_skipped > 0 {
        println!(
            "{}",
            logging::format_warning(&format!(
                "{} documents were skipped; rerun with --verbose for details",
                stats.documents_skipped
            ))
        );
    }

    Ok(())
}

fn build_engine(config: &Config, retrieval_only: bool) -> Result<QueryEngine> {
    let store = SnapshotStore::new(config.index.snapshot_dir.clone());
    let snapshot = store
        .load()
        .context("Failed to load snapshot (run `ingest` first)")?;

    let synthesizer = if retrieval_only {
        None
    } else {
        let client = SynthesisClient::from_config(&config.synthesis)
            .context("Failed to create synthesis client")?;
        if client.is_none() {
            info!("No synthesis collaborator configured; answers are retrieved passages");
        }
        client
    };

    let engine = QueryEngine::new(Arc::new(snapshot), synthesizer, config.query.clone())
        .context("Snapshot failed validation")?;
    Ok(engine)
}

async fn cmd_query(
    config: &Config,
    query: &str,
    k: Option<usize>,
    retrieval_only: bool,
) -> Result<()> {
    info!("Answering: {}", query);

    let engine = build_engine(config, retrieval_only)?;
    let response = engine.answer(query, k).await?;

    print_response(query, &response);
    Ok(())
}

async fn cmd_interactive(config: &Config, k: Option<usize>) -> Result<()> {
    let engine = build_engine(config, false)?;

    println!("\n=== FAQ Assistant ({} indexed passages) ===", engine.entry_count());
    println!("Ask a question about your corpus (type 'exit' to quit)\n");

    let stdin = std::io::stdin();
    loop {
        print!("Your question: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if matches!(question.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Goodbye!");
            break;
        }

        if question.is_empty() {
            continue;
        }

        match engine.answer(question, k).await {
            Ok(response) => print_response(question, &response),
            Err(e) => println!("{}", logging::format_error(&format!("Error: {}", e))),
        }
    }

    Ok(())
}

fn print_response(query: &str, response: &faq_assistant::QueryResponse) {
    if response.sources.is_empty() {
        println!("\nNo results found for query: \"{}\"\n", query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Checking that documents have been ingested");
        return;
    }

    println!("\n{}", "=".repeat(80));

    match response.mode {
        AnswerMode::Synthesized => {
            println!("{}", logging::format_success("Synthesized answer:"));
        }
        AnswerMode::RetrievalOnly => {
            println!(
                "{}",
                logging::format_info("Retrieval-only answer (top passages):")
            );
        }
    }

    println!("\n{}\n", response.answer);
    println!("Sources:");

    for (idx, passage) in response.sources.iter().enumerate() {
        println!(
            "  {}. {} (Score: {:.4})",
            idx + 1,
            passage.source_path,
            passage.score
        );
    }

    println!("{}\n", "=".repeat(80));
}

fn cmd_verify(config: &Config) -> Result<()> {
    info!("Verifying snapshot artifacts");

    let store = SnapshotStore::new(config.index.snapshot_dir.clone());
    let checks: Vec<HealthCheck> = store
        .artifact_paths()
        .iter()
        .map(|path| HealthCheck::snapshot_artifact(path))
        .collect();

    let report = HealthReport::new(checks, env!("CARGO_PKG_VERSION").to_string());
    println!("{}", report.format());

    if report.overall_status == HealthStatus::Healthy {
        let snapshot = store.load().context("Snapshot artifacts are unreadable")?;
        println!(
            "{}",
            logging::format_success(&format!(
                "Snapshot valid: {} entries, {} vocabulary terms",
                snapshot.entry_count(),
                snapshot.vocabulary.dimension()
            ))
        );
    } else {
        println!(
            "{}",
            logging::format_warning("Snapshot incomplete; run `ingest` to rebuild it")
        );
    }

    Ok(())
}

fn cmd_stats(config: &Config) -> Result<()> {
    info!("Gathering snapshot statistics");

    let store = SnapshotStore::new(config.index.snapshot_dir.clone());
    let snapshot: Snapshot = store
        .load()
        .context("Failed to load snapshot (run `ingest` first)")?;

    let document_count = snapshot
        .chunks
        .iter()
        .map(|record| record.doc_id.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    println!("Documents indexed: {}", document_count);
    println!("Passages indexed: {}", snapshot.entry_count());
    println!("Vocabulary terms: {}", snapshot.vocabulary.dimension());

    Ok(())
}
