//! Revisor CLI - batch entry points for analysis and judgment.

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use revisor_analysis::{AnalysisConfig, Analyzer};
use revisor_catalog::SilbFetcher;
use revisor_judge::{FsDocumentCache, Judge, JudgeConfig};
use revisor_llm::OpenAiGateway;
use revisor_store::SqliteStore;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => {
            let document_text = std::fs::read_to_string(&args.document)
                .with_context(|| format!("reading document {}", args.document.display()))?;

            let catalog = SilbFetcher::new(&args.catalog_url);
            let gateway = OpenAiGateway::new(&args.api_base, &args.api_key, &args.model);
            let store = SqliteStore::new(&cli.db)
                .with_context(|| format!("opening store {}", cli.db.display()))?;
            let config = AnalysisConfig {
                suppress_equivalent_dates: args.suppress_equivalent_dates,
                ..AnalysisConfig::default()
            };

            let analyzer = Analyzer::new(catalog, gateway, store, config);
            let report = analyzer
                .analyze(&args.reference, &document_text, &args.strategy)
                .await;

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Judge(args) => {
            let gateway = OpenAiGateway::new(&args.api_base, &args.api_key, &args.model);
            let store = SqliteStore::new(&cli.db)
                .with_context(|| format!("opening store {}", cli.db.display()))?;
            let cache = FsDocumentCache::new(&args.cache_dir);

            let judge = Judge::new(gateway, store, cache, JudgeConfig::default());
            let summary = judge.judge_pending().await?;

            println!(
                "judged: {}, skipped: {}, failed: {}, already judged: {}",
                summary.judged, summary.skipped, summary.failed, summary.already_judged
            );
        }
    }

    Ok(())
}
