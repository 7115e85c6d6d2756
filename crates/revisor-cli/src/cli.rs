//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Revisor - reconcile sesmaria catalog records against document text.
#[derive(Debug, Parser)]
#[command(name = "revisor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path
    #[arg(long, global = true, default_value = "revisor.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare one document's catalog record against its text
    Analyze(AnalyzeArgs),

    /// Adjudicate every open error record
    Judge(JudgeArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Document reference
    pub reference: String,

    /// Path to the document's plain text
    pub document: PathBuf,

    /// Prompt strategy key (rules, exemplar, reasoning, confidence)
    #[arg(long, default_value = "rules")]
    pub strategy: String,

    /// Catalog API base URL
    #[arg(long, default_value = revisor_catalog::fetcher::DEFAULT_BASE_URL)]
    pub catalog_url: String,

    /// Generation API base URL
    #[arg(long, default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    /// Generation API key
    #[arg(long, env = "REVISOR_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model identifier
    #[arg(long, default_value = revisor_llm::openai::DEFAULT_MODEL)]
    pub model: String,

    /// Drop discrepancies that only reformat the same date
    #[arg(long)]
    pub suppress_equivalent_dates: bool,
}

/// Arguments for the judge command.
#[derive(Debug, Args)]
pub struct JudgeArgs {
    /// Directory of cached document texts (<reference>.txt)
    #[arg(long, default_value = "cache")]
    pub cache_dir: PathBuf,

    /// Generation API base URL
    #[arg(long, default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    /// Generation API key (the judge may use its own credential)
    #[arg(long, env = "REVISOR_JUDGE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model identifier
    #[arg(long, default_value = revisor_llm::openai::DEFAULT_MODEL)]
    pub model: String,
}
