//! Command-line argument parsing for syllabot
//!
//! Provides clap-based CLI with an optional one-shot question and
//! a configuration subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// syllabot - answer questions about university course catalogs
#[derive(Parser, Debug)]
#[command(name = "syllabot")]
#[command(version)]
#[command(about = "Hybrid lexical + semantic QA over university course catalogs", long_about = None)]
pub struct Args {
    /// Question to answer in one-shot mode (starts the REPL when omitted)
    #[arg(value_name = "QUESTION")]
    pub question: Option<String>,

    /// Ollama model used for answer synthesis
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama host
    #[arg(long)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory with pre-extracted catalog sources (JSON)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Number of ranked results per query
    #[arg(short)]
    pub k: Option<usize>,

    /// Fusion weight in [0,1]: 1.0 = vector only, 0.0 = lexical only
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: default (warn), -v (info), -vv (debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display the effective configuration
    Config,
}
