//! syllabot - Main CLI entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use syllabot::agent::{AgentEngine, AuditLog};
use syllabot::cli::{Args, Commands, Config};
use syllabot::embedding::{EmbeddingProvider, LocalEmbedder};
use syllabot::ingest;
use syllabot::llm::OllamaGenerator;
use syllabot::retrieval::{Corpus, HybridEngine, SearchParams};
use syllabot::tools::{CalculatorTool, RetrievalTool, Tool, VerificationTool};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("syllabot={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Merge CLI overrides into the loaded configuration.
fn effective_config(args: &Args) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(model) = &args.model {
        config.ollama.model = model.clone();
    }
    if let Some(host) = &args.host {
        config.ollama.host = host.clone();
    }
    if let Some(port) = args.port {
        config.ollama.port = port;
    }
    if let Some(data_dir) = &args.data_dir {
        config.paths.data_dir = data_dir.clone();
    }
    if let Some(k) = args.k {
        config.retrieval.top_k = k;
    }
    if let Some(alpha) = args.alpha {
        config.retrieval.alpha = alpha;
    }
    config.validate()?;
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

async fn build_agent(config: &Config) -> Result<AgentEngine> {
    // Ingest catalog sources into flat indexable lines.
    let sources = ingest::load_dir(&config.paths.data_dir)?;
    let texts = ingest::build_corpus_texts(&sources);
    println!(
        "{}",
        format!(
            "Indexando {} fragmentos de {} fuentes...",
            texts.len(),
            sources.len()
        )
        .dimmed()
    );

    // Build both indices before serving any query.
    let pb = spinner("Cargando modelo de embeddings...");
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(LocalEmbedder::with_model(&config.embedding.model_id)?);
    pb.set_message("Construyendo índices...");
    let corpus = Arc::new(Corpus::build(texts, embedder.as_ref()).await?);
    pb.finish_and_clear();

    let params = SearchParams {
        k: config.retrieval.top_k,
        alpha: config.retrieval.alpha,
    };
    let engine = Arc::new(HybridEngine::new(corpus, embedder));

    let generator = Arc::new(OllamaGenerator::new(
        config.ollama_url(),
        config.ollama.model.clone(),
    )?);
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(RetrievalTool::new(engine, params)),
        Arc::new(CalculatorTool::new()),
        Arc::new(VerificationTool::new()),
    ];
    let audit = AuditLog::new(&config.paths.log_dir)?;

    Ok(AgentEngine::new(generator, tools, audit))
}

async fn answer_once(agent: &AgentEngine, query: &str) -> Result<()> {
    let response = agent.run(query).await?;
    println!("{} {}", "Agent>".green().bold(), response.answer);
    println!(
        "{}",
        format!(
            "[{} | {:.2}s]",
            response.tool, response.latency_seconds
        )
        .dimmed()
    );
    Ok(())
}

async fn repl(agent: &AgentEngine) -> Result<()> {
    println!(
        "{}",
        "Sistema listo. Escribe 'exit' para salir.".cyan().bold()
    );

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("User> ") {
            Ok(line) => {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                if matches!(query.to_lowercase().as_str(), "exit" | "quit") {
                    break;
                }
                editor.add_history_entry(query)?;
                if let Err(e) = answer_once(agent, query).await {
                    eprintln!("{} {e}", "Error:".red().bold());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = effective_config(&args)?;

    if let Some(Commands::Config) = args.command {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let agent = build_agent(&config).await?;

    match &args.question {
        Some(question) => answer_once(&agent, question).await,
        None => repl(&agent).await,
    }
}
