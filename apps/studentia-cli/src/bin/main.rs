use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use studentia_core::config::{resolve_with_base, Config, Settings};
use studentia_embed::{get_default_embedder, separator_token_len, OpenAiCompleter};
use studentia_rag::{ContextPacker, PromptBuilder, PromptPipeline};
use studentia_store::KnowledgeBase;

#[derive(Parser, Debug)]
#[command(name = "studentia", about = "Answer questions about Ewha Womans University from its curated section corpus")]
struct Cli {
    /// Directory that relative data paths in the configuration are resolved against
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// OpenAI API key used for both embeddings and completions
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the prompt and ask the completion model
    Ask { question: String },
    /// Print the selected sections and the prompt without calling the completion model
    Prompt {
        question: String,
        /// Also list this many top-ranked sections with their scores
        #[arg(long, default_value_t = 0)]
        show_ranking: usize,
    },
    /// Load and validate the section and embedding tables
    Check,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load().context("Error loading config")?;
    let settings = config.settings()?;
    let base_dir = match &cli.base_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let kb = Arc::new(load_knowledge_base(&settings, &base_dir)?);

    match cli.command {
        Command::Check => {
            println!("✅ {} sections, {} dimensions", kb.len(), kb.dimension());
        }
        Command::Prompt { question, show_ranking } => {
            let pipeline = build_pipeline(&settings, &base_dir, Arc::clone(&kb), cli.openai_api_key)?;
            let retrieval = pipeline.retrieve(&question)?;
            if show_ranking > 0 {
                println!("--- Ranking ---");
                for (i, candidate) in retrieval.ranked.iter().take(show_ranking).enumerate() {
                    println!("  {}. score={:.4}  {}", i + 1, candidate.score, candidate.key);
                }
            }
            println!("--- Selected {} sections ({} tokens) ---", retrieval.context.len(), retrieval.context.token_total);
            for key in &retrieval.context.keys {
                println!("  {}", key);
            }
            println!("--- Prompt ---\n{}", pipeline.render(&question, &retrieval));
        }
        Command::Ask { question } => {
            let api_key = cli.openai_api_key.clone();
            let pipeline = build_pipeline(&settings, &base_dir, Arc::clone(&kb), api_key.clone())?;
            let completer = OpenAiCompleter::new(
                api_key.ok_or_else(|| anyhow!("OPENAI_API_KEY must be set for the completion provider"))?,
                settings.completion.base_url.clone(),
                settings.completion.model.clone(),
                settings.completion.max_tokens,
                Duration::from_secs(settings.completion.timeout_secs),
            )?;
            let answer = pipeline.answer(&question, &completer)?;
            println!("{}", answer.trim());
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_knowledge_base(settings: &Settings, base_dir: &Path) -> Result<KnowledgeBase> {
    let sections = settings.data.sections_path(base_dir);
    let embeddings = settings.data.embeddings_path(base_dir);
    KnowledgeBase::load(&sections, &embeddings)
        .with_context(|| format!("failed to load knowledge base from {} and {}", sections.display(), embeddings.display()))
}

fn build_pipeline(settings: &Settings, base_dir: &Path, kb: Arc<KnowledgeBase>, api_key: Option<String>) -> Result<PromptPipeline> {
    let prompt = &settings.prompt;
    let separator_tokens = match &prompt.tokenizer_path {
        Some(path) => {
            let path = resolve_with_base(base_dir, path);
            let len = separator_token_len(&path, &prompt.separator)?;
            tracing::info!(tokenizer = %path.display(), separator_tokens = len, "measured separator");
            len
        }
        None => prompt.separator_tokens,
    };
    let packer = ContextPacker::new(prompt.separator.clone(), separator_tokens);
    let builder = match &prompt.header {
        Some(header) => PromptBuilder::with_header(header.clone()),
        None => PromptBuilder::new(),
    };
    let embedder = get_default_embedder(&settings.embedding, api_key, kb.dimension())?;
    Ok(PromptPipeline::new(kb, embedder, packer, builder, prompt.token_budget))
}
