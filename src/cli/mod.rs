//! CLI command definitions and handlers

mod list;
mod metrics;
mod predict;

use crate::config::{load_config, ReadabilityConfig};
use crate::lexer::{CachedLexer, CppLexer, Language};
use crate::lexicon::{NullLexicon, SharedLexicon, WordNet};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Readability features and predictions for C++ snippets
#[derive(Parser, Debug)]
#[command(name = "cpp-readability")]
#[command(
    version,
    about = "Readability feature extraction and prediction for C++ snippets",
    after_help = "\
Examples:
  cpp-readability metrics snippet.cpp                        All features as text
  cpp-readability metrics a.cpp b.cpp --format json          JSON output for scripting
  cpp-readability metrics a.cpp --feature \"Posnett volume\"   A single feature
  cpp-readability predict --model model.json a.cpp           Readability label and probability
  cpp-readability list                                       Feature names in registry order"
)]
pub struct Cli {
    /// Config file (default: ./cpp-readability.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute readability features of each file
    Metrics {
        /// C++ snippet files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Only compute these features (repeatable)
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Predict whether each file is readable
    Predict {
        /// Logistic model in JSON (default: [model] path from the config)
        #[arg(long, short = 'm')]
        model: Option<PathBuf>,

        /// C++ snippet files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List feature names in registry order
    List {
        /// Output format: text or json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
}

/// Run the parsed command
pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let config = load_config(cli.config.as_deref(), &cwd);

    match cli.command {
        Commands::Metrics {
            files,
            features,
            format,
        } => metrics::run(&Engine::load(config)?, &files, &features, &format),

        Commands::Predict {
            model,
            files,
            format,
        } => {
            let model = model
                .or_else(|| config.model.path.clone())
                .context("No model given: pass --model or set [model] path in the config")?;
            predict::run(Engine::load(config)?, &model, &files, &format)
        }

        Commands::List { format } => list::run(&config, &format),
    }
}

/// Everything a file needs to be analyzed
pub(crate) struct Engine {
    pub config: ReadabilityConfig,
    pub language: Language,
    pub lexicon: SharedLexicon,
}

impl Engine {
    pub fn load(config: ReadabilityConfig) -> Result<Self> {
        let language = config
            .language()
            .with_context(|| format!("Invalid language in config: {}", config.language))?;
        let lexicon = load_lexicon(&config);
        Ok(Self {
            config,
            language,
            lexicon,
        })
    }

    /// A fresh token cache for one file, dropped with the file's registry
    pub fn lexer(&self) -> Arc<CachedLexer<CppLexer>> {
        self.language.lexer()
    }
}

/// WordNet from the configured location, or an empty lexicon
fn load_lexicon(config: &ReadabilityConfig) -> SharedLexicon {
    let Some(dir) = config.lexicon.resolve_wordnet_dir() else {
        warn!("No WordNet directory configured (set WORDNET_DIR); dictionary-based features will be 0");
        return Arc::new(NullLexicon);
    };
    match WordNet::open(&dir) {
        Ok(wordnet) => Arc::new(wordnet),
        Err(e) => {
            warn!("Failed to load WordNet from {}: {}", dir.display(), e);
            Arc::new(NullLexicon)
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Apply `analyze` to every file in parallel. Failures are logged and left
/// out; results keep the input order.
fn process_files<T, F>(files: &[PathBuf], analyze: F) -> (Vec<(PathBuf, T)>, usize)
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    let results: Vec<(PathBuf, Result<T>)> = files
        .par_iter()
        .map(|path| {
            debug!("Analyzing {}", path.display());
            let result = read_source(path).and_then(|code| analyze(&code));
            (path.clone(), result)
        })
        .collect();

    let mut failed = 0;
    let mut succeeded = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(value) => succeeded.push((path, value)),
            Err(e) => {
                warn!("Skipping {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }
    (succeeded, failed)
}

fn check_failures(failed: usize, total: usize) -> Result<()> {
    if failed > 0 {
        anyhow::bail!("{} of {} files could not be analyzed", failed, total);
    }
    Ok(())
}
