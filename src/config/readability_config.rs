//! Readability configuration support
//!
//! Loads settings from `cpp-readability.toml` in the working directory or from
//! a file named on the command line. Every key is optional.
//!
//! # Configuration Format
//!
//! ```toml
//! # cpp-readability.toml
//! tab_size = 4
//! language = "cpp"
//!
//! [lexicon]
//! wordnet_dir = "/usr/share/wordnet/dict"
//!
//! [noc]
//! standard_eps = 0.1
//! normalized_eps = 0.3
//! min_samples = 2
//!
//! [tc]
//! threshold = 1
//!
//! [model]
//! path = "models/readability.json"
//! ```

use crate::error::LexError;
use crate::lexer::Language;
use crate::metrics::DEFAULT_TAB_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = "cpp-readability.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityConfig {
    /// Spaces substituted for each tab before analysis
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub lexicon: LexiconConfig,

    #[serde(default)]
    pub noc: NocConfig,

    #[serde(default)]
    pub tc: TcConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            language: default_language(),
            lexicon: LexiconConfig::default(),
            noc: NocConfig::default(),
            tc: TcConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl ReadabilityConfig {
    pub fn language(&self) -> Result<Language, LexError> {
        self.language.parse()
    }
}

fn default_tab_size() -> usize {
    DEFAULT_TAB_SIZE
}

fn default_language() -> String {
    "cpp".to_string()
}

/// Where to find a WordNet database in WNdb format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default)]
    pub wordnet_dir: Option<PathBuf>,
}

impl LexiconConfig {
    /// `WORDNET_DIR`, then `$WNHOME/dict`, then the configured directory
    pub fn resolve_wordnet_dir(&self) -> Option<PathBuf> {
        self.resolve_with(
            std::env::var_os("WORDNET_DIR").map(PathBuf::from),
            std::env::var_os("WNHOME").map(PathBuf::from),
        )
    }

    fn resolve_with(&self, wordnet_dir: Option<PathBuf>, wnhome: Option<PathBuf>) -> Option<PathBuf> {
        wordnet_dir
            .or_else(|| wnhome.map(|home| home.join("dict")))
            .or_else(|| self.wordnet_dir.clone())
    }
}

/// DBSCAN parameters of the number-of-concepts features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NocConfig {
    #[serde(default = "default_standard_eps")]
    pub standard_eps: f64,

    #[serde(default = "default_normalized_eps")]
    pub normalized_eps: f64,

    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

impl Default for NocConfig {
    fn default() -> Self {
        Self {
            standard_eps: default_standard_eps(),
            normalized_eps: default_normalized_eps(),
            min_samples: default_min_samples(),
        }
    }
}

fn default_standard_eps() -> f64 {
    0.1
}

fn default_normalized_eps() -> f64 {
    0.3
}

fn default_min_samples() -> usize {
    2
}

/// Minimum number of inner lines for a block to take part in text coherence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcConfig {
    #[serde(default = "default_threshold")]
    pub threshold: usize,
}

impl Default for TcConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> usize {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model used by `predict` when `--model` is not given
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Load configuration from `explicit` if given, else from
/// `cpp-readability.toml` in `dir`. Unreadable or malformed files are reported
/// and replaced by defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> ReadabilityConfig {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = dir.join(CONFIG_FILE_NAME);
            if !path.exists() {
                debug!("No config found in {}, using defaults", dir.display());
                return ReadabilityConfig::default();
            }
            path
        }
    };

    match load_toml_config(&path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {:#}", path.display(), e);
            ReadabilityConfig::default()
        }
    }
}

fn load_toml_config(path: &Path) -> anyhow::Result<ReadabilityConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ReadabilityConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReadabilityConfig::default();
        assert_eq!(config.tab_size, 4);
        assert_eq!(config.language().unwrap(), Language::Cpp);
        assert_eq!(config.noc.standard_eps, 0.1);
        assert_eq!(config.noc.normalized_eps, 0.3);
        assert_eq!(config.noc.min_samples, 2);
        assert_eq!(config.tc.threshold, 1);
        assert!(config.model.path.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: ReadabilityConfig = toml::from_str(
            r#"
            tab_size = 2

            [noc]
            standard_eps = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(config.tab_size, 2);
        assert_eq!(config.language, "cpp");
        assert_eq!(config.noc.standard_eps, 0.2);
        assert_eq!(config.noc.normalized_eps, 0.3);
        assert_eq!(config.tc, TcConfig::default());
    }

    #[test]
    fn test_unsupported_language() {
        let config = ReadabilityConfig {
            language: "java".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.language(), Err(LexError::UnsupportedLanguage(_))));
    }

    #[test]
    fn test_wordnet_dir_precedence() {
        let lexicon = LexiconConfig {
            wordnet_dir: Some(PathBuf::from("/configured")),
        };
        assert_eq!(
            lexicon.resolve_with(Some("/env".into()), Some("/home".into())),
            Some(PathBuf::from("/env"))
        );
        assert_eq!(
            lexicon.resolve_with(None, Some("/home".into())),
            Some(PathBuf::from("/home/dict"))
        );
        assert_eq!(lexicon.resolve_with(None, None), Some(PathBuf::from("/configured")));
        assert_eq!(LexiconConfig::default().resolve_with(None, None), None);
    }
}
