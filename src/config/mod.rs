//! Configuration module
//!
//! This module handles:
//! - Loading `cpp-readability.toml` (or an explicit `--config` file)
//! - Tokenizer settings (language, tab size)
//! - Lexical database discovery
//! - Clustering and coherence parameters of the textual features

mod readability_config;

pub use readability_config::{
    load_config,
    LexiconConfig,
    ModelConfig,
    NocConfig,
    ReadabilityConfig,
    TcConfig,
    CONFIG_FILE_NAME,
};
