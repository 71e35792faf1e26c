// src/config.rs
//! Engine configuration: dedup thresholds, brand vocabulary, category
//! keyword tables and stop-words, all in one TOML file.
//!
//! Load order:
//! 1. `$CAGEFEED_CONFIG` (error if it points nowhere)
//! 2. `config/engine.toml` relative to the working directory
//! 3. the default config embedded in the binary

use crate::dedup::DedupParams;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENV_CONFIG_PATH: &str = "CAGEFEED_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

const EMBEDDED_CONFIG: &str = include_str!("../config/engine.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub dedup: DedupParams,
    pub relevance: RelevanceConfig,
    pub keywords: CategoryKeywords,
    pub stopwords: StopwordConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelevanceConfig {
    /// The promotion's own name/brand vocabulary; any hit means in-domain.
    pub brand_tokens: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryKeywords {
    /// Roster / person news.
    pub fighters: Vec<String>,
    /// Matchup, card and event news.
    pub events: Vec<String>,
    /// Contracts, front office, off-the-record.
    pub drama: Vec<String>,
    /// Tie-break rule (a): versus-markers and card vocabulary.
    pub matchup_signals: Vec<String>,
    /// Tie-break rule (b): contract and executive vocabulary.
    pub drama_signals: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopwordConfig {
    /// Articles, prepositions, conjunctions in the feed languages.
    #[serde(default)]
    pub words: Vec<String>,
    /// Domain-generic noise (the sport's own common nouns and abbreviations).
    #[serde(default)]
    pub noise: Vec<String>,
}

/// Compiled stop-word set handed to the tokenizer as an explicit argument.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    set: HashSet<String>,
}

impl StopWords {
    pub fn from_config(cfg: &StopwordConfig) -> Self {
        let set = cfg
            .words
            .iter()
            .chain(cfg.noise.iter())
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { set }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.set.contains(token)
    }
}

impl EngineConfig {
    /// Env path, then the conventional file, then the embedded default.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to a non-existent path"));
            }
            return Self::load_from(&pb);
        }
        let conventional = Path::new(DEFAULT_CONFIG_PATH);
        if conventional.exists() {
            return Self::load_from(conventional);
        }
        Ok(Self::embedded())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        let cfg: EngineConfig = toml::from_str(&content)
            .with_context(|| format!("parsing engine config from {}", path.display()))?;
        info!(path = %path.display(), "engine config loaded");
        Ok(cfg.sanitized())
    }

    /// The config compiled into the binary; always valid.
    pub fn embedded() -> Self {
        let cfg: EngineConfig =
            toml::from_str(EMBEDDED_CONFIG).expect("valid embedded engine config");
        cfg.sanitized()
    }

    fn sanitized(mut self) -> Self {
        self.dedup = self.dedup.sanitized();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::embedded()
    }
}
