//! Configuration loading, validation, and management for ctxpack.
//!
//! Loads configuration from `./.ctxpack.toml` (project-local) or
//! `~/.ctxpack/config.toml` (global), with environment variable overrides.
//! Validates all settings at startup.
//!
//! The scoring and packet sections are handed to the assembly engine as
//! immutable values; nothing here is process-wide mutable state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file name, looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".ctxpack.toml";

/// Environment variable overriding the context directory.
pub const ENV_CONTEXT_DIR: &str = "CTXPACK_DIR";

/// Environment variable overriding the default token budget.
pub const ENV_TOKEN_BUDGET: &str = "CTXPACK_TOKEN_BUDGET";

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the Markdown knowledge files
    #[serde(default = "default_context_dir")]
    pub context_dir: String,

    /// Token budget used when `--budget` is not given
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,

    /// Tier allocation settings
    #[serde(default)]
    pub packet: PacketConfig,

    /// Entry scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// `agent` command settings
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_context_dir() -> String {
    ".context".into()
}
fn default_token_budget() -> usize {
    8000
}

/// Tier allocation settings for the packet assembler.
///
/// Percentages are integers in `0..=100` and always apply to the
/// *original* requested budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketConfig {
    /// Tier 2 cap (active tasks)
    #[serde(default = "default_task_pct")]
    pub task_pct: u32,

    /// Tier 3 cap (conventions)
    #[serde(default = "default_convention_pct")]
    pub convention_pct: u32,

    /// Guaranteed share of each knowledge section when oversubscribed
    #[serde(default = "default_split_floor_pct")]
    pub split_floor_pct: u32,

    /// Share of a section budget usable for full entry bodies
    #[serde(default = "default_full_content_pct")]
    pub full_content_pct: u32,

    /// Closing instruction for the agent
    #[serde(default = "default_instruction")]
    pub instruction: String,
}

fn default_task_pct() -> u32 {
    40
}
fn default_convention_pct() -> u32 {
    20
}
fn default_split_floor_pct() -> u32 {
    30
}
fn default_full_content_pct() -> u32 {
    80
}
fn default_instruction() -> String {
    concat!(
        "Before starting work, confirm to the user: ",
        "\"I have read the required context files and ",
        "I'm following project conventions.\"",
    )
    .into()
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            task_pct: default_task_pct(),
            convention_pct: default_convention_pct(),
            split_floor_pct: default_split_floor_pct(),
            full_content_pct: default_full_content_pct(),
            instruction: default_instruction(),
        }
    }
}

/// One step of the recency step function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecencyBucket {
    /// Inclusive upper bound on entry age in days
    pub max_age_days: i64,
    /// Score for entries in this bucket
    pub score: f64,
}

impl RecencyBucket {
    pub const fn new(max_age_days: i64, score: f64) -> Self {
        Self {
            max_age_days,
            score,
        }
    }
}

/// Entry scoring and keyword extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score for entries older than every bucket, or with unparsable dates
    #[serde(default = "default_stale_score")]
    pub stale_score: f64,

    /// Number of distinct keyword matches that saturates relevance at 1.0
    #[serde(default = "default_relevance_saturation")]
    pub relevance_saturation: usize,

    /// Shortest token kept as a keyword
    #[serde(default = "default_min_keyword_len")]
    pub min_keyword_len: usize,

    /// Tokens never used as keywords
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Age buckets, evaluated in order; must be ascending by `max_age_days`
    #[serde(default = "default_recency_buckets")]
    pub recency_buckets: Vec<RecencyBucket>,
}

fn default_recency_buckets() -> Vec<RecencyBucket> {
    vec![
        RecencyBucket::new(7, 1.0),
        RecencyBucket::new(30, 0.7),
        RecencyBucket::new(90, 0.4),
    ]
}
fn default_stale_score() -> f64 {
    0.2
}
fn default_relevance_saturation() -> usize {
    3
}
fn default_min_keyword_len() -> usize {
    3
}

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "onto", "that", "this", "these", "those",
    "are", "was", "were", "been", "being", "has", "have", "had", "not", "but", "all", "any",
    "can", "will", "should", "would", "could", "may", "might", "must", "its", "our", "their",
    "they", "them", "then", "than", "when", "what", "which", "who", "whom", "how", "why",
    "where", "you", "your", "also", "each", "via", "per", "about", "after", "before", "over",
    "under", "out", "off", "only", "some", "such", "very", "just", "more", "most", "other",
    "does", "did", "doing", "there", "here", "use", "using",
];

fn default_stop_words() -> Vec<String> {
    STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            stale_score: default_stale_score(),
            relevance_saturation: default_relevance_saturation(),
            min_keyword_len: default_min_keyword_len(),
            stop_words: default_stop_words(),
            recency_buckets: default_recency_buckets(),
        }
    }
}

/// Settings for the `agent` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Seconds during which a session's repeated packet emission is suppressed
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_cooldown_secs() -> u64 {
    600
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the project-local file, else the global one.
    ///
    /// Environment variables are applied last (highest priority):
    /// - `CTXPACK_DIR`
    /// - `CTXPACK_TOKEN_BUDGET`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(
            std::env::var(ENV_CONTEXT_DIR).ok(),
            std::env::var(ENV_TOKEN_BUDGET).ok(),
        );
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// The config file that [`AppConfig::load`] reads.
    pub fn config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::config_dir().join("config.toml")
        }
    }

    /// Get the global configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ctxpack")
    }

    /// Apply environment-style overrides. Unparsable budgets are ignored.
    pub fn apply_overrides(&mut self, context_dir: Option<String>, token_budget: Option<String>) {
        if let Some(dir) = context_dir.filter(|d| !d.trim().is_empty()) {
            self.context_dir = dir;
        }

        if let Some(raw) = token_budget {
            match raw.trim().parse::<usize>() {
                Ok(budget) => self.token_budget = budget,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid {ENV_TOKEN_BUDGET}"),
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let packet = &self.packet;
        if packet.task_pct + packet.convention_pct > 100 {
            return Err(ConfigError::ValidationError(
                "packet.task_pct + packet.convention_pct must not exceed 100".into(),
            ));
        }

        if packet.split_floor_pct > 50 {
            return Err(ConfigError::ValidationError(
                "packet.split_floor_pct must be at most 50".into(),
            ));
        }

        if packet.full_content_pct > 100 {
            return Err(ConfigError::ValidationError(
                "packet.full_content_pct must be at most 100".into(),
            ));
        }

        let scoring = &self.scoring;
        if scoring
            .recency_buckets
            .windows(2)
            .any(|w| w[0].max_age_days >= w[1].max_age_days)
        {
            return Err(ConfigError::ValidationError(
                "scoring.recency_buckets must be strictly ascending by max_age_days".into(),
            ));
        }

        // 0.0 is reserved for superseded entries
        let live = |s: f64| s > 0.0 && s <= 1.0;
        if !live(scoring.stale_score) || !scoring.recency_buckets.iter().all(|b| live(b.score)) {
            return Err(ConfigError::ValidationError(
                "recency scores must be greater than 0.0 and at most 1.0".into(),
            ));
        }

        if scoring.relevance_saturation == 0 {
            return Err(ConfigError::ValidationError(
                "scoring.relevance_saturation must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            context_dir: default_context_dir(),
            token_budget: default_token_budget(),
            packet: PacketConfig::default(),
            scoring: ScoringConfig::default(),
            agent: AgentConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {reason}", path.display())]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {}: {reason}", path.display())]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for ctxpack_core::Error {
    fn from(e: ConfigError) -> Self {
        Self::Config {
            message: e.to_string(),
        }
    }
}
