//! Configuration system for revoir.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::srs::Sm2Scheduler;
use crate::types::MIN_EASE_FACTOR;

/// Scheduler parameters.
///
/// The defaults are the standard SM-2 values; overriding them changes
/// how aggressively intervals grow but never relaxes the ease floor
/// semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Floor applied to every ease update.
    pub min_ease_factor: f32,
    /// Flat ease deduction on a failed recall.
    pub lapse_penalty: f32,
    /// Interval after the first successful review, in days.
    pub first_interval_days: u32,
    /// Interval after the second consecutive success, in days.
    pub second_interval_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_ease_factor: MIN_EASE_FACTOR,
            lapse_penalty: 0.20,
            first_interval_days: 1,
            second_interval_days: 6,
        }
    }
}

impl From<&SchedulerConfig> for Sm2Scheduler {
    fn from(config: &SchedulerConfig) -> Self {
        Sm2Scheduler::with_params(
            config.min_ease_factor,
            config.lapse_penalty,
            config.first_interval_days,
            config.second_interval_days,
        )
    }
}

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SrsConfig {
    /// Path to the SQLite database.
    pub db_path: PathBuf,
    /// Scheduler parameters.
    pub scheduler: SchedulerConfig,
    /// Default cap on the number of cards returned per review queue
    /// request.
    pub due_limit: usize,
}

impl Default for SrsConfig {
    fn default() -> Self {
        let revoir_dir = dirs::home_dir()
            .map(|h| h.join(".revoir"))
            .unwrap_or_else(|| PathBuf::from(".revoir"));

        Self {
            db_path: revoir_dir.join("revoir.db"),
            scheduler: SchedulerConfig::default(),
            due_limit: 20,
        }
    }
}

impl SrsConfig {
    /// Load configuration from a file (TOML or JSON).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::RevoirResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| crate::error::RevoirError::Configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| crate::error::RevoirError::Configuration(e.to_string())),
            _ => Err(crate::error::RevoirError::Configuration(
                "Unsupported config file format. Use .toml or .json".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("REVOIR_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Ok(limit) = std::env::var("REVOIR_DUE_LIMIT") {
            if let Ok(limit) = limit.parse() {
                config.due_limit = limit;
            }
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> SrsConfigBuilder {
        SrsConfigBuilder::default()
    }
}

/// Builder for [`SrsConfig`].
#[derive(Default)]
pub struct SrsConfigBuilder {
    config: SrsConfig,
}

impl SrsConfigBuilder {
    /// Set the database path.
    pub fn db_path(mut self, path: PathBuf) -> Self {
        self.config.db_path = path;
        self
    }

    /// Set the scheduler parameters.
    pub fn scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.config.scheduler = scheduler;
        self
    }

    /// Set the review queue cap.
    pub fn due_limit(mut self, limit: usize) -> Self {
        self.config.due_limit = limit;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> SrsConfig {
        self.config
    }
}
