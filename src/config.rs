use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::TopicLinkMode;
use crate::repository::RepositoryOptions;
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Repository root; `~` is expanded
    #[serde(default = "default_root")]
    pub root: String,
    /// Directory under the root holding the year/month/day tree
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
    /// Master document under the root carrying the recent-entries section
    #[serde(default = "default_master_file")]
    pub master_file: String,
    #[serde(default = "default_backlink_window_days")]
    pub backlink_window_days: u32,
    #[serde(default = "default_toc_limit")]
    pub toc_limit: usize,
    /// `{date}` is replaced with `YYYY-MM-DD`
    #[serde(default = "default_title_template")]
    pub title_template: String,
    #[serde(default)]
    pub topic_link_mode: TopicLinkMode,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            docs_dir: default_docs_dir(),
            master_file: default_master_file(),
            backlink_window_days: default_backlink_window_days(),
            toc_limit: default_toc_limit(),
            title_template: default_title_template(),
            topic_link_mode: TopicLinkMode::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

// Default value functions
fn default_root() -> String {
    "~/.openclaw/workspace/memory".to_string()
}

fn default_docs_dir() -> String {
    "docs".to_string()
}

fn default_master_file() -> String {
    "MEMORY.md".to_string()
}

fn default_backlink_window_days() -> u32 {
    30
}

fn default_toc_limit() -> usize {
    10
}

fn default_title_template() -> String {
    "{date} 日報".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration from the profile's config file, creating it with
    /// defaults if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(format!("{}: {}", config_path.display(), e)))?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let mut config = Config::default();
            if let Err(e) = config.save_to_path(config_path) {
                tracing::error!(path = %config_path.display(), error = %e, "failed to save default config");
                return Err(e);
            }
            tracing::info!(path = %config_path.display(), "created default config");
            Ok(config)
        }
    }

    /// Load configuration using the production profile
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_profile(utils::Profile::Prod)
    }

    /// Save configuration to a file
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        // Ensure config version is set before saving
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the expanded repository root (with ~ expansion)
    pub fn get_root_path(&self) -> PathBuf {
        utils::expand_path(&self.root)
    }

    /// Runtime options for a [`crate::Repository`]
    pub fn repository_options(&self) -> RepositoryOptions {
        RepositoryOptions {
            root: self.get_root_path(),
            docs_dir: self.docs_dir.clone(),
            master_file: self.master_file.clone(),
            backlink_window_days: self.backlink_window_days,
            toc_limit: self.toc_limit,
            title_template: self.title_template.clone(),
            topic_link_mode: self.topic_link_mode,
        }
    }
}
