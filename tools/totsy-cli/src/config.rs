//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use totsy_commerce::lists::{DEFAULT_LIST_AUTHOR, DEFAULT_STORAGE_KEY};
use totsy_commerce::suggest::{RankingWeights, DEFAULT_LOCATION_KEYWORDS, DEFAULT_TOP_N};

/// Config file names searched for, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["totsy.toml", ".totsy.toml", "totsy.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Who the user is.
    #[serde(default)]
    pub profile: ProfileConfig,

    /// Where lists are kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Suggestion ranking.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Share links.
    #[serde(default)]
    pub share: ShareConfig,

    /// External generation command.
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// User profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Author label on new lists and comments.
    #[serde(default = "default_author")]
    pub author: String,
}

fn default_author() -> String {
    DEFAULT_LIST_AUTHOR.to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
        }
    }
}

/// List storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory (default: ~/.local/share/totsylist).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Key the list snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: default_storage_key(),
        }
    }
}

/// Suggestion ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Places that earn the location bonus.
    #[serde(default = "default_location_keywords")]
    pub location_keywords: Vec<String>,

    /// How many suggestions are highlighted.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// JSON catalog replacing the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Bonus weights.
    #[serde(default)]
    pub weights: RankingWeights,
}

fn default_location_keywords() -> Vec<String> {
    DEFAULT_LOCATION_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            location_keywords: default_location_keywords(),
            top_n: default_top_n(),
            catalog: None,
            weights: RankingWeights::default(),
        }
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `human` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Share links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Page share links point at.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "https://totsylist.app/".to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// External command that answers generation prompts.
///
/// The prompt is written to the command's stdin; its stdout is the answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,

    /// Environment variable that must hold the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

/// Generate a default totsy.toml config file.
pub fn generate_default_config(author: &str) -> String {
    format!(
        r#"# TotsyList configuration

[profile]
author = "{author}"

[storage]
# data_dir = "~/.local/share/totsylist"
storage_key = "{storage_key}"

[ranking]
location_keywords = ["seattle"]
top_n = {top_n}
# catalog = "catalog.json"

[ranking.weights]
name = 0.05
brand = 0.03
category = 0.02
location = 0.01
due_date = 0.005

[logging]
level = "warn"
format = "human"

[share]
base_url = "https://totsylist.app/"

[generation]
# command = "my-llm"
# args = ["--model", "fast"]
# api_key_env = "GENERATION_API_KEY"
"#,
        author = author,
        storage_key = DEFAULT_STORAGE_KEY,
        top_n = DEFAULT_TOP_N,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let parsed: CliConfig = toml::from_str(&generate_default_config("User")).unwrap();
        assert_eq!(parsed, CliConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let parsed: CliConfig = toml::from_str(
            r#"
            [profile]
            author = "Sam"

            [ranking]
            location_keywords = ["portland"]
            "#,
        )
        .unwrap();

        assert_eq!(parsed.profile.author, "Sam");
        assert_eq!(parsed.ranking.location_keywords, vec!["portland"]);
        assert_eq!(parsed.ranking.top_n, 2);
        assert_eq!(parsed.storage.storage_key, "totsylist-user-lists");
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("totsy.json");
        let path = path.to_str().unwrap();

        let mut config = CliConfig::default();
        config.share.base_url = "http://localhost:3000/".to_string();
        config.save(path).unwrap();

        assert_eq!(CliConfig::load(path).unwrap(), config);
    }
}
