//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use totsy_cache::Cache;
use totsy_commerce::catalog::Catalog;
use totsy_commerce::generation::{GenerationService, Generator};
use totsy_commerce::ids::{ItemId, ListId};
use totsy_commerce::lists::{ListStore, UserList};
use totsy_commerce::suggest::Ranker;
use totsy_observability::{LogFormat, LogLevel, SessionId, StructuredLogger};

use crate::completion::{CommandCompletion, FileCompletion, Unconfigured};
use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::error::LookupError;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was loaded from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Structured logger for this invocation.
    pub logger: StructuredLogger,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        let logger = build_logger(&config, output.is_verbose());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            logger,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Get the data directory lists are stored in.
    pub fn data_dir(&self) -> PathBuf {
        match &self.config.storage.data_dir {
            Some(dir) => self.resolve_path(&expand_home(dir)),
            None => dirs_path().join("totsylist"),
        }
    }

    /// Open the list store over the data directory.
    pub fn open_store(&self) -> Result<ListStore> {
        let dir = self.data_dir();
        self.output.debug(&format!("Data directory: {}", dir.display()));
        let cache = Cache::open_dir(&dir)
            .with_context(|| format!("Failed to open data directory: {}", dir.display()))?;

        Ok(ListStore::builder(cache)
            .with_storage_key(self.config.storage.storage_key.clone())
            .with_logger(self.logger.clone())
            .open())
    }

    /// Load a list or fail with a readable error.
    pub fn require_list(&self, store: &ListStore, id: &str) -> Result<UserList> {
        store
            .list(&ListId::new(id))
            .ok_or_else(|| LookupError::ListNotFound(id.to_string()).into())
    }

    /// Check that an item exists in a list.
    pub fn require_item(&self, store: &ListStore, list: &str, item: &str) -> Result<UserList> {
        let found = self.require_list(store, list)?;
        if found.item(&ItemId::new(item)).is_none() {
            return Err(LookupError::ItemNotFound {
                list: list.to_string(),
                item: item.to_string(),
            }
            .into());
        }
        Ok(found)
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<Catalog> {
        match &self.config.ranking.catalog {
            Some(path) => {
                let path = self.resolve_path(path);
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
                Catalog::from_json(&json)
                    .with_context(|| format!("Invalid catalog: {}", path.display()))
            }
            None => Ok(Catalog::builtin()),
        }
    }

    /// Ranker using the configured weights and keywords.
    pub fn ranker(&self) -> Ranker {
        Ranker::new()
            .with_weights(self.config.ranking.weights)
            .with_location_keywords(&self.config.ranking.location_keywords)
    }

    /// Generator backed by a saved response, the configured command, or
    /// nothing (which reports a credential problem).
    pub fn generator(&self, response_file: Option<&str>) -> Generator<Box<dyn GenerationService>> {
        let service: Box<dyn GenerationService> = match response_file {
            Some(path) => Box::new(FileCompletion::new(self.resolve_path(path))),
            None => match CommandCompletion::from_config(&self.config.generation) {
                Some(command) => Box::new(command),
                None => Box::new(Unconfigured),
            },
        };
        Generator::new(service).with_logger(self.logger.clone())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

fn build_logger(config: &CliConfig, verbose: bool) -> StructuredLogger {
    let level = if verbose {
        LogLevel::Debug
    } else {
        config.logging.level.parse().unwrap_or(LogLevel::Warn)
    };
    let format = if config.logging.format.eq_ignore_ascii_case("json") {
        LogFormat::Json
    } else {
        LogFormat::Human
    };

    StructuredLogger::new(SessionId::generate())
        .for_component("cli")
        .with_min_level(level)
        .with_format(format)
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest).to_string_lossy().into_owned(),
        _ => path.to_string(),
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(dir: &Path) -> Context {
        let mut config = CliConfig::default();
        config.storage.data_dir = Some(dir.join("data").to_string_lossy().into_owned());
        Context {
            config,
            config_path: None,
            output: Output::new(false, true),
            cwd: dir.to_path_buf(),
            logger: StructuredLogger::disabled(),
        }
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join("totsy.toml"),
            "[profile]\nauthor = \"Sam\"\n",
        )
        .unwrap();

        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(config.profile.author, "Sam");
        assert_eq!(path, dir.path().join("totsy.toml"));
    }

    #[test]
    fn test_store_persists_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        let id = {
            let store = ctx.open_store().unwrap();
            store.create_list(totsy_commerce::lists::NewList::new("Shower"))
        };

        let store = ctx.open_store().unwrap();
        assert_eq!(ctx.require_list(&store, id.as_str()).unwrap().name, "Shower");
        assert!(ctx.require_list(&store, "missing").is_err());
        assert!(ctx.require_item(&store, id.as_str(), "missing").is_err());
    }

    #[test]
    fn test_catalog_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("catalog.json"),
            r#"[{"id": "x", "name": "X", "brand": "B", "category": "C", "price": 1, "score": 0.1}]"#,
        )
        .unwrap();
        let mut ctx = context_in(dir.path());
        assert_eq!(ctx.catalog().unwrap().len(), 10);

        ctx.config.ranking.catalog = Some("catalog.json".to_string());
        assert_eq!(ctx.catalog().unwrap().len(), 1);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), "/abs/path");
        if let Some(home) = std::env::var_os("HOME") {
            let expanded = expand_home("~/lists");
            assert_eq!(PathBuf::from(expanded), PathBuf::from(home).join("lists"));
        }
    }
}
