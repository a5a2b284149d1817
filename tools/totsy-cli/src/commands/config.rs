//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx).await,
        ConfigCommand::Init { author, force } => init_config(&author, force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.line("");
    ctx.output.line("[profile]");
    ctx.output.kv("author", &config.profile.author);

    ctx.output.line("");
    ctx.output.line("[storage]");
    ctx.output
        .kv("data_dir", &ctx.data_dir().display().to_string());
    ctx.output.kv("storage_key", &config.storage.storage_key);

    ctx.output.line("");
    ctx.output.line("[ranking]");
    ctx.output
        .kv("location_keywords", &config.ranking.location_keywords.join(", "));
    ctx.output.kv("top_n", &config.ranking.top_n.to_string());
    if let Some(ref catalog) = config.ranking.catalog {
        ctx.output.kv("catalog", catalog);
    }
    let weights = &config.ranking.weights;
    ctx.output.kv(
        "weights",
        &format!(
            "name={} brand={} category={} location={} due_date={}",
            weights.name, weights.brand, weights.category, weights.location, weights.due_date
        ),
    );

    ctx.output.line("");
    ctx.output.line("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv("format", &config.logging.format);

    ctx.output.line("");
    ctx.output.line("[share]");
    ctx.output.kv("base_url", &config.share.base_url);

    ctx.output.line("");
    ctx.output.line("[generation]");
    match config.generation.command {
        Some(ref command) => {
            let mut full = command.clone();
            for arg in &config.generation.args {
                full.push(' ');
                full.push_str(arg);
            }
            ctx.output.kv("command", &full);
        }
        None => ctx.output.kv("command", "(not configured)"),
    }
    if let Some(ref env) = config.generation.api_key_env {
        let state = if std::env::var_os(env).is_some() {
            "set"
        } else {
            "missing"
        };
        ctx.output.kv("api_key_env", &format!("{} ({})", env, state));
    }

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = match ctx.config_path {
        Some(ref path) => path.to_string_lossy().to_string(),
        None => find_config_file(&ctx.cwd)?,
    };

    let mut config = CliConfig::load(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

async fn init_config(author: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(author))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    // Catalog must load
    let mut errors = errors;
    if let Err(e) = ctx.catalog() {
        errors.push(format!("ranking.catalog: {:#}", e));
    }

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Static checks that need no I/O. Returns (errors, warnings).
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    if config.storage.storage_key.trim().is_empty() {
        errors.push("storage.storage_key is required".to_string());
    } else if config.storage.storage_key.starts_with('.') {
        errors.push("storage.storage_key must not start with '.'".to_string());
    }

    if config.ranking.top_n == 0 {
        warnings.push("ranking.top_n is 0, no suggestion will be highlighted".to_string());
    }

    if config
        .ranking
        .location_keywords
        .iter()
        .all(|k| k.trim().is_empty())
    {
        warnings.push("ranking.location_keywords is empty, no location bonus applies".to_string());
    }

    let weights = &config.ranking.weights;
    for (name, value) in [
        ("name", weights.name),
        ("brand", weights.brand),
        ("category", weights.category),
        ("location", weights.location),
        ("due_date", weights.due_date),
    ] {
        if !value.is_finite() {
            errors.push(format!("ranking.weights.{} must be a number", name));
        } else if value < 0.0 {
            warnings.push(format!("ranking.weights.{} is negative", name));
        }
    }

    if config.logging.level.parse::<totsy_observability::LogLevel>().is_err() {
        errors.push(format!("logging.level '{}' is unknown", config.logging.level));
    }

    if !["human", "json"].contains(&config.logging.format.to_ascii_lowercase().as_str()) {
        warnings.push(format!(
            "logging.format '{}' is unknown, using human",
            config.logging.format
        ));
    }

    if !config.share.base_url.starts_with("http://") && !config.share.base_url.starts_with("https://")
    {
        warnings.push(format!(
            "share.base_url '{}' is not an http(s) URL",
            config.share.base_url
        ));
    }

    if config.generation.command.is_none() {
        warnings.push("generation.command is not set, generation will fall back".to_string());
    }

    (errors, warnings)
}

fn get_config_value(config: &CliConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["profile", "author"] => Ok(config.profile.author.clone()),
        ["storage", "data_dir"] => Ok(config
            .storage
            .data_dir
            .clone()
            .unwrap_or_else(|| "null".to_string())),
        ["storage", "storage_key"] => Ok(config.storage.storage_key.clone()),
        ["ranking", "location_keywords"] => Ok(config.ranking.location_keywords.join(",")),
        ["ranking", "top_n"] => Ok(config.ranking.top_n.to_string()),
        ["ranking", "catalog"] => Ok(config
            .ranking
            .catalog
            .clone()
            .unwrap_or_else(|| "null".to_string())),
        ["logging", "level"] => Ok(config.logging.level.clone()),
        ["logging", "format"] => Ok(config.logging.format.clone()),
        ["share", "base_url"] => Ok(config.share.base_url.clone()),
        ["generation", "command"] => Ok(config
            .generation
            .command
            .clone()
            .unwrap_or_else(|| "null".to_string())),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["profile", "author"] => config.profile.author = value.to_string(),
        ["storage", "data_dir"] => config.storage.data_dir = Some(value.to_string()),
        ["storage", "storage_key"] => config.storage.storage_key = value.to_string(),
        ["ranking", "location_keywords"] => {
            config.ranking.location_keywords = value
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect()
        }
        ["ranking", "top_n"] => config.ranking.top_n = value.parse()?,
        ["ranking", "catalog"] => config.ranking.catalog = Some(value.to_string()),
        ["logging", "level"] => config.logging.level = value.to_string(),
        ["logging", "format"] => config.logging.format = value.to_string(),
        ["share", "base_url"] => config.share.base_url = value.to_string(),
        ["generation", "command"] => config.generation.command = Some(value.to_string()),
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

fn find_config_file(cwd: &std::path::Path) -> Result<String> {
    for name in &CONFIG_FILE_NAMES {
        let path = cwd.join(name);
        if path.exists() {
            return Ok(path.to_string_lossy().to_string());
        }
    }
    bail!("No config file found. Run `totsy config init` to create one.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid_apart_from_generation() {
        let (errors, warnings) = check_config(&CliConfig::default());
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("generation.command"));
    }

    #[test]
    fn test_check_config_flags_problems() {
        let mut config = CliConfig::default();
        config.storage.storage_key = ".hidden".to_string();
        config.logging.level = "loud".to_string();
        config.ranking.top_n = 0;

        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(warnings.iter().any(|w| w.starts_with("ranking.top_n")));
    }

    #[test]
    fn test_set_then_get() {
        let mut config = CliConfig::default();
        set_config_value(&mut config, "ranking.location_keywords", "Seattle, Portland,").unwrap();
        set_config_value(&mut config, "ranking.top_n", "3").unwrap();

        assert_eq!(
            get_config_value(&config, "ranking.location_keywords").unwrap(),
            "Seattle,Portland"
        );
        assert_eq!(get_config_value(&config, "ranking.top_n").unwrap(), "3");
        assert!(set_config_value(&mut config, "ranking.top_n", "many").is_err());
        assert!(get_config_value(&config, "nope").is_err());
    }
}
