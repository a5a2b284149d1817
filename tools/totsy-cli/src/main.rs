//! Totsy CLI - baby-gear suggestions, lists and share links from the terminal.
//!
//! Commands:
//! - `totsy suggest` - Rank the catalog for a location, due date and terms
//! - `totsy lists` - Manage saved lists, items, votes and comments
//! - `totsy generate` - Generate a categorized list from a free-text request
//! - `totsy explain` - Explain why a product was recommended
//! - `totsy share` - Build and decode pick share links
//! - `totsy config` - Manage configuration

mod commands;
mod completion;
mod config;
mod context;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, ExplainArgs, GenerateArgs, ListsArgs, ShareArgs, SuggestArgs};

/// Totsy CLI - Find, save and share baby gear
#[derive(Parser)]
#[command(name = "totsy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank catalog suggestions
    Suggest(SuggestArgs),

    /// Manage saved lists
    Lists(ListsArgs),

    /// Generate a list from a free-text request
    Generate(GenerateArgs),

    /// Explain a recommendation
    Explain(ExplainArgs),

    /// Build and decode share links
    Share(ShareArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    // Execute command
    let result = match cli.command {
        Commands::Suggest(args) => commands::suggest::run(args, &ctx).await,
        Commands::Lists(args) => commands::lists::run(args, &ctx).await,
        Commands::Generate(args) => commands::generate::run(args, &ctx).await,
        Commands::Explain(args) => commands::explain::run(args, &ctx).await,
        Commands::Share(args) => commands::share::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
