//! CLI command implementations.

pub mod config;
pub mod explain;
pub mod generate;
pub mod lists;
pub mod share;
pub mod suggest;

use clap::{Args, Subcommand};

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// Where the family lives.
    #[arg(short, long, default_value = "")]
    pub location: String,

    /// Due date, any format.
    #[arg(short, long, default_value = "")]
    pub due_date: String,

    /// Comma-separated search terms.
    #[arg(short, long, default_value = "")]
    pub terms: String,

    /// Number of highlighted suggestions (default from config).
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Show the remaining suggestions too.
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the lists command.
#[derive(Args)]
pub struct ListsArgs {
    #[command(subcommand)]
    pub command: Option<ListsCommand>,
}

#[derive(Subcommand)]
pub enum ListsCommand {
    /// List all saved lists.
    List,
    /// Show a list with its items.
    Show {
        /// List ID.
        list: String,
    },
    /// Create a list.
    Create {
        /// List name.
        name: String,

        /// Description.
        #[arg(short, long)]
        description: Option<String>,

        /// Make the list public and give it a share code.
        #[arg(long)]
        public: bool,

        /// Author label (default from config).
        #[arg(long)]
        author: Option<String>,
    },
    /// Change list details.
    Update {
        /// List ID.
        list: String,

        /// New name.
        #[arg(long)]
        name: Option<String>,

        /// New description.
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,

        /// Remove the description.
        #[arg(long)]
        clear_description: bool,

        /// Make the list public.
        #[arg(long, conflicts_with = "private")]
        public: bool,

        /// Make the list private.
        #[arg(long)]
        private: bool,

        /// New author label.
        #[arg(long)]
        author: Option<String>,
    },
    /// Delete a list.
    Delete {
        /// List ID.
        list: String,

        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Add an item, from the catalog or by hand.
    AddItem(AddItemArgs),
    /// Remove an item.
    RemoveItem {
        /// List ID.
        list: String,
        /// Item ID.
        item: String,
    },
    /// Vote on an item (up or down).
    Vote {
        /// List ID.
        list: String,
        /// Item ID.
        item: String,
        /// `up` or `down`.
        vote: String,
    },
    /// Comment on an item.
    Comment {
        /// List ID.
        list: String,
        /// Item ID.
        item: String,
        /// Comment text.
        text: String,

        /// Author label (default: anonymous).
        #[arg(long)]
        author: Option<String>,
    },
    /// Open a public list by its share code.
    Shared {
        /// Share code.
        code: String,
    },
}

/// Arguments for adding an item to a list.
#[derive(Args)]
pub struct AddItemArgs {
    /// List ID.
    pub list: String,

    /// Catalog product ID to add.
    #[arg(short, long, conflicts_with = "name")]
    pub product: Option<String>,

    /// Item name.
    #[arg(long, required_unless_present = "product")]
    pub name: Option<String>,

    /// Why the item belongs on the list.
    #[arg(long, default_value = "")]
    pub why: String,

    /// Brand.
    #[arg(long)]
    pub brand: Option<String>,

    /// Estimated price in USD.
    #[arg(long)]
    pub price: Option<f64>,

    /// Product link.
    #[arg(long)]
    pub url: Option<String>,

    /// Mark the item eco-friendly.
    #[arg(long)]
    pub eco: bool,
}

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// What the parent is looking for.
    pub input: String,

    /// Read the answer from a file instead of the generation command.
    #[arg(long)]
    pub response_file: Option<String>,

    /// Save the generated items into a new list with this name.
    #[arg(long)]
    pub save_as: Option<String>,

    /// Make the saved list public.
    #[arg(long, requires = "save_as")]
    pub public: bool,

    /// Only save essential items.
    #[arg(long, requires = "save_as")]
    pub essentials_only: bool,
}

/// Arguments for the explain command.
#[derive(Args)]
pub struct ExplainArgs {
    /// Product name.
    pub product: String,

    /// Brand.
    #[arg(long, default_value = "")]
    pub brand: String,

    /// Category.
    #[arg(long, default_value = "")]
    pub category: String,

    /// What the parent asked for.
    #[arg(long, default_value = "")]
    pub input: String,

    /// Original reason the product was picked.
    #[arg(long, default_value = "")]
    pub why: String,

    /// Read the answer from a file instead of the generation command.
    #[arg(long)]
    pub response_file: Option<String>,
}

/// Arguments for the share command.
#[derive(Args)]
pub struct ShareArgs {
    #[command(subcommand)]
    pub command: ShareCommand,
}

#[derive(Subcommand)]
pub enum ShareCommand {
    /// Build a share link from catalog picks.
    Link(ShareLinkArgs),
    /// Decode a share link.
    Decode {
        /// Share URL or bare query string.
        url: String,
    },
}

/// Arguments for building a share link.
#[derive(Args)]
pub struct ShareLinkArgs {
    /// Catalog product IDs to pick.
    #[arg(short, long = "pick", required = true)]
    pub picks: Vec<String>,

    /// Picks to mark selected for voting.
    #[arg(short, long = "select")]
    pub selected: Vec<String>,

    /// Purchase status as `id=status`.
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// People who manage the picks together.
    #[arg(long = "co-owner")]
    pub co_owners: Vec<String>,

    /// `registry` or `voting`.
    #[arg(short, long, default_value = "registry")]
    pub mode: String,

    /// Location the picks were made for.
    #[arg(long, default_value = "")]
    pub location: String,

    /// Due date the picks were made for.
    #[arg(long, default_value = "")]
    pub due_date: String,

    /// Search terms the picks were made for.
    #[arg(long, default_value = "")]
    pub terms: String,

    /// Page the link points at (default from config).
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Author label for new lists.
        #[arg(short, long, default_value = "User")]
        author: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
