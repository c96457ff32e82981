//! CLI command implementations.

pub mod cart;
pub mod clear;
pub mod config;
pub mod import;
pub mod show;
pub mod wishlist;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use furniro_cart::{Currency, ItemSnapshot};

/// Product fields needed to put an item in the cart or wishlist.
#[derive(Args)]
pub struct ItemArgs {
    /// Product ID.
    pub id: String,

    /// Product title.
    #[arg(short, long, default_value = "")]
    pub title: String,

    /// Unit price as a decimal (e.g. 49.99).
    #[arg(short, long)]
    pub price: f64,

    /// Product image reference.
    #[arg(short, long)]
    pub image: Option<String>,
}

impl ItemArgs {
    /// Build a validated snapshot priced in `currency`.
    pub fn snapshot(&self, currency: Currency) -> Result<ItemSnapshot> {
        let title = if self.title.is_empty() {
            self.id.clone()
        } else {
            self.title.clone()
        };
        Ok(ItemSnapshot::new(
            self.id.as_str(),
            title,
            self.price,
            self.image.clone(),
            currency,
        )?)
    }
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub item: ItemArgs,

    /// Units to add (values below 1 add one unit).
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the set-qty command.
#[derive(Args)]
pub struct SetQtyArgs {
    /// Product ID.
    pub id: String,

    /// New quantity (0 or less removes the entry).
    #[arg(allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the wishlist command.
#[derive(Args)]
pub struct WishlistArgs {
    #[command(subcommand)]
    pub command: WishlistCommand,
}

#[derive(Subcommand)]
pub enum WishlistCommand {
    /// Add a product if absent, remove it if present.
    Toggle(ItemArgs),
    /// Move a wishlist entry into the cart.
    Move {
        /// Product ID.
        id: String,
    },
    /// List wishlist entries.
    List,
}

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// Path to a product record JSON file (a single record or an array).
    pub path: String,

    /// Toggle the products in the wishlist instead of adding to the cart.
    #[arg(short, long)]
    pub wishlist: bool,

    /// Units of each product to add.
    #[arg(short, long, default_value_t = 1)]
    pub quantity: i64,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Only show the counters and subtotal.
    #[arg(short, long)]
    pub summary: bool,
}

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Collection to empty.
    #[arg(value_enum)]
    pub target: ClearTarget,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ClearTarget {
    Cart,
    Wishlist,
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
    /// Initialize a new config file.
    Init {
        /// File to create; a `.json` name writes JSON.
        #[arg(default_value = "furniro.toml")]
        path: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
