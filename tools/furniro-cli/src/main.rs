//! Furniro CLI - inspect and script the cart and wishlist store.
//!
//! Commands:
//! - `furniro add` - Add a product to the cart
//! - `furniro remove` - Remove a product from the cart
//! - `furniro set-qty` - Set a cart entry's quantity
//! - `furniro wishlist` - Toggle, move or list wishlist entries
//! - `furniro import` - Add products from a content-store JSON export
//! - `furniro show` - Show cart, wishlist, counts and subtotal
//! - `furniro clear` - Empty the cart or the wishlist
//! - `furniro config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{
    AddArgs, ClearArgs, ConfigArgs, ImportArgs, RemoveArgs, SetQtyArgs, ShowArgs, WishlistArgs,
};
use config::{LogConfig, LogFormat};

/// Furniro CLI - Manage the storefront cart and wishlist
#[derive(Parser)]
#[command(name = "furniro")]
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
    /// Add a product to the cart
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Set the quantity of a cart entry
    SetQty(SetQtyArgs),

    /// Manage the wishlist
    Wishlist(WishlistArgs),

    /// Import product records from a JSON file
    Import(ImportArgs),

    /// Show the cart and wishlist
    Show(ShowArgs),

    /// Empty the cart or the wishlist
    Clear(ClearArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    init_logging(&ctx.config.log, cli.verbose);
    tracing::debug!(config = ?ctx.config_path, "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Add(args) => commands::cart::add(args, &ctx),
        Commands::Remove(args) => commands::cart::remove(args, &ctx),
        Commands::SetQty(args) => commands::cart::set_quantity(args, &ctx),
        Commands::Wishlist(args) => commands::wishlist::run(args, &ctx),
        Commands::Import(args) => commands::import::run(args, &ctx),
        Commands::Show(args) => commands::show::run(args, &ctx),
        Commands::Clear(args) => commands::clear::run(args, &ctx),
        Commands::Config(args) => commands::config::run(args, &ctx),
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Install the log subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(config: &LogConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.level.as_str() };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json_layer = (config.format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (config.format == LogFormat::Human).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
