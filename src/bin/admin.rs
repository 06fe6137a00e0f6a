//! CLI administration tool for link-rotator.
//!
//! Works directly on the Redis store with the same services as the HTTP
//! surface, so no admin token or running server is needed.
//!
//! # Usage
//!
//! ```bash
//! # Show the destination list
//! cargo run --bin admin -- links list
//!
//! # Replace the destination list (URL or NAME=URL)
//! cargo run --bin admin -- links set "Ventas=https://wa.me/5491100000001" https://wa.me/5491100000002
//!
//! # Clear the destination list
//! cargo run --bin admin -- links reset
//!
//! # Restart the rotation at the first destination
//! cargo run --bin admin -- rotation reset
//!
//! # Read or change the block size
//! cargo run --bin admin -- blocksize get
//! cargo run --bin admin -- blocksize set 3
//!
//! # Range report
//! cargo run --bin admin -- stats --range week
//!
//! # Check the Redis connection
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! - `REDIS_URL` or `REDIS_HOST` (+ `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`) (required)
//! - `KEY_PREFIX`, `BLOCK_SIZE`, `STATS_RETENTION_DAYS`, `ALLOWED_URL_PATTERN` (optional,
//!   same meaning as for the server)

use link_rotator::application::services::{
    BlockSizeService, RegistryService, RotationService, StatsService,
};
use link_rotator::config::{Config, RotationSettings, mask_connection_string};
use link_rotator::domain::entities::{BlockSize, DestinationEntry, StatsRange};
use link_rotator::domain::keys::KeySpace;
use link_rotator::infrastructure::store::{KeyValueStore, RedisStore};
use link_rotator::utils::SystemClock;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing link-rotator.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the destination list
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Manage the rotation cursor
    Rotation {
        #[command(subcommand)]
        action: RotationAction,
    },

    /// Read or change the block size
    Blocksize {
        #[command(subcommand)]
        action: BlockSizeAction,
    },

    /// Show the hit report for a range
    Stats {
        /// today, yesterday, week or month
        #[arg(short, long, default_value = "today")]
        range: String,
    },

    /// Store operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum LinksAction {
    /// List destinations in rotation order
    List,

    /// Replace the destination list
    Set {
        /// `URL` or `NAME=URL`
        #[arg(required = true)]
        entries: Vec<String>,
    },

    /// Remove every destination
    Reset {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum RotationAction {
    /// Restart at the first destination with a full block
    Reset,
}

#[derive(Subcommand)]
enum BlockSizeAction {
    /// Show the stored override and the effective value
    Get,

    /// Store an override (1-20)
    Set { value: i64 },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Check the Redis connection
    Check,
}

/// Services wired onto the Redis store.
struct Services {
    store: Arc<dyn KeyValueStore>,
    registry: Arc<RegistryService>,
    rotation: RotationService,
    block_sizes: Arc<BlockSizeService>,
    stats: StatsService,
}

impl Services {
    fn new(store: Arc<dyn KeyValueStore>, settings: &RotationSettings) -> Result<Self> {
        let keys = KeySpace::new(settings.key_prefix.clone());

        let registry = Arc::new(RegistryService::new(
            store.clone(),
            keys.clone(),
            settings.url_policy()?,
        ));
        let block_sizes = Arc::new(BlockSizeService::new(
            store.clone(),
            keys.clone(),
            settings.block_size_default,
        ));
        let rotation = RotationService::new(
            store.clone(),
            keys.clone(),
            registry.clone(),
            block_sizes.clone(),
        );
        let stats = StatsService::new(
            store.clone(),
            keys,
            registry.clone(),
            Arc::new(SystemClock),
            settings.stats_retention_days,
        );

        Ok(Self {
            store,
            registry,
            rotation,
            block_sizes,
            stats,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let redis_url = Config::load_redis_url()
        .context("REDIS_URL or REDIS_HOST must be set for the admin tool")?;

    let settings = RotationSettings::from_env()?;
    settings.validate()?;

    let store = RedisStore::connect(&redis_url)
        .await
        .with_context(|| format!("Failed to connect to {}", mask_connection_string(&redis_url)))?;

    let services = Services::new(Arc::new(store), &settings)?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, &services).await?,
        Commands::Rotation { action } => handle_rotation_action(action, &services).await?,
        Commands::Blocksize { action } => handle_block_size_action(action, &services).await?,
        Commands::Stats { range } => show_stats(&range, &services).await?,
        Commands::Store { action } => handle_store_action(action, &services).await?,
    }

    Ok(())
}

/// Dispatches destination list commands.
async fn handle_links_action(action: LinksAction, services: &Services) -> Result<()> {
    match action {
        LinksAction::List => list_links(services).await?,
        LinksAction::Set { entries } => {
            let entries = entries.iter().map(|e| parse_entry(e)).collect();
            let saved = services.registry.replace_entries(entries).await?;

            println!(
                "{} {} destination(s) saved",
                "✅".green(),
                saved.to_string().bright_white().bold()
            );
            println!();
            list_links(services).await?;
        }
        LinksAction::Reset { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Remove every destination? Redirects will answer 404")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            services.registry.reset().await?;
            println!("{}", "✅ Destination list cleared".green().bold());
        }
    }

    Ok(())
}

/// Lists destinations with their rotation position.
///
/// # Output Format
///
/// ```text
/// 🔗 Destinations
///
///   #   Name                     URL
///   ──────────────────────────────────────────────────────────────────
///   0   Ventas                   https://wa.me/5491100000001
///   1   -                        https://wa.me/5491100000002
/// ```
async fn list_links(services: &Services) -> Result<()> {
    println!("{}", "🔗 Destinations".bright_blue().bold());
    println!();

    let links = services.registry.list().await?;

    if links.is_empty() {
        println!("{}", "  No destinations configured".yellow());
        println!();
        println!(
            "  Add some with: {} admin links set <URL>...",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<3} {:<24} {}",
        "#".bright_white().bold(),
        "Name".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for (index, link) in links.iter().enumerate() {
        let name = if link.name.is_empty() { "-" } else { &link.name };
        println!(
            "  {:<3} {:<24} {}",
            index.to_string().bright_black(),
            name.cyan(),
            link.url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Dispatches rotation commands.
async fn handle_rotation_action(action: RotationAction, services: &Services) -> Result<()> {
    match action {
        RotationAction::Reset => {
            services.rotation.reset().await?;
            println!(
                "{}",
                "✅ Rotation reset; the next redirect serves the first destination"
                    .green()
                    .bold()
            );
        }
    }

    Ok(())
}

/// Dispatches block size commands.
async fn handle_block_size_action(action: BlockSizeAction, services: &Services) -> Result<()> {
    match action {
        BlockSizeAction::Get => {
            let stored = services.block_sizes.stored().await?;
            let effective = services.block_sizes.effective().await?;

            match stored {
                Some(value) => println!("  Stored override: {}", value.to_string().cyan()),
                None => println!("  Stored override: {}", "none".bright_black()),
            }
            println!(
                "  Effective:       {}",
                effective.to_string().bright_green().bold()
            );
        }
        BlockSizeAction::Set { value } => {
            let block_size = BlockSize::new(value).with_context(|| {
                format!(
                    "Block size must be between {} and {}, got {}",
                    BlockSize::MIN,
                    BlockSize::MAX,
                    value
                )
            })?;

            services.block_sizes.set(block_size).await?;
            println!(
                "{} Block size set to {}",
                "✅".green(),
                block_size.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Prints the range report as a table.
async fn show_stats(range: &str, services: &Services) -> Result<()> {
    let range = StatsRange::from_param(Some(range));
    let report = services.stats.aggregate(range).await?;

    println!(
        "{} {}",
        "📊 Hits:".bright_blue().bold(),
        report.range.bright_white().bold()
    );
    println!();

    if report.stats.is_empty() {
        println!("{}", "  No hits recorded in this range".yellow());
        println!();
        return Ok(());
    }

    println!(
        "  {:>8} {:<24} {}",
        "Count".bright_white().bold(),
        "Name".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for row in &report.stats {
        println!(
            "  {:>8} {:<24} {}",
            row.count.to_string().bright_green(),
            row.name.cyan(),
            row.url
        );
    }

    println!();
    println!(
        "  Total: {}",
        report.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles store diagnostic commands.
async fn handle_store_action(action: StoreAction, services: &Services) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!("{}", "🔍 Checking Redis connection...".bright_blue());

            if !services.store.health_check().await {
                anyhow::bail!("Redis PING failed");
            }

            println!("{}", "✅ Redis connection OK".green().bold());
        }
    }

    Ok(())
}

/// Parses a `URL` or `NAME=URL` command line entry.
///
/// The split happens at the first `=` only when the text before it is not
/// itself part of a url, so `https://wa.me/1?text=hi` stays a bare url.
fn parse_entry(raw: &str) -> DestinationEntry {
    match raw.split_once('=') {
        Some((name, url)) if !name.contains("://") => DestinationEntry::new(name.trim(), url.trim()),
        _ => DestinationEntry::unnamed(raw.trim()),
    }
}
