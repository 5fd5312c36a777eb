//! CLI administration tool for shortlink.
//!
//! Manages short links and the database directly, without going through
//! the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- links list
//!
//! # Create a link with a random or chosen alias
//! cargo run --bin admin -- links create example.com/page
//! cargo run --bin admin -- links create https://example.com --alias promo
//!
//! # Delete a link
//! cargo run --bin admin -- links delete promo
//!
//! # Database tools
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//! - `BASE_URL` (optional): prefix shown for short URLs

use shortlink::application::services::LinkService;
use shortlink::config::load_database_url;
use shortlink::infrastructure::persistence::PgShortLinkRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinksAction {
    /// List all links
    List,

    /// Create a new short link
    Create {
        /// URL to shorten; `https://` is assumed when no scheme is given
        url: String,

        /// Custom alias (random if not provided)
        #[arg(short, long)]
        alias: Option<String>,
    },

    /// Delete a link by alias
    Delete {
        alias: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

type PgLinkService = LinkService<PgShortLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Links { action } => handle_links_action(action, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_links_action(action: LinksAction, pool: PgPool) -> Result<()> {
    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let repo = Arc::new(PgShortLinkRepository::new(Arc::new(pool)));
    let service = LinkService::new(repo, base_url);

    match action {
        LinksAction::List => list_links(&service).await?,
        LinksAction::Create { url, alias } => create_link(&service, url, alias).await?,
        LinksAction::Delete { alias, yes } => delete_link(&service, alias, yes).await?,
    }

    Ok(())
}

/// Lists all links in creation order.
///
/// # Output Format
///
/// ```text
/// 🔗 Short Links
///
///   Alias     Original URL                              Created
///   ──────────────────────────────────────────────────────────────────────────
///   aB3dE9    https://example.com/page                  2026-03-01 10:30
/// ```
async fn list_links(service: &PgLinkService) -> Result<()> {
    println!("{}", "🔗 Short Links".bright_blue().bold());
    println!();

    let links = service
        .get_all_urls()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin links create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<12} {:<50} {:<20}",
        "Alias".bright_white().bold(),
        "Original URL".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(84).bright_black());

    for entry in &links {
        println!(
            "  {:<12} {:<50} {}",
            entry.link.alias.cyan(),
            truncate(&entry.link.original_url, 50),
            entry
                .link
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Creates a short link through the same allocation path as the API.
async fn create_link(service: &PgLinkService, url: String, alias: Option<String>) -> Result<()> {
    println!("{}", "✨ Create Short Link".bright_blue().bold());
    println!();

    let shortened = service
        .shorten(Some(url), alias)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("  Alias:     {}", shortened.link.alias.cyan());
    println!("  Original:  {}", shortened.link.original_url);
    println!("  Short URL: {}", shortened.short_url.bright_yellow().bold());
    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!();

    Ok(())
}

/// Deletes a link by alias, asking for confirmation unless `--yes` is given.
///
/// The confirmation defaults to No. Deletion is permanent and frees the alias.
async fn delete_link(service: &PgLinkService, alias: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Short Link".bright_blue().bold());
    println!();

    let original_url = service
        .get_original_url(&alias)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Alias:    {}", alias.cyan());
    println!("  Original: {}", original_url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_by_alias(&alias)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "📦 Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Shortens `s` to at most `max` characters for table output.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }

    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
