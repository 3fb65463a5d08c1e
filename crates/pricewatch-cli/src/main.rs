mod catalog;
mod check;
mod history;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pricewatch_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricewatch")]
#[command(about = "Track marketplace product prices and alert on drops")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every tracked product, store the observations, and report drops
    Check {
        /// Check a single tracked product by name
        #[arg(long)]
        product: Option<String>,
    },
    /// Start tracking a product page
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
    },
    /// Stop tracking a product
    Remove {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// List tracked products
    List,
    /// Show the stored price history for a product, newest first
    History { name: String },
    /// Database management
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Create the price history schema if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pricewatch_core::load_app_config().context("failed to load configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Check { product } => {
            let pool = open_store(&config).await?;
            let summary = check::run_check(&pool, &config, product.as_deref()).await?;
            check::print_summary(&summary);
        }
        Commands::Add { name, url } => catalog::add(&config.products_path, &name, &url)?,
        Commands::Remove { name, yes } => {
            catalog::remove(&config.products_path, &name, yes, catalog::confirm_on_stdin)?;
        }
        Commands::List => catalog::list(&config.products_path),
        Commands::History { name } => {
            let pool = open_store(&config).await?;
            history::print_history(&pool, &name).await?;
        }
        Commands::Db {
            command: DbCommands::Init,
        } => {
            let pool = open_store(&config).await?;
            pool.close().await;
            println!("Database initialized at {}", config.database_path.display());
        }
    }

    Ok(())
}

/// Opens the store and brings its schema up to date.
async fn open_store(config: &AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = pricewatch_db::connect_pool(
        &config.database_path,
        pricewatch_db::PoolConfig::from_app_config(config),
    )
    .await
    .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    pricewatch_db::initialize(&pool)
        .await
        .context("failed to initialize price history schema")?;
    Ok(pool)
}

#[cfg(test)]
mod tests;
