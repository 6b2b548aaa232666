//! Tidemark main entry point
//!
//! This is the command-line interface for the Tidemark search crawler.

use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tidemark::config::load_config_with_hash;
use tidemark::crawler::run_crawl;
use tidemark::model::Platform;
use tracing_subscriber::EnvFilter;

/// Tidemark: an incremental windowed search crawler
///
/// Tidemark sweeps a programmable-search API through consecutive calendar
/// windows for a fixed set of commerce platforms, persisting dated article
/// results to SQLite and per-platform CSV exports. Each invocation resumes
/// where the last one stopped.
#[derive(Parser, Debug)]
#[command(name = "tidemark")]
#[command(version = "1.0.0")]
#[command(about = "An incremental windowed search crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = "tidemark.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-warning output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what each platform would scan next, without crawling
    #[arg(long, conflicts_with_all = ["stats", "export_only", "reset_progress"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export_only", "reset_progress"])]
    stats: bool,

    /// Regenerate the CSV export files from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "reset_progress"])]
    export_only: bool,

    /// Delete the progress cursor for a platform and exit
    #[arg(long, value_name = "PLATFORM", conflicts_with_all = ["dry_run", "stats", "export_only"])]
    reset_progress: Option<Platform>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Injected everywhere a date decision is made, so one invocation sees
    // one consistent "today"
    let today = Utc::now().date_naive();

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config, today)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_only {
        handle_export_only(&config)?;
    } else if let Some(platform) = cli.reset_progress {
        handle_reset_progress(&config, platform)?;
    } else {
        handle_crawl(config, today).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show warnings and errors
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("tidemark=info,warn"),
            1 => EnvFilter::new("tidemark=debug,info"),
            2 => EnvFilter::new("tidemark=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the pending windows
fn handle_dry_run(config: &tidemark::config::Config, today: chrono::NaiveDate) -> anyhow::Result<()> {
    use std::path::Path;
    use tidemark::crawler::WindowScheduler;
    use tidemark::storage::SqliteStorage;

    println!("=== Tidemark Dry Run ===\n");

    println!("Search:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  Page size: {}", config.crawl.page_size);
    println!("  Result budget: {}", config.crawl.result_budget);
    println!("  Window span: {} months", config.crawl.window_months);
    println!("  Floor date: {}", config.crawl.floor_date);
    println!(
        "  Advance on fetch error: {}",
        config.crawl.advance_on_fetch_error
    );

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\nExport:");
    println!("  Directory: {}", config.export.directory);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let scheduler = WindowScheduler::new(&config.crawl);

    println!("\nPlatforms ({}):", config.crawl.platforms.len());
    for &platform in &config.crawl.platforms {
        let window = scheduler.next_window(&storage, platform, today)?;
        println!("  - {}: would scan {}", platform, window);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &tidemark::config::Config) -> anyhow::Result<()> {
    use std::path::Path;
    use tidemark::export::{load_stats, print_stats};
    use tidemark::storage::SqliteStorage;

    println!("Database: {}\n", config.storage.database_path);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let stats = load_stats(&storage)?;
    print_stats(&stats);

    Ok(())
}

/// Handles the --export-only mode: regenerates CSV files from the database
fn handle_export_only(config: &tidemark::config::Config) -> anyhow::Result<()> {
    use std::path::Path;
    use tidemark::export::{export_file_name, write_csv, ExportRecord};
    use tidemark::storage::{SqliteStorage, Storage};

    println!("=== Regenerating CSV Exports ===\n");
    println!("Database: {}", config.storage.database_path);
    println!("Directory: {}\n", config.export.directory);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let export_dir = Path::new(&config.export.directory);

    for &platform in &config.crawl.platforms {
        let records: Vec<ExportRecord> = storage
            .results_for_platform(platform)?
            .iter()
            .map(ExportRecord::from)
            .collect();

        let path = export_dir.join(export_file_name(platform));
        write_csv(&path, &records)?;
        println!("✓ {}: {} rows -> {}", platform, records.len(), path.display());
    }

    Ok(())
}

/// Handles the --reset-progress mode: deletes one platform's cursor
fn handle_reset_progress(
    config: &tidemark::config::Config,
    platform: Platform,
) -> anyhow::Result<()> {
    use std::path::Path;
    use tidemark::storage::{SqliteStorage, Storage};

    let mut storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;

    if storage.reset_cursor(platform)? {
        println!("✓ Progress reset for {}", platform);
        println!("  The next run rescans from the configured floor date.");
    } else {
        println!("No progress recorded for {}", platform);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: tidemark::config::Config,
    today: chrono::NaiveDate,
) -> anyhow::Result<()> {
    tracing::info!(
        "Scanning {} platform(s), {}-month windows",
        config.crawl.platforms.len(),
        config.crawl.window_months
    );

    match run_crawl(config, today).await {
        Ok(summary) => {
            if summary.all_succeeded() {
                tracing::info!("Crawl completed successfully");
                Ok(())
            } else {
                anyhow::bail!(
                    "{} platform scan(s) failed; see log for details",
                    summary.failed_platforms.len()
                )
            }
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
