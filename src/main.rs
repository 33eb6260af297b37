use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{error, info, warn};

use mangascrape::{Config, MangaScraper};

#[derive(Parser)]
#[command(name = "mangascrape")]
#[command(about = "Downloads every chapter of a manga from its catalog page")]
#[command(version)]
#[command(after_help = "Example: mangascrape http://www.mangapanda.com/naruto")]
struct Cli {
    /// Manga catalog URL
    url: String,

    /// Request timeout in milliseconds, default 0 (no timeout)
    #[arg(short, long, allow_negative_numbers = true)]
    timeout: Option<String>,

    /// Max attempts per request, default 90
    #[arg(short, long = "max-retries", allow_negative_numbers = true)]
    max_retries: Option<String>,

    /// Download directory, default ./manga_downloads
    #[arg(short, long = "download-directory")]
    download_directory: Option<String>,

    /// Chapters downloaded at the same time, default 5
    #[arg(short = 'c', long)]
    concurrency: Option<usize>,

    /// Configuration file path, default mangascrape.toml if present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?.with_overrides(
        positive("timeout", cli.timeout.as_deref()),
        positive("max-retries", cli.max_retries.as_deref()),
        cli.download_directory,
        cli.concurrency,
    );

    info!(
        "[Timeout: {}], [Max Retries: {}], [Download Directory: {}], [Concurrency: {}]",
        config.timeout_ms, config.max_retries, config.download_directory, config.concurrency
    );

    let scraper = MangaScraper::new(config)?;

    // Fatal errors are reported, the exit status stays 0
    match scraper.scrape(&cli.url).await {
        Ok(report) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render());
            }
        }
        Err(e) if e.is_fatal() => {
            error!("-! {} !-", e);
        }
        Err(e) => {
            error!("Run stopped before all chapters were queued: {}", e);
        }
    }

    Ok(())
}

/// Parses a strictly positive number. Anything else keeps the configured value.
fn positive<T>(option: &str, raw: Option<&str>) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            warn!("Ignoring --{} {:?}, keeping the configured value", option, raw);
            None
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("mangascrape={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
