use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vitrine_catalog::{CatalogConfig, CatalogManager, StopwordConfig};
use vitrine_core::{Error, ProductId, Result};
use vitrine_similarity::DEFAULT_RECOMMENDATIONS;

/// Content-based product recommendations over a CSV catalog
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(version, about = "Content-based product recommendations", long_about = None)]
struct Args {
    /// Path to the catalog CSV file
    #[arg(short, long, default_value = "./data/catalog.csv")]
    catalog: PathBuf,

    /// Stopwords: portuguese, english, none, or a file with one word per line
    #[arg(long, default_value = "portuguese")]
    stopwords: StopwordConfig,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every product in catalog order
    List,
    /// Print one product
    Show { id: ProductId },
    /// Recommend products similar to ID
    Recommend {
        id: ProductId,
        /// Number of recommendations
        #[arg(short, long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        n: usize,
        /// Include similarity scores
        #[arg(long)]
        scores: bool,
    },
    /// Show which shared terms make OTHER similar to ID
    Explain { id: ProductId, other: ProductId },
    /// Print snapshot statistics and the load report
    Info,
    /// Read product ids from stdin and answer with recommendations
    Interactive {
        /// Reload the catalog every S seconds (0 disables)
        #[arg(long, default_value_t = 0)]
        reload_interval_secs: u64,
        #[arg(short, long, default_value_t = DEFAULT_RECOMMENDATIONS)]
        n: usize,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// One compact JSON document per line, flushed so a reader on a pipe sees it
fn print_json_line<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if !args.delimiter.is_ascii() {
        return Err(Error::InvalidConfig(format!(
            "delimiter must be a single ASCII character, got {:?}",
            args.delimiter
        ))
        .into());
    }

    let reload_interval = match &args.command {
        Command::Interactive {
            reload_interval_secs,
            ..
        } => Some(Duration::from_secs(*reload_interval_secs)),
        _ => None,
    };

    let config = CatalogConfig::new(&args.catalog)
        .with_stopwords(args.stopwords.clone())
        .with_delimiter(args.delimiter as u8)
        .with_reload_interval(reload_interval);

    info!("Starting Vitrine v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", config.catalog_path);
    info!("Stopwords: {}", config.stopwords);

    let catalog = CatalogManager::open_or_empty(&config);

    match args.command {
        Command::List => print_json(&catalog.list_products())?,
        Command::Show { id } => {
            let product = catalog.get_product(id).ok_or(Error::ProductNotFound(id))?;
            print_json(&product)?;
        }
        Command::Recommend { id, n, scores } => {
            if catalog.get_product(id).is_none() {
                warn!("Product {} not found; no recommendations", id);
            }
            if scores {
                print_json(&catalog.recommend_scored(id, n))?;
            } else {
                print_json(&catalog.recommend(id, n))?;
            }
        }
        Command::Explain { id, other } => match catalog.explain(id, other) {
            Some(explanation) => print_json(&explanation)?,
            None => {
                let missing = if catalog.get_product(id).is_none() { id } else { other };
                return Err(Error::ProductNotFound(missing).into());
            }
        },
        Command::Info => print_json(&catalog.info())?,
        Command::Interactive { n, .. } => {
            info!("Reading product ids from stdin (one per line, optional count after the id)");
            for line in io::stdin().lock().lines() {
                let line = line?;
                let mut parts = line.split_whitespace();
                let Some(first) = parts.next() else {
                    continue;
                };
                let Ok(id) = first.parse::<ProductId>() else {
                    warn!("Not a product id: {:?}", first);
                    continue;
                };
                let count = parts.next().and_then(|s| s.parse().ok()).unwrap_or(n);
                print_json_line(&catalog.recommend_scored(id, count))?;
            }
            info!("Input closed after generation {}", catalog.generation());
        }
    }

    Ok(())
}
