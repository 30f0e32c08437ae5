use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shelfkeep_core::{
    load_entities, seed::sample_products, seed_if_empty, set_log_level, Catalog, CatalogConfig,
    JsonFileSource, ListingOptions, LogLevel, SortBy,
};
use std::path::{Path, PathBuf};

mod demo;
mod sink;

use sink::ConsoleSink;

#[derive(Parser)]
#[command(name = "shelfkeep")]
#[command(about = "Shelfkeep - in-memory product and book catalog")]
#[command(version)]
struct Cli {
    /// Log level: error, warn, info, debug, trace (overrides SHELFKEEP_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the product manager walkthrough
    Demo,
    /// Run the book setup, CRUD, query and ranking walkthrough
    Books {
        /// How many books the most-rated ranking shows
        #[arg(long)]
        top: Option<usize>,
    },
    /// List products from a JSON file
    List {
        /// JSON file with records
        file: PathBuf,
        #[arg(long, default_value = "products")]
        collection: String,
        /// Exact category, or "all"
        #[arg(long, default_value = "all")]
        category: String,
        /// Inclusive price cap
        #[arg(long)]
        max_price: Option<f64>,
        /// default, price-low, price-high or name
        #[arg(long, default_value = "default")]
        sort: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show products whose stock is below a threshold
    LowStock {
        file: PathBuf,
        #[arg(long, default_value = "products")]
        collection: String,
        #[arg(long)]
        threshold: Option<i64>,
    },
    /// Write the demo products into a JSON file unless it already has some
    Seed {
        file: PathBuf,
        #[arg(long, default_value = "products")]
        collection: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.log_level.as_deref())?;
    set_log_level(config.log_level);

    match cli.command {
        Commands::Demo => demo::products(),
        Commands::Books { top } => demo::books(top.unwrap_or(config.top_limit)),
        Commands::List {
            file,
            collection,
            category,
            max_price,
            sort,
            limit,
        } => {
            let sort: SortBy = sort.parse()?;
            let mut options = ListingOptions::new()
                .with_category(category.as_str())
                .with_sort(sort);
            if let Some(max) = max_price {
                options = options.with_max_price(max);
            }
            if let Some(limit) = limit {
                options = options.with_limit(limit);
            }
            list_products(&file, &collection, &options)
        }
        Commands::LowStock {
            file,
            collection,
            threshold,
        } => low_stock(
            &file,
            &collection,
            threshold.unwrap_or(config.low_stock_threshold),
        ),
        Commands::Seed { file, collection } => seed(&file, &collection),
    }
}

/// Config file, then SHELFKEEP_LOG, then --log-level
fn load_config(path: Option<&Path>, log_level: Option<&str>) -> Result<CatalogConfig> {
    let mut config = match path {
        Some(path) => CatalogConfig::from_file(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?,
        None => CatalogConfig::default(),
    };

    if let Some(level) = LogLevel::from_env() {
        config = config.with_log_level(level);
    }
    if let Some(raw) = log_level {
        let level: LogLevel = raw.parse().map_err(anyhow::Error::msg)?;
        config = config.with_log_level(level);
    }
    Ok(config)
}

fn open_catalog(file: &Path, collection: &str) -> Result<Catalog<ConsoleSink>> {
    let source = JsonFileSource::open(file)
        .with_context(|| format!("Failed to open records: {}", file.display()))?;
    let entities = load_entities(&source, collection)
        .with_context(|| format!("Failed to load collection '{}'", collection))?;

    let mut catalog = Catalog::with_sink(ConsoleSink::quiet());
    catalog.extend_from(entities);
    Ok(catalog)
}

fn list_products(file: &Path, collection: &str, options: &ListingOptions) -> Result<()> {
    let catalog = open_catalog(file, collection)?;
    let view = options.apply(&catalog);

    if view.is_empty() {
        println!("No products match the current filters");
        return Ok(());
    }
    for entity in &view {
        println!("{} [{}]", entity.display_info(), entity.stock_label());
    }
    println!("Total: {} of {} products", view.len(), catalog.len());
    Ok(())
}

fn low_stock(file: &Path, collection: &str, threshold: i64) -> Result<()> {
    let catalog = open_catalog(file, collection)?;

    println!("--- Low Stock Products (threshold: {}) ---", threshold);
    for entity in catalog.low_stock(threshold) {
        println!("{}", entity.display_info());
    }
    Ok(())
}

fn seed(file: &Path, collection: &str) -> Result<()> {
    let mut source = JsonFileSource::open_or_create(file)
        .with_context(|| format!("Failed to open records: {}", file.display()))?;

    let written = seed_if_empty(&mut source, collection, &sample_products())
        .with_context(|| format!("Failed to seed '{}' in {}", collection, file.display()))?;

    if written == 0 {
        println!("Collection '{}' already has products", collection);
    } else {
        println!("Inserted {} products into {}", written, file.display());
    }
    Ok(())
}
