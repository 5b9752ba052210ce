//! nutrilog: search foods, pick servings and total up meals.

use clap::{Parser, Subcommand};
use nutrilog_cli::output::{format_count, format_food, format_nutrients, print_response, Status};
use nutrilog_core::config::{Config, ConfigSchema};
use nutrilog_core::error::exit_codes;
use nutrilog_core::seed::seed_catalog;
use nutrilog_core::{CatalogStore, Error, FoodId, FoodRecord, JsonFileCatalog, Result};
use nutrilog_nutrition::{resolve_grams, resolve_serving, MealTotals, ServingSelection};
use nutrilog_search::FoodSearch;
use nutrilog_telemetry::{metrics, names, TelemetryConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Parser)]
#[command(name = "nutrilog")]
#[command(about = "Personal nutrition log")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Catalog file, overrides the config
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Print search and index metrics to stderr when done
    #[arg(long, global = true)]
    stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the starter catalog
    Init {
        /// Overwrite an existing catalog
        #[arg(long)]
        force: bool,
    },

    /// Search foods by name or tag
    Search {
        /// Query text
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show favorites and recently added foods
    Browse {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Nutrients for one serving of a food
    Serving {
        /// Food id
        id: u64,
        /// Named serving, e.g. "1 cup"
        #[arg(long, conflicts_with = "grams")]
        serving: Option<String>,
        /// Custom amount in grams
        #[arg(long)]
        grams: Option<f64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a copy of a food as a favorite
    Favorite {
        /// Food id
        id: u64,
    },

    /// Total nutrients for several portions
    Meal {
        /// Portions as ID:GRAMS, e.g. 1:150
        #[arg(required = true)]
        portions: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report(&e)),
    };

    nutrilog_telemetry::init_with_config(telemetry_config(&config.schema, cli.verbose))?;

    let catalog_path = cli
        .catalog
        .unwrap_or_else(|| PathBuf::from(&config.schema.catalog.path));
    debug!(config = ?config.path, catalog = %catalog_path.display(), "Resolved catalog");
    let store = Arc::new(JsonFileCatalog::new(catalog_path));

    let result = match cli.command {
        Commands::Init { force } => run_init(&store, force).await,
        Commands::Search { query, json } => run_search(store, &config.schema, &query.join(" "), json).await,
        Commands::Browse { json } => run_browse(store, &config.schema, json).await,
        Commands::Serving {
            id,
            serving,
            grams,
            json,
        } => run_serving(store, &config.schema, FoodId(id), serving.as_deref(), grams, json).await,
        Commands::Favorite { id } => run_favorite(store, &config.schema, FoodId(id)).await,
        Commands::Meal { portions, json } => run_meal(store, &config.schema, &portions, json).await,
    };

    let code = match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => report(&e),
    };

    let session = metrics().export_json();
    debug!(metrics = %session, "Session metrics");
    if cli.stats {
        Status::info(&stats_summary());
        eprintln!("{}", serde_json::to_string_pretty(&session)?);
    }
    std::process::exit(code);
}

fn telemetry_config(schema: &ConfigSchema, verbose: bool) -> TelemetryConfig {
    TelemetryConfig {
        log_level: if verbose {
            "debug".to_string()
        } else {
            schema.logging.level.clone()
        },
        json: schema.logging.json,
        ..TelemetryConfig::default()
    }
}

/// One-line digest of the session counters.
fn stats_summary() -> String {
    let registry = metrics();
    let indexed = registry.gauge_value(names::INDEX_RECORDS).unwrap_or(0);
    format!(
        "{} run, {} superseded, {} via fallback; index holds {}",
        format_count(registry.counter(names::SEARCH_EXECUTED) as usize, "search", "searches"),
        registry.counter(names::SEARCH_SUPERSEDED),
        registry.counter(names::SEARCH_FALLBACK),
        format_count(indexed as usize, "food", "foods")
    )
}

fn report(err: &Error) -> i32 {
    let report = err.to_report();
    Status::error(&format!("[{}] {}", report.code_str, report.message));
    if let Some(context) = &report.context {
        eprintln!("  {}", context);
    }
    if let Some(suggestion) = &report.suggestion {
        eprintln!("  hint: {}", suggestion);
    }
    err.exit_code()
}

async fn open_engine(store: Arc<JsonFileCatalog>, schema: &ConfigSchema) -> Result<FoodSearch> {
    Ok(FoodSearch::open(store, schema).await?)
}

async fn find_food(engine: &FoodSearch, id: FoodId) -> Result<FoodRecord> {
    engine.find(id).await.ok_or_else(|| Error::record_not_found(id))
}

async fn run_init(store: &JsonFileCatalog, force: bool) -> Result<()> {
    if !force && !store.read_all().await?.is_empty() {
        return Err(Error::validation(format!(
            "Catalog {} already has foods",
            store.path().display()
        ))
        .with_suggestion("Pass --force to replace it with the starter catalog"));
    }

    let records = store.overwrite(seed_catalog()).await?;
    Status::success(&format!(
        "Wrote {} to {}",
        format_count(records.len(), "food", "foods"),
        store.path().display()
    ));
    Ok(())
}

async fn run_search(store: Arc<JsonFileCatalog>, schema: &ConfigSchema, query: &str, json: bool) -> Result<()> {
    let engine = open_engine(store, schema).await?;
    let response = engine.search_now(query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

async fn run_browse(store: Arc<JsonFileCatalog>, schema: &ConfigSchema, json: bool) -> Result<()> {
    let engine = open_engine(store, schema).await?;
    let lists = engine.browse().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }

    Status::header("Popular");
    if lists.popular.is_empty() {
        Status::info("No favorites yet, add one with `nutrilog favorite <id>`");
    }
    for food in &lists.popular {
        println!("{}", format_food(food));
    }

    Status::header("Recent");
    for food in &lists.recent {
        println!("{}", format_food(food));
    }
    Ok(())
}

async fn run_serving(
    store: Arc<JsonFileCatalog>,
    schema: &ConfigSchema,
    id: FoodId,
    serving: Option<&str>,
    grams: Option<f64>,
    json: bool,
) -> Result<()> {
    let engine = open_engine(store, schema).await?;
    let food = find_food(&engine, id).await?;

    let selection = match (serving, grams) {
        (Some(label), _) => ServingSelection::named_from(&food, label)?,
        (None, Some(grams)) => ServingSelection::custom(grams)?,
        (None, None) => ServingSelection::default_for(&food)?,
    };
    let payload = resolve_serving(&food, &selection);

    if json {
        let value = serde_json::json!({
            "food": food,
            "selection": selection,
            "nutrients": payload,
            "display": payload.display(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    Status::header(&food.name);
    println!("{}", selection.describe());
    println!("{}", format_nutrients(&payload.display()));
    if !food.servings.is_empty() {
        let labels: Vec<&str> = food.servings.iter().map(|s| s.label.as_str()).collect();
        Status::subheader(&format!("Servings: {}", labels.join(", ")));
    }
    Ok(())
}

async fn run_favorite(store: Arc<JsonFileCatalog>, schema: &ConfigSchema, id: FoodId) -> Result<()> {
    let engine = open_engine(store, schema).await?;
    let food = find_food(&engine, id).await?;
    let saved = engine.add_favorite(&food).await?;

    Status::success(&format!("Saved {} as favorite #{}", saved.name, saved.id));
    Ok(())
}

async fn run_meal(store: Arc<JsonFileCatalog>, schema: &ConfigSchema, portions: &[String], json: bool) -> Result<()> {
    let engine = open_engine(store, schema).await?;

    let mut payloads = Vec::with_capacity(portions.len());
    let mut foods = Vec::with_capacity(portions.len());
    for portion in portions {
        let (id, grams) = parse_portion(portion)?;
        let food = find_food(&engine, id).await?;
        payloads.push(resolve_grams(&food, grams)?);
        foods.push(food);
    }
    let totals: MealTotals = payloads.iter().collect();

    if json {
        let value = serde_json::json!({
            "portions": payloads,
            "totals": totals,
            "display": totals.display(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    Status::header("Meal");
    for (food, payload) in foods.iter().zip(&payloads) {
        println!("{:<32} {:>7} g  {}", food.name, payload.grams, format_nutrients(&payload.display()));
    }
    println!();
    Status::success(&format!(
        "{}, {} g: {}",
        format_count(totals.entries, "item", "items"),
        totals.grams,
        format_nutrients(&totals.display())
    ));
    Ok(())
}

/// Parse `ID:GRAMS`.
fn parse_portion(portion: &str) -> Result<(FoodId, f64)> {
    let invalid = || {
        Error::validation(format!("Invalid portion '{}'", portion))
            .with_suggestion("Write portions as ID:GRAMS, e.g. 3:150")
    };

    let (id, grams) = portion.split_once(':').ok_or_else(invalid)?;
    let id: u64 = id.trim().parse().map_err(|_| invalid())?;
    let grams: f64 = grams.trim().parse().map_err(|_| invalid())?;
    Ok((FoodId(id), grams))
}
