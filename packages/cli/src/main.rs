#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for the dispensary sales map engine.
//!
//! ```text
//! dispo_map summary <dataset.json> [--config engine.toml]
//! dispo_map view <dataset.json> [--geocache cache.json] [--view companies] [--trend up] ...
//! dispo_map address-keys <dataset.json> [--output address_keys.csv]
//! dispo_map build-cache <address_keys.csv> [--output geocoded_cache.json]
//! ```
//!
//! Results are written to stdout as JSON unless `--output` is given.
//! Set `RUST_LOG=info` for load and resolution diagnostics on stderr.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use dispo_map_analytics::{aggregate, regional_stats, summarize};
use dispo_map_analytics_models::{RegionalStats, TrendSummary};
use dispo_map_dashboard::{
    EngineConfig, FilterCriteria, PlotPoint, SortColumn, SortDirection, SortSpec, TrendFilter,
    ViewConfig, ViewMode, ViewOutput, compute_view,
};
use dispo_map_ingest::address_keys::{
    address_key_rows, build_cache, cache_document, read_address_keys, write_address_keys,
};
use dispo_map_ingest::{load_dataset, load_geo_cache};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "dispo_map",
    about = "Dispensary sales map engine: trends, company rollups, and map placement"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print trend counts for locations and companies
    Summary {
        /// Sales document (JSON)
        dataset: PathBuf,
        /// Engine config override (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute one filtered, sorted view
    View(ViewArgs),
    /// Export the address-key sheet used to build the geocode cache
    AddressKeys {
        /// Sales document (JSON)
        dataset: PathBuf,
        /// Write CSV here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert a filled address-key sheet into a geocode cache document
    BuildCache {
        /// Address-key sheet (CSV)
        input: PathBuf,
        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Sales document (JSON)
    dataset: PathBuf,
    /// Geocode cache (JSON); without it locations fall back to city centroids
    #[arg(long)]
    geocache: Option<PathBuf>,
    /// Engine config override (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// `locations` or `companies`
    #[arg(long, default_value = "locations")]
    view: ViewMode,
    /// Case-insensitive text search
    #[arg(long)]
    search: Option<String>,
    /// Exact region name
    #[arg(long)]
    region: Option<String>,
    /// Restrict to these cities (repeatable)
    #[arg(long = "city")]
    cities: Vec<String>,
    /// `all`, `up`, `down`, or `stable`
    #[arg(long, default_value = "all")]
    trend: TrendFilter,
    /// Column to sort by
    #[arg(long, default_value = "latest_sales")]
    sort: SortColumn,
    /// `asc` or `desc`
    #[arg(long, default_value = "desc")]
    direction: SortDirection,
    /// Include sparkline geometry for every row
    #[arg(long)]
    sparklines: bool,
}

impl ViewArgs {
    fn view_config(&self) -> ViewConfig {
        ViewConfig {
            view: self.view,
            filters: FilterCriteria {
                search: self.search.clone(),
                region: self.region.clone(),
                cities: (!self.cities.is_empty())
                    .then(|| self.cities.iter().cloned().collect::<BTreeSet<_>>()),
                trend: self.trend,
            },
            sort: SortSpec {
                column: self.sort,
                direction: self.direction,
            },
        }
    }
}

#[derive(Serialize)]
struct SummaryReport {
    generated_at: Option<String>,
    months_covered: Vec<String>,
    locations: TrendSummary,
    companies: TrendSummary,
    regions: Vec<RegionalStats>,
}

#[derive(Serialize)]
struct ViewReport {
    #[serde(flatten)]
    output: ViewOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    sparklines: Option<Vec<Vec<PlotPoint>>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { dataset, config } => {
            let config = EngineConfig::load(config.as_deref())?;
            let dataset = load_dataset(&dataset)?;

            let companies = match &dataset.companies {
                Some(companies) => summarize(companies),
                None => summarize(&aggregate(&dataset.locations, &config.trend)),
            };

            let report = SummaryReport {
                generated_at: dataset.generated_at.clone(),
                months_covered: dataset.months_covered.clone(),
                locations: summarize(&dataset.locations),
                companies,
                regions: regional_stats(&dataset.locations, &dataset.regions),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::View(args) => {
            let config = EngineConfig::load(args.config.as_deref())?;
            let dataset = load_dataset(&args.dataset)?;
            let geo_cache = load_geo_cache(args.geocache.as_deref());

            let output = compute_view(&dataset, &geo_cache, &config, &args.view_config());
            let sparklines = args
                .sparklines
                .then(|| output.rows.sparklines(&config.sparkline));

            let report = ViewReport { output, sparklines };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::AddressKeys { dataset, output } => {
            let dataset = load_dataset(&dataset)?;
            let rows = address_key_rows(&dataset.locations);

            match output {
                Some(path) => {
                    write_address_keys(&rows, File::create(&path)?)?;
                    log::info!("Wrote {} unique addresses to {}", rows.len(), path.display());
                }
                None => write_address_keys(&rows, std::io::stdout().lock())?,
            }
        }
        Commands::BuildCache { input, output } => {
            let rows = read_address_keys(File::open(&input)?)?;
            let cache = build_cache(&rows);
            let json = cache_document(&cache)?;
            write_text(output.as_deref(), &json)?;
        }
    }

    Ok(())
}

fn write_text(path: Option<&Path>, text: &str) -> std::io::Result<()> {
    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            writeln!(file, "{text}")?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
