//! nalssi: Korean short-term forecast lookups from the terminal.

mod error_mapping;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use error_mapping::IntoAppError;
use nalssi_core::{AppError, Config, WeatherError};
use nalssi_weather::district::parse_district;
use nalssi_weather::{
    now_kst, to_grid, ClientOptions, DistrictIndex, FavoriteLocation, Favorites, FileStore,
    GeoPoint, KmaClient, RegionTable, RetryConfig, WeatherService,
};

#[derive(Parser)]
#[command(name = "nalssi")]
#[command(about = "Short-term weather forecasts for Korean locations", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast for a coordinate pair
    Current {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Convert a coordinate pair to its forecast grid cell
    Grid {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Search districts by name
    Search {
        /// At least two characters, e.g. "청운" or "종로구"
        term: String,
    },

    /// Forecast for a district, e.g. "서울특별시-종로구-청운효자동"
    Show { district: String },

    /// Manage saved locations
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved locations
    List,
    /// Save a district
    Add { district: String },
    /// Remove a saved location by its full name, e.g. "부산광역시 중구 중앙동"
    Remove { name: String },
    /// Forecast for every saved location
    Show,
}

#[tokio::main]
async fn main() {
    if let Err(e) = nalssi_core::init() {
        eprintln!("{e:#}");
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        match e.downcast_ref::<AppError>() {
            Some(app) => eprintln!("{}", app.user_message()),
            None => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;

    // Grid conversion needs neither config nor data files
    if let Commands::Grid { lat, lon } = cli.command {
        let cell = to_grid(lat, lon);
        if json {
            print_json(&cell)?;
        } else {
            println!("nx={} ny={}", cell.nx, cell.ny);
        }
        return Ok(());
    }

    let (config, _) = Config::load_validated(cli.config.as_deref())?;

    match cli.command {
        Commands::Grid { .. } => Ok(()),
        Commands::Current { lat, lon } => {
            let service = build_service(&config)?;
            let point = GeoPoint::new(lat, lon);
            let report = service.report_for_point(point, now_kst()).await;
            match report {
                Some(report) if json => print_json(&report),
                Some(report) => {
                    println!("{}", render::report(&report));
                    Ok(())
                }
                None => {
                    let cell = service.grid_for(point);
                    let name = service.regions().describe(cell).full();
                    no_data(&name, json)
                }
            }
        }
        Commands::Search { term } => {
            let districts = load_districts(&config)?;
            let matches = districts.search(&term);
            if json {
                print_json(&matches)
            } else {
                println!("{}", render::search_results(&term, &matches));
                Ok(())
            }
        }
        Commands::Show { district } => {
            let service = build_service(&config)?;
            let entry = resolve_entry(service.districts(), &district)?;
            match service.report_for_district(&entry, now_kst()).await {
                Some(report) if json => print_json(&report),
                Some(report) => {
                    println!("{}", render::report(&report));
                    Ok(())
                }
                None => no_data(&entry.replace('-', " "), json),
            }
        }
        Commands::Favorites { action } => run_favorites(&config, action, json).await,
    }
}

async fn run_favorites(config: &Config, action: FavoritesAction, json: bool) -> Result<()> {
    let store = FileStore::new(&config.data.favorites_dir);
    let mut favorites = Favorites::load(store).map_err(|e| e.into_app_error())?;

    match action {
        FavoritesAction::List => {
            if json {
                print_json(&favorites.list())
            } else {
                println!("{}", render::favorites(favorites.list()));
                Ok(())
            }
        }
        FavoritesAction::Add { district } => {
            let regions = load_regions(config)?;
            let districts = load_districts(config)?;
            let entry = resolve_entry(&districts, &district)?;
            let (grid, region) = regions
                .resolve_district(&entry)
                .ok_or_else(|| AppError::Weather(WeatherError::LocationNotFound(entry.clone())))?;

            let favorite = FavoriteLocation::for_region(region, grid);
            let name = favorite.name.clone();
            favorites.add(favorite).map_err(|e| e.into_app_error())?;
            println!("Added {name}");
            Ok(())
        }
        FavoritesAction::Remove { name } => {
            // Accept the district form as well as the listed full name
            let name = if name.contains('-') {
                parse_district(&name).full()
            } else {
                name.trim().to_string()
            };
            let removed = favorites.remove(&name).map_err(|e| e.into_app_error())?;
            if removed {
                println!("Removed {name}");
            } else {
                println!("No favorite named \"{name}\" (use the full name shown by `favorites list`)");
            }
            Ok(())
        }
        FavoritesAction::Show => {
            if favorites.list().is_empty() {
                println!("{}", render::favorites(&[]));
                return Ok(());
            }
            let service = build_service(config)?;
            let reports = service
                .reports_for_favorites(favorites.list(), now_kst())
                .await;

            if json {
                let entries: Vec<_> = reports
                    .iter()
                    .map(|(favorite, report)| FavoriteReport { favorite, report: report.as_ref() })
                    .collect();
                return print_json(&entries);
            }

            let blocks: Vec<String> = reports
                .iter()
                .map(|(favorite, report)| match report {
                    Some(report) => render::report(report),
                    None => render::missing_report(&favorite.region.full()),
                })
                .collect();
            println!("{}", blocks.join("\n\n"));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct FavoriteReport<'a> {
    favorite: &'a FavoriteLocation,
    report: Option<&'a nalssi_weather::WeatherReport>,
}

/// Exact district entry for `input`; a search with a single hit also counts.
fn resolve_entry(districts: &DistrictIndex, input: &str) -> Result<String> {
    let input = input.trim();
    if districts.contains(input) {
        return Ok(input.to_string());
    }

    match districts.search(input).as_slice() {
        [only] => Ok(only.full.clone()),
        _ => Err(AppError::Weather(WeatherError::LocationNotFound(input.to_string())).into()),
    }
}

fn no_data(name: &str, json: bool) -> Result<()> {
    if json {
        print_json(&serde_json::Value::Null)
    } else {
        println!("{}", render::missing_report(name));
        Ok(())
    }
}

fn load_regions(config: &Config) -> Result<RegionTable> {
    let regions = RegionTable::load(&config.data.regions_path).map_err(|e| e.into_app_error())?;
    tracing::debug!("{} region rows loaded", regions.len());
    Ok(regions)
}

fn load_districts(config: &Config) -> Result<DistrictIndex> {
    let districts =
        DistrictIndex::load(&config.data.districts_path).map_err(|e| e.into_app_error())?;
    tracing::debug!("{} districts loaded", districts.len());
    Ok(districts)
}

fn build_service(config: &Config) -> Result<WeatherService> {
    let client = KmaClient::new(ClientOptions {
        base_url: config.kma.base_url.clone(),
        service_key: config.kma.service_key.clone(),
        num_of_rows: config.kma.num_of_rows,
        timeout: Duration::from_secs(config.kma.timeout_secs),
        retry: RetryConfig::default(),
    })
    .map_err(|e| e.into_app_error())?;

    Ok(WeatherService::new(
        client,
        load_regions(config)?,
        load_districts(config)?,
    ))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to encode JSON output")?;
    println!("{text}");
    Ok(())
}
