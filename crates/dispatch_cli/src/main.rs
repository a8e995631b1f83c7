use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dispatch_core::config::DispatchConfig;
use dispatch_core::matching::{pending_trips, DriverMatchScorer, Suggestion};
use dispatch_core::model::VehicleClass;
use dispatch_core::synthetic::{generate_snapshot, FleetParams};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod report;
mod snapshot;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "nemt-dispatch",
    about = "Rank drivers for NEMT trips and price rides",
    long_about = "Ranks candidate drivers for non-emergency medical transport trips\n\
                  from a JSON snapshot of trips and drivers, and prices trips\n\
                  against a tiered rate card."
)]
struct Cli {
    /// JSON config with matching tunables and rate tables
    #[arg(long, global = true, env = "NEMT_DISPATCH_CONFIG")]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank drivers for one trip
    Rank {
        /// Snapshot file with trips and drivers
        #[arg(long)]
        snapshot: PathBuf,
        /// Trip to rank drivers for
        #[arg(long)]
        trip: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Rank drivers for every pending trip, earliest first
    RankPending {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Explain why a trip has no viable drivers
    Explain {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        trip: String,
        #[arg(long)]
        json: bool,
    },
    /// Price a trip from the configured rate card
    Fare {
        #[arg(long, value_enum)]
        service: ServiceLevel,
        #[arg(long)]
        miles: f64,
        /// Show the tier and overflow split
        #[arg(long)]
        breakdown: bool,
    },
    /// Generate a seeded synthetic snapshot and rank its pending trips
    Demo {
        #[arg(long, default_value_t = 25)]
        drivers: usize,
        #[arg(long, default_value_t = 40)]
        trips: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Also write the generated snapshot to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ServiceLevel {
    Ambulatory,
    Wheelchair,
    Stretcher,
}

impl From<ServiceLevel> for VehicleClass {
    fn from(level: ServiceLevel) -> Self {
        match level {
            ServiceLevel::Ambulatory => VehicleClass::Ambulatory,
            ServiceLevel::Wheelchair => VehicleClass::Wheelchair,
            ServiceLevel::Stretcher => VehicleClass::Stretcher,
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_scorer(config: &DispatchConfig) -> Result<DriverMatchScorer> {
    DriverMatchScorer::new(config.matching.clone()).context("matching config rejected")
}

// ── commands ───────────────────────────────────────────────────────

fn rank(config: &DispatchConfig, snapshot_path: PathBuf, trip_id: &str, json: bool) -> Result<()> {
    let scorer = build_scorer(config)?;
    let snapshot = snapshot::load_snapshot(&snapshot_path)?;
    let trip = snapshot::find_trip(&snapshot, trip_id)?;

    let suggestions = scorer
        .rank(trip, &snapshot.drivers, &snapshot.trips)
        .with_context(|| format!("cannot rank trip {trip_id}"))?;
    if json {
        return print_json(&suggestions);
    }

    if suggestions.is_empty() {
        if let Some(explanation) =
            scorer.explain_no_matches(trip, &snapshot.drivers, &snapshot.trips)?
        {
            println!("{}", report::explanation_line(trip_id, &explanation));
        }
        return Ok(());
    }
    print!("{}", report::suggestions_table(trip_id, &suggestions));
    Ok(())
}

fn rank_pending(config: &DispatchConfig, snapshot_path: PathBuf, json: bool) -> Result<()> {
    let scorer = build_scorer(config)?;
    let snapshot = snapshot::load_snapshot(&snapshot_path)?;
    let pending = pending_trips(&snapshot.trips);
    info!(pending = pending.len(), "ranking pending trips");

    let rankings = scorer.rank_batch(&pending, &snapshot.drivers, &snapshot.trips);

    if json {
        #[derive(Serialize)]
        struct Entry<'a> {
            trip_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            suggestions: Option<&'a [Suggestion]>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
        }
        let entries: Vec<Entry<'_>> = rankings
            .iter()
            .map(|ranking| match &ranking.result {
                Ok(suggestions) => Entry {
                    trip_id: &ranking.trip_id,
                    suggestions: Some(suggestions.as_slice()),
                    error: None,
                },
                Err(error) => Entry {
                    trip_id: &ranking.trip_id,
                    suggestions: None,
                    error: Some(error.to_string()),
                },
            })
            .collect();
        return print_json(&entries);
    }

    for ranking in &rankings {
        match &ranking.result {
            Ok(suggestions) if suggestions.is_empty() => {
                println!("trip {}: no viable drivers", ranking.trip_id);
            }
            Ok(suggestions) => print!("{}", report::suggestions_table(&ranking.trip_id, suggestions)),
            Err(error) => println!("trip {}: skipped ({error})", ranking.trip_id),
        }
    }
    Ok(())
}

fn explain(config: &DispatchConfig, snapshot_path: PathBuf, trip_id: &str, json: bool) -> Result<()> {
    let scorer = build_scorer(config)?;
    let snapshot = snapshot::load_snapshot(&snapshot_path)?;
    let trip = snapshot::find_trip(&snapshot, trip_id)?;

    let explanation = scorer
        .explain_no_matches(trip, &snapshot.drivers, &snapshot.trips)
        .with_context(|| format!("cannot explain trip {trip_id}"))?;
    if json {
        return print_json(&explanation);
    }
    match explanation {
        Some(explanation) => println!("{}", report::explanation_line(trip_id, &explanation)),
        None => println!("trip {trip_id} has viable drivers; nothing to explain"),
    }
    Ok(())
}

fn fare(config: &DispatchConfig, service: VehicleClass, miles: f64, detailed: bool) -> Result<()> {
    let breakdown = config
        .rates
        .breakdown(service, miles)
        .with_context(|| format!("cannot price a {miles} mi {service} trip"))?;
    println!("{}", report::fare_line(service, &breakdown, detailed));
    Ok(())
}

fn demo(config: &DispatchConfig, params: FleetParams, out: Option<PathBuf>) -> Result<()> {
    let snapshot = generate_snapshot(&params);
    if let Some(path) = out {
        snapshot::write_snapshot(&path, &snapshot)?;
        eprintln!("wrote snapshot to {}", path.display());
    }

    let scorer = build_scorer(config)?;
    let pending = pending_trips(&snapshot.trips);
    let rankings = scorer.rank_batch(&pending, &snapshot.drivers, &snapshot.trips);

    let mut unmatched = 0;
    for (ranking, trip) in rankings.iter().zip(&pending) {
        let suggestions = ranking
            .result
            .as_ref()
            .map_err(|error| error.clone())
            .with_context(|| format!("synthetic trip {} failed to rank", trip.id))?;
        if suggestions.is_empty() {
            unmatched += 1;
            if let Some(explanation) =
                scorer.explain_no_matches(trip, &snapshot.drivers, &snapshot.trips)?
            {
                println!("{}", report::explanation_line(&trip.id, &explanation));
            }
            continue;
        }
        print!("{}", report::suggestions_table(&trip.id, suggestions));
    }

    println!(
        "\n{} drivers, {} trips, {} pending, {} without a viable driver",
        snapshot.drivers.len(),
        snapshot.trips.len(),
        pending.len(),
        unmatched
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = snapshot::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Rank {
            snapshot,
            trip,
            json,
        } => rank(&config, snapshot, &trip, json),
        Commands::RankPending { snapshot, json } => rank_pending(&config, snapshot, json),
        Commands::Explain {
            snapshot,
            trip,
            json,
        } => explain(&config, snapshot, &trip, json),
        Commands::Fare {
            service,
            miles,
            breakdown,
        } => fare(&config, service.into(), miles, breakdown),
        Commands::Demo {
            drivers,
            trips,
            seed,
            out,
        } => demo(
            &config,
            FleetParams::default()
                .with_seed(seed)
                .with_drivers(drivers)
                .with_trips(trips),
            out,
        ),
    }
}
