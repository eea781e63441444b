//! RidePlan - Deterministic Training Plan Assembly
//!
//! Usage:
//! ```bash
//! # Plan with the built-in library and the stored configuration
//! rideplan weeks.json
//!
//! # Custom library, fixed seed, 280 W FTP for the rendered watts
//! rideplan weeks.json library.json --seed 7 --ftp 280
//! ```
//!
//! The rendered plan is printed as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rideplan::planning::{generate_plan, WeekOverview};
use rideplan::storage::config::{load_config, load_config_from};
use rideplan::workouts::{MigrationRegistry, WorkoutLibrary};

#[derive(Parser)]
#[command(
    name = "rideplan",
    version,
    about = "Assemble weekly cycling training plans from a workout library"
)]
struct Cli {
    /// JSON array of week overviews
    weeks: PathBuf,

    /// Workout library file (defaults to the configured or built-in library)
    library: Option<PathBuf>,

    /// Configuration file override
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rotation seed override
    #[arg(long)]
    seed: Option<u64>,

    /// Athlete FTP override in watts
    #[arg(long)]
    ftp: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting RidePlan v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("loading configuration")?;
    if let Some(seed) = cli.seed {
        config.rotation.seed = seed;
    }
    if let Some(ftp) = cli.ftp {
        config.athlete.ftp = ftp;
    }

    let library = match cli.library.or_else(|| config.library.path.clone()) {
        Some(path) => {
            let source = std::fs::read_to_string(&path)
                .with_context(|| format!("reading library {}", path.display()))?;
            WorkoutLibrary::load_with(
                &source,
                &config.library.expected_version,
                &MigrationRegistry::with_defaults(),
            )
            .with_context(|| format!("loading library {}", path.display()))?
        }
        None => WorkoutLibrary::builtin().context("loading built-in library")?,
    };

    let content = std::fs::read_to_string(&cli.weeks)
        .with_context(|| format!("reading weeks {}", cli.weeks.display()))?;
    let weeks: Vec<WeekOverview> =
        serde_json::from_str(&content).context("parsing week overviews")?;

    let plan = generate_plan(&library, &config, &weeks);
    if !plan.is_complete() {
        tracing::warn!(weeks = ?plan.failed_weeks(), "Plan generated with failed weeks");
    }

    let rendered = serde_json::to_string_pretty(&plan.render(config.athlete.ftp))?;
    println!("{}", rendered);

    Ok(())
}
