pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "walk-planner")]
#[command(about = "Compose a short walking route through a catalog of places")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "configs/walk-planner.toml")]
    pub config: String,

    /// Override the catalog CSV path from the config file
    #[arg(long)]
    pub catalog: Option<String>,

    /// Free-text interests, e.g. "музеи и архитектура"
    #[arg(short, long)]
    pub interests: Option<String>,

    #[arg(long, help = "Minimum walk duration in hours")]
    pub min_hours: Option<f64>,

    #[arg(long, help = "Maximum walk duration in hours")]
    pub max_hours: Option<f64>,

    /// Start coordinates as "lat lon" or "lat,lon"
    #[arg(short, long)]
    pub start: String,

    /// Departure time (HH:MM) for the timetable, defaults to now
    #[arg(long)]
    pub depart_at: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}
