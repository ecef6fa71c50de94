pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::PlannerConfig;

pub use adapters::{CsvCatalogSource, GeodesicDistanceProvider, HttpEmbedder};
pub use crate::core::{composer::RouteComposer, scorer::Catalog};
pub use domain::itinerary::Itinerary;
pub use domain::model::{ComposeRequest, Coordinates, Place, RouteWindow};
pub use utils::error::{PlannerError, Result};
