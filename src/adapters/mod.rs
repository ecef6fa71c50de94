// Adapters layer: concrete implementations of the collaborator ports (distance, embeddings, catalog files).

pub mod catalog_csv;
pub mod geodesic;
pub mod http_embedder;

pub use catalog_csv::CsvCatalogSource;
pub use geodesic::GeodesicDistanceProvider;
pub use http_embedder::HttpEmbedder;
