pub mod accountant;
pub mod composer;
pub mod context;
pub mod explain;
pub mod ranker;
pub mod scorer;
pub mod selector;
pub mod sequencer;
pub mod walking;

pub use crate::domain::itinerary::{Itinerary, ItineraryStop, RouteTotals, Transition};
pub use crate::domain::model::{
    CandidateCombination, ComposeRequest, Coordinates, Place, PlaceFeature, RouteWindow,
    ScoredCandidate, SelectionTier, WindowFit,
};
pub use crate::domain::ports::{DistanceProvider, EmbeddingProvider};
pub use crate::utils::error::Result;
