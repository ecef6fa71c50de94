// Domain layer: core models and ports (interfaces) for the route composer.

pub mod itinerary;
pub mod model;
pub mod ports;
