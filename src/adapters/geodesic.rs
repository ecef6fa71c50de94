use crate::domain::model::Coordinates;
use crate::domain::ports::DistanceProvider;
use crate::utils::error::{PlannerError, Result};
use geo::{GeodesicDistance, Point};

/// WGS-84 橢球面上的測地線距離（Karney 演算法）
#[derive(Debug, Clone, Copy, Default)]
pub struct GeodesicDistanceProvider;

impl GeodesicDistanceProvider {
    pub fn new() -> Self {
        Self
    }

    fn to_point(coords: Coordinates) -> Result<Point<f64>> {
        let valid = coords.lat.is_finite()
            && coords.lon.is_finite()
            && (-90.0..=90.0).contains(&coords.lat)
            && (-180.0..=180.0).contains(&coords.lon);

        if !valid {
            return Err(PlannerError::distance(format!(
                "coordinates out of range: ({}, {})",
                coords.lat, coords.lon
            )));
        }
        // geo 使用 (x = 經度, y = 緯度)
        Ok(Point::new(coords.lon, coords.lat))
    }
}

impl DistanceProvider for GeodesicDistanceProvider {
    fn distance_km(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
        let a = Self::to_point(from)?;
        let b = Self::to_point(to)?;
        let meters = a.geodesic_distance(&b);

        if !meters.is_finite() {
            return Err(PlannerError::distance("geodesic solver did not converge"));
        }
        Ok(meters / 1000.0)
    }
}
