use crate::core::context::RouteContext;
use crate::domain::itinerary::{RouteTotals, Transition};
use crate::domain::model::ScoredCandidate;
use crate::utils::error::Result;

/// 依給定順序計算每段步行：起點到第一站，之後相鄰兩站
pub fn transitions(stops: &[ScoredCandidate<'_>], ctx: &RouteContext<'_>) -> Result<Vec<Transition>> {
    let mut current = ctx.start;
    let mut legs = Vec::with_capacity(stops.len());

    for stop in stops {
        let distance_km = ctx.distance_km(current, stop.coordinates())?;
        legs.push(Transition {
            distance_km,
            duration_minutes: ctx.walking.time_minutes(distance_km),
        });
        current = stop.coordinates();
    }

    Ok(legs)
}

/// 停留時間總和加上步行時間
pub fn totals(stops: &[ScoredCandidate<'_>], legs: &[Transition]) -> RouteTotals {
    let visit_hours: f64 = stops.iter().map(|s| s.dwell_time_hours).sum();
    let walking_minutes: f64 = legs.iter().map(|l| l.duration_minutes).sum();

    RouteTotals {
        visit_hours,
        walking_minutes,
        total_hours: visit_hours + walking_minutes / 60.0,
    }
}

/// 給定順序下的路線總時長
pub fn account(stops: &[ScoredCandidate<'_>], ctx: &RouteContext<'_>) -> Result<RouteTotals> {
    if stops.is_empty() {
        return Ok(RouteTotals::ZERO);
    }
    let legs = transitions(stops, ctx)?;
    Ok(totals(stops, &legs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::walking::WalkingTimeModel;
    use crate::domain::model::{Coordinates, Place, RouteWindow};
    use crate::domain::ports::DistanceProvider;

    struct PlanarDistance;

    impl DistanceProvider for PlanarDistance {
        fn distance_km(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
            Ok(((from.lat - to.lat).powi(2) + (from.lon - to.lon).powi(2)).sqrt())
        }
    }

    fn place(id: u64, lat: f64, lon: f64) -> Place {
        Place {
            id,
            name: format!("Place {}", id),
            description: String::new(),
            address: String::new(),
            coordinates: Coordinates::new(lat, lon),
            category_id: None,
            url: None,
        }
    }

    fn candidate(place: &Place, dwell: f64) -> ScoredCandidate<'_> {
        ScoredCandidate {
            place,
            similarity: 0.5,
            distance_from_start_km: 0.0,
            walk_time_from_start_hours: 0.0,
            dwell_time_hours: dwell,
        }
    }

    #[test]
    fn test_account_sums_dwell_and_walks() {
        let distance = PlanarDistance;
        let ctx = RouteContext::new(
            Coordinates::new(0.0, 0.0),
            RouteWindow::new(1.0, 2.0).unwrap(),
            WalkingTimeModel::default(),
            &distance,
        );
        let a = place(1, 2.0, 0.0);
        let b = place(2, 2.0, 1.0);
        let c = place(3, 2.0, 1.1);
        let stops = vec![candidate(&a, 0.4), candidate(&b, 0.3), candidate(&c, 0.2)];

        let legs = transitions(&stops, &ctx).unwrap();
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[0].duration_minutes, 30.0);
        assert_eq!(legs[1].duration_minutes, 15.0);
        // 0.1 km 低於下限
        assert_eq!(legs[2].duration_minutes, 5.0);

        let totals = account(&stops, &ctx).unwrap();
        assert!((totals.visit_hours - 0.9).abs() < 1e-9);
        assert!((totals.walking_minutes - 50.0).abs() < 1e-9);
        assert!((totals.total_hours - (0.9 + 50.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_account_empty_route() {
        let distance = PlanarDistance;
        let ctx = RouteContext::new(
            Coordinates::new(0.0, 0.0),
            RouteWindow::new(1.0, 2.0).unwrap(),
            WalkingTimeModel::default(),
            &distance,
        );
        assert_eq!(account(&[], &ctx).unwrap(), RouteTotals::ZERO);
    }
}
