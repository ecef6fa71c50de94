use crate::core::context::RouteContext;
use crate::domain::model::{Place, ScoredCandidate};
use crate::utils::error::{PlannerError, Result};

/// 依相關度分級的建議停留時間（小時）
pub fn dwell_time_hours(similarity: f64) -> f64 {
    if similarity > 0.7 {
        0.4
    } else if similarity > 0.5 {
        0.3
    } else if similarity > 0.3 {
        0.25
    } else {
        0.2
    }
}

/// 為每個景點附加相似度、離起點距離與時間估計，並排序
///
/// 排序：相似度降序，其次離起點距離升序；相同時保留目錄順序。
pub fn rank<'p>(
    places: &'p [Place],
    similarities: &[f64],
    ctx: &RouteContext<'_>,
) -> Result<Vec<ScoredCandidate<'p>>> {
    if places.len() != similarities.len() {
        return Err(PlannerError::embedding(format!(
            "got {} similarity scores for {} places",
            similarities.len(),
            places.len()
        )));
    }

    let mut candidates = places
        .iter()
        .zip(similarities)
        .map(|(place, &similarity)| {
            let distance_from_start_km = ctx.distance_km(ctx.start, place.coordinates)?;
            Ok(ScoredCandidate {
                place,
                similarity,
                distance_from_start_km,
                walk_time_from_start_hours: ctx.walking.time_hours(distance_from_start_km),
                dwell_time_hours: dwell_time_hours(similarity),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // sort_by 為穩定排序
    candidates.sort_by(|a, b| {
        b.similarity
            .total_cmp(&a.similarity)
            .then_with(|| a.distance_from_start_km.total_cmp(&b.distance_from_start_km))
    });

    if let Some(top) = candidates.first() {
        tracing::debug!(
            "Ranked {} candidates, top: {} (similarity {:.3})",
            candidates.len(),
            top.place.name,
            top.similarity
        );
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::walking::WalkingTimeModel;
    use crate::domain::model::{Coordinates, RouteWindow};
    use crate::domain::ports::DistanceProvider;

    /// 把經緯度當作公里的平面距離
    struct PlanarDistance;

    impl DistanceProvider for PlanarDistance {
        fn distance_km(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
            Ok(((from.lat - to.lat).powi(2) + (from.lon - to.lon).powi(2)).sqrt())
        }
    }

    struct BrokenDistance;

    impl DistanceProvider for BrokenDistance {
        fn distance_km(&self, _from: Coordinates, _to: Coordinates) -> Result<f64> {
            Err(PlannerError::distance("service down"))
        }
    }

    fn place(id: u64, lat: f64) -> Place {
        Place {
            id,
            name: format!("Place {}", id),
            description: String::new(),
            address: String::new(),
            coordinates: Coordinates::new(lat, 0.0),
            category_id: None,
            url: None,
        }
    }

    fn ctx(distance: &dyn DistanceProvider) -> RouteContext<'_> {
        RouteContext::new(
            Coordinates::new(0.0, 0.0),
            RouteWindow::new(2.0, 3.0).unwrap(),
            WalkingTimeModel::default(),
            distance,
        )
    }

    #[test]
    fn test_dwell_tiers() {
        assert_eq!(dwell_time_hours(0.75), 0.4);
        assert_eq!(dwell_time_hours(0.7), 0.3);
        assert_eq!(dwell_time_hours(0.5), 0.25);
        assert_eq!(dwell_time_hours(0.51), 0.3);
        assert_eq!(dwell_time_hours(0.3), 0.2);
        assert_eq!(dwell_time_hours(0.31), 0.25);
        assert_eq!(dwell_time_hours(0.1), 0.2);
        assert_eq!(dwell_time_hours(-0.4), 0.2);
    }

    #[test]
    fn test_rank_orders_by_similarity_then_distance() {
        let places = vec![place(1, 3.0), place(2, 1.0), place(3, 2.0), place(4, 0.5)];
        let similarities = vec![0.6, 0.6, 0.9, 0.2];
        let distance = PlanarDistance;

        let ranked = rank(&places, &similarities, &ctx(&distance)).unwrap();
        let ids: Vec<u64> = ranked.iter().map(|c| c.id()).collect();

        assert_eq!(ids, vec![3, 2, 1, 4]);
        assert_eq!(ranked[0].dwell_time_hours, 0.4);
        assert_eq!(ranked[1].distance_from_start_km, 1.0);
        assert_eq!(ranked[1].walk_time_from_start_hours, 0.25);
        assert_eq!(ranked[3].dwell_time_hours, 0.2);
    }

    #[test]
    fn test_rank_keeps_catalog_order_on_full_ties() {
        let places = vec![place(7, 1.0), place(3, 1.0), place(5, 1.0)];
        let distance = PlanarDistance;

        let ranked = rank(&places, &[0.4, 0.4, 0.4], &ctx(&distance)).unwrap();
        let ids: Vec<u64> = ranked.iter().map(|c| c.id()).collect();

        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_rank_propagates_distance_failure() {
        let places = vec![place(1, 1.0)];
        let distance = BrokenDistance;

        assert!(matches!(
            rank(&places, &[0.5], &ctx(&distance)),
            Err(PlannerError::DistanceError { .. })
        ));
    }

    #[test]
    fn test_rank_rejects_misaligned_scores() {
        let places = vec![place(1, 1.0), place(2, 2.0)];
        let distance = PlanarDistance;

        assert!(rank(&places, &[0.5], &ctx(&distance)).is_err());
    }
}
