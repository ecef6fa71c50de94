use crate::core::context::{RouteContext, SequencingStrategy};
use crate::domain::model::{Coordinates, ScoredCandidate};
use crate::utils::error::Result;

/// 貪婪最近鄰：從起點出發，每次走向最近的未訪問站
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborSequencer;

impl NearestNeighborSequencer {
    pub fn new() -> Self {
        Self
    }

    /// 起點加上所有站點的完全圖距離矩陣，索引 0 為起點
    fn distance_matrix(points: &[Coordinates], ctx: &RouteContext<'_>) -> Result<Vec<Vec<f64>>> {
        let n = points.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let d = ctx.distance_km(points[i], points[j])?;
                matrix[i][j] = d;
                matrix[j][i] = d;
            }
        }

        Ok(matrix)
    }
}

impl SequencingStrategy for NearestNeighborSequencer {
    fn sequence<'p>(
        &self,
        subset: &[ScoredCandidate<'p>],
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<ScoredCandidate<'p>>> {
        if subset.len() <= 1 {
            return Ok(subset.to_vec());
        }

        let points: Vec<Coordinates> = std::iter::once(ctx.start)
            .chain(subset.iter().map(|c| c.coordinates()))
            .collect();
        let matrix = Self::distance_matrix(&points, ctx)?;

        let mut visited = vec![false; points.len()];
        visited[0] = true;
        let mut current = 0;
        let mut tour = Vec::with_capacity(subset.len());

        while tour.len() < subset.len() {
            // 距離相同時取較前的站，結果可重現
            let mut next: Option<(usize, f64)> = None;
            for (node, &d) in matrix[current].iter().enumerate() {
                if visited[node] {
                    continue;
                }
                if next.map_or(true, |(_, best)| d < best) {
                    next = Some((node, d));
                }
            }

            let Some((node, _)) = next else { break };
            visited[node] = true;
            tour.push(subset[node - 1]);
            current = node;
        }

        tracing::debug!(
            "Tour order: {:?}",
            tour.iter().map(|c| c.id()).collect::<Vec<_>>()
        );
        Ok(tour)
    }
}
