use crate::core::walking::WalkingTimeModel;
use crate::domain::model::{CandidateCombination, Coordinates, RouteWindow, ScoredCandidate};
use crate::domain::ports::DistanceProvider;
use crate::utils::error::Result;

/// 單次組合請求的上下文，在各階段之間傳遞
#[derive(Clone, Copy)]
pub struct RouteContext<'a> {
    pub start: Coordinates,
    pub window: RouteWindow,
    pub walking: WalkingTimeModel,
    pub distance: &'a dyn DistanceProvider,
}

impl<'a> RouteContext<'a> {
    pub fn new(
        start: Coordinates,
        window: RouteWindow,
        walking: WalkingTimeModel,
        distance: &'a dyn DistanceProvider,
    ) -> Self {
        Self {
            start,
            window,
            walking,
            distance,
        }
    }

    pub fn distance_km(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
        self.distance.distance_km(from, to)
    }

    /// 兩點間步行時間（小時）
    pub fn walk_hours(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
        Ok(self.walking.time_hours(self.distance_km(from, to)?))
    }
}

impl std::fmt::Debug for RouteContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteContext")
            .field("start", &self.start)
            .field("window", &self.window)
            .field("walking", &self.walking)
            .finish_non_exhaustive()
    }
}

/// 從排名後的候選中挑出子集
pub trait SelectionStrategy: Send + Sync {
    fn select<'p>(
        &self,
        ranked: &[ScoredCandidate<'p>],
        ctx: &RouteContext<'_>,
    ) -> Result<CandidateCombination<'p>>;
}

/// 將固定子集排成從起點出發的遊覽順序
pub trait SequencingStrategy: Send + Sync {
    fn sequence<'p>(
        &self,
        subset: &[ScoredCandidate<'p>],
        ctx: &RouteContext<'_>,
    ) -> Result<Vec<ScoredCandidate<'p>>>;
}
