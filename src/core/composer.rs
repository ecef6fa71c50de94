use crate::core::accountant;
use crate::core::context::{RouteContext, SelectionStrategy, SequencingStrategy};
use crate::core::explain;
use crate::core::ranker;
use crate::core::scorer::{Catalog, RelevanceScorer};
use crate::core::selector::{TieredGreedySelector, MIN_STOPS};
use crate::core::sequencer::NearestNeighborSequencer;
use crate::core::walking::WalkingTimeModel;
use crate::domain::itinerary::{Itinerary, ItineraryStop};
use crate::domain::model::{ComposeRequest, Place, RouteWindow, ScoredCandidate, SelectionTier};
use crate::domain::ports::{DistanceProvider, EmbeddingProvider};
use crate::utils::error::{PipelineStage, Result};
use std::time::Instant;

/// 評分 → 排名 → 選擇 → 排序 → 計時 的組合流程
///
/// 除查詢嵌入外全部同步執行；目錄可透過 `Arc` 在多個請求間共用。
pub struct RouteComposer<E: EmbeddingProvider, D: DistanceProvider> {
    scorer: RelevanceScorer<E>,
    distance: D,
    walking: WalkingTimeModel,
    selector: Box<dyn SelectionStrategy>,
    sequencer: Box<dyn SequencingStrategy>,
}

impl<E: EmbeddingProvider, D: DistanceProvider> RouteComposer<E, D> {
    pub fn new(embedder: E, distance: D) -> Self {
        Self {
            scorer: RelevanceScorer::new(embedder),
            distance,
            walking: WalkingTimeModel::default(),
            selector: Box::new(TieredGreedySelector::new()),
            sequencer: Box::new(NearestNeighborSequencer::new()),
        }
    }

    pub fn with_walking_model(mut self, walking: WalkingTimeModel) -> Self {
        self.walking = walking;
        self
    }

    pub fn with_selector(mut self, selector: Box<dyn SelectionStrategy>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_sequencer(mut self, sequencer: Box<dyn SequencingStrategy>) -> Self {
        self.sequencer = sequencer;
        self
    }

    /// 載入時預先計算目錄的嵌入向量
    pub async fn index_catalog(&self, places: Vec<Place>) -> Result<Catalog> {
        let started = Instant::now();
        let catalog = self.scorer.index(places).await?;
        tracing::info!(
            "📚 Indexed {} places in {:?}",
            catalog.len(),
            started.elapsed()
        );
        Ok(catalog)
    }

    pub async fn compose(&self, catalog: &Catalog, request: &ComposeRequest) -> Result<Itinerary> {
        let window = RouteWindow::new(request.min_hours, request.max_hours)?;

        tracing::debug!(
            "Composing route for '{}' within [{}, {}]h from ({:.6}, {:.6})",
            request.interests,
            window.min_hours,
            window.max_hours,
            request.start.lat,
            request.start.lon
        );

        let similarities = self.scorer.score(&request.interests, catalog).await?;

        let ctx = RouteContext::new(request.start, window, self.walking, &self.distance);

        let ranked = ranker::rank(catalog.places(), &similarities, &ctx)
            .map_err(|e| e.at_stage(PipelineStage::Ranking))?;

        let selection = self
            .selector
            .select(&ranked, &ctx)
            .map_err(|e| e.at_stage(PipelineStage::Selection))?;
        tracing::debug!(
            "Selected {:?} via {:?} ({:.2}h in ranked order)",
            selection.ids(),
            selection.tier,
            selection.accumulated_hours
        );

        let tour = self
            .sequencer
            .sequence(&selection.candidates, &ctx)
            .map_err(|e| e.at_stage(PipelineStage::Sequencing))?;

        let itinerary = build_itinerary(&tour, &ctx, request, selection.tier, selection.accumulated_hours)
            .map_err(|e| e.at_stage(PipelineStage::Accounting))?;

        if itinerary.shortfall {
            tracing::warn!(
                "Catalog offers only {} stops, fewer than {}",
                itinerary.stops.len(),
                MIN_STOPS
            );
        }
        if !itinerary.window_fit.is_within() {
            tracing::warn!(
                "Route takes {:.2}h, outside requested [{}, {}]h: {:?}",
                itinerary.totals.total_hours,
                window.min_hours,
                window.max_hours,
                itinerary.window_fit
            );
        }

        tracing::info!(
            "🗺️ Composed {} stops, {:.2}h total ({:.0} min walking)",
            itinerary.stops.len(),
            itinerary.totals.total_hours,
            itinerary.totals.walking_minutes
        );

        Ok(itinerary)
    }
}

fn build_itinerary(
    tour: &[ScoredCandidate<'_>],
    ctx: &RouteContext<'_>,
    request: &ComposeRequest,
    tier: SelectionTier,
    selection_hours: f64,
) -> Result<Itinerary> {
    let legs = accountant::transitions(tour, ctx)?;
    let totals = accountant::totals(tour, &legs);

    let mut clock_minutes = 0.0;
    let stops = tour
        .iter()
        .zip(&legs)
        .map(|(candidate, leg)| {
            let arrival = clock_minutes + leg.duration_minutes;
            let departure = arrival + candidate.dwell_time_hours * 60.0;
            clock_minutes = departure;
            let features = explain::classify(candidate.place);
            ItineraryStop {
                place: candidate.place.clone(),
                similarity: candidate.similarity,
                reason: explain::reason(candidate.place, &features, candidate.similarity, &request.interests),
                features,
                dwell_time_hours: candidate.dwell_time_hours,
                walk_in: *leg,
                arrival_offset_minutes: arrival,
                departure_offset_minutes: departure,
            }
        })
        .collect::<Vec<_>>();

    Ok(Itinerary {
        interests: request.interests.clone(),
        start: ctx.start,
        window: ctx.window,
        shortfall: stops.len() < MIN_STOPS,
        stops,
        window_fit: ctx.window.fit(totals.total_hours),
        totals,
        selection_tier: tier,
        selection_hours,
    })
}
