use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use walk_planner::core::context::{RouteContext, SelectionStrategy, SequencingStrategy};
use walk_planner::core::{
    CandidateCombination, PlaceFeature, ScoredCandidate, SelectionTier, WindowFit,
};
use walk_planner::domain::ports::{DistanceProvider, EmbeddingProvider};
use walk_planner::utils::error::PipelineStage;
use walk_planner::{
    ComposeRequest, Coordinates, GeodesicDistanceProvider, Place, PlannerError, RouteComposer,
};

const QUERY: &str = "музеи";

/// 固定查表的嵌入服務：查詢為 [1, 0]，景點向量與其夾角餘弦即為給定相似度
struct LookupEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl LookupEmbedder {
    fn for_places(places: &[(Place, f32)]) -> Self {
        let mut vectors = HashMap::new();
        vectors.insert(QUERY.to_string(), vec![1.0, 0.0]);
        for (place, similarity) in places {
            vectors.insert(
                place.embedding_text(),
                vec![*similarity, (1.0 - similarity * similarity).sqrt()],
            );
        }
        Self { vectors }
    }
}

#[async_trait]
impl EmbeddingProvider for LookupEmbedder {
    async fn embed(&self, text: &str) -> walk_planner::Result<Vec<f32>> {
        self.vectors
            .get(text)
            .cloned()
            .ok_or_else(|| PlannerError::embedding(format!("unknown text '{}'", text)))
    }

    async fn embed_batch(&self, texts: &[String]) -> walk_planner::Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

struct BrokenDistance;

impl DistanceProvider for BrokenDistance {
    fn distance_km(&self, _from: Coordinates, _to: Coordinates) -> walk_planner::Result<f64> {
        Err(PlannerError::distance("geodesic service unavailable"))
    }
}

fn place(id: u64, name: &str, lat: f64, lon: f64) -> Place {
    Place {
        id,
        name: name.to_string(),
        description: format!("{} в Нижнем Новгороде", name),
        address: "Нижний Новгород".to_string(),
        coordinates: Coordinates::new(lat, lon),
        category_id: None,
        url: None,
    }
}

fn start() -> Coordinates {
    Coordinates::new(56.32, 44.00)
}

/// 五個景點：1→2→3 沿經線每段約 2 km，4 在 3 以東約 2 km，5 在 3 以西約 3 km
fn museum_catalog() -> Vec<(Place, f32)> {
    vec![
        (place(1, "Художественный музей", 56.338, 44.0), 0.8),
        (place(2, "Исторический музей", 56.356, 44.0), 0.6),
        (place(3, "Музей-квартира", 56.374, 44.0), 0.4),
        (place(4, "Галерея", 56.374, 44.0324), 0.35),
        (place(5, "Сквер", 56.374, 43.9514), 0.1),
    ]
}

fn request(min_hours: f64, max_hours: f64) -> ComposeRequest {
    ComposeRequest {
        interests: QUERY.to_string(),
        min_hours,
        max_hours,
        start: start(),
    }
}

fn composer_for(
    places: &[(Place, f32)],
) -> RouteComposer<LookupEmbedder, GeodesicDistanceProvider> {
    RouteComposer::new(LookupEmbedder::for_places(places), GeodesicDistanceProvider::new())
}

fn just_places(places: &[(Place, f32)]) -> Vec<Place> {
    places.iter().map(|(p, _)| p.clone()).collect()
}

#[tokio::test]
async fn test_end_to_end_museum_walk() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let itinerary = composer.compose(&catalog, &request(2.0, 3.0)).await?;

    // 第 4、5 名放不下；前三名約 2.45 h
    assert_eq!(itinerary.selection_tier, SelectionTier::Windowed);
    assert_eq!(itinerary.place_ids(), vec![1, 2, 3]);
    assert!(itinerary.window_fit.is_within());
    assert!((itinerary.totals.total_hours - 2.45).abs() < 0.02);
    assert!((itinerary.selection_hours - itinerary.totals.total_hours).abs() < 1e-9);
    assert!(!itinerary.shortfall);

    // 停留時間依相似度分級
    let dwell: Vec<f64> = itinerary.stops.iter().map(|s| s.dwell_time_hours).collect();
    assert_eq!(dwell, vec![0.4, 0.3, 0.25]);
    assert!((itinerary.totals.visit_hours - 0.95).abs() < 1e-9);

    // 興趣「музеи」對上文化類景點
    for stop in &itinerary.stops {
        assert!(stop.features.contains(&PlaceFeature::Cultural));
        assert!(stop.reason.starts_with("отвечает вашему запросу о культурных местах"));
    }

    let first = &itinerary.stops[0];
    assert!((first.walk_in.distance_km - 2.0).abs() < 0.05);
    assert!((first.arrival_offset_minutes - first.walk_in.duration_minutes).abs() < 1e-9);
    for pair in itinerary.stops.windows(2) {
        let expected = pair[0].departure_offset_minutes + pair[1].walk_in.duration_minutes;
        assert!((pair[1].arrival_offset_minutes - expected).abs() < 1e-9);
    }
    let last = itinerary.stops.last().unwrap();
    assert!((last.departure_offset_minutes / 60.0 - itinerary.totals.total_hours).abs() < 1e-9);

    Ok(())
}

#[tokio::test]
async fn test_tour_starts_at_nearest_selected_place() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let itinerary = composer.compose(&catalog, &request(3.5, 4.0)).await?;

    let distance = GeodesicDistanceProvider::new();
    let first = distance.distance_km(start(), itinerary.stops[0].place.coordinates)?;
    for stop in &itinerary.stops[1..] {
        assert!(first <= distance.distance_km(start(), stop.place.coordinates)?);
    }

    // 上限 4 h 裝得下 4 站，但達不到 3.5 h 下限
    assert_eq!(itinerary.selection_tier, SelectionTier::BestEffort);
    assert_eq!(itinerary.place_ids(), vec![1, 2, 3, 4]);
    assert!(matches!(itinerary.window_fit, WindowFit::Under { .. }));

    Ok(())
}

#[tokio::test]
async fn test_fallback_ladder_still_returns_three_places() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    // 任一景點的停留時間都超過上限
    let itinerary = composer.compose(&catalog, &request(0.1, 0.15)).await?;

    assert_eq!(itinerary.selection_tier, SelectionTier::MinimumGuarantee);
    assert_eq!(itinerary.stops.len(), 3);
    assert_eq!(itinerary.place_ids(), vec![1, 2, 3]);
    assert!(matches!(itinerary.window_fit, WindowFit::Over { .. }));
    assert!(!itinerary.shortfall);

    Ok(())
}

#[tokio::test]
async fn test_small_catalog_is_flagged_not_failed() -> Result<()> {
    let places: Vec<(Place, f32)> = museum_catalog().into_iter().take(2).collect();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let itinerary = composer.compose(&catalog, &request(2.0, 3.0)).await?;

    assert_eq!(itinerary.stops.len(), 2);
    assert!(itinerary.shortfall);
    assert_eq!(itinerary.selection_tier, SelectionTier::BestEffort);
    assert!(matches!(itinerary.window_fit, WindowFit::Under { .. }));

    Ok(())
}

#[tokio::test]
async fn test_small_catalog_never_returns_empty_route() -> Result<()> {
    let places: Vec<(Place, f32)> = museum_catalog().into_iter().take(2).collect();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    // 兩個景點都超出上限，仍須回傳全部
    let itinerary = composer.compose(&catalog, &request(0.1, 0.15)).await?;

    assert_eq!(itinerary.place_ids(), vec![1, 2]);
    assert!(itinerary.shortfall);
    assert_eq!(itinerary.selection_tier, SelectionTier::MinimumGuarantee);
    assert!(matches!(itinerary.window_fit, WindowFit::Over { .. }));

    Ok(())
}

#[tokio::test]
async fn test_composition_is_deterministic() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let first = composer.compose(&catalog, &request(1.0, 2.0)).await?;
    for _ in 0..3 {
        let again = composer.compose(&catalog, &request(1.0, 2.0)).await?;
        assert_eq!(again.place_ids(), first.place_ids());
        assert_eq!(again.totals, first.totals);
        assert_eq!(again.selection_tier, first.selection_tier);
    }

    Ok(())
}

#[tokio::test]
async fn test_concurrent_requests_share_catalog() -> Result<()> {
    let places = museum_catalog();
    let composer = Arc::new(composer_for(&places));
    let catalog = Arc::new(composer.index_catalog(just_places(&places)).await?);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let composer = Arc::clone(&composer);
        let catalog = Arc::clone(&catalog);
        handles.push(tokio::spawn(async move {
            composer.compose(&catalog, &request(2.0, 3.0)).await
        }));
    }

    for handle in handles {
        let itinerary = handle.await??;
        assert_eq!(itinerary.place_ids(), vec![1, 2, 3]);
    }

    Ok(())
}

#[tokio::test]
async fn test_inverted_window_is_rejected() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let result = composer.compose(&catalog, &request(3.0, 2.0)).await;
    assert!(matches!(result, Err(PlannerError::InvalidWindow { .. })));

    let result = composer.compose(&catalog, &request(0.0, 2.0)).await;
    assert!(matches!(result, Err(PlannerError::InvalidWindow { .. })));

    Ok(())
}

#[tokio::test]
async fn test_distance_failure_names_the_stage() -> Result<()> {
    let places = museum_catalog();
    let composer = RouteComposer::new(LookupEmbedder::for_places(&places), BrokenDistance);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let err = composer.compose(&catalog, &request(2.0, 3.0)).await.unwrap_err();
    match err {
        PlannerError::DependencyUnavailable { stage, source } => {
            assert_eq!(stage, PipelineStage::Ranking);
            assert!(matches!(*source, PlannerError::DistanceError { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    Ok(())
}

#[tokio::test]
async fn test_embedding_failure_names_the_stage() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places);
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let mut unknown = request(2.0, 3.0);
    unknown.interests = "что-то неизвестное".to_string();

    let err = composer.compose(&catalog, &unknown).await.unwrap_err();
    assert!(matches!(
        err,
        PlannerError::DependencyUnavailable {
            stage: PipelineStage::Scoring,
            ..
        }
    ));

    Ok(())
}

#[tokio::test]
async fn test_empty_catalog_is_rejected() -> Result<()> {
    let composer = composer_for(&[]);
    let result = composer.index_catalog(Vec::new()).await;
    assert!(matches!(result, Err(PlannerError::CatalogEmpty)));
    Ok(())
}

/// 只取排名前三，不看時間
struct TopThree;

impl SelectionStrategy for TopThree {
    fn select<'p>(
        &self,
        ranked: &[ScoredCandidate<'p>],
        _ctx: &RouteContext<'_>,
    ) -> walk_planner::Result<CandidateCombination<'p>> {
        Ok(CandidateCombination {
            candidates: ranked.iter().take(3).copied().collect(),
            accumulated_hours: 0.0,
            tier: SelectionTier::BestEffort,
        })
    }
}

/// 反轉選擇順序
struct Reversed;

impl SequencingStrategy for Reversed {
    fn sequence<'p>(
        &self,
        subset: &[ScoredCandidate<'p>],
        _ctx: &RouteContext<'_>,
    ) -> walk_planner::Result<Vec<ScoredCandidate<'p>>> {
        Ok(subset.iter().rev().copied().collect())
    }
}

#[tokio::test]
async fn test_strategies_can_be_swapped() -> Result<()> {
    let places = museum_catalog();
    let composer = composer_for(&places)
        .with_selector(Box::new(TopThree))
        .with_sequencer(Box::new(Reversed));
    let catalog = composer.index_catalog(just_places(&places)).await?;

    let itinerary = composer.compose(&catalog, &request(2.0, 3.0)).await?;

    assert_eq!(itinerary.place_ids(), vec![3, 2, 1]);
    // 回程順序從最遠的點開始，總時長比最近鄰順序長
    assert!(itinerary.totals.total_hours > 2.5);

    Ok(())
}
