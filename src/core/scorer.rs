use crate::domain::model::{Place, PlaceId};
use crate::domain::ports::EmbeddingProvider;
use crate::utils::error::{PipelineStage, PlannerError, Result};
use std::collections::HashSet;

/// 景點與預先計算的嵌入向量，建立後不再變動
#[derive(Debug, Clone)]
pub struct Catalog {
    places: Vec<Place>,
    embeddings: Vec<Vec<f32>>,
}

impl Catalog {
    pub fn new(places: Vec<Place>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if places.is_empty() {
            return Err(PlannerError::CatalogEmpty);
        }

        let mut seen: HashSet<PlaceId> = HashSet::with_capacity(places.len());
        for place in &places {
            if !seen.insert(place.id) {
                return Err(PlannerError::DuplicatePlaceId { id: place.id });
            }
        }

        if embeddings.len() != places.len() {
            return Err(PlannerError::embedding(format!(
                "expected {} place embeddings, got {}",
                places.len(),
                embeddings.len()
            ))
            .at_stage(PipelineStage::Scoring));
        }

        Ok(Self { places, embeddings })
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// 以嵌入向量的餘弦相似度評估景點與興趣的相關性
pub struct RelevanceScorer<E: EmbeddingProvider> {
    embedder: E,
}

impl<E: EmbeddingProvider> RelevanceScorer<E> {
    pub fn new(embedder: E) -> Self {
        Self { embedder }
    }

    /// 載入時一次性計算所有景點的嵌入向量
    pub async fn index(&self, places: Vec<Place>) -> Result<Catalog> {
        if places.is_empty() {
            return Err(PlannerError::CatalogEmpty);
        }

        let texts: Vec<String> = places.iter().map(Place::embedding_text).collect();
        tracing::debug!("Embedding {} catalog entries", texts.len());

        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Scoring))?;

        Catalog::new(places, embeddings)
    }

    /// 回傳與目錄順序對齊的相似度
    pub async fn score(&self, query: &str, catalog: &Catalog) -> Result<Vec<f64>> {
        let query_vector = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| e.at_stage(PipelineStage::Scoring))?;

        Ok(cosine_similarity(&query_vector, catalog.embeddings()))
    }
}

/// 查詢向量對一批向量的餘弦相似度；零向量或維度不符得 0
pub fn cosine_similarity(query: &[f32], vectors: &[Vec<f32>]) -> Vec<f64> {
    let query_norm = norm(query);

    vectors
        .iter()
        .map(|vector| {
            if vector.len() != query.len() {
                return 0.0;
            }
            let denom = query_norm * norm(vector);
            if denom == 0.0 {
                return 0.0;
            }
            let dot: f64 = query
                .iter()
                .zip(vector)
                .map(|(a, b)| f64::from(*a) * f64::from(*b))
                .sum();
            dot / denom
        })
        .collect()
}

fn norm(vector: &[f32]) -> f64 {
    vector
        .iter()
        .map(|v| f64::from(*v) * f64::from(*v))
        .sum::<f64>()
        .sqrt()
}
