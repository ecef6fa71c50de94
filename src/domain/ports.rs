use crate::domain::model::Coordinates;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 文字嵌入服務；相同輸入必須得到相同向量
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// 橢球面上的地面距離（公里），需對稱且非負
pub trait DistanceProvider: Send + Sync {
    fn distance_km(&self, from: Coordinates, to: Coordinates) -> Result<f64>;
}
