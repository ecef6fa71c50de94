use crate::domain::ports::EmbeddingProvider;
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

/// OpenAI 相容的 `/embeddings` 服務客戶端
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: Option<String>,
    api_key: Option<String>,
    batch_size: usize,
}

impl HttpEmbedder {
    pub const DEFAULT_BATCH_SIZE: usize = 64;

    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: None,
            api_key: None,
            batch_size: Self::DEFAULT_BATCH_SIZE,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    async fn request_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: self.model.as_deref(),
            input: texts,
        };

        tracing::debug!("POST {} with {} texts", self.endpoint, texts.len());
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PlannerError::embedding(format!(
                "{} returned {}: {}",
                self.endpoint, status, detail
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;
        if parsed.data.len() != texts.len() {
            return Err(PlannerError::embedding(format!(
                "requested {} embeddings, received {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        restore_order(parsed.data)
    }
}

/// 回應可能亂序，依 index 還原；index 必須恰好涵蓋 0..len
fn restore_order(items: Vec<EmbeddingItem>) -> Result<Vec<Vec<f32>>> {
    let mut slots: Vec<Option<Vec<f32>>> = vec![None; items.len()];

    for item in items {
        let index = item
            .index
            .ok_or_else(|| PlannerError::embedding("embedding item without index"))?;
        let slot = slots.get_mut(index).ok_or_else(|| {
            PlannerError::embedding(format!("embedding index {} out of range", index))
        })?;
        if slot.is_some() {
            return Err(PlannerError::embedding(format!(
                "duplicate embedding index {}",
                index
            )));
        }
        *slot = Some(item.embedding);
    }

    // 長度相同且無重複，每個位置必定已填
    Ok(slots.into_iter().flatten().collect())
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text.to_string()];
        self.embed_batch(&texts)
            .await?
            .pop()
            .ok_or_else(|| PlannerError::embedding("empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.batch_size) {
            vectors.extend(self.request_batch(chunk).await?);
        }
        Ok(vectors)
    }
}
