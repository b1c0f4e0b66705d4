//! Qdrant-backed document store
//!
//! Embeds the query text, then runs a points search against one collection.
//! Passage text and source locators live in the point payload.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{DomainError, DocumentStore, EmbeddingProvider, ScoredPassage};
use crate::infrastructure::http::HttpClientTrait;

/// Document store backed by a Qdrant collection
#[derive(Debug)]
pub struct QdrantDocumentStore<C, E>
where
    C: HttpClientTrait,
    E: EmbeddingProvider,
{
    client: C,
    embedder: Arc<E>,
    base_url: String,
    collection: String,
}

impl<C, E> QdrantDocumentStore<C, E>
where
    C: HttpClientTrait,
    E: EmbeddingProvider,
{
    pub fn new(
        client: C,
        embedder: Arc<E>,
        base_url: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            client,
            embedder,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        )
    }
}

#[derive(Debug, Deserialize)]
struct QdrantSearchResponse {
    result: Vec<QdrantHit>,
}

#[derive(Debug, Deserialize)]
struct QdrantHit {
    score: f32,
    payload: Option<QdrantPayload>,
}

#[derive(Debug, Deserialize)]
struct QdrantPayload {
    #[serde(alias = "page_content")]
    content: String,
    #[serde(default)]
    source: Option<String>,
}

#[async_trait]
impl<C, E> DocumentStore for QdrantDocumentStore<C, E>
where
    C: HttpClientTrait,
    E: EmbeddingProvider,
{
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, DomainError> {
        let vector = self.embedder.embed(query).await?;

        let body = serde_json::json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        });

        let headers = vec![("Content-Type", "application/json")];
        let json = self
            .client
            .post_json(&self.search_url(), headers, &body)
            .await
            .map_err(|e| DomainError::document_store(e.to_string()))?;

        let response: QdrantSearchResponse = serde_json::from_value(json)
            .map_err(|e| DomainError::document_store(format!("Unexpected response: {}", e)))?;

        debug!(
            "Qdrant returned {} hits for collection {}",
            response.result.len(),
            self.collection
        );

        let passages = response
            .result
            .into_iter()
            .filter_map(|hit| {
                hit.payload.map(|payload| {
                    ScoredPassage::new(
                        payload.content,
                        payload.source.unwrap_or_else(|| "unknown".to_string()),
                        hit.score,
                    )
                })
            })
            .collect();

        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::infrastructure::http::MockHttpClient;

    const TEST_URL: &str = "http://localhost:6333/collections/physio-corpus/points/search";

    fn embedder() -> Arc<MockEmbeddingProvider> {
        Arc::new(MockEmbeddingProvider::new(vec![0.1, 0.2]))
    }

    #[tokio::test]
    async fn test_similarity_search_maps_payloads() {
        let mock_response = serde_json::json!({
            "result": [
                {
                    "id": 1,
                    "score": 0.91,
                    "payload": {"content": "SLR reproduces radicular pain", "source": "magee.pdf"}
                },
                {
                    "id": 2,
                    "score": 0.84,
                    "payload": {"page_content": "Lumbar flexion restricted", "source": "norkin.pdf"}
                }
            ]
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let store =
            QdrantDocumentStore::new(client, embedder(), "http://localhost:6333", "physio-corpus");

        let results = store.similarity_search("slr test", 3).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].passage.content, "SLR reproduces radicular pain");
        assert_eq!(results[0].passage.source, "magee.pdf");
        assert_eq!(results[1].passage.content, "Lumbar flexion restricted");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_similarity_search_skips_payloadless_hits() {
        let mock_response = serde_json::json!({
            "result": [
                {"id": 1, "score": 0.9, "payload": null},
                {"id": 2, "score": 0.8, "payload": {"content": "kept", "source": "s.pdf"}}
            ]
        });

        let client = MockHttpClient::new().with_response(TEST_URL, mock_response);
        let store =
            QdrantDocumentStore::new(client, embedder(), "http://localhost:6333", "physio-corpus");

        let results = store.similarity_search("query", 3).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].passage.content, "kept");
    }

    #[tokio::test]
    async fn test_transport_error_is_store_error() {
        let client = MockHttpClient::new().with_error(TEST_URL, "connection refused");
        let store =
            QdrantDocumentStore::new(client, embedder(), "http://localhost:6333", "physio-corpus");

        let result = store.similarity_search("query", 3).await;
        assert!(matches!(result, Err(DomainError::DocumentStore(_))));
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let client = MockHttpClient::new();
        let embedder = Arc::new(MockEmbeddingProvider::new(vec![]).with_error("quota"));
        let store =
            QdrantDocumentStore::new(client, embedder, "http://localhost:6333", "physio-corpus");

        assert!(store.similarity_search("query", 3).await.is_err());
    }
}
