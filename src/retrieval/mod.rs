//! Similarity search over document chunks.
//!
//! Chunks are ranked by the inner product of their embedding with the query
//! embedding. Sentence-embedding models emit near-unit vectors, so this
//! approximates cosine similarity without normalizing.

mod index;

pub use index::ChunkIndex;

use crate::embedding::Embedder;
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default number of chunks returned by a search.
pub const DEFAULT_TOP_K: usize = 3;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// Position of the chunk in the document.
    pub index: usize,
    /// Chunk text.
    pub content: String,
    /// Inner product with the query (higher is better).
    pub score: f32,
}

/// Inner product of two vectors of equal length.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Join retrieved chunks into the context handed to the language model.
pub fn join_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Embeds queries and ranks indexed chunks against them.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn Embedder>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Return the `k` chunks most similar to `query`, best first.
    #[instrument(skip(self, index), fields(chunks = index.len()))]
    pub async fn search(&self, query: &str, index: &ChunkIndex, k: usize) -> Result<Vec<ScoredChunk>> {
        // Fail on an empty index before paying for a query embedding.
        if index.is_empty() {
            return index.rank(&[], k);
        }

        let query_embedding = self.embedder.embed(query).await?;
        let results = index.rank(&query_embedding, k)?;

        debug!(
            "Top score {:.3} over {} results",
            results.first().map(|r| r.score).unwrap_or_default(),
            results.len()
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EkkoError;
    use async_trait::async_trait;

    /// Maps a few keywords onto fixed axes.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let text = text.to_lowercase();
            Ok(vec![
                text.matches("experience").count() as f32,
                text.matches("education").count() as f32,
                text.matches("hobby").count() as f32,
            ])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn dimensions(&self) -> usize {
            3
        }

        fn model_name(&self) -> &str {
            "keywords"
        }
    }

    async fn build_index(chunks: &[&str]) -> ChunkIndex {
        let chunks: Vec<String> = chunks.iter().map(|c| c.to_string()).collect();
        let embeddings = KeywordEmbedder.embed_batch(&chunks).await.unwrap();
        ChunkIndex::new(chunks, embeddings).unwrap()
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot_product(&[], &[]), 0.0);
    }

    #[test]
    fn test_join_context() {
        let chunks = vec![
            ScoredChunk { index: 2, content: "second".to_string(), score: 0.9 },
            ScoredChunk { index: 0, content: "first".to_string(), score: 0.1 },
        ];
        assert_eq!(join_context(&chunks), "second\n\nfirst");
    }

    #[tokio::test]
    async fn test_search_returns_best_chunk() {
        let index = build_index(&[
            "My education is in physics.",
            "Ten years of experience, deep experience in backend.",
            "My hobby is climbing.",
        ])
        .await;

        let retriever = Retriever::new(Arc::new(KeywordEmbedder));
        let results = retriever
            .search("What is your experience?", &index, DEFAULT_TOP_K)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].index, 1);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_search_empty_index() {
        let retriever = Retriever::new(Arc::new(KeywordEmbedder));
        let err = retriever
            .search("anything", &ChunkIndex::default(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, EkkoError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_search_never_exceeds_k_or_len() {
        let index = build_index(&["experience", "education", "hobby", "experience hobby"]).await;
        let retriever = Retriever::new(Arc::new(KeywordEmbedder));

        for k in 1..=6 {
            let results = retriever.search("experience", &index, k).await.unwrap();
            assert_eq!(results.len(), k.min(index.len()));
        }
    }
}
