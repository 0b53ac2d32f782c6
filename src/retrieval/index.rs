//! In-memory chunk index for a single document.

use super::{dot_product, ScoredChunk};
use crate::error::{EkkoError, Result};

/// Chunks of one document paired with their embeddings.
///
/// `embeddings[i]` is the vector for `chunks[i]`.
#[derive(Debug, Clone, Default)]
pub struct ChunkIndex {
    chunks: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl ChunkIndex {
    /// Pair chunks with embeddings, rejecting mismatched lengths.
    pub fn new(chunks: Vec<String>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            return Err(EkkoError::InvalidState(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        if let Some(first) = embeddings.first() {
            if let Some(bad) = embeddings.iter().position(|e| e.len() != first.len()) {
                return Err(EkkoError::InvalidState(format!(
                    "embedding {} has {} dimensions, expected {}",
                    bad,
                    embeddings[bad].len(),
                    first.len()
                )));
            }
        }

        Ok(Self { chunks, embeddings })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Embedding width, or `None` for an empty index.
    pub fn dimensions(&self) -> Option<usize> {
        self.embeddings.first().map(|e| e.len())
    }

    /// Rank chunks against a query vector and keep the best `k`.
    ///
    /// Scores are plain inner products. Results are ordered by score
    /// descending, equal scores by ascending chunk index. `k` larger than the
    /// index is clamped.
    pub fn rank(&self, query_embedding: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(EkkoError::InvalidArgument(
                "k must be greater than zero".to_string(),
            ));
        }

        if self.is_empty() {
            return Err(EkkoError::InvalidState(
                "no chunks to search; the document is empty".to_string(),
            ));
        }

        if let Some(dims) = self.dimensions() {
            if dims != query_embedding.len() {
                return Err(EkkoError::InvalidState(format!(
                    "query has {} dimensions but chunks have {}",
                    query_embedding.len(),
                    dims
                )));
            }
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, embedding)| (i, dot_product(embedding, query_embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k.min(self.len()));

        Ok(scored
            .into_iter()
            .map(|(index, score)| ScoredChunk {
                index,
                content: self.chunks[index].clone(),
                score,
            })
            .collect())
    }
}
