//! Embedding generation for semantic search and retrieval.

mod local;

pub use local::{LocalEmbedder, SupportedModel};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// `embed` and `embed_batch` must be backed by the same model so query and
/// chunk vectors are comparable.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the embedding dimensions.
    fn dimensions(&self) -> usize;

    /// Name of the model producing the vectors.
    fn model_name(&self) -> &str;
}
