//! Search command implementation.

use crate::chunking::chunk_text;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::document::load_document;
use crate::embedding::{Embedder, LocalEmbedder};
use crate::retrieval::{ChunkIndex, Retriever};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Run the search command.
///
/// Runs entirely locally, so no API key is needed.
pub async fn run_search(
    document: &str,
    query: &str,
    top_k: Option<usize>,
    settings: Settings,
) -> Result<()> {
    let path = Path::new(document);
    preflight::check_document(path)?;

    let doc = load_document(path)?;
    let chunks = chunk_text(&doc.text, settings.chunking.chunk_size)?;

    let spinner = Output::spinner("Loading embedding model...");
    let embedder = LocalEmbedder::load(&settings.embedding, settings.embedding_cache_dir()).await;
    spinner.finish_and_clear();
    let embedder: Arc<dyn Embedder> = Arc::new(embedder?);

    let spinner = Output::spinner(&format!("Embedding {} chunks...", chunks.len()));
    let embeddings = embedder.embed_batch(&chunks).await;
    spinner.finish_and_clear();
    let index = ChunkIndex::new(chunks, embeddings?)?;

    let k = top_k.unwrap_or(settings.retrieval.top_k);
    match Retriever::new(embedder).search(query, &index, k).await {
        Ok(results) => {
            Output::success(&format!(
                "Top {} of {} chunks in {}",
                results.len(),
                index.len(),
                doc.name
            ));
            for result in &results {
                Output::chunk_result(result.index, result.score, &result.content, 200);
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
