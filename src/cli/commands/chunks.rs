//! Chunks command implementation.

use crate::chunking::chunk_text;
use crate::cli::preflight;
use crate::cli::Output;
use crate::config::Settings;
use crate::document::load_document;
use anyhow::Result;
use std::path::Path;

/// Print a document's chunks.
pub fn run_chunks(document: &str, size: Option<usize>, settings: &Settings) -> Result<()> {
    let path = Path::new(document);
    preflight::check_document(path)?;

    let doc = load_document(path)?;
    let size = size.unwrap_or(settings.chunking.chunk_size);
    let chunks = chunk_text(&doc.text, size)?;

    if chunks.is_empty() {
        Output::warning(&format!("{} contains no text.", doc.name));
        return Ok(());
    }

    Output::header(&format!("{} ({})", doc.name, doc.format));
    Output::kv("Words", &doc.word_count().to_string());
    Output::kv("Chunk size", &size.to_string());
    Output::kv("Chunks", &chunks.len().to_string());

    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "\n--- chunk {} ({} words) ---\n{}",
            i + 1,
            chunk.split_whitespace().count(),
            chunk
        );
    }

    Ok(())
}
