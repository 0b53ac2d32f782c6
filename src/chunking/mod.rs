//! Content chunking for breaking documents into searchable segments.
//!
//! Documents are split into fixed-size runs of words. Chunks never overlap
//! and ignore sentence boundaries.

use crate::error::{EkkoError, Result};

/// Default number of words per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Split `text` into chunks of `size` whitespace-separated words.
///
/// Words inside a chunk are re-joined with single spaces, so the original
/// spacing is not preserved. The last chunk holds the remainder. Empty or
/// whitespace-only text yields no chunks.
pub fn chunk_text(text: &str, size: usize) -> Result<Vec<String>> {
    if size == 0 {
        return Err(EkkoError::InvalidArgument(
            "chunk size must be greater than zero".to_string(),
        ));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    Ok(words.chunks(size).map(|group| group.join(" ")).collect())
}

/// Fixed-size word chunker.
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    size: usize,
}

impl WordChunker {
    /// Create a chunker, rejecting a zero size.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EkkoError::InvalidArgument(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { size })
    }

    /// Split text into chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .chunks(self.size)
            .map(|group| group.join(" "))
            .collect()
    }
}

impl Default for WordChunker {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_single_sentence_is_one_chunk() {
        let text = "Alice is a software engineer with 5 years of experience in backend systems.";
        let chunks = chunk_text(text, 500).unwrap();
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk_text("", 500).unwrap().is_empty());
        assert!(chunk_text("  \n\t ", 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            chunk_text("a b c", 0),
            Err(EkkoError::InvalidArgument(_))
        ));
        assert!(matches!(
            WordChunker::new(0),
            Err(EkkoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_remainder_chunk() {
        let chunks = chunk_text("one two three four five six seven", 3).unwrap();
        assert_eq!(chunks, vec!["one two three", "four five six", "seven"]);
    }

    #[test]
    fn test_whitespace_collapsed_across_lines() {
        let chunks = chunk_text("Senior  engineer\n\nRust,\tGo\r\nKubernetes", 2).unwrap();
        assert_eq!(chunks, vec!["Senior engineer", "Rust, Go", "Kubernetes"]);
    }

    #[test]
    fn test_lossless_under_normalization() {
        let text = "  The quick\tbrown fox\n jumps over\n\nthe lazy dog  again and again ";
        for size in 1..=12 {
            let chunks = chunk_text(text, size).unwrap();
            assert_eq!(chunks.join(" "), normalize(text), "size {}", size);
        }
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        let text = (0..1234).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        for size in [1, 7, 100, 500, 1234, 5000] {
            let chunks = chunk_text(&text, size).unwrap();
            assert_eq!(chunks.len(), 1234_usize.div_ceil(size), "size {}", size);
            assert!(chunks
                .iter()
                .all(|c| c.split_whitespace().count() <= size));
        }
    }

    #[test]
    fn test_word_chunker_matches_function() {
        let chunker = WordChunker::new(4).unwrap();
        let text = "a b c d e f g h i j";
        assert_eq!(chunker.chunk(text), chunk_text(text, 4).unwrap());
        let long = vec!["word"; DEFAULT_CHUNK_SIZE + 1].join(" ");
        assert_eq!(WordChunker::default().chunk(&long).len(), 2);
    }
}
