//! RAG (Retrieval-Augmented Generation) for question answering.
//!
//! Turns retrieved chunks and a question into a single prompt and hands it to
//! a hosted language model.

mod chat;
mod generator;

pub use chat::ChatCompletionModel;
pub use generator::AnswerGenerator;

use crate::error::Result;
use crate::retrieval::ScoredChunk;
use async_trait::async_trait;

/// One-shot, stateless text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a single prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logs and display.
    fn name(&self) -> &str;
}

/// A generated answer with the chunks it was grounded on.
#[derive(Debug, Clone)]
pub struct Answer {
    /// The question as asked (typed or transcribed).
    pub question: String,
    /// The model's answer.
    pub text: String,
    /// Retrieved chunks, best first.
    pub sources: Vec<ScoredChunk>,
}

impl Answer {
    /// Format the answer with its sources for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.text.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\n[chunk {}] (score: {:.2}) {}",
                    source.index + 1,
                    source.score,
                    preview(&source.content, 80)
                ));
            }
        }

        output
    }
}

/// First `max_chars` characters of `text` on one line.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
