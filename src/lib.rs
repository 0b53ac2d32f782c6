//! Ekko - Ask a document out loud
//!
//! Load a resume (or any text or PDF document), ask a question by voice, and
//! hear the answer spoken back in the first person.
//!
//! # Overview
//!
//! Ekko:
//! - Splits the document into fixed-size word chunks
//! - Embeds the chunks with a local sentence-embedding model
//! - Transcribes a recorded question with a hosted speech-to-text service
//! - Retrieves the most similar chunks by inner product
//! - Asks a hosted language model to answer from those chunks
//! - Synthesizes the answer with a hosted text-to-speech service
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `document` - Text and PDF loading
//! - `chunking` - Fixed-size word chunking
//! - `embedding` - Sentence embeddings
//! - `retrieval` - In-memory chunk index and top-k search
//! - `rag` - Prompt building and answer generation
//! - `voice` - Speech-to-text, text-to-speech, scoped temp audio
//! - `session` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use ekko::config::Settings;
//! use ekko::session::Session;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let mut session = Session::new(settings).await?;
//!
//!     session.load_document(std::path::Path::new("resume.pdf")).await?;
//!     let answer = session.ask("What is your experience?").await?;
//!     println!("{}", answer.text);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod rag;
pub mod retrieval;
pub mod session;
pub mod voice;

pub use error::{EkkoError, Result};
