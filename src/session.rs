//! Pipeline coordination for Ekko.
//!
//! A session owns the services and the index of the currently loaded
//! document. Each user action runs to completion; any error ends that action
//! and leaves the session ready for the next one.

use crate::chunking::WordChunker;
use crate::config::{Prompts, Settings};
use crate::document::{load_document, Document};
use crate::embedding::{Embedder, LocalEmbedder};
use crate::error::{EkkoError, Result};
use crate::openai::HostedApi;
use crate::rag::{Answer, AnswerGenerator, ChatCompletionModel, LanguageModel};
use crate::retrieval::{join_context, ChunkIndex, Retriever, ScoredChunk};
use crate::voice::{
    HostedSynthesizer, HostedTranscriber, SpeechToText, SynthesizedAudio, TempAudioFile,
    TextToSpeech,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// The currently loaded document and its index.
struct LoadedDocument {
    document: Document,
    index: ChunkIndex,
}

/// Summary of an indexed document.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSummary {
    pub name: String,
    pub words: usize,
    pub chunks: usize,
}

/// One spoken question and its spoken answer.
#[derive(Debug, Clone)]
pub struct SpokenTurn {
    pub answer: Answer,
    pub reply: SynthesizedAudio,
}

/// The main session for the Ekko pipeline.
pub struct Session {
    settings: Settings,
    chunker: WordChunker,
    embedder: Arc<dyn Embedder>,
    retriever: Retriever,
    generator: AnswerGenerator,
    transcriber: Arc<dyn SpeechToText>,
    synthesizer: Arc<dyn TextToSpeech>,
    temp_dir: PathBuf,
    loaded: Option<LoadedDocument>,
}

impl Session {
    /// Create a session with hosted services and the local embedding model.
    ///
    /// Fails with `ModelUnavailable` if the embedding model cannot be loaded
    /// and with `Config` if the API key is missing.
    pub async fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let api = HostedApi::from_settings(&settings.llm)?;

        let model: Arc<dyn LanguageModel> = Arc::new(
            ChatCompletionModel::new(api.clone(), &settings.llm.model)
                .with_temperature(settings.llm.temperature),
        );
        let transcriber: Arc<dyn SpeechToText> =
            Arc::new(HostedTranscriber::from_settings(api.clone(), &settings.speech));
        let synthesizer: Arc<dyn TextToSpeech> =
            Arc::new(HostedSynthesizer::from_settings(api, &settings.speech));

        let embedder: Arc<dyn Embedder> = Arc::new(
            LocalEmbedder::load(&settings.embedding, settings.embedding_cache_dir()).await?,
        );

        Self::with_components(settings, prompts, embedder, transcriber, model, synthesizer)
    }

    /// Create a session with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        transcriber: Arc<dyn SpeechToText>,
        model: Arc<dyn LanguageModel>,
        synthesizer: Arc<dyn TextToSpeech>,
    ) -> Result<Self> {
        let chunker = WordChunker::new(settings.chunking.chunk_size)?;
        let generator = AnswerGenerator::new(model)
            .with_prompts(prompts)
            .with_document_kind(&settings.prompts.document_kind);
        let temp_dir = settings.temp_dir();

        Ok(Self {
            chunker,
            retriever: Retriever::new(embedder.clone()),
            embedder,
            generator,
            transcriber,
            synthesizer,
            temp_dir,
            settings,
            loaded: None,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a reference to the embedder.
    pub fn embedder(&self) -> Arc<dyn Embedder> {
        self.embedder.clone()
    }

    /// Name of the loaded document, if any.
    pub fn document_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.document.name.as_str())
    }

    /// Load a document from disk, replacing the current one.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn load_document(&mut self, path: &Path) -> Result<IndexSummary> {
        let document = load_document(path)?;
        self.index_document(document).await
    }

    /// Load a document from in-memory text, replacing the current one.
    pub async fn load_text(&mut self, name: &str, text: &str) -> Result<IndexSummary> {
        self.index_document(Document::from_text(name, text)).await
    }

    async fn index_document(&mut self, document: Document) -> Result<IndexSummary> {
        // Drop the old index first so a failed load never answers from it.
        self.loaded = None;

        info!("Chunking {}", document.name);
        let chunks = self.chunker.chunk(&document.text);

        info!("Embedding {} chunks", chunks.len());
        let embeddings = self.embedder.embed_batch(&chunks).await?;
        let index = ChunkIndex::new(chunks, embeddings)?;

        let summary = IndexSummary {
            name: document.name.clone(),
            words: document.word_count(),
            chunks: index.len(),
        };
        info!("Indexed {} ({} chunks)", summary.name, summary.chunks);

        self.loaded = Some(LoadedDocument { document, index });
        Ok(summary)
    }

    fn index(&self) -> Result<&ChunkIndex> {
        self.loaded
            .as_ref()
            .map(|l| &l.index)
            .ok_or_else(|| EkkoError::InvalidState("no document loaded".to_string()))
    }

    /// Retrieve the `k` chunks most relevant to `query`.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        self.retriever.search(query, self.index()?, k).await
    }

    /// Answer a typed question from the loaded document.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.ask_top_k(question, self.settings.retrieval.top_k).await
    }

    /// Answer a typed question using the `k` best chunks.
    pub async fn ask_top_k(&self, question: &str, k: usize) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(EkkoError::InvalidArgument("question is empty".to_string()));
        }

        let sources = self.search(question, k).await?;
        let context = join_context(&sources);
        let text = self.generator.generate(question, &context).await?;

        Ok(Answer {
            question: question.to_string(),
            text,
            sources,
        })
    }

    /// Transcribe a recorded question, answer it, and speak the answer.
    ///
    /// The recording lives in a temp file that is removed however this ends.
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn ask_spoken(&self, audio: &[u8]) -> Result<SpokenTurn> {
        self.ask_spoken_top_k(audio, self.settings.retrieval.top_k).await
    }

    /// Spoken question using the `k` best chunks.
    pub async fn ask_spoken_top_k(&self, audio: &[u8], k: usize) -> Result<SpokenTurn> {
        if audio.is_empty() {
            return Err(EkkoError::UnrecognizedAudio("recording is empty".to_string()));
        }
        // Nothing to answer from; skip the transcription call.
        if self.index()?.is_empty() {
            return Err(EkkoError::InvalidState(
                "document has no chunks to search".to_string(),
            ));
        }

        let recording = TempAudioFile::create_in(&self.temp_dir, audio)?;
        let question = self.transcriber.transcribe(recording.path()).await?;
        info!("Heard: {}", question);

        let answer = self.ask_top_k(&question, k).await?;
        let reply = self.synthesizer.synthesize(&answer.text).await?;

        Ok(SpokenTurn { answer, reply })
    }

    /// Render text as speech.
    pub async fn speak(&self, text: &str) -> Result<SynthesizedAudio> {
        self.synthesizer.synthesize(text).await
    }
}
