//! Local sentence embeddings via fastembed (ONNX).

use super::Embedder;
use crate::config::EmbeddingSettings;
use crate::error::{EkkoError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, info, instrument};

type SharedModel = Arc<Mutex<TextEmbedding>>;

/// Loaded models, keyed by canonical model name. Lives until process exit.
static MODEL_CACHE: OnceLock<Mutex<HashMap<String, SharedModel>>> = OnceLock::new();

fn model_cache() -> &'static Mutex<HashMap<String, SharedModel>> {
    MODEL_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Sentence-embedding models Ekko knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedModel {
    AllMiniLmL6V2,
    AllMiniLmL12V2,
    BgeSmallEnV15,
    BgeBaseEnV15,
}

impl SupportedModel {
    /// Resolve a user-facing model name. Hub prefixes are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        let short = name
            .trim()
            .trim_start_matches("sentence-transformers/")
            .trim_start_matches("BAAI/")
            .to_lowercase();

        match short.as_str() {
            "all-minilm-l6-v2" => Some(SupportedModel::AllMiniLmL6V2),
            "all-minilm-l12-v2" => Some(SupportedModel::AllMiniLmL12V2),
            "bge-small-en-v1.5" => Some(SupportedModel::BgeSmallEnV15),
            "bge-base-en-v1.5" => Some(SupportedModel::BgeBaseEnV15),
            _ => None,
        }
    }

    /// Canonical name, used as the cache key.
    pub fn name(&self) -> &'static str {
        match self {
            SupportedModel::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            SupportedModel::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            SupportedModel::BgeSmallEnV15 => "bge-small-en-v1.5",
            SupportedModel::BgeBaseEnV15 => "bge-base-en-v1.5",
        }
    }

    pub fn dimensions(&self) -> usize {
        match self {
            SupportedModel::BgeBaseEnV15 => 768,
            _ => 384,
        }
    }

    fn fastembed_model(&self) -> EmbeddingModel {
        match self {
            SupportedModel::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            SupportedModel::AllMiniLmL12V2 => EmbeddingModel::AllMiniLML12V2,
            SupportedModel::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
            SupportedModel::BgeBaseEnV15 => EmbeddingModel::BGEBaseENV15,
        }
    }
}

/// Embedder backed by a locally run ONNX sentence-embedding model.
#[derive(Clone)]
pub struct LocalEmbedder {
    model: SharedModel,
    kind: SupportedModel,
}

impl std::fmt::Debug for LocalEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalEmbedder")
            .field("model", &self.kind.name())
            .finish()
    }
}

impl LocalEmbedder {
    /// Load the configured model, reusing an already loaded instance.
    pub async fn load(settings: &EmbeddingSettings, cache_dir: Option<PathBuf>) -> Result<Self> {
        let kind = SupportedModel::from_name(&settings.model).ok_or_else(|| {
            EkkoError::ModelUnavailable(format!(
                "unknown embedding model '{}' (supported: all-MiniLM-L6-v2, all-MiniLM-L12-v2, bge-small-en-v1.5, bge-base-en-v1.5)",
                settings.model
            ))
        })?;

        if let Some(model) = Self::cached(kind)? {
            debug!("Using cached embedding model {}", kind.name());
            return Ok(Self { model, kind });
        }

        info!("Loading embedding model {}", kind.name());
        let show_progress = settings.show_download_progress;
        let model = tokio::task::spawn_blocking(move || -> Result<TextEmbedding> {
            let mut options = InitOptions::new(kind.fastembed_model())
                .with_show_download_progress(show_progress);
            if let Some(dir) = cache_dir {
                options = options.with_cache_dir(dir);
            }
            TextEmbedding::try_new(options).map_err(|e| {
                EkkoError::ModelUnavailable(format!("failed to load {}: {}", kind.name(), e))
            })
        })
        .await
        .map_err(|e| EkkoError::ModelUnavailable(format!("model loader crashed: {}", e)))??;

        let model = model_cache()
            .lock()
            .map_err(|_| EkkoError::ModelUnavailable("model cache lock poisoned".to_string()))?
            .entry(kind.name().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(model)))
            .clone();

        info!("Embedding model {} ready ({} dimensions)", kind.name(), kind.dimensions());
        Ok(Self { model, kind })
    }

    fn cached(kind: SupportedModel) -> Result<Option<SharedModel>> {
        let cache = model_cache()
            .lock()
            .map_err(|_| EkkoError::ModelUnavailable("model cache lock poisoned".to_string()))?;
        Ok(cache.get(kind.name()).cloned())
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EkkoError::ModelUnavailable("empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let model = Arc::clone(&self.model);
        let input = texts.to_vec();
        let embeddings = tokio::task::spawn_blocking(move || -> Result<Vec<Vec<f32>>> {
            let mut model = model.lock().map_err(|_| {
                EkkoError::ModelUnavailable("embedding model lock poisoned".to_string())
            })?;
            model
                .embed(input, None)
                .map_err(|e| EkkoError::ModelUnavailable(format!("embedding failed: {}", e)))
        })
        .await
        .map_err(|e| EkkoError::ModelUnavailable(format!("embedding task crashed: {}", e)))??;

        if embeddings.len() != texts.len() {
            return Err(EkkoError::ModelUnavailable(format!(
                "model returned {} embeddings for {} texts",
                embeddings.len(),
                texts.len()
            )));
        }

        debug!("Generated {} embeddings", embeddings.len());
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.kind.dimensions()
    }

    fn model_name(&self) -> &str {
        self.kind.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_names() {
        assert_eq!(
            SupportedModel::from_name("all-MiniLM-L6-v2"),
            Some(SupportedModel::AllMiniLmL6V2)
        );
        assert_eq!(
            SupportedModel::from_name("sentence-transformers/all-MiniLM-L6-v2"),
            Some(SupportedModel::AllMiniLmL6V2)
        );
        assert_eq!(
            SupportedModel::from_name("BAAI/bge-base-en-v1.5"),
            Some(SupportedModel::BgeBaseEnV15)
        );
        assert_eq!(SupportedModel::from_name("text-embedding-3-small"), None);
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(SupportedModel::AllMiniLmL6V2.dimensions(), 384);
        assert_eq!(SupportedModel::BgeBaseEnV15.dimensions(), 768);
    }

    #[tokio::test]
    async fn test_unknown_model_is_unavailable() {
        let settings = EmbeddingSettings {
            model: "no-such-model".to_string(),
            ..Default::default()
        };
        let err = LocalEmbedder::load(&settings, None).await.unwrap_err();
        assert!(matches!(err, EkkoError::ModelUnavailable(_)));
    }
}
