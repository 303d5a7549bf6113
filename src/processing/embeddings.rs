//! Semantic similarity scoring with static sentence embeddings (Model2Vec)

use crate::error::{Result, ScreenerError};
use log::{debug, info, warn};
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OnceCell;

/// A pretrained text -> fixed-size vector function
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn model_name(&self) -> &str;
}

/// Model2Vec static embedding model
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load from a local model directory (tokenizer.json, model.safetensors, config.json).
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        if !model_path.is_dir() {
            return Err(ScreenerError::ModelNotFound(format!(
                "No model directory at {}",
                model_path.display()
            )));
        }

        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ScreenerError::ModelLoading(format!("Failed to load model: {}", e)))?;

        info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.model.encode_single(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Where the scorer gets its model from on first use
enum ModelSource {
    Path { path: PathBuf, name: String },
    Preloaded,
}

/// Scores semantic fit between two texts on a 0-100 scale.
///
/// The embedding model is loaded lazily on the first non-degenerate call and
/// at most once for the scorer's lifetime; concurrent first calls wait on the
/// same load.
pub struct SemanticScorer {
    source: ModelSource,
    embedder: OnceCell<Arc<dyn Embedder>>,
}

impl SemanticScorer {
    /// Scorer that loads a Model2Vec model from `model_path` on first use.
    pub fn lazy(model_path: PathBuf, model_name: impl Into<String>) -> Self {
        Self {
            source: ModelSource::Path {
                path: model_path,
                name: model_name.into(),
            },
            embedder: OnceCell::new(),
        }
    }

    /// Scorer around an already loaded embedder.
    pub fn with_embedder(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            source: ModelSource::Preloaded,
            embedder: OnceCell::new_with(Some(embedder)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.embedder.initialized()
    }

    /// The shared embedder, loading it if this is the first use.
    pub async fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        let embedder = self.embedder.get_or_try_init(|| self.load_embedder()).await?;
        Ok(Arc::clone(embedder))
    }

    async fn load_embedder(&self) -> Result<Arc<dyn Embedder>> {
        let (path, name) = match &self.source {
            ModelSource::Path { path, name } => (path.clone(), name.clone()),
            ModelSource::Preloaded => {
                return Err(ScreenerError::ModelLoading(
                    "No embedding model configured".to_string(),
                ))
            }
        };

        let loaded = tokio::task::spawn_blocking(move || Model2VecEmbedder::load(&path, &name))
            .await
            .map_err(|e| ScreenerError::ModelLoading(format!("Model loading task failed: {}", e)))??;

        Ok(Arc::new(loaded))
    }

    /// Semantic fit of two texts in [0, 100], two decimals.
    ///
    /// Returns 0.0 without touching the model when either text is empty.
    /// A text with no token the model knows embeds to the zero vector. Its
    /// cosine similarity is taken as 0, so such a pair scores 50.
    pub async fn score(&self, text_a: &str, text_b: &str) -> Result<f64> {
        if text_a.is_empty() || text_b.is_empty() {
            return Ok(0.0);
        }

        let embedder = self.embedder().await?;
        let text_a = text_a.to_string();
        let text_b = text_b.to_string();

        let similarity = tokio::task::spawn_blocking(move || -> Result<f32> {
            let a = unit_vector(embedder.encode(&text_a)?);
            let b = unit_vector(embedder.encode(&text_b)?);
            if is_zero_vector(&a) || is_zero_vector(&b) {
                warn!("A text has no tokens known to the embedding model; scoring it as unrelated (50)");
            }
            cosine_similarity(&a, &b)
        })
        .await
        .map_err(|e| ScreenerError::Embedding(format!("Embedding task failed: {}", e)))??;

        let score = similarity_to_score(similarity);
        debug!("Cosine similarity {:.4} -> score {:.2}", similarity, score);
        Ok(score)
    }
}

/// Map a cosine similarity in [-1, 1] to a [0, 100] score, rounded to 2 decimals.
pub fn similarity_to_score(similarity: f32) -> f64 {
    let score = ((f64::from(similarity) + 1.0) * 50.0).clamp(0.0, 100.0);
    (score * 100.0).round() / 100.0
}

fn is_zero_vector(v: &[f32]) -> bool {
    v.iter().all(|x| *x == 0.0)
}

/// Scale to unit L2 norm; the zero vector is returned unchanged
pub fn unit_vector(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    v
}

/// Cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScreenerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Hashed bag-of-words embedder, deterministic and model-free
    pub struct BagOfWordsEmbedder {
        dimensions: usize,
        pub calls: AtomicUsize,
    }

    impl BagOfWordsEmbedder {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Embedder for BagOfWordsEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut vector = vec![0.0f32; self.dimensions];
            for word in text.to_lowercase().split_whitespace() {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                vector[(hasher.finish() as usize) % self.dimensions] += 1.0;
            }
            Ok(vector)
        }

        fn model_name(&self) -> &str {
            "bag-of-words"
        }
    }

    /// Returns a fixed vector per text
    pub struct FixedEmbedder(pub Vec<(String, Vec<f32>)>);

    impl Embedder for FixedEmbedder {
        fn encode(&self, text: &str) -> Result<Vec<f32>> {
            self.0
                .iter()
                .find(|(t, _)| t == text)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| ScreenerError::Embedding(format!("no vector for '{}'", text)))
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }
}
