//! Hugging Face Inference API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use takenote_core::defaults::{
    CATEGORY_LIMIT, SUMMARY_MAX_TOKENS, SUMMARY_MIN_OUTPUT_CHARS, SUMMARY_MIN_TOKENS,
};
use takenote_core::{AnalysisBackend, Error, Result, ScoredLabel};

use crate::config::HuggingFaceConfig;

/// Calls slower than this are logged at WARN.
const SLOW_CALL_MS: u128 = 5_000;

/// Timeout for the health probe (seconds).
const HEALTH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    #[serde(default)]
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct EntityOutput {
    #[serde(default)]
    entity_group: Option<String>,
    #[serde(default)]
    word: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct LabelOutput {
    label: String,
    #[serde(default)]
    score: f32,
}

/// Text classification responses come back either per-input nested or flat.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyOutput {
    Nested(Vec<Vec<LabelOutput>>),
    Flat(Vec<LabelOutput>),
}

impl ClassifyOutput {
    fn into_labels(self) -> Vec<LabelOutput> {
        match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(labels) => labels,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SimilarityOutput {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

impl SimilarityOutput {
    fn into_scores(self) -> Vec<f32> {
        match self {
            Self::Flat(scores) => scores,
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Hugging Face Inference API backend.
pub struct HuggingFaceBackend {
    client: Client,
    config: HuggingFaceConfig,
}

impl HuggingFaceBackend {
    /// Create a backend with the given configuration.
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Hugging Face backend: url={}, summary={:?}, classify={}",
            config.base_url, config.summary_models, config.classify_model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(HuggingFaceConfig::from_env())
    }

    pub fn config(&self) -> &HuggingFaceConfig {
        &self.config
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), model)
    }

    /// POST `payload` to a model endpoint and decode the JSON answer.
    async fn post<T: DeserializeOwned>(&self, model: &str, payload: &Value) -> Result<T> {
        let start = Instant::now();

        let mut request = self.client.post(self.model_url(model)).json(payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "{} returned {}: {}",
                model, status, body
            )));
        }

        let decoded = response
            .json::<T>()
            .await
            .map_err(|e| Error::Inference(format!("Invalid response from {}: {}", model, e)))?;

        let elapsed = start.elapsed().as_millis();
        if elapsed > SLOW_CALL_MS {
            warn!(model, duration_ms = elapsed as u64, slow = true, "Slow model call");
        } else {
            debug!(model, duration_ms = elapsed as u64, "Model call completed");
        }

        Ok(decoded)
    }

    fn exhausted(op: &str, last: Option<Error>) -> Error {
        last.unwrap_or_else(|| Error::Inference(format!("No model produced a usable {}", op)))
    }
}

#[async_trait]
impl AnalysisBackend for HuggingFaceBackend {
    #[instrument(skip(self, text), fields(subsystem = "inference", component = "huggingface", op = "summarize", input_len = text.len()))]
    async fn summarize(&self, text: &str) -> Result<(String, String)> {
        let payload = json!({
            "inputs": text,
            "parameters": {
                "max_length": SUMMARY_MAX_TOKENS,
                "min_length": SUMMARY_MIN_TOKENS,
                "do_sample": false
            }
        });

        let mut last_err = None;
        for model in &self.config.summary_models {
            match self.post::<Vec<SummaryOutput>>(model, &payload).await {
                Ok(outputs) => {
                    let summary = outputs
                        .into_iter()
                        .next()
                        .map(|o| o.summary_text.trim().to_string())
                        .unwrap_or_default();
                    if summary.chars().count() > SUMMARY_MIN_OUTPUT_CHARS {
                        return Ok((summary, model.clone()));
                    }
                    debug!(model = %model, "Summary too short, trying next model");
                }
                Err(e) => {
                    debug!(model = %model, error = %e, "Summarization model failed");
                    last_err = Some(e);
                }
            }
        }
        Err(Self::exhausted("summary", last_err))
    }

    #[instrument(skip(self, text), fields(subsystem = "inference", component = "huggingface", op = "extract_entities", input_len = text.len()))]
    async fn extract_entities(&self, text: &str) -> Result<(Vec<ScoredLabel>, String)> {
        let payload = json!({
            "inputs": text,
            "parameters": { "aggregation_strategy": "simple" }
        });

        let mut last_err = None;
        for model in &self.config.ner_models {
            match self.post::<Vec<EntityOutput>>(model, &payload).await {
                Ok(outputs) => {
                    let entities: Vec<ScoredLabel> = outputs
                        .into_iter()
                        .filter(|e| e.entity_group.is_some())
                        .filter_map(|e| {
                            let word = e.word.trim();
                            (word.chars().count() > 2 && word.chars().all(char::is_alphabetic))
                                .then(|| ScoredLabel {
                                    label: word.to_lowercase(),
                                    score: e.score,
                                })
                        })
                        .collect();
                    if !entities.is_empty() {
                        return Ok((entities, model.clone()));
                    }
                    debug!(model = %model, "No usable entities, trying next model");
                }
                Err(e) => {
                    debug!(model = %model, error = %e, "NER model failed");
                    last_err = Some(e);
                }
            }
        }
        Err(Self::exhausted("entity list", last_err))
    }

    #[instrument(skip(self, text), fields(subsystem = "inference", component = "huggingface", op = "classify", model = %self.config.classify_model, input_len = text.len()))]
    async fn classify(&self, text: &str) -> Result<(Vec<ScoredLabel>, String)> {
        let payload = json!({
            "inputs": text,
            "parameters": { "top_k": CATEGORY_LIMIT }
        });

        let model = &self.config.classify_model;
        let output: ClassifyOutput = self.post(model, &payload).await?;

        let mut labels: Vec<ScoredLabel> = output
            .into_labels()
            .into_iter()
            .map(|l| ScoredLabel {
                label: l.label,
                score: l.score,
            })
            .collect();
        if labels.is_empty() {
            return Err(Error::Inference(format!("{} returned no labels", model)));
        }
        labels.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ok((labels, model.clone()))
    }

    #[instrument(skip(self, query, documents), fields(subsystem = "inference", component = "huggingface", op = "sentence_similarity", doc_count = documents.len()))]
    async fn sentence_similarity(
        &self,
        query: &str,
        documents: &[String],
    ) -> Result<(Vec<f32>, String)> {
        if documents.is_empty() {
            return Err(Error::InvalidInput(
                "sentence similarity needs at least one document".to_string(),
            ));
        }

        let payload = json!({
            "inputs": {
                "source_sentence": query,
                "sentences": documents
            }
        });

        let mut last_err = None;
        for model in &self.config.similarity_models {
            match self.post::<SimilarityOutput>(model, &payload).await {
                Ok(output) => {
                    let scores = output.into_scores();
                    if scores.len() == documents.len() {
                        return Ok((scores, model.clone()));
                    }
                    let e = Error::Inference(format!(
                        "{} returned {} scores for {} documents",
                        model,
                        scores.len(),
                        documents.len()
                    ));
                    debug!(model = %model, error = %e, "Similarity model misaligned");
                    last_err = Some(e);
                }
                Err(e) => {
                    debug!(model = %model, error = %e, "Similarity model failed");
                    last_err = Some(e);
                }
            }
        }
        Err(Self::exhausted("similarity", last_err))
    }

    fn name(&self) -> &str {
        "huggingface"
    }

    async fn health_check(&self) -> Result<bool> {
        let Some(model) = self.config.summary_models.first() else {
            return Ok(false);
        };

        let mut request = self
            .client
            .get(self.model_url(model))
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS));
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Hugging Face health check passed");
                Ok(true)
            }
            Ok(resp) => {
                warn!("Hugging Face health check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Hugging Face health check error: {}", e);
                Ok(false)
            }
        }
    }
}
