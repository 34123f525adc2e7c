//! Mock analysis backend for deterministic testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use takenote_core::{AnalysisBackend, Error, Result, ScoredLabel};

/// Mock analysis backend with canned answers.
#[derive(Clone)]
pub struct MockAnalysisBackend {
    config: Arc<MockConfig>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    summary: String,
    entities: Vec<ScoredLabel>,
    labels: Vec<ScoredLabel>,
    /// Fixed similarity score per document; `None` scores by position.
    similarity: Option<f32>,
    latency: Duration,
    fail: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            summary: "Mock summary of the note.".to_string(),
            entities: vec![
                ScoredLabel {
                    label: "istanbul".to_string(),
                    score: 0.98,
                },
                ScoredLabel {
                    label: "acme".to_string(),
                    score: 0.91,
                },
            ],
            labels: vec![
                ScoredLabel {
                    label: "joy".to_string(),
                    score: 0.8,
                },
                ScoredLabel {
                    label: "optimism".to_string(),
                    score: 0.15,
                },
            ],
            similarity: None,
            latency: Duration::ZERO,
            fail: false,
        }
    }
}

impl MockAnalysisBackend {
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every call fails with `Error::Inference`.
    pub fn failing() -> Self {
        let mut mock = Self::new();
        Arc::make_mut(&mut mock.config).fail = true;
        mock
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).summary = summary.into();
        self
    }

    pub fn with_entities(mut self, entities: Vec<ScoredLabel>) -> Self {
        Arc::make_mut(&mut self.config).entities = entities;
        self
    }

    pub fn with_similarity(mut self, score: f32) -> Self {
        Arc::make_mut(&mut self.config).similarity = Some(score);
        self
    }

    /// Delay every call, for timeout tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = latency;
        self
    }

    /// Operations called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn enter(&self, op: &str) -> Result<()> {
        self.calls.lock().unwrap().push(op.to_string());
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
        if self.config.fail {
            return Err(Error::Inference(format!("mock {} failure", op)));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisBackend for MockAnalysisBackend {
    async fn summarize(&self, _text: &str) -> Result<(String, String)> {
        self.enter("summarize").await?;
        Ok((self.config.summary.clone(), "mock-summarizer".to_string()))
    }

    async fn extract_entities(&self, _text: &str) -> Result<(Vec<ScoredLabel>, String)> {
        self.enter("extract_entities").await?;
        Ok((self.config.entities.clone(), "mock-ner".to_string()))
    }

    async fn classify(&self, _text: &str) -> Result<(Vec<ScoredLabel>, String)> {
        self.enter("classify").await?;
        Ok((self.config.labels.clone(), "mock-classifier".to_string()))
    }

    async fn sentence_similarity(
        &self,
        _query: &str,
        documents: &[String],
    ) -> Result<(Vec<f32>, String)> {
        self.enter("sentence_similarity").await?;
        let n = documents.len();
        let scores = (0..n)
            .map(|i| {
                self.config
                    .similarity
                    .unwrap_or(1.0 - i as f32 / n.max(1) as f32)
            })
            .collect();
        Ok((scores, "mock-similarity".to_string()))
    }

    fn name(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.config.fail)
    }
}
