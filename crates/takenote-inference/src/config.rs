//! Hugging Face backend configuration.

use std::env;
use std::fmt;

use takenote_core::defaults;

/// Settings for [`crate::HuggingFaceBackend`].
///
/// Every model list is tried in order until one returns a usable answer.
#[derive(Clone)]
pub struct HuggingFaceConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub summary_models: Vec<String>,
    pub ner_models: Vec<String>,
    pub classify_model: String,
    pub similarity_models: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::HF_BASE_URL.to_string(),
            api_key: None,
            summary_models: to_owned_list(defaults::HF_SUMMARY_MODELS),
            ner_models: to_owned_list(defaults::HF_NER_MODELS),
            classify_model: defaults::HF_CLASSIFY_MODEL.to_string(),
            similarity_models: to_owned_list(defaults::HF_SIMILARITY_MODELS),
            timeout_secs: defaults::AI_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("summary_models", &self.summary_models)
            .field("ner_models", &self.ner_models)
            .field("classify_model", &self.classify_model)
            .field("similarity_models", &self.similarity_models)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HuggingFaceConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// | Variable | Meaning |
    /// |----------|---------|
    /// | `HF_BASE_URL` | Inference API base URL |
    /// | `HUGGINGFACE_API_KEY` | Bearer token (optional) |
    /// | `HF_SUMMARY_MODELS` | Comma-separated summarization models |
    /// | `HF_NER_MODELS` | Comma-separated NER models |
    /// | `HF_CLASSIFY_MODEL` | Classification model |
    /// | `HF_SIMILARITY_MODELS` | Comma-separated sentence-similarity models |
    /// | `AI_TIMEOUT_SECS` | Per-request timeout |
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            base_url: env::var("HF_BASE_URL").unwrap_or(base.base_url),
            api_key: env::var("HUGGINGFACE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            summary_models: env_list("HF_SUMMARY_MODELS").unwrap_or(base.summary_models),
            ner_models: env_list("HF_NER_MODELS").unwrap_or(base.ner_models),
            classify_model: env::var("HF_CLASSIFY_MODEL")
                .ok()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(base.classify_model),
            similarity_models: env_list("HF_SIMILARITY_MODELS").unwrap_or(base.similarity_models),
            timeout_secs: env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.timeout_secs),
        }
    }
}

fn to_owned_list(models: &[&str]) -> Vec<String> {
    models.iter().map(|m| m.to_string()).collect()
}

fn env_list(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().and_then(|raw| parse_model_list(&raw))
}

/// Parse a comma-separated model list. `None` when no entry survives trimming.
pub(crate) fn parse_model_list(raw: &str) -> Option<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect();
    (!models.is_empty()).then_some(models)
}
