use serde::{Deserialize, Serialize};

/// The selectable model ids, in display order.
///
/// Ids are opaque strings validated only by the remote service; the
/// catalog exists for display and selection, not for local validation.
const DEFAULT_MODELS: &[&str] = &[
    "deepseek-r1-distill-llama-70b",
    "distil-whisper-large-v3-en",
    "gemma2-9b-it",
    "llama-3.3-70b-versatile",
    "llama-3.1-8b-instant",
    "llama-guard-3-8b",
    "llama3-70b-8192",
    "llama3-8b-8192",
    "mixtral-8x7b-32768",
    "whisper-large-v3",
    "whisper-large-v3-turbo",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalog {
    models: Vec<String>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl ModelCatalog {
    pub fn new(models: Vec<String>) -> Self {
        Self { models }
    }

    /// Build the catalog from a comma-separated id list, falling back to
    /// the default set when the list is empty or blank.
    pub fn from_list(list: &str) -> Self {
        let models: Vec<String> = list
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();

        if models.is_empty() {
            Self::default()
        } else {
            Self { models }
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn contains(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
