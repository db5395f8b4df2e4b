use serde::{Deserialize, Serialize};

/// Model every request is rerouted to when safety mode is on, regardless
/// of the user's selection.
pub const SAFETY_MODEL: &str = "llama-guard-3-8b";

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Generation parameter bundle for one completion request.
///
/// Defaults mirror the playground's input widgets: temperature 1.0,
/// 1024 max tokens, top-p 0.9, seed 42, streaming on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParameters {
    model: String,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    seed: u64,
    stop_sequence: String,
    stream: bool,
    safety_mode: bool,
    json_mode: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            max_tokens: 1024,
            top_p: 0.9,
            seed: 42,
            stop_sequence: String::new(),
            stream: true,
            safety_mode: false,
            json_mode: false,
        }
    }
}

impl GenerationParameters {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        // At least one token must be requested
        self.max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stop_sequence(mut self, stop_sequence: impl Into<String>) -> Self {
        self.stop_sequence = stop_sequence.into();
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_safety_mode(mut self, safety_mode: bool) -> Self {
        self.safety_mode = safety_mode;
        self
    }

    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The model actually sent to the service: safety mode overrides the
    /// user's selection with the fixed safety classifier.
    pub fn effective_model(&self) -> &str {
        if self.safety_mode {
            SAFETY_MODEL
        } else {
            &self.model
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The stop sequence, with empty/blank normalized to `None`.
    ///
    /// A blank stop sequence means "no stop condition" and must reach the
    /// service as an absent field, never as a literal empty string.
    pub fn stop(&self) -> Option<&str> {
        let trimmed = self.stop_sequence.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(self.stop_sequence.as_str())
        }
    }

    pub fn stream(&self) -> bool {
        self.stream
    }

    pub fn safety_mode(&self) -> bool {
        self.safety_mode
    }

    pub fn json_mode(&self) -> bool {
        self.json_mode
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!("model={}", self.effective_model())];
        parts.push(format!("temperature={:.1}", self.temperature));
        parts.push(format!("max_tokens={}", self.max_tokens));
        parts.push(format!("top_p={:.2}", self.top_p));
        parts.push(format!("seed={}", self.seed));

        if let Some(stop) = self.stop() {
            parts.push(format!("stop={:?}", stop));
        }
        if self.stream {
            parts.push("stream".to_string());
        }
        if self.safety_mode {
            parts.push("safety_mode".to_string());
        }
        if self.json_mode {
            parts.push("json_mode".to_string());
        }

        parts.join(", ")
    }
}
