//! Wire types for the daemon's generation endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a `POST /api/generate` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

impl GenerateRequest {
    /// Build a streaming request with no sampling overrides.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: true,
            temperature: None,
            options: None,
        }
    }

    /// Set the sampling temperature.
    ///
    /// The value is mirrored into `options.temperature`, the key the daemon reads.
    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        if let Some(value) = temperature {
            self.options
                .get_or_insert_with(Map::new)
                .insert("temperature".to_string(), Value::from(value));
        }
        self
    }

    /// Copy of this request with the stream flag replaced.
    pub fn streaming(&self, stream: bool) -> Self {
        Self {
            stream,
            ..self.clone()
        }
    }
}

/// A whole response or one streamed chunk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub context: Option<Vec<i64>>,
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub load_duration: Option<u64>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
    #[serde(default)]
    pub eval_duration: Option<u64>,
    /// Set by the daemon when generation fails mid-stream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_omits_unset_temperature() {
        let request = GenerateRequest::new("llama3.2:3b", "hi").streaming(false);
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            value,
            json!({ "model": "llama3.2:3b", "prompt": "hi", "stream": false })
        );
    }

    #[test]
    fn temperature_is_mirrored_into_options() {
        let request = GenerateRequest::new("llama3.2:3b", "hi").with_temperature(Some(0.5));
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["temperature"], json!(0.5));
        assert_eq!(value["options"], json!({ "temperature": 0.5 }));
    }

    #[test]
    fn response_ignores_unknown_fields() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"model":"m","response":"hey","done":true,"done_reason":"stop","eval_count":3}"#,
        )
        .expect("decode");
        assert_eq!(response.response, "hey");
        assert!(response.done);
        assert_eq!(response.eval_count, Some(3));
    }
}
