use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix that marks a reply as an error rather than generated content
pub const ERROR_PREFIX: &str = "❌";

/// Fallback text when the backend answers 200 without a `response` field
pub const NO_RESPONSE: &str = "No response generated";

/// A model identifier as reported by the inference backend
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelDescriptor(pub String);

impl ModelDescriptor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelDescriptor {
    fn from(s: &str) -> Self {
        ModelDescriptor(s.to_string())
    }
}

/// Whether the inference backend was found on the last probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    /// No probe has run yet
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Failure kinds at the inference client boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    /// Backend not available or no active model selected
    NotConfigured,
    /// Requested model is not in the last-known descriptor set
    UnknownModel(String),
    /// Backend answered with a non-200 status
    Status(u16),
    /// Timeout, refused connection or any other transport failure
    Network(String),
    /// Response body did not match the expected shape
    Parse(String),
}

impl InferenceError {
    /// Text shown to the chat user, always carrying [`ERROR_PREFIX`]
    pub fn user_message(&self) -> String {
        match self {
            InferenceError::NotConfigured => format!(
                "{} Ollama is not properly configured or no models available",
                ERROR_PREFIX
            ),
            InferenceError::UnknownModel(name) => format!(
                "{} Model '{}' not found. Use /models to see available options.",
                ERROR_PREFIX, name
            ),
            InferenceError::Status(code) => {
                format!("{} Error generating response: HTTP {}", ERROR_PREFIX, code)
            }
            InferenceError::Network(e) => format!("{} Connection error: {}", ERROR_PREFIX, e),
            InferenceError::Parse(e) => format!("{} Unexpected error: {}", ERROR_PREFIX, e),
        }
    }
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::NotConfigured => write!(f, "inference backend not configured"),
            InferenceError::UnknownModel(name) => write!(f, "unknown model: {}", name),
            InferenceError::Status(code) => write!(f, "[HTTP {}] request rejected", code),
            InferenceError::Network(e) => write!(f, "network error: {}", e),
            InferenceError::Parse(e) => write!(f, "malformed response: {}", e),
        }
    }
}

impl std::error::Error for InferenceError {}

impl From<reqwest::Error> for InferenceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            InferenceError::Parse(e.to_string())
        } else {
            InferenceError::Network(e.to_string())
        }
    }
}

// ============================================================================
// Wire types for the Ollama HTTP API
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_prefixed() {
        let errors = [
            InferenceError::NotConfigured,
            InferenceError::UnknownModel("phi".to_string()),
            InferenceError::Status(500),
            InferenceError::Network("connection refused".to_string()),
            InferenceError::Parse("expected value".to_string()),
        ];
        for err in errors {
            assert!(err.user_message().starts_with(ERROR_PREFIX), "{:?}", err);
        }
    }

    #[test]
    fn test_status_message_embeds_code() {
        assert_eq!(
            InferenceError::Status(404).user_message(),
            "❌ Error generating response: HTTP 404"
        );
    }

    #[test]
    fn test_tags_response_parsing() {
        let parsed: TagsResponse = serde_json::from_str(
            r#"{"models": [{"name": "llama3", "size": 1}, {"name": "mistral"}]}"#,
        )
        .unwrap();
        let names: Vec<_> = parsed.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["llama3", "mistral"]);

        let empty: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.models.is_empty());

        // Entries without a name are a schema violation
        assert!(serde_json::from_str::<TagsResponse>(r#"{"models": [{"size": 1}]}"#).is_err());
    }

    #[test]
    fn test_generate_request_shape() {
        let body = serde_json::to_value(GenerateRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model": "llama3", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn test_generate_response_missing_field() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.response.is_none());
    }
}
