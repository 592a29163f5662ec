use crate::ai::types::{
    Availability, GenerateRequest, GenerateResponse, InferenceError, ModelDescriptor,
    TagsResponse, NO_RESPONSE,
};
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use std::io;
use std::time::Duration;
use tokio::process::Command;

/// Bound on the `--version` probe and on model discovery
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Generation is slow on local hardware
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Default)]
struct BackendState {
    availability: Availability,
    models: Vec<ModelDescriptor>,
    active: Option<ModelDescriptor>,
}

/// Client for a local Ollama server.
///
/// Owns the availability flag, the last-known descriptor set and the active model.
/// None of its operations raise past this type: discovery degrades to `false` or an
/// empty set, and generation returns an [`InferenceError`] the caller can render.
pub struct OllamaClient {
    client: Client,
    base_url: String,
    binary: String,
    state: RwLock<BackendState>,
}

impl OllamaClient {
    pub fn new(base_url: &str, binary: &str) -> Self {
        Self {
            client: crate::http::shared_client().clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            binary: binary.to_string(),
            state: RwLock::new(BackendState::default()),
        }
    }

    pub fn availability(&self) -> Availability {
        self.state.read().availability
    }

    /// Last-known descriptor set, in the order the backend reported it
    pub fn models(&self) -> Vec<ModelDescriptor> {
        self.state.read().models.clone()
    }

    pub fn active_model(&self) -> Option<ModelDescriptor> {
        self.state.read().active.clone()
    }

    /// True when a generation request would actually be sent
    pub fn is_ready(&self) -> bool {
        let state = self.state.read();
        state.availability.is_available() && state.active.is_some()
    }

    /// Run `<binary> --version` and record the outcome
    pub async fn check_availability(&self) -> bool {
        let probe = Command::new(&self.binary)
            .arg("--version")
            .kill_on_drop(true)
            .output();

        let available = match tokio::time::timeout(DISCOVERY_TIMEOUT, probe).await {
            Ok(Ok(output)) if output.status.success() => {
                log::info!(
                    "Ollama version: {}",
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                true
            }
            Ok(Ok(output)) => {
                log::error!("Ollama command failed ({})", output.status);
                false
            }
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::error!("Ollama not found in PATH ({})", self.binary);
                false
            }
            Ok(Err(e)) => {
                log::error!("Error checking Ollama installation: {}", e);
                false
            }
            Err(_) => {
                log::error!("Ollama command timed out");
                false
            }
        };

        self.state.write().availability = if available {
            Availability::Available
        } else {
            Availability::Unavailable
        };
        available
    }

    /// Refresh the descriptor set from `/api/tags`.
    ///
    /// A non-empty result also makes its first model the active one. Failures
    /// leave the previous set in place and return an empty one.
    pub async fn list_models(&self) -> Vec<ModelDescriptor> {
        let models = match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                log::error!("Failed to get models: {}", e);
                return Vec::new();
            }
        };

        log::info!(
            "Available models: {:?}",
            models.iter().map(|m| m.as_str()).collect::<Vec<_>>()
        );

        let mut state = self.state.write();
        state.models = models.clone();
        match models.first() {
            Some(first) => {
                state.active = Some(first.clone());
                log::info!("Default model set to: {}", first);
            }
            None => log::warn!("No models found"),
        }

        models
    }

    async fn fetch_models(&self) -> Result<Vec<ModelDescriptor>, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(DISCOVERY_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(InferenceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let tags: TagsResponse =
            serde_json::from_str(&body).map_err(|e| InferenceError::Parse(e.to_string()))?;

        Ok(tags
            .models
            .into_iter()
            .map(|m| ModelDescriptor(m.name))
            .collect())
    }

    /// Make `name` the active model. It must be in the last-known descriptor set.
    pub fn select_model(&self, name: &str) -> Result<ModelDescriptor, InferenceError> {
        let mut state = self.state.write();
        let model = state
            .models
            .iter()
            .find(|m| m.as_str() == name)
            .cloned()
            .ok_or_else(|| InferenceError::UnknownModel(name.to_string()))?;

        state.active = Some(model.clone());
        log::info!("Active model switched to: {}", model);
        Ok(model)
    }

    /// The requested model when it is known, else the active one.
    /// `None` while the backend is unavailable or nothing is selected.
    fn resolve_model(&self, requested: Option<&str>) -> Option<ModelDescriptor> {
        let state = self.state.read();
        if !state.availability.is_available() {
            return None;
        }
        let active = state.active.clone()?;

        match requested {
            Some(name) => Some(
                state
                    .models
                    .iter()
                    .find(|m| m.as_str() == name)
                    .cloned()
                    .unwrap_or(active),
            ),
            None => Some(active),
        }
    }

    /// Generate a completion for an already assembled prompt
    pub async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
    ) -> Result<String, InferenceError> {
        let model = self.resolve_model(model).ok_or(InferenceError::NotConfigured)?;

        let request = GenerateRequest {
            model: model.as_str(),
            prompt,
            stream: false,
        };

        log::debug!("Sending request to Ollama API: {:?}", request);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(GENERATION_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Error generating response: {}", e);
                InferenceError::from(e)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            log::error!("Ollama API returned error status: {}", status);
            return Err(InferenceError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| {
            log::error!("Error reading Ollama response: {}", e);
            InferenceError::from(e)
        })?;
        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse Ollama response: {}", e);
            InferenceError::Parse(e.to_string())
        })?;

        Ok(parsed
            .response
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::test_server::{closed_port_url, FakeBackend};
    use serde_json::json;

    const TWO_MODELS: &str = r#"{"models": [{"name": "llama3"}, {"name": "mistral"}]}"#;

    async fn ready_client(backend: &FakeBackend) -> OllamaClient {
        let client = OllamaClient::new(&backend.url, "true");
        assert!(client.check_availability().await);
        client.list_models().await;
        client
    }

    #[tokio::test]
    async fn test_availability_starts_unknown() {
        let client = OllamaClient::new("http://127.0.0.1:1", "true");
        assert_eq!(client.availability(), Availability::Unknown);
        assert!(!client.is_ready());
    }

    #[tokio::test]
    async fn test_check_availability_transitions() {
        let client = OllamaClient::new("http://127.0.0.1:1", "true");
        assert!(client.check_availability().await);
        assert_eq!(client.availability(), Availability::Available);

        let failing = OllamaClient::new("http://127.0.0.1:1", "false");
        assert!(!failing.check_availability().await);
        assert_eq!(failing.availability(), Availability::Unavailable);

        let missing = OllamaClient::new("http://127.0.0.1:1", "/nonexistent/ollama-binary");
        assert!(!missing.check_availability().await);
        assert_eq!(missing.availability(), Availability::Unavailable);
    }

    #[tokio::test]
    async fn test_list_models_sets_default() {
        let backend = FakeBackend::builder().tags(200, TWO_MODELS).start().await;
        let client = OllamaClient::new(&backend.url, "true");

        let models = client.list_models().await;

        assert_eq!(
            models,
            vec![ModelDescriptor::from("llama3"), ModelDescriptor::from("mistral")]
        );
        assert_eq!(client.active_model(), Some(ModelDescriptor::from("llama3")));
    }

    #[tokio::test]
    async fn test_list_models_empty_keeps_active_unset() {
        let backend = FakeBackend::builder().tags(200, r#"{"models": []}"#).start().await;
        let client = OllamaClient::new(&backend.url, "true");

        assert!(client.list_models().await.is_empty());
        assert!(client.active_model().is_none());
    }

    #[tokio::test]
    async fn test_list_models_failures_return_empty() {
        let backend = FakeBackend::builder().tags(500, "boom").start().await;
        let client = OllamaClient::new(&backend.url, "true");
        assert!(client.list_models().await.is_empty());

        let garbled = FakeBackend::builder().tags(200, "not json").start().await;
        let client = OllamaClient::new(&garbled.url, "true");
        assert!(client.list_models().await.is_empty());

        let client = OllamaClient::new(&closed_port_url(), "true");
        assert!(client.list_models().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_set() {
        let backend = FakeBackend::builder().tags(200, TWO_MODELS).start().await;
        let client = OllamaClient::new(&backend.url, "true");
        client.list_models().await;

        backend.set_tags(503, "");
        assert!(client.list_models().await.is_empty());
        assert_eq!(client.models().len(), 2);
        assert_eq!(client.active_model(), Some(ModelDescriptor::from("llama3")));
    }

    #[tokio::test]
    async fn test_select_model_validates_membership() {
        let backend = FakeBackend::builder().tags(200, TWO_MODELS).start().await;
        let client = ready_client(&backend).await;

        assert_eq!(
            client.select_model("mistral"),
            Ok(ModelDescriptor::from("mistral"))
        );
        assert_eq!(client.active_model(), Some(ModelDescriptor::from("mistral")));

        assert_eq!(
            client.select_model("phi3"),
            Err(InferenceError::UnknownModel("phi3".to_string()))
        );
        assert_eq!(client.active_model(), Some(ModelDescriptor::from("mistral")));
    }

    #[tokio::test]
    async fn test_generate_unavailable_makes_no_request() {
        let backend = FakeBackend::builder().tags(200, TWO_MODELS).start().await;
        let client = OllamaClient::new(&backend.url, "false");
        client.list_models().await;
        assert!(!client.check_availability().await);
        let hits_before = backend.hits();

        let result = client.generate("hello", None).await;

        assert_eq!(result, Err(InferenceError::NotConfigured));
        assert_eq!(backend.hits(), hits_before);
        assert!(backend.generate_requests().is_empty());
    }

    #[tokio::test]
    async fn test_generate_without_models_is_not_configured() {
        let backend = FakeBackend::builder().tags(200, r#"{"models": []}"#).start().await;
        let client = ready_client(&backend).await;

        assert_eq!(
            client.generate("hello", None).await,
            Err(InferenceError::NotConfigured)
        );
        assert!(backend.generate_requests().is_empty());
    }

    #[tokio::test]
    async fn test_generate_sends_expected_body() {
        let backend = FakeBackend::builder()
            .tags(200, TWO_MODELS)
            .generate(200, r#"{"response": "Good evening.", "done": true}"#)
            .start()
            .await;
        let client = ready_client(&backend).await;

        let reply = client.generate("PROMPT", None).await.unwrap();

        assert_eq!(reply, "Good evening.");
        assert_eq!(
            backend.generate_requests(),
            vec![json!({"model": "llama3", "prompt": "PROMPT", "stream": false})]
        );
    }

    #[tokio::test]
    async fn test_generate_unknown_model_falls_back_to_active() {
        let backend = FakeBackend::builder()
            .tags(200, TWO_MODELS)
            .generate(200, r#"{"response": "ok"}"#)
            .start()
            .await;
        let client = ready_client(&backend).await;

        client.generate("p", Some("not-installed")).await.unwrap();
        client.generate("p", Some("mistral")).await.unwrap();

        let models: Vec<_> = backend
            .generate_requests()
            .iter()
            .map(|r| r["model"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(models, vec!["llama3", "mistral"]);
    }

    #[tokio::test]
    async fn test_generate_missing_response_field() {
        let backend = FakeBackend::builder()
            .tags(200, TWO_MODELS)
            .generate(200, r#"{"done": true}"#)
            .start()
            .await;
        let client = ready_client(&backend).await;

        assert_eq!(client.generate("p", None).await.unwrap(), NO_RESPONSE);
    }

    #[tokio::test]
    async fn test_generate_non_200_embeds_status() {
        let backend = FakeBackend::builder()
            .tags(200, TWO_MODELS)
            .generate(404, r#"{"error": "model not found"}"#)
            .start()
            .await;
        let client = ready_client(&backend).await;

        let err = client.generate("p", None).await.unwrap_err();
        assert_eq!(err, InferenceError::Status(404));
        assert!(err.user_message().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_generate_malformed_body_is_parse_error() {
        let backend = FakeBackend::builder()
            .tags(200, TWO_MODELS)
            .generate(200, "<html>")
            .start()
            .await;
        let client = ready_client(&backend).await;

        assert!(matches!(
            client.generate("p", None).await,
            Err(InferenceError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_connection_failure() {
        let client = OllamaClient::new(&closed_port_url(), "true");
        assert!(client.check_availability().await);
        {
            let mut state = client.state.write();
            state.models = vec![ModelDescriptor::from("llama3")];
            state.active = Some(ModelDescriptor::from("llama3"));
        }

        let err = client.generate("p", None).await.unwrap_err();
        assert!(matches!(err, InferenceError::Network(_)));
        assert!(err.user_message().starts_with("❌ Connection error:"));
    }
}
