//! Blocking client for Ollama-compatible `/api/generate` endpoints.

use crate::client::ModelClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::io::find_char_boundary;
use crate::prompt::GenerationRequest;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest error body kept in [`ClientError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Single-shot HTTP client for a local or remote Ollama server.
///
/// No credentials are handled here; the endpoint is expected to be
/// reachable as configured.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    endpoint: String,
    model: String,
    http: HttpClient,
}

impl OllamaClient {
    /// Creates a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            http,
        })
    }

    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(
            config.endpoint.as_str(),
            config.model.as_str(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ModelClient for OllamaClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        let payload = GenerateRequest::from_request(&self.model, request);
        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "sending generate request");

        let response = self.http.post(&self.endpoint).json(&payload).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let end = find_char_boundary(&body, MAX_ERROR_BODY);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: body[..end].to_string(),
            });
        }

        let reply: GenerateResponse = response.json()?;
        tracing::debug!(bytes = reply.response.len(), "received generate response");
        Ok(reply.response)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'static str>,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: u32,
}

impl<'a> GenerateRequest<'a> {
    fn from_request(model: &'a str, request: &'a GenerationRequest) -> Self {
        Self {
            model,
            prompt: &request.prompt,
            system: &request.system,
            stream: false,
            format: request.options.wants_json().then_some("json"),
            options: GenerateOptions {
                temperature: request.options.temperature,
                top_p: request.options.top_p,
                top_k: request.options.top_k,
                num_predict: request.options.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::prompt::TopicRequest;

    #[test]
    fn test_payload_shape() {
        let request = GenerationRequest::new(&TopicRequest::Count(2), GenerationConfig::default());
        let payload = GenerateRequest::from_request("llama3.2", &request);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["prompt"], "2");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["top_k"], 40);
        assert_eq!(json["options"]["num_predict"], 8000);
        assert!(json.get("format").is_none());
    }

    #[test]
    fn test_json_mime_type_sets_format() {
        let options = GenerationConfig {
            response_mime_type: crate::config::MIME_JSON.to_string(),
            ..GenerationConfig::default()
        };
        let request = GenerationRequest::new(&TopicRequest::Count(1), options);
        let payload = GenerateRequest::from_request("llama3.2", &request);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["format"], "json");
    }

    #[test]
    fn test_response_decoding() {
        let reply: GenerateResponse =
            serde_json::from_str(r#"{"model":"m","response":"**Topic 1**x","done":true}"#)
                .unwrap();
        assert_eq!(reply.response, "**Topic 1**x");
    }

    #[test]
    fn test_from_config() {
        let client = OllamaClient::from_config(&ClientConfig::default()).unwrap();
        assert_eq!(client.endpoint(), crate::config::DEFAULT_ENDPOINT);
        assert_eq!(client.model(), crate::config::DEFAULT_MODEL);
        assert_eq!(client.name(), "ollama");
    }
}
