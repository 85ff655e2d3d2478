// SPDX-FileCopyrightText: 2026 Hireflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completion backend.

use std::time::Duration;

use async_trait::async_trait;
use hireflow_core::{BackendInfo, GenerateOptions, GenerationBackend, HireflowError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Upper bound for a single HTTP exchange when the caller sets no timeout.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// A backend speaking the OpenAI `/chat/completions` protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleBackend {
    client: reqwest::Client,
    info: BackendInfo,
}

impl OpenAiCompatibleBackend {
    /// Build a client for `info.endpoint` authenticating with `api_key`.
    pub fn new(info: BackendInfo, api_key: &SecretString) -> Result<Self, HireflowError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| HireflowError::ConstructionFailed {
                name: info.name.clone(),
                message: format!("invalid API key header value: {e}"),
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(CLIENT_TIMEOUT)
            .build()
            .map_err(|e| HireflowError::ConstructionFailed {
                name: info.name.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, info })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.info.endpoint.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl GenerationBackend for OpenAiCompatibleBackend {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn info(&self) -> BackendInfo {
        self.info.clone()
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, HireflowError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = options.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let request = ChatRequest {
            model: &self.info.model_id,
            messages,
            temperature: options.temperature.unwrap_or(self.info.temperature),
            max_tokens: options.max_tokens.unwrap_or(self.info.max_tokens),
        };

        let response = self
            .client
            .post(self.completions_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| HireflowError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(backend = %self.info.name, status = %status, "completion response received");

        let body = response.text().await.map_err(|e| HireflowError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            return Err(HireflowError::Provider {
                message: format!("{} returned {status}: {body}", self.info.name),
                source: None,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| HireflowError::Provider {
                message: format!("failed to parse completion response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| HireflowError::Provider {
                message: format!("{} returned no choices", self.info.name),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_backend(endpoint: &str) -> OpenAiCompatibleBackend {
        let info = BackendInfo {
            name: "qwen".into(),
            model_id: "qwen-plus".into(),
            endpoint: endpoint.to_string(),
            temperature: 0.7,
            max_tokens: 2048,
        };
        OpenAiCompatibleBackend::new(info, &SecretString::from("sk-test".to_string())).unwrap()
    }

    fn completion(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn generate_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "qwen-plus",
                "max_tokens": 2048,
                "messages": [{"role": "user", "content": "Hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let backend = test_backend(&format!("{}/v1/", server.uri()));
        let text = backend
            .generate("Hello", &GenerateOptions::default())
            .await
            .unwrap();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn options_override_defaults_and_add_system_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "max_tokens": 64,
                "messages": [
                    {"role": "system", "content": "Be terse."},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let options = GenerateOptions {
            max_tokens: Some(64),
            system_prompt: Some("Be terse.".into()),
            ..GenerateOptions::default()
        };
        assert_eq!(backend.generate("Hello", &options).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn non_success_status_is_provider_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string("{\"error\":\"invalid api key\"}"),
            )
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend
            .generate("Hello", &GenerateOptions::default())
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, HireflowError::Provider { .. }));
        assert!(msg.contains("401"), "got: {msg}");
        assert!(msg.contains("invalid api key"), "got: {msg}");
    }

    #[tokio::test]
    async fn empty_choices_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let backend = test_backend(&server.uri());
        let err = backend
            .generate("Hello", &GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[test]
    fn invalid_key_is_construction_failure() {
        let info = BackendInfo {
            name: "broken".into(),
            model_id: "m".into(),
            endpoint: "http://localhost".into(),
            temperature: 0.7,
            max_tokens: 16,
        };
        let err = OpenAiCompatibleBackend::new(info, &SecretString::from("bad\nkey".to_string()))
            .unwrap_err();
        assert!(matches!(err, HireflowError::ConstructionFailed { .. }));
    }
}
