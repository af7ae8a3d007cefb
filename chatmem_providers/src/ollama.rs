//! Ollama provider for local models over `/api/chat`.

use std::time::Duration;

use async_trait::async_trait;
use chatmem_core::{Message, ModelProvider, ProviderError, Role};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

pub const DEFAULT_HOST: &str = "http://localhost:11434";

pub struct OllamaProvider {
    client: Client,
    host: String,
    model: String,
}

impl OllamaProvider {
    /// Create a provider against a local Ollama instance.
    #[must_use]
    pub fn new(host: &str, model: String) -> Self {
        // Local inference can be slow on first load; allow a long response
        // window but fail fast if the daemon is not listening.
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            model,
        }
    }

    const fn wire_role(role: Role) -> &'static str {
        match role {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }

    fn build_request(&self, messages: &[Message]) -> Value {
        let wire: Vec<Value> = messages
            .iter()
            .map(|m| {
                json!({
                    "role": Self::wire_role(m.role),
                    "content": m.content,
                })
            })
            .collect();

        json!({
            "model": self.model,
            "messages": wire,
            "stream": false,
        })
    }

    fn request_error(e: &reqwest::Error) -> ProviderError {
        ProviderError::Request {
            provider: "ollama".to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let request = self.build_request(messages);

        info!(model = %self.model, messages = messages.len(), "calling ollama");

        let response = self
            .client
            .post(format!("{}/api/chat", self.host))
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::request_error(&e))?
            .error_for_status()
            .map_err(|e| Self::request_error(&e))?
            .json::<Value>()
            .await
            .map_err(|e| Self::request_error(&e))?;

        let content = response["message"]["content"].as_str().ok_or_else(|| {
            ProviderError::InvalidResponse {
                provider: "ollama".to_string(),
                message: "missing message content".to_string(),
            }
        })?;

        Ok(content.to_string())
    }
}
