//! Google Gemini provider over the `generateContent` REST endpoint.

use async_trait::async_trait;
use chatmem_core::{Message, ModelProvider, ProviderError, Role};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a provider for the given model.
    ///
    /// The key comes from the config file or, failing that, the
    /// `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment variables.
    pub fn new(api_key: Option<String>, model: String) -> Result<Self, ProviderError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| ProviderError::MissingApiKey {
                provider: "gemini".to_string(),
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn request_error(e: &reqwest::Error) -> ProviderError {
        ProviderError::Request {
            provider: "gemini".to_string(),
            message: e.to_string(),
        }
    }

    /// Build the `generateContent` request body.
    ///
    /// Gemini only accepts `user`/`model` roles in `contents`; system
    /// messages (the summary carrier) go into `systemInstruction`.
    fn build_request(messages: &[Message]) -> Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for m in messages {
            match m.role {
                Role::System => system_parts.push(json!({ "text": m.content })),
                Role::User => contents.push(json!({
                    "role": "user",
                    "parts": [{ "text": m.content }],
                })),
                Role::Assistant => contents.push(json!({
                    "role": "model",
                    "parts": [{ "text": m.content }],
                })),
            }
        }

        let mut request = json!({ "contents": contents });
        if !system_parts.is_empty() {
            request["systemInstruction"] = json!({ "parts": system_parts });
        }
        request
    }

    /// Extract the reply text from a `generateContent` response.
    fn extract_text(response: &Value) -> Result<String, ProviderError> {
        if let Some(message) = response["error"]["message"].as_str() {
            return Err(ProviderError::InvalidResponse {
                provider: "gemini".to_string(),
                message: message.to_string(),
            });
        }

        let parts = response["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider: "gemini".to_string(),
                message: "missing candidates".to_string(),
            })?;

        let text: String = parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join("");

        Ok(text)
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let request = Self::build_request(messages);

        info!(model = %self.model, messages = messages.len(), "calling gemini");

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.base_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::request_error(&e))?
            .error_for_status()
            .map_err(|e| Self::request_error(&e))?
            .json::<Value>()
            .await
            .map_err(|e| Self::request_error(&e))?;

        Self::extract_text(&response)
    }
}
