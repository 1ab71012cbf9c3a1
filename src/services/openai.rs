use std::fmt;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

pub const OPENAI_MODEL: &str = "gpt-4";
const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug)]
pub enum OpenAiError {
    Http(reqwest::Error),
    Status(u16, String),
    MalformedResponse(String),
}

impl fmt::Display for OpenAiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenAiError::Http(err) => write!(f, "HTTP error: {}", err),
            OpenAiError::Status(code, body) => {
                write!(f, "OpenAI returned status {}: {}", code, body)
            }
            OpenAiError::MalformedResponse(msg) => write!(f, "Malformed response: {}", msg),
        }
    }
}

impl std::error::Error for OpenAiError {}

impl From<reqwest::Error> for OpenAiError {
    fn from(err: reqwest::Error) -> Self {
        OpenAiError::Http(err)
    }
}

/// Thin client for the chat-completions API. Each call carries its own
/// token budget, temperature, and timeout since extraction and generation
/// have different needs.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: OPENAI_ENDPOINT.to_string(),
        }
    }

    /// Overrides the API endpoint, used by tests to simulate failures.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
        timeout: Duration,
    ) -> Result<String, OpenAiError> {
        debug!("OpenAI request ({} max tokens): {:.120}", max_tokens, prompt);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.trim())
            .timeout(timeout)
            .json(&json!({
                "model": OPENAI_MODEL,
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": max_tokens,
                "temperature": temperature,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Status(status.as_u16(), body));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| OpenAiError::MalformedResponse(e.to_string()))?;

        value["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                OpenAiError::MalformedResponse("no message content in choices".to_string())
            })
    }
}
