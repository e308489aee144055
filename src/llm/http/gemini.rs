use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::instrument;

use crate::error::{Result, RouterError};
use crate::llm::client::LlmClient;
use crate::llm::types::{LlmRequest, LlmResponse};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new<S1, S2>(api_key: S1, model: S2) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::with_base_url(GEMINI_API_BASE, api_key, model)
    }

    pub fn with_base_url<S1, S2, S3>(base_url: S1, api_key: S2, model: S3) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| RouterError::Llm(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    fn request_body(request: &LlmRequest) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.user }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
            }
        });
        if let Some(system) = &request.system {
            body["systemInstruction"] = json!({ "parts": [{ "text": system }] });
        }
        body
    }

    fn extract_text(payload: &Value) -> Option<String> {
        let parts = payload["candidates"][0]["content"]["parts"].as_array()?;
        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn truncate(text: &str) -> String {
    if text.len() <= MAX_ERROR_BODY {
        return text.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &text[..end], text.len())
}

#[async_trait]
impl LlmClient for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = Self::request_body(&request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RouterError::Llm(format!("HTTP request error: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| RouterError::Llm(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(RouterError::Llm(format!(
                "request failed with status {}: {}",
                status,
                truncate(&response_text)
            )));
        }

        let payload: Value = serde_json::from_str(&response_text).map_err(|e| {
            RouterError::Llm(format!(
                "response parse error: {}; body: {}",
                e,
                truncate(&response_text)
            ))
        })?;

        let content = Self::extract_text(&payload).ok_or_else(|| {
            RouterError::Llm(format!(
                "missing text in response: {}",
                truncate(&payload.to_string())
            ))
        })?;

        Ok(LlmResponse {
            content,
            metadata: Some(payload),
        })
    }
}
