use crate::capabilities::{SamplingOptions, TextCompletion};
use crate::config::ConfigProvider;
use crate::error::{CapabilityError, CapabilityResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// OpenAI-style `/chat/completions` client (DeepSeek by default).
#[derive(Clone)]
pub struct DeepSeekClient {
    client: Client,
    config: Arc<dyn ConfigProvider>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: String,
    messages: [RequestMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl DeepSeekClient {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TextCompletion for DeepSeekClient {
    async fn complete(&self, system: &str, user: &str, options: &SamplingOptions) -> CapabilityResult<String> {
        // Credentials are read per call so a newly configured key applies immediately.
        let settings = self.config.settings();
        let api_key = settings
            .api_key()
            .ok_or_else(|| CapabilityError::Unauthenticated("no DeepSeek API key configured".to_string()))?;

        let request_body = CompletionRequest {
            model: settings.model.clone(),
            messages: [
                RequestMessage { role: "system", content: system },
                RequestMessage { role: "user", content: user },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false, // One-shot only
        };

        debug!("POST {} (max_tokens={})", settings.completion_url, options.max_tokens);
        let response = self
            .client
            .post(&settings.completion_url)
            .bearer_auth(api_key)
            .timeout(options.timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let resp_json: CompletionResponse = response.json().await?;
        Ok(first_content(resp_json))
    }
}

fn first_content(response: CompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default()
}

fn status_error(status: StatusCode, body: &str) -> CapabilityError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("HTTP {}", status));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CapabilityError::Unauthenticated(detail),
        StatusCode::TOO_MANY_REQUESTS => CapabilityError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CapabilityError::Timeout,
        _ => CapabilityError::Api(detail),
    }
}
