use async_trait::async_trait;
use chatbot_core::config::{CHAT_ENDPOINT, LIST_ENDPOINT};
use chatbot_core::{Message, ModelProvider};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};

use crate::provider::{ChatProvider, LLMError, LineStream, Result};

use super::common::lines::line_stream_from_response;
use super::common::openai_compat::build_openai_compat_body;

/// Path tried for `/list` when `APIS` does not name a `list` endpoint.
pub const DEFAULT_LIST_PATH: &str = "/v1/models";

/// Talks to any endpoint that implements the OpenAI chat completions API.
pub struct OpenAICompatProvider {
    client: Client,
    config: ModelProvider,
}

impl OpenAICompatProvider {
    pub fn new(config: ModelProvider) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ModelProvider) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ModelProvider {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
    }

    fn list_url(&self) -> String {
        self.config.endpoint_url(LIST_ENDPOINT).unwrap_or_else(|| {
            log::warn!(
                "No '{}' endpoint configured in APIS, trying default {}",
                LIST_ENDPOINT,
                DEFAULT_LIST_PATH
            );
            format!("{}{}", self.config.base_url, DEFAULT_LIST_PATH)
        })
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await?;
        return Err(LLMError::Api(format!("HTTP {}: {}", status, text)));
    }
    Ok(response)
}

#[async_trait]
impl ChatProvider for OpenAICompatProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat_stream(&self, messages: &[Message]) -> Result<LineStream> {
        let url = self.config.endpoint_url(CHAT_ENDPOINT).ok_or_else(|| {
            LLMError::Config(format!("no '{}' endpoint configured", CHAT_ENDPOINT))
        })?;

        let body = build_openai_compat_body(&self.config.model, messages);
        log::debug!(
            "POST {} with {} messages (model '{}')",
            url,
            messages.len(),
            self.config.model
        );

        let response = self
            .authorized(self.client.post(&url))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        Ok(line_stream_from_response(response))
    }

    async fn list_models(&self) -> Result<String> {
        let url = self.list_url();
        log::debug!("GET {}", url);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.text().await?)
    }
}
