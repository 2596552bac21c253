//! Remote collaborators: the code-generation service and the quote service.
//!
//! Both are opaque HTTP endpoints. Any non-2xx status is a failure and its body is ignored.

use crate::artifact::GeneratedArtifact;
use crate::config::ClientConfig;
use crate::error::{ServiceError, ServiceResult};
use async_trait::async_trait;
use serde::Serialize;

/// Seam between the session controller and the network.
#[async_trait]
pub trait PrototypeService: Send + Sync {
    /// Generate a prototype for an already-trimmed prompt.
    async fn generate(&self, prompt: &str) -> ServiceResult<GeneratedArtifact>;

    /// Request a quote document; returns the raw PDF bytes.
    async fn quote(&self, request: &str) -> ServiceResult<Vec<u8>>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
struct QuoteRequest<'a> {
    request: &'a str,
}

/// reqwest-backed client. No timeout and no retry on either call.
#[derive(Debug, Clone)]
pub struct HttpPrototypeService {
    client: reqwest::Client,
    generate_url: String,
    quote_url: String,
}

impl HttpPrototypeService {
    pub fn new(generate_url: impl Into<String>, quote_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            generate_url: generate_url.into(),
            quote_url: quote_url.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.generate_url.clone(), config.quote_url.clone())
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> ServiceResult<reqwest::Response> {
        let res = self.client.post(url).json(body).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        Ok(res)
    }
}

#[async_trait]
impl PrototypeService for HttpPrototypeService {
    async fn generate(&self, prompt: &str) -> ServiceResult<GeneratedArtifact> {
        tracing::debug!(url = %self.generate_url, prompt_len = prompt.len(), "sending prompt");
        let res = self
            .post_json(&self.generate_url, &GenerateRequest { prompt })
            .await?;
        let text = res.text().await?;
        let artifact: GeneratedArtifact = serde_json::from_str(&text)?;
        Ok(artifact)
    }

    async fn quote(&self, request: &str) -> ServiceResult<Vec<u8>> {
        tracing::debug!(url = %self.quote_url, "requesting quote");
        let res = self
            .post_json(&self.quote_url, &QuoteRequest { request })
            .await?;
        let bytes = res.bytes().await?;
        Ok(bytes.to_vec())
    }
}
