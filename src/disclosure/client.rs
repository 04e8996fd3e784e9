// src/disclosure/client.rs
use crate::utils::error::DisclosureError;
use reqwest::header;
use std::time::Duration;

// Overridable through PTR_USER_AGENT.
const DEFAULT_USER_AGENT: &str = "ptr_extractor/0.1 (financial disclosure research)";
// One request at a time, with a pause before each, to go easy on the clerk's server.
const REQUEST_DELAY_MS: u64 = 150;

/// Anything that can turn a URL into the raw bytes of a document.
#[allow(async_fn_in_trait)]
pub trait DocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DisclosureError>;
}

/// HTTP fetcher for the House clerk disclosure site.
pub struct DisclosureClient {
    client: reqwest::Client,
    delay: Duration,
}

impl DisclosureClient {
    pub fn new() -> Result<Self, DisclosureError> {
        let user_agent = std::env::var("PTR_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        tracing::debug!("Using User-Agent: {}", user_agent);

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            delay: Duration::from_millis(REQUEST_DELAY_MS),
        })
    }
}

impl DocumentFetcher for DisclosureClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DisclosureError> {
        tracing::debug!("Fetching {}", url);
        tokio::time::sleep(self.delay).await;

        let response = self.client.get(url)
            .header(header::ACCEPT, "application/zip,application/pdf,*/*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DisclosureError::NotFound(url.to_string()));
            }
            return Err(DisclosureError::Http(status, url.to_string()));
        }

        let body = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body.to_vec())
    }
}
