use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::{
    error::{CoverError, Result},
    traits::ApiClient,
};

fn default_user_agent() -> String {
    format!("DiscogsCover/{}", env!("CARGO_PKG_VERSION"))
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

/// reqwest-backed [`ApiClient`] speaking to Discogs.
#[derive(Debug, Clone)]
pub struct DiscogsClient {
    client: Client,
    user_agent: String,
}

#[derive(Default)]
pub struct DiscogsClientBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl DiscogsClientBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Per-request transport timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<DiscogsClient> {
        let user_agent = self
            .user_agent
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(default_user_agent);

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(DiscogsClient {
            client: builder.build()?,
            user_agent,
        })
    }
}

impl DiscogsClient {
    pub fn builder() -> DiscogsClientBuilder {
        DiscogsClientBuilder::new()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn handle_json(url: &str, response: Response) -> Result<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::Api {
                status: status.as_u16(),
                status_text: status_text(status),
            });
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| CoverError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl ApiClient for DiscogsClient {
    async fn fetch_json(&self, url: &str, token: &str) -> Result<serde_json::Value> {
        let url = Url::parse(url)?;
        debug!("Request: GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::AUTHORIZATION, format!("Discogs token={token}"))
            .send()
            .await?;
        Self::handle_json(url.as_str(), response).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;
        debug!("Download: GET {}", url);
        let response = self
            .client
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoverError::Download {
                status: status.as_u16(),
                status_text: status_text(status),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
