//! HTTP transport
//!
//! The executor talks to PostHog through the [`Transport`] trait so the
//! request pipeline can be exercised without a network. [`HttpTransport`] is
//! the reqwest-backed implementation used in production.

use async_trait::async_trait;
use reqwest::Client;

/// Status line and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body parsed as JSON, or the raw text when it is not JSON
    pub fn error_body(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|_| serde_json::Value::String(self.body.clone()))
    }
}

/// Sends one authenticated GET
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, api_key: &str) -> Result<TransportResponse, reqwest::Error>;
}

/// reqwest-backed transport
///
/// No timeout is configured; the reqwest defaults apply.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("typelytics/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Use an existing client (shared connection pool, custom TLS, ...)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<TransportResponse, reqwest::Error> {
        let response = self.client.get(url).bearer_auth(api_key).send().await?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}
