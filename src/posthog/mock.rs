//! Recording transport for tests

use super::transport::{Transport, TransportResponse};
use async_trait::async_trait;
use std::sync::Mutex;

/// Answers every request with a canned response and records `(url, api_key)`
pub struct MockTransport {
    response: TransportResponse,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockTransport {
    pub fn ok(body: &str) -> Self {
        Self::status(200, "OK", body)
    }

    pub fn status(status: u16, status_text: &str, body: &str) -> Self {
        Self {
            response: TransportResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<TransportResponse, reqwest::Error> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), api_key.to_string()));
        Ok(self.response.clone())
    }
}
