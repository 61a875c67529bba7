//! Infrastructure implementation of the `HttpClient` port, backed by reqwest.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{HttpClient, HttpResponse};
use crate::domain::HarnessError;

/// Default timeout for a whole request, body included.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Production `HttpClient`.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!(%url, "GET");
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| HarnessError::Transport(format!("GET {url}: {e}")))?;

        let status = response.status().as_u16();
        let mut header_map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                header_map
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| HarnessError::Transport(format!("reading body of {url}: {e}")))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers: header_map,
            body,
        })
    }
}
