// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{header::CONTENT_TYPE, Client, Url};

use crate::RpcError;

/// Moves serialized JSON-RPC payloads to a node and back.
///
/// Retries, timeouts and cancellation are the transport's business; the client issues
/// every request exactly once.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: Vec<u8>) -> Result<Vec<u8>, RpcError>;
}

/// Configuration of an [HttpTransport].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The node's JSON-RPC endpoint.
    pub url: String,
    /// Timeout applied to each request as a whole.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        ClientConfig {
            url: url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A [Transport] that POSTs each payload to an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        let url = Url::parse(&config.url).map_err(|_| RpcError::InvalidUrl(config.url.clone()))?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(HttpTransport {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        trace!("POST {} ({} bytes)", self.url, payload.len());
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            // nodes report JSON-RPC errors with non-2xx codes too, so the body is kept
            debug!("{} answered with HTTP {status}", self.url);
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url() {
        assert!(matches!(
            HttpTransport::new(&ClientConfig::new("not a url")),
            Err(RpcError::InvalidUrl(_))
        ));
    }

    #[test]
    fn config() {
        let config = ClientConfig::new("http://localhost:8545").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.url().as_str(), "http://localhost:8545/");
    }
}
