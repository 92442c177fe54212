// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use tracing::debug;

/// Response body delivered in transport-sized pieces
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Status line, declared length and body of a streamed GET
pub struct HttpResponse {
    pub status: u16,
    /// Content-Length header value, if present
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

/// The two kinds of GET the archiver performs
///
/// Kept behind a trait so the archive loop can run against canned responses.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch a whole document, failing on transport errors and error statuses
    async fn get_bytes(&self, url: &str) -> Result<Bytes, reqwest::Error>;

    /// Start a streamed download; the caller inspects `status`
    async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error>;
}

/// `HttpClient` backed by a shared `reqwest::Client`
#[derive(Clone, Default)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a preconfigured client, e.g. one with custom timeouts
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_bytes(&self, url: &str) -> Result<Bytes, reqwest::Error> {
        debug!(%url, "GET document");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        debug!(%url, bytes = body.len(), "document received");
        Ok(body)
    }

    async fn get_stream(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        debug!(%url, "GET stream");
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_length = response.content_length();
        debug!(%url, status, ?content_length, "stream opened");

        Ok(HttpResponse {
            status,
            content_length,
            body: Box::pin(response.bytes_stream()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reqwest_client_can_be_created() {
        let _client = ReqwestClient::new();
        let _wrapped = ReqwestClient::with_client(reqwest::Client::new());
    }
}
