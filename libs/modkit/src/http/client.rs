//! Traced HTTP client
//!
//! Wraps `reqwest::Client` so every outgoing request gets its own `outgoing_http` span and a
//! `traceparent` header.

use crate::http::simple_otel;
use tracing::{field, Instrument, Level};

/// A traced HTTP client. Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    /// Create a new TracedClient wrapping the provided reqwest::Client
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Execute a built request inside an `outgoing_http` span.
    ///
    /// Non-success statuses are returned as `Ok`; callers decide how to classify them.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = field::Empty,
            trace_id = field::Empty,
            error = field::Empty,
            otel.kind = "client",
        );

        let tp = simple_otel::inject_trace_context(req.headers_mut());
        span.record("trace_id", tp.trace_id.as_str());

        async {
            let response = match self.inner.execute(req).await {
                Ok(r) => r,
                Err(e) => {
                    tracing::Span::current().record("error", true);
                    tracing::debug!(error = %e, "outgoing request failed");
                    return Err(e);
                }
            };

            let status = response.status();
            let current = tracing::Span::current();
            current.record("http.status_code", status.as_u16());
            if status.is_client_error() || status.is_server_error() {
                current.record("error", true);
            }

            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Convenience method for GET requests
    pub async fn get(&self, url: &str) -> reqwest::Result<reqwest::Response> {
        let req = self.inner.get(url).build()?;
        self.execute(req).await
    }

    /// Get a reference to the underlying reqwest::Client for advanced usage
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }
}

impl From<reqwest::Client> for TracedClient {
    fn from(c: reqwest::Client) -> Self {
        Self::new(c)
    }
}

impl Default for TracedClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_traced_client_injects_trace_headers() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/ping").header_exists("traceparent");
                then.status(200).body("ok");
            })
            .await;

        let client = TracedClient::from(reqwest::Client::new());
        let url = format!("{}/ping", server.base_url());
        let resp = client.get(&url).await.unwrap();

        assert!(resp.status().is_success());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let client = TracedClient::default();
        let resp = client
            .get(&format!("{}/missing", server.base_url()))
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 404);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = TracedClient::default();
        // Port 9 (discard) on localhost is not expected to be listening in CI.
        let res = client.get("http://127.0.0.1:9/unreachable").await;
        assert!(res.is_err());
    }

    #[test]
    fn test_bad_url_fails_to_build() {
        let client = TracedClient::default();
        assert!(client.inner().get("not a url").build().is_err());
    }
}
