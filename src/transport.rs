//! HTTP transport seam.
//!
//! The flow only needs "send this signed request, give me status and body".
//! [`ReqwestTransport`] does that with a blocking `reqwest` client; tests
//! plug in their own [`Transport`].

use std::time::Duration;

use http::header::AUTHORIZATION;
use reqwest::blocking::Client as ReqwestClient;

use crate::request::SignedRequest;

/// Timeout applied to each exchange unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Perform exactly one attempt; no retries.
    fn execute(&self, request: &SignedRequest) -> reqwest::Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &SignedRequest) -> reqwest::Result<HttpResponse> {
        (**self).execute(request)
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: ReqwestClient,
}

impl ReqwestTransport {
    /// Constructs a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let inner = ReqwestClient::builder().timeout(timeout).build()?;
        Ok(ReqwestTransport { inner })
    }

    /// Constructs a transport with specifying inner `reqwest::blocking::Client`.
    pub fn new_with_client(client: ReqwestClient) -> Self {
        ReqwestTransport { inner: client }
    }
}

impl From<ReqwestClient> for ReqwestTransport {
    fn from(client: ReqwestClient) -> Self {
        ReqwestTransport::new_with_client(client)
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &SignedRequest) -> reqwest::Result<HttpResponse> {
        let resp = self
            .inner
            .request(request.method.clone(), request.url.clone())
            .header(AUTHORIZATION, request.authorization.as_str())
            .send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(401, "").is_success());
    }
}
