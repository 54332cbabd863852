//! HTTP transport for BigQuery REST API calls
//!
//! [`Transport`] is the seam between request construction and the wire.
//! [`GcpHttpClient`] is the production implementation: reqwest plus a bearer
//! token from [`GcpCredentials`].

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Method};
use url::Url;

use super::auth::GcpCredentials;
use crate::error::{sanitize_for_log, Error, Result};

/// Something that can perform authenticated GETs and DELETEs.
///
/// Implementations own authentication and status handling: a non-success
/// status must come back as an error, never as a body.
pub trait Transport: Send + Sync {
    /// GET `url` and return the response body.
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<String>>;

    /// DELETE `url`. Any response body is discarded.
    fn delete<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<()>>;
}

/// HTTP client wrapper for BigQuery API calls
#[derive(Clone, Debug)]
pub struct GcpHttpClient {
    client: Client,
    credentials: GcpCredentials,
}

impl GcpHttpClient {
    /// Create a new HTTP client
    pub fn new(credentials: GcpCredentials, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("bqrest/", env!("CARGO_PKG_VERSION")));

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            credentials,
        })
    }

    pub fn credentials(&self) -> &GcpCredentials {
        &self.credentials
    }

    async fn send(&self, method: Method, url: &Url) -> Result<String> {
        tracing::debug!("{} {}", method, url.path());

        let token = self.credentials.get_token().await?;

        let response = self
            .client
            .request(method, url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(Error::from_api_response(status.as_u16(), &body));
        }

        Ok(body)
    }
}

impl Transport for GcpHttpClient {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<String>> {
        self.send(Method::GET, url).boxed()
    }

    fn delete<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<()>> {
        self.send(Method::DELETE, url).map(|res| res.map(drop)).boxed()
    }
}
