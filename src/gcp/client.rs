//! BigQuery Client
//!
//! Main client for the BigQuery REST API, combining a [`Transport`] with the
//! versioned base URL every route is built from.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::auth::GcpCredentials;
use super::http::{GcpHttpClient, Transport};
use crate::error::Result;

/// Default BigQuery v2 endpoint
pub const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2/";

/// Main BigQuery client
///
/// Cheap to clone; clones share the transport. Holds no per-call state, so
/// independent calls may run concurrently.
#[derive(Clone)]
pub struct BigQueryClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl fmt::Debug for BigQueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BigQueryClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BigQueryClient {
    /// Create a client against the public endpoint using Application Default Credentials
    pub async fn new() -> Result<Self> {
        let credentials = GcpCredentials::new().await?;
        let http = GcpHttpClient::new(credentials, None)?;
        Self::with_transport(DEFAULT_BASE_URL, http)
    }

    /// Create a client with explicit credentials, endpoint and request timeout
    pub fn with_credentials(
        base_url: &str,
        credentials: GcpCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let http = GcpHttpClient::new(credentials, timeout)?;
        Self::with_transport(base_url, http)
    }

    /// Create a client on top of any [`Transport`]
    pub fn with_transport<T>(base_url: &str, transport: T) -> Result<Self>
    where
        T: Transport + 'static,
    {
        Ok(Self {
            transport: Arc::new(transport),
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        &*self.transport
    }

    /// Build the URL for a route below the base URL.
    ///
    /// Every segment is percent-encoded, so identifiers can't escape their
    /// position in the path.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/");

        Ok(self.base_url.join(&path)?)
    }
}

/// Make sure the base URL ends in `/`, otherwise `join` drops its last segment.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    if base_url.ends_with('/') {
        Ok(Url::parse(base_url)?)
    } else {
        Ok(Url::parse(&format!("{}/", base_url))?)
    }
}
