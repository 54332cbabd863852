//! Resource Fetcher
//!
//! The request loop shared by every operation: one GET for a single resource,
//! one DELETE, or a GET per page until the listing is exhausted.

use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, Result};
use crate::gcp::client::BigQueryClient;
use crate::model::ListEnvelope;

/// Query parameters for a request, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to a single value, replacing any previous values.
    pub fn set(&mut self, key: &'static str, value: impl ToString) {
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.to_string()));
    }

    /// Set `key` only when a value is present.
    pub fn set_opt<T: ToString>(&mut self, key: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    /// Add one more value for `key`, for repeated parameters.
    pub fn append(&mut self, key: &'static str, value: impl ToString) {
        self.pairs.push((key, value.to_string()));
    }

    /// First value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Copy of `url` with these parameters as its query string.
    pub fn apply(&self, url: &Url) -> Url {
        let mut url = url.clone();
        if self.pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut()
                .clear()
                .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())));
        }
        url
    }
}

/// Fail with [`Error::MissingArgument`] when a required identifier is empty.
pub(crate) fn require(value: &str, name: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingArgument(name));
    }
    Ok(())
}

/// GET one resource and decode it.
pub async fn fetch_one<T>(client: &BigQueryClient, url: &Url, params: &QueryParams) -> Result<T>
where
    T: DeserializeOwned,
{
    let url = params.apply(url);
    let body = client.transport().get(&url).await?;

    serde_json::from_str(&body).map_err(|source| Error::Decode {
        url: url.path().to_string(),
        source,
    })
}

/// DELETE one resource.
pub async fn delete_one(client: &BigQueryClient, url: &Url) -> Result<()> {
    client.transport().delete(url).await
}

/// Fetch all resources (auto-paginate)
///
/// Pages are requested one after another and their items concatenated in
/// server order until a page comes back without a `nextPageToken`.
///
/// If `page_token` is given the caller asked for that page only: exactly one
/// request is made and its `nextPageToken` is ignored.
///
/// The first error aborts the loop; items from earlier pages are dropped.
pub async fn fetch_all<E>(
    client: &BigQueryClient,
    url: &Url,
    mut params: QueryParams,
    page_token: Option<&str>,
) -> Result<Vec<E::Item>>
where
    E: ListEnvelope,
{
    let one_shot = page_token.is_some();
    let mut page_token = page_token.map(str::to_owned);
    let mut all_items = Vec::new();
    let mut pages = 0usize;

    loop {
        if let Some(token) = page_token.take() {
            params.set("pageToken", token);
        }

        let page: E = fetch_one(client, url, &params).await?;
        pages += 1;

        let next_token = page
            .next_page_token()
            .filter(|token| !token.is_empty())
            .map(str::to_owned);

        let mut items = page.into_items();
        tracing::debug!(
            "page {} from {}: {} items, more: {}",
            pages,
            url.path(),
            items.len(),
            next_token.is_some()
        );
        all_items.append(&mut items);

        if one_shot {
            break;
        }

        match next_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    Ok(all_items)
}
