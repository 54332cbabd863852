//! In-memory [`Transport`] for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use futures::FutureExt;
use url::Url;

use crate::error::{Error, Result};
use crate::gcp::http::Transport;

/// Replays queued responses in order and records every request it sees.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<String>>>>,
    calls: Arc<Mutex<Vec<(&'static str, Url)>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, body: serde_json::Value) {
        self.push_body(body.to_string());
    }

    pub(crate) fn push_body(&self, body: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(body.into()));
    }

    pub(crate) fn push_error(&self, error: Error) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Every request made so far, as `(method, url)`.
    pub(crate) fn calls(&self) -> Vec<(&'static str, Url)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn requests(&self) -> Vec<Url> {
        self.calls().into_iter().map(|(_, url)| url).collect()
    }

    fn respond(&self, method: &'static str, url: &Url) -> Result<String> {
        self.calls.lock().unwrap().push((method, url.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport(format!("no scripted response for {method} {url}"))))
    }
}

impl Transport for ScriptedTransport {
    fn get<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<String>> {
        let result = self.respond("GET", url);
        async move { result }.boxed()
    }

    fn delete<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<()>> {
        let result = self.respond("DELETE", url).map(drop);
        async move { result }.boxed()
    }
}
