//! Dataset operations
//!
//! `datasets.list` and `datasets.get`.

use super::fetcher::{fetch_all, fetch_one, require, QueryParams};
use crate::error::Result;
use crate::gcp::client::BigQueryClient;
use crate::model::{Dataset, DatasetList, DatasetReference};

/// Filters for [`BigQueryClient::list_datasets`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDatasetsConfig {
    pub project_id: String,
    /// Include hidden datasets.
    pub all: Option<bool>,
    /// Label filter, e.g. `labels.env:prod`.
    pub filter: Option<String>,
    /// Page size hint for the server.
    pub max_results: Option<u32>,
    /// Fetch only this page instead of the whole listing.
    pub page_token: Option<String>,
}

impl ListDatasetsConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_opt("all", self.all);
        params.set_opt("filter", self.filter.as_deref());
        params.set_opt("maxResults", self.max_results);
        params
    }
}

impl BigQueryClient {
    /// List the datasets of a project, following every page unless
    /// `config.page_token` asks for a single one.
    pub async fn list_datasets(&self, config: &ListDatasetsConfig) -> Result<Vec<Dataset>> {
        require(&config.project_id, "project_id")?;

        let url = self.url_for(&["projects", &config.project_id, "datasets"])?;
        fetch_all::<DatasetList>(self, &url, config.params(), config.page_token.as_deref()).await
    }

    pub async fn get_dataset(&self, dataset: &DatasetReference) -> Result<Dataset> {
        require(&dataset.project_id, "project_id")?;
        require(&dataset.dataset_id, "dataset_id")?;

        let url = self.url_for(&["projects", &dataset.project_id, "datasets", &dataset.dataset_id])?;
        fetch_one(self, &url, &QueryParams::new()).await
    }
}
