//! Table operations
//!
//! `tables.list`, `tables.get` and `tables.delete`.

use super::fetcher::{delete_one, fetch_all, fetch_one, require, QueryParams};
use crate::error::Result;
use crate::gcp::client::BigQueryClient;
use crate::model::{Table, TableList, TableReference};

/// Filters for [`BigQueryClient::list_tables`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTablesConfig {
    pub project_id: String,
    pub dataset_id: String,
    pub max_results: Option<u32>,
    /// Fetch only this page instead of the whole listing.
    pub page_token: Option<String>,
}

impl ListTablesConfig {
    pub fn new(project_id: impl Into<String>, dataset_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset_id: dataset_id.into(),
            ..Default::default()
        }
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_opt("maxResults", self.max_results);
        params
    }
}

impl BigQueryClient {
    /// List the tables of a dataset. List items are partial: schemas and
    /// sizes are only returned by [`get_table`](Self::get_table).
    pub async fn list_tables(&self, config: &ListTablesConfig) -> Result<Vec<Table>> {
        require(&config.project_id, "project_id")?;
        require(&config.dataset_id, "dataset_id")?;

        let url = self.url_for(&[
            "projects",
            &config.project_id,
            "datasets",
            &config.dataset_id,
            "tables",
        ])?;
        fetch_all::<TableList>(self, &url, config.params(), config.page_token.as_deref()).await
    }

    pub async fn get_table(&self, table: &TableReference) -> Result<Table> {
        let url = self.table_url(table)?;
        fetch_one(self, &url, &QueryParams::new()).await
    }

    /// Delete a table. Deleting a table that no longer exists is an error (404).
    pub async fn delete_table(&self, table: &TableReference) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::info!("deleting table {}", table);
        delete_one(self, &url).await
    }

    fn table_url(&self, table: &TableReference) -> Result<url::Url> {
        require(&table.project_id, "project_id")?;
        require(&table.dataset_id, "dataset_id")?;
        require(&table.table_id, "table_id")?;

        self.url_for(&[
            "projects",
            &table.project_id,
            "datasets",
            &table.dataset_id,
            "tables",
            &table.table_id,
        ])
    }
}
