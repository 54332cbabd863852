//! BigQuery operations
//!
//! Every operation is an `async fn` on [`BigQueryClient`](crate::BigQueryClient)
//! that performs its requests strictly in sequence.
//!
//! # Architecture
//!
//! - [`fetcher`] - the shared request loop: single GET, DELETE, and auto-pagination
//! - [`datasets`] - `datasets.list` / `datasets.get`
//! - [`tables`] - `tables.list` / `tables.get` / `tables.delete`
//! - [`jobs`] - `jobs.list` / `jobs.get`
//!
//! # Example
//!
//! ```ignore
//! use bqrest::resource::ListTablesConfig;
//!
//! async fn list(client: &bqrest::BigQueryClient) -> bqrest::Result<()> {
//!     let tables = client.list_tables(&ListTablesConfig::new("my-project", "analytics")).await?;
//!     for table in tables {
//!         println!("{}", table.table_reference);
//!     }
//!     Ok(())
//! }
//! ```

pub mod datasets;
pub mod fetcher;
pub mod jobs;
pub mod tables;

#[cfg(test)]
pub(crate) mod testing;

pub use datasets::ListDatasetsConfig;
pub use fetcher::{delete_one, fetch_all, fetch_one, QueryParams};
pub use jobs::ListJobsConfig;
pub use tables::ListTablesConfig;
