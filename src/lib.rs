//! Typed client for the BigQuery v2 REST control plane.
//!
//! Lists and fetches datasets, tables and jobs, and deletes tables. List
//! operations follow `nextPageToken` until the server stops returning one,
//! unless the caller pins a single page with an explicit page token.
//!
//! ```ignore
//! use bqrest::{BigQueryClient, resource::ListJobsConfig};
//! use bqrest::model::JobState;
//!
//! # async fn run() -> bqrest::Result<()> {
//! let client = BigQueryClient::new().await?;
//! let running = client
//!     .list_jobs(&ListJobsConfig {
//!         state_filter: vec![JobState::Running],
//!         ..ListJobsConfig::new("my-project")
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gcp;
pub mod model;
pub mod resource;

pub use error::{format_api_error, Error, Result};
pub use gcp::auth::GcpCredentials;
pub use gcp::client::{BigQueryClient, DEFAULT_BASE_URL};
pub use gcp::http::{GcpHttpClient, Transport};
