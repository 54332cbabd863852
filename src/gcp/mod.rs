//! GCP API interaction module
//!
//! Authentication, the HTTP transport, and the client every BigQuery
//! operation goes through.
//!
//! # Module Structure
//!
//! - [`auth`] - GCP authentication using Application Default Credentials
//! - [`client`] - [`BigQueryClient`](client::BigQueryClient), base URL and route building
//! - [`http`] - the [`Transport`](http::Transport) seam and its reqwest implementation
//!
//! # Example
//!
//! ```ignore
//! use bqrest::BigQueryClient;
//! use bqrest::resource::ListDatasetsConfig;
//!
//! async fn example() -> bqrest::Result<()> {
//!     let client = BigQueryClient::new().await?;
//!     let datasets = client.list_datasets(&ListDatasetsConfig::new("my-project")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
