//! BigQuery resource shapes
//!
//! Plain serde mirrors of the v2 REST resources. Identity fields are required,
//! everything else is an `Option` so "absent" never collapses into a zero
//! value. Large integers use [`Int64`].
//!
//! - [`dataset`] - datasets and their access rules
//! - [`table`] - tables, schemas and table-level configuration
//! - [`job`] - jobs, job configuration, statistics and status
//! - [`reference`] - composite keys shared by all of the above

pub mod dataset;
mod int64;
pub mod job;
pub mod reference;
pub mod table;

use serde::{Deserialize, Serialize};

pub use dataset::{Dataset, DatasetAccess, DatasetList};
pub use int64::Int64;
pub use job::{Job, JobList, JobProjection, JobState, JobStatus};
pub use reference::{
    DatasetReference, JobReference, ModelReference, RoutineReference, TableReference,
};
pub use table::{Table, TableFieldSchema, TableList, TableSchema};

/// Error information attached to a job status or an API failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `KMS` key used to protect a table or a query destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_name: Option<String>,
}

/// One page of a list endpoint.
///
/// Implemented by the `*List` envelopes so the pagination loop can stay
/// generic over the resource kind.
pub trait ListEnvelope: serde::de::DeserializeOwned {
    type Item;

    /// Token for the next page. `None` or an empty string ends pagination.
    fn next_page_token(&self) -> Option<&str>;

    fn into_items(self) -> Vec<Self::Item>;
}
