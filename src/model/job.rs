//! Job resource
//!
//! https://cloud.google.com/bigquery/docs/reference/rest/v2/Job

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::table::{Clustering, RangePartitioning, TimePartitioning, UserDefinedFunctionResource};
use super::{
    DatasetReference, EncryptionConfiguration, ErrorProto, Int64, JobReference, ListEnvelope,
    TableReference,
};

/// Response of `jobs.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<Job>>,
}

impl ListEnvelope for JobList {
    type Item = Job;

    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    fn into_items(self) -> Vec<Job> {
        self.jobs.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// The API spells this one in snake case.
    #[serde(default, rename = "user_email", skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Omitted for jobs listed with the `MINIMAL` projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<JobConfiguration>,
    pub job_reference: JobReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<JobStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfiguration {
    /// `QUERY`, `LOAD`, `EXTRACT`, `COPY` or `UNKNOWN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<JobConfigurationQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<JobConfigurationLoad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copy: Option<JobConfigurationTableCopy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<JobConfigurationExtract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_timeout_ms: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_table: Option<TableReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<DatasetReference>,
    /// `CREATE_IF_NEEDED` or `CREATE_NEVER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_disposition: Option<String>,
    /// `WRITE_TRUNCATE`, `WRITE_APPEND` or `WRITE_EMPTY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_disposition: Option<String>,
    /// `INTERACTIVE` or `BATCH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_legacy_sql: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_query_cache: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_large_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flatten_results: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_bytes_billed: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_billing_tier: Option<i64>,
    /// `POSITIONAL` or `NAMED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_update_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_partitioning: Option<TimePartitioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_partitioning: Option<RangePartitioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustering: Option<Clustering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_encryption_configuration: Option<EncryptionConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_function_resources: Option<Vec<UserDefinedFunctionResource>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationLoad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_table: Option<TableReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_disposition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bad_records: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autodetect: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationTableCopy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<TableReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tables: Option<Vec<TableReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_table: Option<TableReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_disposition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationExtract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_table: Option<TableReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_bytes_processed: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_deferments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_slot_ms: Option<Int64>,
    #[serde(default, rename = "reservation_id", skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_child_jobs: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_job_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    /// Set when the job failed; the job is `DONE` in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_result: Option<ErrorProto>,
    /// Every error hit while running, including non-fatal ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorProto>>,
    pub state: JobState,
}

impl JobStatus {
    pub fn is_done(&self) -> bool {
        self.state == JobState::Done
    }

    pub fn first_error(&self) -> Option<&ErrorProto> {
        self.error_result
            .as_ref()
            .or_else(|| self.errors.as_ref().and_then(|errors| errors.first()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Done,
    Pending,
    Running,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Done => "DONE",
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of each job `jobs.list` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobProjection {
    /// Includes the job configuration.
    Full,
    /// Omits the job configuration.
    Minimal,
}

impl JobProjection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Minimal => "MINIMAL",
        }
    }
}

impl fmt::Display for JobProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
