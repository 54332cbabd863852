//! Job operations
//!
//! `jobs.list` and `jobs.get`.

use chrono::{DateTime, Utc};

use super::fetcher::{fetch_all, fetch_one, require, QueryParams};
use crate::error::Result;
use crate::gcp::client::BigQueryClient;
use crate::model::{Job, JobList, JobProjection, JobReference, JobState};

/// Filters for [`BigQueryClient::list_jobs`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListJobsConfig {
    pub project_id: String,
    /// Include jobs of every user in the project, not only the caller's.
    pub all_users: Option<bool>,
    pub max_results: Option<u32>,
    /// Only jobs created at or after this instant. Sent as epoch milliseconds.
    pub min_creation_time: Option<DateTime<Utc>>,
    /// Only jobs created at or before this instant. Sent as epoch milliseconds.
    pub max_creation_time: Option<DateTime<Utc>>,
    /// Fetch only this page instead of the whole listing.
    pub page_token: Option<String>,
    pub projection: Option<JobProjection>,
    /// Empty means every state.
    pub state_filter: Vec<JobState>,
    /// Only children of this script job.
    pub parent_job_id: Option<String>,
}

impl ListJobsConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.set_opt("allUsers", self.all_users);
        params.set_opt("maxResults", self.max_results);
        params.set_opt(
            "minCreationTime",
            self.min_creation_time.map(|t| t.timestamp_millis()),
        );
        params.set_opt(
            "maxCreationTime",
            self.max_creation_time.map(|t| t.timestamp_millis()),
        );
        params.set_opt("projection", self.projection);
        for state in &self.state_filter {
            params.append("stateFilter", state);
        }
        params.set_opt("parentJobId", self.parent_job_id.as_deref());
        params
    }
}

impl BigQueryClient {
    /// List the jobs of a project, newest first, following every page unless
    /// `config.page_token` asks for a single one.
    pub async fn list_jobs(&self, config: &ListJobsConfig) -> Result<Vec<Job>> {
        require(&config.project_id, "project_id")?;

        let url = self.url_for(&["projects", &config.project_id, "jobs"])?;
        fetch_all::<JobList>(self, &url, config.params(), config.page_token.as_deref()).await
    }

    /// Get a job. The reference's location is required by the API for jobs
    /// outside the US and EU multi-regions.
    pub async fn get_job(&self, job: &JobReference) -> Result<Job> {
        require(&job.project_id, "project_id")?;
        require(&job.job_id, "job_id")?;

        let url = self.url_for(&["projects", &job.project_id, "jobs", &job.job_id])?;

        let mut params = QueryParams::new();
        params.set_opt("location", job.location.as_deref());

        fetch_one(self, &url, &params).await
    }
}
