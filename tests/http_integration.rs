//! Integration tests for the BigQuery client using wiremock
//!
//! These tests drive the real reqwest transport against mocked endpoints,
//! covering pagination, query encoding and error handling.

use bqrest::model::{DatasetReference, JobReference, JobState, TableReference};
use bqrest::resource::{ListDatasetsConfig, ListJobsConfig, ListTablesConfig};
use bqrest::{BigQueryClient, Error, GcpCredentials};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{bearer_token, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BigQueryClient {
    BigQueryClient::with_credentials(
        &format!("{}/bigquery/v2/", server.uri()),
        GcpCredentials::from_static_token("test-token"),
        None,
    )
    .expect("client should build")
}

fn dataset(id: &str) -> serde_json::Value {
    json!({
        "kind": "bigquery#dataset",
        "id": format!("test-project:{}", id),
        "datasetReference": {"projectId": "test-project", "datasetId": id},
        "location": "US"
    })
}

fn table(id: &str) -> serde_json::Value {
    json!({
        "tableReference": {"projectId": "test-project", "datasetId": "sales", "tableId": id},
        "type": "TABLE"
    })
}

/// Pagination against a live HTTP server
mod pagination_tests {
    use super::*;

    /// Test that every page is fetched and items keep server order
    #[tokio::test]
    async fn test_list_datasets_follows_page_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets"))
            .and(query_param("pageToken", "t1"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [dataset("c")]
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets"))
            .and(query_param_is_missing("pageToken"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [dataset("a"), dataset("b")],
                "nextPageToken": "t1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let datasets = assert_ok!(
            client(&server)
                .list_datasets(&ListDatasetsConfig::new("test-project"))
                .await
        );

        let ids: Vec<_> = datasets
            .iter()
            .map(|d| d.dataset_reference.dataset_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    /// Test that an explicit page token fetches exactly one page
    #[tokio::test]
    async fn test_explicit_page_token_fetches_single_page() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets/sales/tables"))
            .and(query_param("pageToken", "resume-here"))
            .and(query_param("maxResults", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tables": [table("orders"), table("refunds")],
                "nextPageToken": "after",
                "totalItems": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ListTablesConfig {
            max_results: Some(2),
            page_token: Some("resume-here".into()),
            ..ListTablesConfig::new("test-project", "sales")
        };
        let tables = assert_ok!(client(&server).list_tables(&config).await);

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].table_reference.table_id, "refunds");
    }

    /// Test that an error on a later page discards earlier results
    #[tokio::test]
    async fn test_error_mid_listing_returns_no_items() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets"))
            .and(query_param("pageToken", "t1"))
            .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets"))
            .and(query_param_is_missing("pageToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "datasets": [dataset("a")],
                "nextPageToken": "t1"
            })))
            .mount(&server)
            .await;

        let err = assert_err!(
            client(&server)
                .list_datasets(&ListDatasetsConfig::new("test-project"))
                .await
        );
        assert_eq!(err.status(), Some(503));
    }
}

/// Request construction and error handling
mod http_client_tests {
    use super::*;

    /// Test that job state filters are sent as repeated parameters
    #[tokio::test]
    async fn test_list_jobs_sends_repeated_state_filter() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/jobs"))
            .and(query_param("allUsers", "true"))
            .and(query_param("projection", "FULL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jobs": [{
                    "jobReference": {"projectId": "test-project", "jobId": "job_1", "location": "US"},
                    "status": {"state": "RUNNING"}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ListJobsConfig {
            all_users: Some(true),
            projection: Some(bqrest::model::JobProjection::Full),
            state_filter: vec![JobState::Pending, JobState::Running],
            ..ListJobsConfig::new("test-project")
        };
        let jobs = assert_ok!(client(&server).list_jobs(&config).await);
        assert_eq!(jobs.len(), 1);

        let requests = server.received_requests().await.expect("recording enabled");
        let states: Vec<String> = requests[0]
            .url
            .query_pairs()
            .filter(|(k, _)| k == "stateFilter")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(states, ["PENDING", "RUNNING"]);
    }

    /// Test that the job location travels as a query parameter
    #[tokio::test]
    async fn test_get_job_with_location() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/jobs/job_1"))
            .and(query_param("location", "europe-west2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jobReference": {"projectId": "test-project", "jobId": "job_1", "location": "europe-west2"},
                "configuration": {"jobType": "QUERY", "query": {"query": "SELECT 1"}},
                "statistics": {"creationTime": "1704067200000"},
                "status": {"state": "DONE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reference = JobReference {
            project_id: "test-project".into(),
            job_id: "job_1".into(),
            location: Some("europe-west2".into()),
        };
        let job = assert_ok!(client(&server).get_job(&reference).await);

        let job_type = job.configuration.as_ref().and_then(|c| c.job_type.as_deref());
        assert_eq!(job_type, Some("QUERY"));
        let created = job.statistics.and_then(|s| s.creation_time).expect("creation time");
        assert_eq!(created, 1_704_067_200_000);
    }

    /// Test that a 404 keeps the API's status and message
    #[tokio::test]
    async fn test_404_returns_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "Not found: Dataset test-project:missing",
                    "errors": [{"reason": "notFound", "message": "Not found: Dataset test-project:missing"}]
                }
            })))
            .mount(&server)
            .await;

        let err = assert_err!(
            client(&server)
                .get_dataset(&DatasetReference::new("test-project", "missing"))
                .await
        );

        match err {
            Error::Api { status, message, errors } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found: Dataset test-project:missing");
                assert_eq!(errors[0].reason.as_deref(), Some("notFound"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    /// Test that a 401 on the first page surfaces immediately
    #[tokio::test]
    async fn test_401_returns_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": 401, "message": "Invalid credentials"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = assert_err!(
            client(&server)
                .list_datasets(&ListDatasetsConfig::new("test-project"))
                .await
        );
        assert_eq!(err.status(), Some(401));
        assert!(bqrest::format_api_error(&err).contains("Authentication"));
    }

    /// Test that a body that isn't JSON is reported as a decode failure
    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bigquery/v2/projects/test-project/datasets/sales/tables/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let err = assert_err!(
            client(&server)
                .get_table(&TableReference::new("test-project", "sales", "orders"))
                .await
        );
        assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
    }

    /// Test that delete accepts an empty 204 response
    #[tokio::test]
    async fn test_delete_table_no_content() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/bigquery/v2/projects/test-project/datasets/sales/tables/orders"))
            .and(bearer_token("test-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        assert_ok!(
            client(&server)
                .delete_table(&TableReference::new("test-project", "sales", "orders"))
                .await
        );
    }

    /// Test that a failed delete reports the conflict
    #[tokio::test]
    async fn test_delete_table_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/bigquery/v2/projects/test-project/datasets/sales/tables/orders"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": {"code": 409, "message": "Table is in use"}
            })))
            .mount(&server)
            .await;

        let err = assert_err!(
            client(&server)
                .delete_table(&TableReference::new("test-project", "sales", "orders"))
                .await
        );
        assert_eq!(err.status(), Some(409));
    }

    /// Test that empty identifiers never reach the network
    #[tokio::test]
    async fn test_empty_dataset_id_sends_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let err = assert_err!(
            client(&server)
                .get_dataset(&DatasetReference::new("test-project", ""))
                .await
        );
        assert!(matches!(err, Error::MissingArgument(_)));
    }
}
