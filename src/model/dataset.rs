//! Dataset resource
//!
//! https://cloud.google.com/bigquery/docs/reference/rest/v2/datasets

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{DatasetReference, Int64, ListEnvelope, RoutineReference, TableReference};

/// Response of `datasets.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    /// Omitted by the server when the project has no datasets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<Dataset>>,
}

impl ListEnvelope for DatasetList {
    type Item = Dataset;

    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    fn into_items(self) -> Vec<Dataset> {
        self.datasets.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    pub dataset_reference: DatasetReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_table_expiration_ms: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_partition_expiration_ms: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Vec<DatasetAccess>>,
    /// Milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<Int64>,
    /// Milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_encryption_configuration: Option<super::EncryptionConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfies_pzs: Option<bool>,
}

/// One entry of a dataset's access control list.
///
/// Exactly one of the grantee fields is set by the server; `view` and
/// `routine` authorize another resource rather than a principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetAccess {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_by_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<TableReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<RoutineReference>,
}
