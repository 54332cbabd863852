//! Table resource
//!
//! https://cloud.google.com/bigquery/docs/reference/rest/v2/tables

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{EncryptionConfiguration, Int64, ListEnvelope, TableReference};

/// Response of `tables.list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    /// Total number of tables in the dataset, across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<i64>,
}

impl ListEnvelope for TableList {
    type Item = Table;

    fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    fn into_items(self) -> Vec<Table> {
        self.tables.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    pub table_reference: TableReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_partitioning: Option<TimePartitioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_partitioning: Option<RangePartitioning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clustering: Option<Clustering>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_partition_filter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_bytes: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_long_term_bytes: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_rows: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<Int64>,
    /// `TABLE`, `VIEW`, `EXTERNAL`, `MATERIALIZED_VIEW` or `SNAPSHOT`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materialized_view: Option<MaterializedViewDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data_configuration: Option<ExternalDataConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_buffer: Option<StreamingBuffer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption_configuration: Option<EncryptionConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_definition: Option<SnapshotDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<TableFieldSchema>>,
}

impl TableSchema {
    /// Top-level fields, empty when the schema has none.
    pub fn fields(&self) -> &[TableFieldSchema] {
        self.fields.as_deref().unwrap_or_default()
    }

    /// Walk the schema depth-first, yielding every field with its dotted path
    /// (`address.city` for a `city` field nested in an `address` record).
    /// Sub-fields come before the record that contains them.
    pub fn flatten(&self) -> Vec<(String, &TableFieldSchema)> {
        fn walk<'a>(
            prefix: Option<&str>,
            fields: &'a [TableFieldSchema],
            out: &mut Vec<(String, &'a TableFieldSchema)>,
        ) {
            for field in fields {
                let path = match prefix {
                    Some(prefix) => format!("{prefix}.{}", field.name),
                    None => field.name.clone(),
                };

                walk(Some(&path), field.sub_fields(), out);
                out.push((path, field));
            }
        }

        let mut out = Vec::new();
        walk(None, self.fields(), &mut out);
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFieldSchema {
    pub name: String,
    /// `STRING`, `INTEGER`, `RECORD`, ... (legacy and standard SQL names both occur)
    #[serde(rename = "type")]
    pub ty: String,
    /// `NULLABLE` (the default when absent), `REQUIRED` or `REPEATED`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Sub-fields of a `RECORD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<TableFieldSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_tags: Option<PolicyTagList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Int64>,
}

impl TableFieldSchema {
    /// Sub-fields of a `RECORD`, empty for scalar columns.
    pub fn sub_fields(&self) -> &[TableFieldSchema] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn is_repeated(&self) -> bool {
        self.mode.as_deref() == Some("REPEATED")
    }

    pub fn is_required(&self) -> bool {
        self.mode.as_deref() == Some("REQUIRED")
    }

    pub fn is_record(&self) -> bool {
        matches!(self.ty.as_str(), "RECORD" | "STRUCT")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTagList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePartitioning {
    /// `DAY`, `HOUR`, `MONTH` or `YEAR`.
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_ms: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePartitioning {
    pub field: String,
    pub range: PartitionRange,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartitionRange {
    pub start: Int64,
    pub end: Int64,
    pub interval: Int64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clustering {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewDefinition {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_function_resources: Option<Vec<UserDefinedFunctionResource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_legacy_sql: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDefinedFunctionResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedViewDefinition {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refresh_time: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_refresh: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<Int64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDataConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bad_records: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autodetect: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_unknown_values: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_options: Option<CsvOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bigtable_options: Option<BigtableOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_sheets_options: Option<GoogleSheetsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hive_partitioning_options: Option<HivePartitioningOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_target_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parquet_options: Option<ParquetOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_delimiter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_leading_rows: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_quoted_newlines: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_jagged_rows: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BigtableOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_families: Option<Vec<BigtableColumnFamily>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_unspecified_column_families: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_rowkey_as_string: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BigtableColumnFamily {
    pub family_id: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<BigtableColumn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_read_latest: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BigtableColumn {
    /// Base64 encoded qualifier.
    pub qualifier_encoded: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_read_latest: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSheetsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_leading_rows: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HivePartitioningOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_uri_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_partition_filter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParquetOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_as_string: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_list_inference: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingBuffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_bytes: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_rows: Option<Int64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oldest_entry_time: Option<Int64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDefinition {
    pub base_table_reference: TableReference,
    /// RFC 3339 timestamp of the base table at snapshot time.
    pub snapshot_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn events_table() -> serde_json::Value {
        json!({
            "kind": "bigquery#table",
            "id": "proj:ds.events",
            "tableReference": {"projectId": "proj", "datasetId": "ds", "tableId": "events"},
            "schema": {
                "fields": [
                    {"name": "id", "type": "INTEGER", "mode": "REQUIRED"},
                    {"name": "tags", "type": "STRING", "mode": "REPEATED"},
                    {"name": "address", "type": "RECORD", "fields": [
                        {"name": "city", "type": "STRING"},
                        {"name": "zip", "type": "STRING"}
                    ]}
                ]
            },
            "timePartitioning": {"type": "DAY", "field": "ts"},
            "numRows": "18446744",
            "numBytes": "0",
            "creationTime": "1600000000000",
            "type": "TABLE"
        })
    }

    #[test]
    fn test_table_decodes() {
        let table: Table = serde_json::from_value(events_table()).unwrap();

        assert_eq!(table.table_reference.table_id, "events");
        assert_eq!(table.num_rows, Some(Int64(18_446_744)));
        assert_eq!(table.num_bytes, Some(Int64(0)));
        assert!(table.num_long_term_bytes.is_none());
        assert_eq!(table.ty.as_deref(), Some("TABLE"));
        assert_eq!(table.time_partitioning.unwrap().field.as_deref(), Some("ts"));
    }

    #[test]
    fn test_schema_flatten_and_modes() {
        let table: Table = serde_json::from_value(events_table()).unwrap();
        let schema = table.schema.unwrap();

        let paths: Vec<_> = schema.flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            paths,
            ["id", "tags", "address.city", "address.zip", "address"]
        );

        let fields = schema.fields();
        assert!(fields[0].is_required());
        assert!(fields[1].is_repeated());
        assert!(fields[2].is_record());
        assert!(!fields[2].is_repeated());
        assert_eq!(fields[2].sub_fields().len(), 2);
        assert!(fields[0].sub_fields().is_empty());
    }

    #[test]
    fn test_zero_max_bad_records_survives() {
        let config = ExternalDataConfiguration {
            source_uris: Some(vec!["gs://bucket/*.csv".into()]),
            max_bad_records: Some(0),
            ..Default::default()
        };

        let encoded = serde_json::to_value(&config).unwrap();
        assert_eq!(encoded["maxBadRecords"], json!(0));
        assert!(encoded.get("autodetect").is_none());

        let decoded: ExternalDataConfiguration = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded.max_bad_records, Some(0));
    }

    #[test]
    fn test_table_list_total_items() {
        let page: TableList = serde_json::from_value(json!({
            "kind": "bigquery#tableList",
            "tables": [events_table()],
            "totalItems": 1
        }))
        .unwrap();

        assert_eq!(page.total_items, Some(1));
        assert!(page.next_page_token().is_none());
        assert_eq!(page.into_items().len(), 1);
    }

    #[test]
    fn test_table_list_page_reencodes_unchanged() {
        let wire = json!({
            "kind": "bigquery#tableList",
            "etag": "e7",
            "nextPageToken": "t2",
            "totalItems": 3,
            "tables": [
                events_table(),
                {
                    "tableReference": {"projectId": "proj", "datasetId": "ds", "tableId": "clicks"},
                    "schema": {"fields": [
                        {"name": "user", "type": "RECORD", "fields": []},
                        {"name": "email", "type": "STRING", "policyTags": {"names": []}}
                    ]},
                    "clustering": {"fields": ["user"]},
                    "numBytes": "9223372036854775807",
                    "numLongTermBytes": "0",
                    "expirationTime": "1893456000000",
                    "type": "TABLE"
                },
                {
                    "tableReference": {"projectId": "proj", "datasetId": "ds", "tableId": "ext"},
                    "externalDataConfiguration": {"sourceUris": [], "sourceFormat": "CSV"},
                    "type": "EXTERNAL"
                }
            ]
        });

        let page: TableList = serde_json::from_value(wire.clone()).unwrap();
        let clicks = &page.tables.as_ref().unwrap()[1];
        let schema = clicks.schema.as_ref().unwrap();
        assert_eq!(schema.fields()[0].fields, Some(vec![]));
        assert_eq!(clicks.num_bytes, Some(Int64(i64::MAX)));

        assert_eq!(serde_json::to_value(&page).unwrap(), wire);
    }

    #[test]
    fn test_schema_without_fields_key() {
        let wire = json!({});
        let schema: TableSchema = serde_json::from_value(wire.clone()).unwrap();

        assert!(schema.fields.is_none());
        assert!(schema.flatten().is_empty());
        assert_eq!(serde_json::to_value(&schema).unwrap(), wire);
    }
}
