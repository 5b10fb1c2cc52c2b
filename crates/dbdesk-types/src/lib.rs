//! Wire types for the dbdesk SQLite gateway and the table-operation surface.
//!
//! Field names follow the JSON the browser UI already speaks, so a few of
//! them (`Field`, `Type`, `pageSize`) are renamed on the wire.

use serde::{Deserialize, Serialize};

/// One result row: column name to value, in column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Body of `POST /api/v1/sqlite/query`.
///
/// Both fields are optional at the serde layer so that a missing field is
/// reported as a validation failure rather than a JSON decode failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

impl QueryRequest {
    pub fn new(path: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            sql: Some(sql.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    #[serde(rename = "Field")]
    pub field: String,
    #[serde(rename = "Type")]
    pub ty: String,
}

/// Normalized result of one gateway call. `total == rows.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub rows: Vec<Row>,
    pub total: usize,
    pub columns: Vec<ColumnInfo>,
}

/// Page of table data. Same shape as [`QueryResponse`], but `total` counts
/// every row matching the filters, not only the rows on this page.
pub type TableData = QueryResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub host: String,
    pub port: u16,
    pub runtime: String,
    /// Milliseconds since the Unix epoch.
    pub now: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

/// Substring filter on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
}

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableQuery {
    /// 1-based.
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<ColumnFilter>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            sort: None,
            filters: Vec::new(),
        }
    }
}

impl TableQuery {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit())
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertRowRequest {
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRowsRequest {
    pub keys: Vec<Row>,
    pub changes: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRowsRequest {
    pub keys: Vec<Row>,
}

/// Outcome of insert/update/delete. `affected` is absent when the backend
/// does not report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_info_uses_capitalized_wire_names() {
        let column = ColumnInfo {
            field: "id".into(),
            ty: "INTEGER".into(),
        };
        assert_eq!(
            serde_json::to_string(&column).unwrap(),
            r#"{"Field":"id","Type":"INTEGER"}"#
        );
    }

    #[test]
    fn query_request_tolerates_missing_fields() {
        let req: QueryRequest = serde_json::from_str(r#"{"sql":"SELECT 1"}"#).unwrap();
        assert_eq!(req.path, None);
        assert_eq!(req.sql.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn row_keeps_column_order() {
        let row: Row = serde_json::from_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn table_query_defaults_and_paging() {
        let query: TableQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, TableQuery::default());
        assert_eq!(query.offset(), 0);

        let query: TableQuery = serde_json::from_str(r#"{"page":3,"pageSize":20}"#).unwrap();
        assert_eq!(query.limit(), 20);
        assert_eq!(query.offset(), 40);

        let query = TableQuery {
            page: 0,
            page_size: 50_000,
            ..TableQuery::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
    }
}
