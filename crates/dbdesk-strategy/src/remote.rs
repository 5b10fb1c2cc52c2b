use dbdesk_gateway::client::request_json;
use dbdesk_types::{
    DeleteRowsRequest, InsertRowRequest, Row, TableData, TableQuery, UpdateRowsRequest,
    WriteOutcome,
};

use crate::error::StrategyError;
use crate::resolver::DatabaseDetailStrategy;

/// Blocking client for the remote table-operation API.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tables_url(&self, conn_id: &str) -> String {
        format!(
            "{}/api/connections/{}/tables",
            self.base_url,
            urlencoding::encode(conn_id)
        )
    }

    pub fn rows_url(&self, conn_id: &str, table: &str) -> String {
        format!(
            "{}/{}/rows",
            self.tables_url(conn_id),
            urlencoding::encode(table)
        )
    }
}

/// Table operations forwarded verbatim to the remote API.
#[derive(Debug, Clone)]
pub struct RemoteStrategy {
    client: RemoteClient,
}

impl RemoteStrategy {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

impl DatabaseDetailStrategy for RemoteStrategy {
    fn list_tables(&self, conn_id: &str) -> Result<Vec<String>, StrategyError> {
        Ok(request_json::<(), _>(
            "GET",
            &self.client.tables_url(conn_id),
            None,
        )?)
    }

    fn get_table_data(
        &self,
        conn_id: &str,
        table: &str,
        query: &TableQuery,
    ) -> Result<TableData, StrategyError> {
        let url = format!("{}/query", self.client.rows_url(conn_id, table));
        Ok(request_json("POST", &url, Some(query))?)
    }

    fn delete_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
    ) -> Result<WriteOutcome, StrategyError> {
        let url = format!("{}/delete", self.client.rows_url(conn_id, table));
        let body = DeleteRowsRequest {
            keys: keys.to_vec(),
        };
        Ok(request_json("POST", &url, Some(&body))?)
    }

    fn insert_row(&self, conn_id: &str, table: &str, row: &Row) -> Result<WriteOutcome, StrategyError> {
        let body = InsertRowRequest { row: row.clone() };
        Ok(request_json(
            "POST",
            &self.client.rows_url(conn_id, table),
            Some(&body),
        )?)
    }

    fn update_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
        changes: &Row,
    ) -> Result<WriteOutcome, StrategyError> {
        let body = UpdateRowsRequest {
            keys: keys.to_vec(),
            changes: changes.clone(),
        };
        Ok(request_json(
            "PUT",
            &self.client.rows_url(conn_id, table),
            Some(&body),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_encoded() {
        let client = RemoteClient::new("https://api.example.com/");
        assert_eq!(
            client.tables_url("pg/42"),
            "https://api.example.com/api/connections/pg%2F42/tables"
        );
        assert_eq!(
            client.rows_url("pg-42", "order items"),
            "https://api.example.com/api/connections/pg-42/tables/order%20items/rows"
        );
    }
}
