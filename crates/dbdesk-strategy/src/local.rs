use dbdesk_gateway::GatewayClient;
use dbdesk_types::{QueryResponse, Row, TableData, TableQuery, WriteOutcome};
use tracing::debug;

use crate::error::StrategyError;
use crate::resolver::DatabaseDetailStrategy;
use crate::sqlgen;

/// Prefix marking a connection identifier as a local SQLite file. The rest
/// of the identifier is the file path.
pub const LOCAL_CONNECTION_PREFIX: &str = "sqlite:";

pub fn is_local_connection(conn_id: &str) -> bool {
    conn_id.starts_with(LOCAL_CONNECTION_PREFIX)
}

pub fn local_database_path(conn_id: &str) -> Option<&str> {
    conn_id
        .strip_prefix(LOCAL_CONNECTION_PREFIX)
        .filter(|path| !path.is_empty())
}

/// Table operations against a local SQLite file, run through the gateway.
#[derive(Debug, Clone)]
pub struct LocalStrategy {
    gateway: GatewayClient,
}

impl LocalStrategy {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    /// Generated SQL embeds row values, so only the operation is logged.
    fn run(
        &self,
        conn_id: &str,
        operation: &'static str,
        table: Option<&str>,
        sql: &str,
    ) -> Result<QueryResponse, StrategyError> {
        let path = local_database_path(conn_id).ok_or_else(|| {
            StrategyError::InvalidInput(format!("not a local sqlite connection: {conn_id}"))
        })?;
        debug!(%path, operation, table, "local strategy query");
        Ok(self.gateway.query(path, sql)?)
    }

    fn run_write(
        &self,
        conn_id: &str,
        operation: &'static str,
        table: &str,
        write_sql: &str,
    ) -> Result<WriteOutcome, StrategyError> {
        let response = self.run(
            conn_id,
            operation,
            Some(table),
            &sqlgen::with_affected_rows(write_sql),
        )?;
        Ok(WriteOutcome {
            affected: first_u64(&response, "affected"),
        })
    }
}

fn first_u64(response: &QueryResponse, column: &str) -> Option<u64> {
    response.rows.first()?.get(column)?.as_u64()
}

impl DatabaseDetailStrategy for LocalStrategy {
    fn list_tables(&self, conn_id: &str) -> Result<Vec<String>, StrategyError> {
        let response = self.run(conn_id, "list_tables", None, sqlgen::LIST_TABLES_SQL)?;
        Ok(response
            .rows
            .iter()
            .filter_map(|row| row.get("name")?.as_str().map(str::to_string))
            .collect())
    }

    fn get_table_data(
        &self,
        conn_id: &str,
        table: &str,
        query: &TableQuery,
    ) -> Result<TableData, StrategyError> {
        let page = self.run(
            conn_id,
            "table_page",
            Some(table),
            &sqlgen::table_page_sql(table, query),
        )?;
        let count = self.run(
            conn_id,
            "table_count",
            Some(table),
            &sqlgen::table_count_sql(table, query),
        )?;
        let total = first_u64(&count, "total").unwrap_or(page.rows.len() as u64);
        Ok(TableData {
            rows: page.rows,
            total: usize::try_from(total).unwrap_or(usize::MAX),
            columns: page.columns,
        })
    }

    fn delete_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
    ) -> Result<WriteOutcome, StrategyError> {
        self.run_write(conn_id, "delete_rows", table, &sqlgen::delete_rows_sql(table, keys)?)
    }

    fn insert_row(&self, conn_id: &str, table: &str, row: &Row) -> Result<WriteOutcome, StrategyError> {
        self.run_write(conn_id, "insert_row", table, &sqlgen::insert_row_sql(table, row)?)
    }

    fn update_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
        changes: &Row,
    ) -> Result<WriteOutcome, StrategyError> {
        self.run_write(
            conn_id,
            "update_rows",
            table,
            &sqlgen::update_rows_sql(table, keys, changes)?,
        )
    }
}
