//! Table-aware SQL for the local strategy.
//!
//! Identifiers are always double-quoted and values are rendered as SQLite
//! literals, so the generated text can be sent through the gateway as a
//! plain script.

use dbdesk_types::{Row, TableQuery};
use serde_json::Value as JsonValue;

use crate::error::StrategyError;

pub const LIST_TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
     ORDER BY name";

/// Appended to write scripts so the last row-returning statement reports
/// the affected row count.
pub const AFFECTED_ROWS_SQL: &str = "SELECT changes() AS affected";

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Render a JSON value as a SQLite literal.
///
/// Arrays of byte-sized integers become blob literals, matching how the
/// gateway reports BLOB columns. Other arrays and objects are stored as
/// their JSON text.
pub fn literal(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "NULL".to_string(),
        JsonValue::Bool(b) => u8::from(*b).to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => quote_text(s),
        JsonValue::Array(items) => match blob_bytes(items) {
            Some(bytes) => {
                let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
                format!("x'{hex}'")
            }
            None => quote_text(&value.to_string()),
        },
        JsonValue::Object(_) => quote_text(&value.to_string()),
    }
}

fn blob_bytes(items: &[JsonValue]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

fn escape_like(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for ch in pattern.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn where_clause(query: &TableQuery) -> String {
    if query.filters.is_empty() {
        return String::new();
    }
    let predicates: Vec<String> = query
        .filters
        .iter()
        .map(|filter| {
            format!(
                "{} LIKE {} ESCAPE '\\'",
                quote_ident(&filter.column),
                quote_text(&format!("%{}%", escape_like(&filter.value)))
            )
        })
        .collect();
    format!(" WHERE {}", predicates.join(" AND "))
}

pub fn table_page_sql(table: &str, query: &TableQuery) -> String {
    let mut sql = format!("SELECT * FROM {}{}", quote_ident(table), where_clause(query));
    if let Some(sort) = &query.sort {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_ident(&sort.column),
            sort.direction.as_sql()
        ));
    }
    sql.push_str(&format!(" LIMIT {} OFFSET {}", query.limit(), query.offset()));
    sql
}

pub fn table_count_sql(table: &str, query: &TableQuery) -> String {
    format!(
        "SELECT COUNT(*) AS total FROM {}{}",
        quote_ident(table),
        where_clause(query)
    )
}

fn key_predicate(key: &Row) -> Result<String, StrategyError> {
    if key.is_empty() {
        return Err(StrategyError::InvalidInput(
            "row key must name at least one column".to_string(),
        ));
    }
    let parts: Vec<String> = key
        .iter()
        .map(|(column, value)| match value {
            JsonValue::Null => format!("{} IS NULL", quote_ident(column)),
            other => format!("{} = {}", quote_ident(column), literal(other)),
        })
        .collect();
    Ok(format!("({})", parts.join(" AND ")))
}

fn keys_predicate(keys: &[Row]) -> Result<String, StrategyError> {
    if keys.is_empty() {
        return Err(StrategyError::InvalidInput(
            "at least one row key is required".to_string(),
        ));
    }
    let parts = keys
        .iter()
        .map(key_predicate)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(" OR "))
}

pub fn insert_row_sql(table: &str, row: &Row) -> Result<String, StrategyError> {
    if row.is_empty() {
        return Err(StrategyError::InvalidInput(
            "insert requires at least one column value".to_string(),
        ));
    }
    let columns: Vec<String> = row.keys().map(|column| quote_ident(column)).collect();
    let values: Vec<String> = row.values().map(literal).collect();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.join(", "),
        values.join(", ")
    ))
}

pub fn update_rows_sql(table: &str, keys: &[Row], changes: &Row) -> Result<String, StrategyError> {
    if changes.is_empty() {
        return Err(StrategyError::InvalidInput(
            "update requires at least one changed column".to_string(),
        ));
    }
    let assignments: Vec<String> = changes
        .iter()
        .map(|(column, value)| format!("{} = {}", quote_ident(column), literal(value)))
        .collect();
    Ok(format!(
        "UPDATE {} SET {} WHERE {}",
        quote_ident(table),
        assignments.join(", "),
        keys_predicate(keys)?
    ))
}

pub fn delete_rows_sql(table: &str, keys: &[Row]) -> Result<String, StrategyError> {
    Ok(format!(
        "DELETE FROM {} WHERE {}",
        quote_ident(table),
        keys_predicate(keys)?
    ))
}

/// Join a write statement with [`AFFECTED_ROWS_SQL`] into one script.
pub fn with_affected_rows(write_sql: &str) -> String {
    format!("{write_sql}; {AFFECTED_ROWS_SQL};")
}
