//! Runs a multi-statement script against a SQLite file and normalizes the
//! outcome into a [`QueryResponse`].
//!
//! Statements run in script order under SQLite's autocommit. A failing
//! statement aborts the call; earlier statements stay committed. Only the
//! last row-returning statement's rows reach the caller.

use std::path::Path;
use std::time::{Duration, Instant};

use dbdesk_sql::{QueryKind, classify, split_statements};
use dbdesk_types::{ColumnInfo, QueryResponse, Row};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde_json::Value as JsonValue;

use crate::error::QueryError;

/// Progress handler callback interval (in SQLite virtual-machine ops).
const PROGRESS_HANDLER_OPS: i32 = 1000;

const UNKNOWN_COLUMN_TYPE: &str = "unknown";

struct ColumnMeta {
    name: String,
    decl_type: Option<String>,
}

/// Rows and columns of the most recent row-returning statement.
#[derive(Default)]
struct ResultState {
    rows: Vec<Row>,
    columns: Vec<ColumnMeta>,
}

impl ResultState {
    fn into_response(self) -> QueryResponse {
        let columns = self
            .columns
            .into_iter()
            .map(|column| ColumnInfo {
                field: column.name,
                ty: column
                    .decl_type
                    .unwrap_or_else(|| UNKNOWN_COLUMN_TYPE.to_string()),
            })
            .collect();
        QueryResponse {
            total: self.rows.len(),
            rows: self.rows,
            columns,
        }
    }
}

/// Execute `script` against the database at `path` with no time limit.
pub fn execute(path: &Path, script: &str) -> Result<QueryResponse, QueryError> {
    execute_with_timeout(path, script, None)
}

/// Execute `script` against the database at `path`.
///
/// With a `timeout`, the running statement is interrupted once the budget
/// is spent and the call fails with the engine's `interrupted` error.
pub fn execute_with_timeout(
    path: &Path,
    script: &str,
    timeout: Option<Duration>,
) -> Result<QueryResponse, QueryError> {
    if !path.exists() {
        return Err(QueryError::NotFound {
            path: std::path::absolute(path)
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string(),
        });
    }

    let conn = open_existing(path)?;
    if let Some(timeout) = timeout {
        install_deadline(&conn, Instant::now() + timeout);
    }

    let statements = split_statements(script);
    if statements.is_empty() {
        return Ok(QueryResponse::default());
    }

    let mut state = ResultState::default();
    for statement in &statements {
        match classify(statement) {
            QueryKind::Returning => state = fetch_all(&conn, statement)?,
            QueryKind::NonReturning => conn.execute_batch(statement)?,
        }
    }
    Ok(state.into_response())
}

fn open_existing(path: &Path) -> Result<Connection, QueryError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Ok(Connection::open_with_flags(path, flags)?)
}

fn install_deadline(conn: &Connection, deadline: Instant) {
    conn.progress_handler(
        PROGRESS_HANDLER_OPS,
        Some(move || Instant::now() > deadline),
    );
}

fn fetch_all(conn: &Connection, sql: &str) -> Result<ResultState, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<ColumnMeta> = stmt
        .columns()
        .iter()
        .map(|column| ColumnMeta {
            name: column.name().to_string(),
            decl_type: column.decl_type().map(str::to_string),
        })
        .collect();

    let mut rows = Vec::new();
    let mut raw_rows = stmt.raw_query();
    while let Some(row) = raw_rows.next()? {
        let mut out = Row::new();
        for (index, column) in columns.iter().enumerate() {
            out.insert(column.name.clone(), sqlite_value_to_json(row.get_ref(index)?));
        }
        rows.push(out);
    }
    Ok(ResultState { rows, columns })
}

fn sqlite_value_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(v) => JsonValue::Number(v.into()),
        ValueRef::Real(v) => serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => bytes.iter().map(|byte| JsonValue::from(*byte)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fresh_db() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("test.sqlite");
        Connection::open(&path).expect("create sqlite file");
        (dir, path)
    }

    fn row(value: serde_json::Value) -> Row {
        match value {
            JsonValue::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn create_insert_select_returns_the_inserted_row() {
        let (_dir, path) = fresh_db();
        let result = execute(
            &path,
            "CREATE TABLE t(x); INSERT INTO t VALUES (1); SELECT * FROM t;",
        )
        .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.rows, vec![row(json!({"x": 1}))]);
        assert_eq!(
            result.columns,
            vec![ColumnInfo {
                field: "x".into(),
                ty: "unknown".into()
            }]
        );
    }

    #[test]
    fn write_only_script_returns_empty_result() {
        let (_dir, path) = fresh_db();
        let result = execute(&path, "CREATE TABLE t(x INTEGER); INSERT INTO t VALUES (1)").unwrap();
        assert_eq!(result, QueryResponse::default());
    }

    #[test]
    fn empty_script_returns_empty_result() {
        let (_dir, path) = fresh_db();
        assert_eq!(execute(&path, "  ;; ").unwrap(), QueryResponse::default());
    }

    #[test]
    fn only_last_returning_statement_is_visible() {
        let (_dir, path) = fresh_db();
        let result = execute(&path, "SELECT 1 AS a; SELECT 2 AS b;").unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.rows, vec![row(json!({"b": 2}))]);
        assert_eq!(result.columns.len(), 1);
        assert_eq!(result.columns[0].field, "b");
    }

    #[test]
    fn writes_after_a_read_keep_the_read_result() {
        let (_dir, path) = fresh_db();
        let result = execute(
            &path,
            "CREATE TABLE t(x); SELECT 42 AS answer; INSERT INTO t VALUES (1);",
        )
        .unwrap();
        assert_eq!(result.rows, vec![row(json!({"answer": 42}))]);
    }

    #[test]
    fn declared_types_and_value_kinds_are_normalized() {
        let (_dir, path) = fresh_db();
        let result = execute(
            &path,
            "CREATE TABLE items(id INTEGER PRIMARY KEY, name TEXT, price REAL, data BLOB, note);
             INSERT INTO items VALUES (1, 'pen', 1.5, x'0102', NULL);
             SELECT id, name, price, data, note FROM items;",
        )
        .unwrap();
        let types: Vec<&str> = result.columns.iter().map(|c| c.ty.as_str()).collect();
        assert_eq!(types, ["INTEGER", "TEXT", "REAL", "BLOB", "unknown"]);
        assert_eq!(
            result.rows,
            vec![row(json!({
                "id": 1,
                "name": "pen",
                "price": 1.5,
                "data": [1, 2],
                "note": null
            }))]
        );
        let keys: Vec<&str> = result.rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "name", "price", "data", "note"]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.sqlite");
        let error = execute(&path, "SELECT 1").unwrap_err();
        assert!(matches!(error, QueryError::NotFound { .. }));
        assert!(error.to_string().contains("absent.sqlite"));
        assert!(!path.exists(), "a missing database must not be created");
    }

    #[test]
    fn failing_statement_keeps_earlier_writes() {
        let (_dir, path) = fresh_db();
        execute(&path, "CREATE TABLE t(x)").unwrap();

        let error = execute(&path, "INSERT INTO t VALUES (7); SELEC nonsense; INSERT INTO t VALUES (8)")
            .unwrap_err();
        assert!(matches!(error, QueryError::Engine(_)));
        assert_eq!(error.public_message(), r#"near "SELEC": syntax error"#);

        let result = execute(&path, "SELECT x FROM t").unwrap();
        assert_eq!(result.rows, vec![row(json!({"x": 7}))]);
    }

    #[test]
    fn insert_returning_rows_are_discarded() {
        let (_dir, path) = fresh_db();
        let result = execute(
            &path,
            "CREATE TABLE t(x); INSERT INTO t VALUES (5) RETURNING x",
        )
        .unwrap();
        assert_eq!(result.total, 0);
        assert_eq!(execute(&path, "SELECT count(*) AS n FROM t").unwrap().rows, vec![row(json!({"n": 1}))]);
    }

    #[test]
    fn syntax_errors_do_not_echo_the_statement() {
        let (_dir, path) = fresh_db();
        let error = execute(&path, "CREATE TABLE t(x); SELEC * FROM t WHERE x = 'secret-value'")
            .unwrap_err();
        assert_eq!(error.public_message(), r#"near "SELEC": syntax error"#);
    }

    #[test]
    fn duplicate_column_names_keep_the_last_value() {
        let (_dir, path) = fresh_db();
        let result = execute(&path, "SELECT 1 AS a, 2 AS a").unwrap();
        assert_eq!(result.rows, vec![row(json!({"a": 2}))]);
        let fields: Vec<&str> = result.columns.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, ["a", "a"]);
    }

    #[test]
    fn comment_only_statement_is_a_no_op() {
        let (_dir, path) = fresh_db();
        let result = execute(&path, "SELECT 1 AS one; -- done").unwrap();
        assert_eq!(result.rows, vec![row(json!({"one": 1}))]);
    }

    #[test]
    fn runaway_statement_is_interrupted_by_timeout() {
        let (_dir, path) = fresh_db();
        let error = execute_with_timeout(
            &path,
            "WITH RECURSIVE c(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM c) SELECT count(*) FROM c",
            Some(Duration::from_millis(50)),
        )
        .unwrap_err();
        assert!(matches!(error, QueryError::Engine(_)));
        assert!(error.to_string().contains("interrupt"), "{error}");
    }
}
