use std::path::PathBuf;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use dbdesk_types::{HealthResponse, QueryRequest};
use tracing::{debug, error, warn};

use crate::app::AppState;
use crate::engine::execute_with_timeout;
use crate::error::QueryError;
use crate::util::http::{json_error, json_ok, preview_sql};
use crate::util::time::now_ms;

pub async fn api_sqlite_query(State(state): State<AppState>, body: Bytes) -> Response {
    execute_query_request(body, state.config.timeout).await
}

pub async fn api_health(State(state): State<AppState>) -> Response {
    json_ok(&HealthResponse {
        ok: true,
        host: state.config.host.clone(),
        port: state.config.port,
        runtime: "rust".to_string(),
        now: now_ms(),
    })
}

pub async fn api_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}

/// Decode, validate, and run one query request on the blocking pool.
pub async fn execute_query_request(body: Bytes, timeout: Option<Duration>) -> Response {
    let request: QueryRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            return json_error(
                StatusCode::BAD_REQUEST,
                format!("invalid request json: {error}"),
            );
        }
    };
    let (path, sql) = match validate_request(request) {
        Ok(fields) => fields,
        Err(error) => return error_response(&error),
    };

    let sql_preview = preview_sql(&sql);
    debug!(path = %path.display(), %sql_preview, "sqlite query request");

    let worker_path = path.clone();
    let result = tokio::task::spawn_blocking(move || {
        execute_with_timeout(&worker_path, &sql, timeout)
    })
    .await
    .unwrap_or_else(|error| Err(QueryError::Internal(format!("query worker join error: {error}"))));

    match result {
        Ok(response) => {
            debug!(
                path = %path.display(),
                total = response.total,
                column_count = response.columns.len(),
                "sqlite query response"
            );
            json_ok(&response)
        }
        Err(error) => {
            if !matches!(error, QueryError::Internal(_)) {
                warn!(path = %path.display(), %sql_preview, %error, "sqlite query failed");
            }
            error_response(&error)
        }
    }
}

fn validate_request(request: QueryRequest) -> Result<(PathBuf, String), QueryError> {
    let path = request
        .path
        .filter(|path| !path.is_empty())
        .ok_or_else(|| QueryError::Validation("path is required".to_string()))?;
    let sql = request
        .sql
        .filter(|sql| !sql.is_empty())
        .ok_or_else(|| QueryError::Validation("sql is required".to_string()))?;
    Ok((PathBuf::from(path), sql))
}

fn error_response(error: &QueryError) -> Response {
    if let QueryError::Internal(detail) = error {
        error!(%detail, "sqlite query internal failure");
    }
    json_error(error.status(), error.public_message())
}
