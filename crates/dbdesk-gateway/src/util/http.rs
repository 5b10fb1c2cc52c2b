use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use dbdesk_types::ApiError;
use serde::Serialize;

pub fn json_ok<T: Serialize>(value: &T) -> Response {
    json_with_status(StatusCode::OK, value)
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    json_with_status(
        status,
        &ApiError {
            error: message.into(),
        },
    )
}

pub fn json_with_status<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("json encode error: {error}"),
        )
            .into_response(),
    }
}

/// First `LIMIT` bytes of `sql` for log lines, cut on a char boundary.
pub fn preview_sql(sql: &str) -> String {
    const LIMIT: usize = 160;
    if sql.len() <= LIMIT {
        return sql.to_string();
    }
    let mut end = LIMIT;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = sql[..end].to_string();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::preview_sql;

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview_sql("SELECT 1"), "SELECT 1");
        let long = "é".repeat(100);
        let preview = preview_sql(&long);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.len(), 160 + 3);
    }
}
