use axum::http::StatusCode;

/// Message returned for failures whose detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Malformed or missing request fields. Never reaches the engine.
    #[error("{0}")]
    Validation(String),

    #[error("database file not found: {path}")]
    NotFound { path: String },

    /// SQLite's own message, passed through unmodified.
    #[error("{}", engine_message(.0))]
    Engine(#[from] rusqlite::Error),

    #[error("{0}")]
    Internal(String),
}

/// The engine's message without the statement text and offset rusqlite
/// appends to input errors.
fn engine_message(error: &rusqlite::Error) -> String {
    match error {
        rusqlite::Error::SqlInputError { msg, .. } => msg.clone(),
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
        other => other.to_string(),
    }
}

impl QueryError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::NotFound { .. } | Self::Engine(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to put on the wire.
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_faults_are_bad_request() {
        assert_eq!(
            QueryError::Validation("path is required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            QueryError::NotFound {
                path: "/tmp/x.db".into()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn engine_message_omits_statement_text() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let error = QueryError::from(
            conn.execute_batch("SELEC * FROM t WHERE x = 'secret-value'")
                .unwrap_err(),
        );
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.public_message(), r#"near "SELEC": syntax error"#);
    }

    #[test]
    fn internal_detail_is_not_public() {
        let error = QueryError::Internal("worker panicked at src/engine.rs:42".into());
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.public_message(), INTERNAL_ERROR_MESSAGE);
    }
}
