use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::api::{api_health, api_not_found, api_sqlite_query};
use crate::config::GatewayConfig;
use crate::error::INTERNAL_ERROR_MESSAGE;
use crate::util::http::json_error;

pub const QUERY_ROUTE: &str = "/api/v1/sqlite/query";
pub const HEALTH_ROUTE: &str = "/health";

/// Shared by every request. Holds configuration only; each query opens and
/// closes its own database handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(QUERY_ROUTE, post(api_sqlite_query).fallback(api_not_found))
        .route(HEALTH_ROUTE, get(api_health).fallback(api_not_found))
        .fallback(api_not_found);
    with_service_layers(router.with_state(state))
}

/// Panic→500 and CORS, applied outside every route.
pub fn with_service_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CorsLayer::permissive())
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(%detail, "request handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
}
