//! Local SQLite execution gateway.
//!
//! [`engine`] runs a multi-statement script against a database file,
//! [`api`] and [`app`] expose it as `POST /api/v1/sqlite/query`, and
//! [`client`] is the blocking caller side of that endpoint.

pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod util;

pub use client::{ClientError, GatewayClient};
pub use config::GatewayConfig;
pub use engine::{execute, execute_with_timeout};
pub use error::QueryError;
