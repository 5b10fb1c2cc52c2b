//! Backend strategy resolution for dbdesk table operations.
//!
//! The UI talks to [`StrategyResolver`] through [`DatabaseDetailStrategy`].
//! Connection identifiers starting with `sqlite:` go to the local gateway,
//! everything else to the remote API.

mod error;
mod local;
mod remote;
mod resolver;
pub mod sqlgen;

pub use error::StrategyError;
pub use local::{LOCAL_CONNECTION_PREFIX, LocalStrategy, is_local_connection, local_database_path};
pub use remote::{RemoteClient, RemoteStrategy};
pub use resolver::{Backend, BackendKind, DatabaseDetailStrategy, StrategyResolver, backend_kind};
