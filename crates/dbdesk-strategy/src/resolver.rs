use dbdesk_gateway::GatewayClient;
use dbdesk_types::{Row, TableData, TableQuery, WriteOutcome};

use crate::error::StrategyError;
use crate::local::{LocalStrategy, is_local_connection};
use crate::remote::{RemoteClient, RemoteStrategy};

/// The table-operation surface every backend family implements.
///
/// Implementations hold no per-connection state; `conn_id` addresses the
/// backend on every call.
pub trait DatabaseDetailStrategy {
    fn list_tables(&self, conn_id: &str) -> Result<Vec<String>, StrategyError>;

    fn get_table_data(
        &self,
        conn_id: &str,
        table: &str,
        query: &TableQuery,
    ) -> Result<TableData, StrategyError>;

    fn delete_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
    ) -> Result<WriteOutcome, StrategyError>;

    fn insert_row(&self, conn_id: &str, table: &str, row: &Row) -> Result<WriteOutcome, StrategyError>;

    fn update_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
        changes: &Row,
    ) -> Result<WriteOutcome, StrategyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    Remote,
}

type Predicate = fn(&str) -> bool;

/// Checked in order; the first match wins. Unmatched identifiers go to
/// [`BackendKind::Remote`].
const ROUTES: &[(Predicate, BackendKind)] = &[(is_local_connection, BackendKind::Local)];

/// Pick a backend family from the identifier's shape alone.
pub fn backend_kind(conn_id: &str) -> BackendKind {
    ROUTES
        .iter()
        .find(|(matches, _)| matches(conn_id))
        .map(|(_, kind)| *kind)
        .unwrap_or(BackendKind::Remote)
}

/// One concrete strategy per backend family.
#[derive(Debug, Clone)]
pub enum Backend {
    Local(LocalStrategy),
    Remote(RemoteStrategy),
}

impl Backend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Local(_) => BackendKind::Local,
            Self::Remote(_) => BackendKind::Remote,
        }
    }

    fn strategy(&self) -> &dyn DatabaseDetailStrategy {
        match self {
            Self::Local(strategy) => strategy,
            Self::Remote(strategy) => strategy,
        }
    }
}

impl DatabaseDetailStrategy for Backend {
    fn list_tables(&self, conn_id: &str) -> Result<Vec<String>, StrategyError> {
        self.strategy().list_tables(conn_id)
    }

    fn get_table_data(
        &self,
        conn_id: &str,
        table: &str,
        query: &TableQuery,
    ) -> Result<TableData, StrategyError> {
        self.strategy().get_table_data(conn_id, table, query)
    }

    fn delete_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
    ) -> Result<WriteOutcome, StrategyError> {
        self.strategy().delete_rows(conn_id, table, keys)
    }

    fn insert_row(&self, conn_id: &str, table: &str, row: &Row) -> Result<WriteOutcome, StrategyError> {
        self.strategy().insert_row(conn_id, table, row)
    }

    fn update_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
        changes: &Row,
    ) -> Result<WriteOutcome, StrategyError> {
        self.strategy().update_rows(conn_id, table, keys, changes)
    }
}

/// Routes each table operation to the strategy for its connection.
///
/// Selection is a pure string test; nothing is queried or cached.
#[derive(Debug, Clone)]
pub struct StrategyResolver {
    local: Backend,
    remote: Backend,
}

impl StrategyResolver {
    pub fn new(gateway: GatewayClient, remote: RemoteClient) -> Self {
        Self {
            local: Backend::Local(LocalStrategy::new(gateway)),
            remote: Backend::Remote(RemoteStrategy::new(remote)),
        }
    }

    pub fn resolve(&self, conn_id: &str) -> &Backend {
        match backend_kind(conn_id) {
            BackendKind::Local => &self.local,
            BackendKind::Remote => &self.remote,
        }
    }
}

impl DatabaseDetailStrategy for StrategyResolver {
    fn list_tables(&self, conn_id: &str) -> Result<Vec<String>, StrategyError> {
        self.resolve(conn_id).list_tables(conn_id)
    }

    fn get_table_data(
        &self,
        conn_id: &str,
        table: &str,
        query: &TableQuery,
    ) -> Result<TableData, StrategyError> {
        self.resolve(conn_id).get_table_data(conn_id, table, query)
    }

    fn delete_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
    ) -> Result<WriteOutcome, StrategyError> {
        self.resolve(conn_id).delete_rows(conn_id, table, keys)
    }

    fn insert_row(&self, conn_id: &str, table: &str, row: &Row) -> Result<WriteOutcome, StrategyError> {
        self.resolve(conn_id).insert_row(conn_id, table, row)
    }

    fn update_rows(
        &self,
        conn_id: &str,
        table: &str,
        keys: &[Row],
        changes: &Row,
    ) -> Result<WriteOutcome, StrategyError> {
        self.resolve(conn_id).update_rows(conn_id, table, keys, changes)
    }
}
