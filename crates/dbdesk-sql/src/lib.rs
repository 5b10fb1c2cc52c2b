//! Lexical helpers for running user-authored SQL scripts against SQLite.
//!
//! Nothing here parses SQL. [`split_statements`] finds top-level statement
//! boundaries and [`classify`] guesses from the leading keyword whether a
//! statement yields rows. Both are total functions.

mod classify;
mod split;

pub use classify::{QueryKind, classify};
pub use split::split_statements;
