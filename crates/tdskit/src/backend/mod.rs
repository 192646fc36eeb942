//! Backend abstraction for SQL Server sessions.
//!
//! The [`Backend`] trait opens sessions; a [`Session`] is the blocking
//! statement interface the resource handlers work against. Keeping both
//! behind traits allows the real TDS driver to be swapped for an
//! in-memory server in tests.

pub mod tds;

use crate::error::Result;
use crate::types::{ConnectionParams, Row};

/// Opens sessions against a server.
pub trait Backend: Send + Sync {
    /// Open a session.
    ///
    /// With `autocommit` off the session starts a transaction that lasts
    /// until [`Session::commit`] or [`Session::rollback`].
    fn connect(&self, params: &ConnectionParams, autocommit: bool) -> Result<Box<dyn Session>>;
}

/// A live, blocking session.
pub trait Session: Send {
    /// Run a query and collect the rows of its first result set.
    fn query(&mut self, sql: &str) -> Result<Vec<Row>>;

    /// Run a statement and return the number of affected rows.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Call a stored procedure with string arguments bound as parameters.
    fn call_procedure(&mut self, name: &str, args: &[&str]) -> Result<()>;

    /// Commit the open transaction, if any.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the open transaction, if any.
    fn rollback(&mut self) -> Result<()>;

    /// Close the session. Further calls fail with [`crate::Error::Closed`].
    fn close(&mut self) -> Result<()>;

    /// Run a query and return the first column of the first row as integer.
    fn query_i64(&mut self, sql: &str) -> Result<Option<i64>> {
        Ok(self.query(sql)?.first().and_then(Row::first_i64))
    }
}

/// Get the default backend (TDS over TCP).
pub fn default_backend() -> tds::TdsBackend {
    tds::TdsBackend::new()
}
