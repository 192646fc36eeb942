//! # tdskit
//!
//! Blocking SQL Server sessions for code that runs one short-lived
//! connection per invocation.
//!
//! This crate provides:
//! - A [`Backend`] trait that opens sessions, and the [`TdsBackend`]
//!   implementation speaking TDS over TCP
//! - A [`Session`] trait with the handful of operations resource
//!   handlers need: query, execute, stored procedure call, commit,
//!   rollback, close
//! - An [`Error`] type whose [`ErrorCategory`] separates "object does not
//!   exist" from every other failure
//!
//! ## Example
//!
//! ```no_run
//! use tdskit::{Backend, ConnectionParams, TdsBackend};
//!
//! let backend = TdsBackend::new();
//! let params = ConnectionParams::new("localhost").with_password("P@ssW0rd");
//! let mut session = backend.connect(&params, true)?;
//!
//! let id = session.query_i64("SELECT database_id FROM master.sys.databases WHERE name = 'master'")?;
//! println!("master has id {id:?}");
//! session.close()?;
//! # Ok::<(), tdskit::Error>(())
//! ```

pub mod backend;
pub mod error;
pub mod types;

pub use backend::tds::TdsBackend;
pub use backend::{Backend, Session, default_backend};
pub use error::{Error, ErrorCategory, Result};
pub use types::{ConnectionParams, DEFAULT_DATABASE, DEFAULT_PORT, DEFAULT_USER, Row, Value};
