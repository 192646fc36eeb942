//! Core types for SQL Server sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default TDS port.
pub const DEFAULT_PORT: u16 = 1433;

/// Default login when none is given.
pub const DEFAULT_USER: &str = "sa";

/// Default database when none is given.
pub const DEFAULT_DATABASE: &str = "master";

/// Everything needed to open a session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Server host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Login name
    pub user: String,
    /// Login password, if one was resolved
    pub password: Option<String>,
    /// Database the session starts in
    pub database: String,
    /// Client character set, passed through verbatim
    pub charset: Option<String>,
}

impl ConnectionParams {
    /// Create parameters with the default port, user and database.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            charset: None,
        }
    }

    /// Set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// `host:port`, used for logging and for detecting a moved server.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Hand-written so the password never ends up in logs.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("charset", &self.charset)
            .finish()
    }
}

/// A single column value returned by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Int(i64),
    Text(String),
}

impl Value {
    /// Integer view of the value, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Text(s) => s.trim().parse().ok(),
            Value::Null => None,
        }
    }
}

/// A result row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Get a column by position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Integer in the first column.
    pub fn first_i64(&self) -> Option<i64> {
        self.get(0).and_then(Value::as_i64)
    }
}
