//! Error types for SQL Server sessions.
//!
//! Errors are categorized so callers can tell a statement that failed
//! because its target does not exist apart from every other failure.

use thiserror::Error;

/// SQL Server error numbers that mean "the addressed object is not there".
///
/// - 911: database does not exist
/// - 3701: cannot drop the object because it does not exist
/// - 4060: cannot open database requested by the login
/// - 15007: not a valid login or no permission
/// - 15008: user does not exist in the current database
/// - 15151: cannot find the login/user/object
const MISSING_OBJECT_NUMBERS: &[u32] = &[911, 3701, 4060, 15007, 15008, 15151];

/// SQL Server error numbers raised when creating something that exists.
///
/// - 1801: database already exists
/// - 2714: object (schema) already exists
/// - 15023: user or role already exists in the current database
/// - 15025: server principal already exists
const ALREADY_EXISTS_NUMBERS: &[u32] = &[1801, 2714, 15023, 15025];

/// Categories of session errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Could not reach or authenticate against the server
    Connection,
    /// The addressed object does not exist
    Missing,
    /// The object to create is already there
    AlreadyExists,
    /// Permission denied
    Permission,
    /// Any other server or protocol error
    Other,
}

impl ErrorCategory {
    /// Whether a destructive statement may treat this error as "already gone".
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Connection => "Could not connect to the server",
            Self::Missing => "Object does not exist",
            Self::AlreadyExists => "Object already exists",
            Self::Permission => "Permission denied",
            Self::Other => "Unexpected error",
        }
    }

    /// Classify a SQL Server error number.
    pub fn from_number(number: u32) -> Self {
        if MISSING_OBJECT_NUMBERS.contains(&number) {
            Self::Missing
        } else if ALREADY_EXISTS_NUMBERS.contains(&number) {
            Self::AlreadyExists
        } else if matches!(number, 229 | 230 | 262 | 300 | 15247) {
            Self::Permission
        } else {
            Self::Other
        }
    }
}

/// Errors that can occur while talking to SQL Server.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection could not be established
    #[error("failed to connect: {message}")]
    Connection {
        /// Driver or socket error text
        message: String,
    },

    /// The server rejected a statement
    #[error("{number}:{message}")]
    Server {
        /// SQL Server error number
        number: u32,
        /// Server message text
        message: String,
    },

    /// Protocol, TLS or conversion error reported by the driver
    #[error("driver error: {0}")]
    Driver(String),

    /// The session was used after it was closed
    #[error("session is closed")]
    Closed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a server error from its number and message.
    pub fn server(number: u32, message: impl Into<String>) -> Self {
        Self::Server {
            number,
            message: message.into(),
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Connection { .. } | Error::Io(_) => ErrorCategory::Connection,
            Error::Server { number, .. } => ErrorCategory::from_number(*number),
            Error::Driver(_) | Error::Closed => ErrorCategory::Other,
        }
    }

    /// Whether the error means the addressed object does not exist.
    pub fn is_missing(&self) -> bool {
        self.category().is_missing()
    }

    /// Human-readable reason: `<number>:<message>` for server errors.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl From<tiberius::error::Error> for Error {
    fn from(err: tiberius::error::Error) -> Self {
        match err {
            tiberius::error::Error::Server(token) => Self::Server {
                number: token.code(),
                message: token.message().to_string(),
            },
            tiberius::error::Error::Io { kind, message } => Self::Connection {
                message: format!("{kind:?}: {message}"),
            },
            other => Self::Driver(other.to_string()),
        }
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
