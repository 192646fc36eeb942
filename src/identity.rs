//! Identity scheme
//!
//! An identity is `mssql:<logical id>:<kind>:<surrogate ids...>`, built
//! from the integer ids the catalogs assign. Ids are looked up by name
//! on every create and update, so an identity is stable across renames
//! exactly when the underlying id is.
//!
//! Lookups treat a statement error as "not found". Only a broken
//! connection is propagated.

use std::fmt;
use tdskit::{Error as TdsError, Session};

use crate::connection::SCHEME;
use crate::error::{ProviderError, Result};

/// Quote a string as an N'...' literal, doubling single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("N'{}'", value.replace('\'', "''"))
}

fn lookup(session: &mut dyn Session, what: &str, sql: &str) -> Result<Option<i64>> {
    log::debug!("Looking up {what}");
    match session.query_i64(sql) {
        Ok(id) => {
            log::debug!("{what}: {id:?}");
            Ok(id)
        }
        Err(err @ (TdsError::Connection { .. } | TdsError::Io(_) | TdsError::Closed)) => {
            Err(ProviderError::Connection(err.to_string()))
        }
        Err(err) => {
            log::debug!("Lookup of {what} failed, treating as absent: {err}");
            Ok(None)
        }
    }
}

/// `principal_id` of a login.
pub fn server_principal_id(session: &mut dyn Session, login: &str) -> Result<Option<i64>> {
    lookup(
        session,
        &format!("login {login}"),
        &format!(
            "SELECT principal_id FROM master.sys.server_principals WHERE name = {}",
            quote_literal(login)
        ),
    )
}

/// `database_id` of a database.
pub fn database_id(session: &mut dyn Session, database: &str) -> Result<Option<i64>> {
    lookup(
        session,
        &format!("database {database}"),
        &format!(
            "SELECT database_id FROM master.sys.databases WHERE name = {}",
            quote_literal(database)
        ),
    )
}

/// `principal_id` of a user inside `database`.
pub fn database_principal_id(
    session: &mut dyn Session,
    database: &str,
    user: &str,
) -> Result<Option<i64>> {
    lookup(
        session,
        &format!("user {user} in {database}"),
        &format!(
            "SELECT principal_id FROM [{database}].sys.database_principals WHERE name = {}",
            quote_literal(user)
        ),
    )
}

/// `schema_id` of a schema in the current database.
pub fn schema_id(session: &mut dyn Session, schema: &str) -> Result<Option<i64>> {
    lookup(
        session,
        &format!("schema {schema}"),
        &format!(
            "SELECT schema_id FROM sys.schemas WHERE name = {}",
            quote_literal(schema)
        ),
    )
}

/// Identity of a managed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Login {
        scope: String,
        principal_id: i64,
    },
    Database {
        scope: String,
        database_id: i64,
    },
    User {
        scope: String,
        database_id: i64,
        principal_id: i64,
    },
    Schema {
        scope: String,
        schema_id: i64,
    },
    Grant {
        scope: String,
        permission: String,
        principal_id: i64,
        database_id: i64,
    },
}

impl Identity {
    /// Look up the identity of a login.
    pub fn of_login(session: &mut dyn Session, scope: &str, login: &str) -> Result<Option<Self>> {
        Ok(server_principal_id(session, login)?.map(|principal_id| Self::Login {
            scope: scope.to_string(),
            principal_id,
        }))
    }

    pub fn of_database(
        session: &mut dyn Session,
        scope: &str,
        database: &str,
    ) -> Result<Option<Self>> {
        Ok(database_id(session, database)?.map(|database_id| Self::Database {
            scope: scope.to_string(),
            database_id,
        }))
    }

    /// A user is addressed by its database and its principal in it.
    pub fn of_user(
        session: &mut dyn Session,
        scope: &str,
        database: &str,
        user: &str,
    ) -> Result<Option<Self>> {
        let Some(database_id) = database_id(session, database)? else {
            return Ok(None);
        };
        Ok(database_principal_id(session, database, user)?.map(|principal_id| Self::User {
            scope: scope.to_string(),
            database_id,
            principal_id,
        }))
    }

    pub fn of_schema(session: &mut dyn Session, scope: &str, schema: &str) -> Result<Option<Self>> {
        Ok(schema_id(session, schema)?.map(|schema_id| Self::Schema {
            scope: scope.to_string(),
            schema_id,
        }))
    }

    pub fn of_grant(
        session: &mut dyn Session,
        scope: &str,
        permission: &str,
        database: &str,
        user: &str,
    ) -> Result<Option<Self>> {
        let Some(principal_id) = database_principal_id(session, database, user)? else {
            return Ok(None);
        };
        Ok(database_id(session, database)?.map(|database_id| Self::Grant {
            scope: scope.to_string(),
            permission: permission.to_string(),
            principal_id,
            database_id,
        }))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login {
                scope,
                principal_id,
            } => write!(f, "{SCHEME}:{scope}:login:{principal_id}"),
            Self::Database { scope, database_id } => {
                write!(f, "{SCHEME}:{scope}:database:{database_id}")
            }
            Self::User {
                scope,
                database_id,
                principal_id,
            } => write!(f, "{SCHEME}:{scope}:database:{database_id}:user:{principal_id}"),
            Self::Schema { scope, schema_id } => write!(f, "{SCHEME}:{scope}:schema:{schema_id}"),
            Self::Grant {
                scope,
                permission,
                principal_id,
                database_id,
            } => write!(
                f,
                "{SCHEME}:{scope}:grant:{permission}:{principal_id}:{database_id}"
            ),
        }
    }
}
