//! Reconcilers for SQL Server objects
//!
//! Every resource kind is handled by a [`Reconciler`]: a policy object
//! holding the kind's statements and identity lookup. The executor in
//! [`crate::engine`] drives all of them through the same lifecycle:
//! - validate the desired properties
//! - [`Reconciler::preflight`] decides without a connection when it can
//! - open one connection, run the operation, release the connection

mod database;
mod grant;
mod login;
mod schema;
mod user;

pub use database::DatabaseReconciler;
pub use grant::GrantReconciler;
pub use login::LoginReconciler;
pub use schema::SchemaReconciler;
pub use user::UserReconciler;

use lifecycle::{Event, Outcome, Properties, RequestType};
use serde_json::Value;
use std::fmt;

use crate::connection::Connection;
use crate::error::{ProviderError, Result};
use crate::properties::{
    DatabaseProperties, GrantProperties, KindProperties, LoginProperties, SchemaProperties,
    UserProperties,
};
use crate::secrets::SecretStore;

/// The closed set of resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Login,
    User,
    Database,
    Schema,
    Grant,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Login,
        Self::User,
        Self::Database,
        Self::Schema,
        Self::Grant,
    ];

    /// Declared resource type, e.g. `Custom::MSSQLLogin`
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::Login => "Custom::MSSQLLogin",
            Self::User => "Custom::MSSQLUser",
            Self::Database => "Custom::MSSQLDatabase",
            Self::Schema => "Custom::MSSQLSchema",
            Self::Grant => "Custom::MSSQLDatabaseGrant",
        }
    }

    pub fn from_resource_type(resource_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.resource_type() == resource_type)
    }

    /// Check desired properties against the kind's schema.
    pub fn validate(&self, props: &Properties) -> Result<()> {
        match self {
            Self::Login => LoginProperties::parse(props).map(drop),
            Self::User => UserProperties::parse(props).map(drop),
            Self::Database => DatabaseProperties::parse(props).map(drop),
            Self::Schema => SchemaProperties::parse(props).map(drop),
            Self::Grant => GrantProperties::parse(props).map(drop),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Login => "login",
            Self::User => "user",
            Self::Database => "database",
            Self::Schema => "schema",
            Self::Grant => "grant",
        };
        f.write_str(s)
    }
}

/// Everything about the current request a reconciler may consult
pub struct RequestContext<'a> {
    pub event: &'a Event,
    pub secrets: &'a dyn SecretStore,
}

impl<'a> RequestContext<'a> {
    pub fn new(event: &'a Event, secrets: &'a dyn SecretStore) -> Self {
        Self { event, secrets }
    }

    pub fn request(&self) -> RequestType {
        self.event.request_type
    }

    /// Logical id, the scope of every identity
    pub fn scope(&self) -> &str {
        &self.event.logical_resource_id
    }

    pub fn prior_identity(&self) -> Option<&str> {
        self.event.physical_resource_id.as_deref()
    }

    /// A string from the previous properties. Only the identifiers a kind
    /// declares are checked; anything else than a string reads as absent.
    pub fn old_str(&self, key: &str) -> Option<&str> {
        self.event
            .old_resource_properties
            .as_ref()
            .and_then(|old| old.get(key))
            .and_then(Value::as_str)
    }

    /// `Server.URL` of the previous properties.
    pub fn old_server_url(&self) -> Option<&str> {
        self.event
            .old_resource_properties
            .as_ref()
            .and_then(|old| old.get("Server"))
            .and_then(|server| server.get("URL"))
            .and_then(Value::as_str)
    }
}

/// What to do before connecting
#[derive(Debug)]
pub enum Preflight {
    /// The operation needs the server
    Connect,
    /// Decided without touching the server
    Finish(Outcome),
}

/// Per-kind reconciliation policy
pub trait Reconciler {
    type Properties: KindProperties;

    fn kind(&self) -> ResourceKind;

    /// Whether statements run outside a transaction.
    fn autocommit(&self) -> bool {
        true
    }

    /// Decide what can be decided from properties alone.
    fn preflight(&self, _ctx: &RequestContext<'_>, _props: &Self::Properties) -> Result<Preflight> {
        Ok(Preflight::Connect)
    }

    fn create(
        &self,
        ctx: &RequestContext<'_>,
        props: &Self::Properties,
        conn: &mut Connection,
    ) -> Result<Outcome>;

    fn update(
        &self,
        ctx: &RequestContext<'_>,
        props: &Self::Properties,
        conn: &mut Connection,
    ) -> Result<Outcome>;

    fn delete(
        &self,
        ctx: &RequestContext<'_>,
        props: &Self::Properties,
        conn: &mut Connection,
    ) -> Result<Outcome>;
}

/// Error for an object that a successful statement should have produced.
pub(crate) fn unresolved(kind: ResourceKind, name: &str) -> ProviderError {
    ProviderError::Unresolved(format!("{kind} {name}"))
}

/// Run a statement whose failure with a "does not exist" error means the
/// object is already gone.
pub(crate) fn execute_tolerating_missing(conn: &mut Connection, sql: &str) -> Result<bool> {
    match conn.session().execute(sql) {
        Ok(_) => Ok(true),
        Err(err) if err.is_missing() => {
            log::info!("Ignoring {err}");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}
