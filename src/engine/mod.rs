//! Execution engine
//!
//! The engine turns one lifecycle event into one response:
//! 1. Dispatching - pick the reconciler for the declared resource type
//! 2. Executing - validate, preflight, connect, run, release
//! 3. Reporting - package the outcome with the identity rules applied

pub mod dispatcher;
pub mod executor;

pub use dispatcher::dispatch;

use tdskit::Backend;

use crate::secrets::SecretStore;

/// Collaborators shared by every invocation
pub struct Provider<'a> {
    pub backend: &'a dyn Backend,
    pub secrets: &'a dyn SecretStore,
    /// Fail unknown resource types instead of handling them as logins
    pub strict_kinds: bool,
}
