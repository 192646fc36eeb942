//! Routing of events to reconcilers

use lifecycle::{Event, Outcome, Response, report};

use super::{Provider, executor};
use crate::resource::{
    DatabaseReconciler, GrantReconciler, LoginReconciler, ResourceKind, SchemaReconciler,
    UserReconciler,
};

/// Kind an event is handled as, if any.
///
/// Unknown resource types are handled as logins unless `strict_kinds` is
/// set.
pub fn route(resource_type: &str, strict_kinds: bool) -> Option<ResourceKind> {
    match ResourceKind::from_resource_type(resource_type) {
        Some(kind) => Some(kind),
        None if strict_kinds => None,
        None => {
            log::warn!(
                "Unsupported resource type {resource_type}, handling it as {}",
                ResourceKind::Login.resource_type()
            );
            Some(ResourceKind::Login)
        }
    }
}

/// Handle one event.
pub fn dispatch(event: &Event, provider: &Provider<'_>) -> Response {
    let Some(kind) = route(&event.resource_type, provider.strict_kinds) else {
        log::error!("Unsupported resource type {}", event.resource_type);
        return report(
            event,
            Outcome::failed(format!("unsupported resource type {}", event.resource_type)),
        );
    };

    match kind {
        ResourceKind::Login => executor::run(&LoginReconciler, event, provider),
        ResourceKind::User => executor::run(&UserReconciler, event, provider),
        ResourceKind::Database => executor::run(&DatabaseReconciler, event, provider),
        ResourceKind::Schema => executor::run(&SchemaReconciler, event, provider),
        ResourceKind::Grant => executor::run(&GrantReconciler, event, provider),
    }
}
