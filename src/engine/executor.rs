//! Execution of a single lifecycle request

use lifecycle::{Change, Event, NEVER_CREATED, Outcome, RequestType, Response, State, report};

use super::Provider;
use crate::connection::{self, Connection};
use crate::error::{ProviderError, Result};
use crate::properties::KindProperties;
use crate::resource::{Preflight, Reconciler, RequestContext};

/// Run one request through `reconciler` and package the result.
///
/// The connection, when one is opened, is committed if the operation
/// succeeded and rolled back otherwise, then closed. A failing commit
/// turns the outcome into a failure.
pub fn run<R: Reconciler>(reconciler: &R, event: &Event, provider: &Provider<'_>) -> Response {
    let request = event.request_type;
    let kind = reconciler.kind();

    let state = State::initial(request).begin(request);
    log::info!("{request} {kind} {} ({state})", event.logical_resource_id);

    let outcome = execute(reconciler, event, provider).unwrap_or_else(|err| {
        log::error!("{request} {kind} {} failed: {err}", event.logical_resource_id);
        if let ProviderError::Mutation(cause) = &err {
            log::debug!("{}", cause.category().description());
        }
        Outcome::failed(err.reason())
    });

    let state = state.complete(outcome.is_success());
    if let Outcome::Success { change, .. } = &outcome {
        if change.is_mutation() {
            log::info!("{kind} {} is {state} ({change:?})", event.logical_resource_id);
        } else {
            log::debug!("{kind} {} is {state}, server untouched", event.logical_resource_id);
        }
    }
    report(event, outcome)
}

fn execute<R: Reconciler>(reconciler: &R, event: &Event, provider: &Provider<'_>) -> Result<Outcome> {
    let request = event.request_type;

    if request == RequestType::Delete && event.physical_resource_id.as_deref() == Some(NEVER_CREATED) {
        log::info!("{} was never created", event.logical_resource_id);
        return Ok(Outcome::success("", Change::Retained));
    }

    let props = R::Properties::parse(&event.resource_properties)?;
    if let Some(previous) = &event.old_resource_properties {
        R::Properties::check_previous(previous)?;
    }
    let ctx = RequestContext::new(event, provider.secrets);

    if let Preflight::Finish(outcome) = reconciler.preflight(&ctx, &props)? {
        return Ok(outcome);
    }

    let params = connection::resolve(props.server(), provider.secrets)?;
    let mut conn = Connection::open(provider.backend, params, reconciler.autocommit())?;

    let result = match request {
        RequestType::Create => reconciler.create(&ctx, &props, &mut conn),
        RequestType::Update => reconciler.update(&ctx, &props, &mut conn),
        RequestType::Delete => reconciler.delete(&ctx, &props, &mut conn),
    };

    let released = conn.release(result.is_ok());
    let outcome = result?;
    released?;
    Ok(outcome)
}
