use anyhow::{Context as _, Result};
use lifecycle::{Event, Response};

use crate::Context;
use crate::config::Settings;
use crate::engine::{Provider, dispatch};
use crate::respond;
use crate::ui;

/// Handle one event: print the response and optionally deliver it.
///
/// A FAILED response still prints and delivers, then exits non-zero.
pub fn run(ctx: &Context, settings: &Settings, source: &str, deliver: bool) -> Result<()> {
    let event = super::read_event(source)?;
    let backend = settings.backend();
    let secrets = settings.secret_store()?;
    let provider = Provider {
        backend: &backend,
        secrets: secrets.as_ref(),
        strict_kinds: settings.strict_kinds,
    };

    let response = process(&event, &provider);
    println!("{}", respond::body(&response)?);

    if deliver {
        let url = event
            .response_url
            .as_deref()
            .context("Event has no ResponseURL to deliver to")?;
        respond::send(&response, url)?;
    }

    summarize(ctx, &response);
    if !response.is_success() {
        anyhow::bail!(
            "{} {} failed",
            event.request_type,
            event.logical_resource_id
        );
    }
    Ok(())
}

fn process(event: &Event, provider: &Provider<'_>) -> Response {
    log::debug!(
        "{} {} ({}) request {}",
        event.request_type,
        event.logical_resource_id,
        event.resource_type,
        event.request_id
    );
    dispatch(event, provider)
}

fn summarize(ctx: &Context, response: &Response) {
    if ctx.quiet {
        return;
    }
    if response.is_success() {
        ui::success(&format!(
            "{} is {}",
            response.logical_resource_id, response.physical_resource_id
        ));
    } else {
        ui::error(response.reason.as_deref().unwrap_or("failed"));
    }
    if ctx.verbose > 0 {
        for (name, value) in &response.attributes {
            ui::dim(&format!("{name} = {value}"));
        }
    }
}
