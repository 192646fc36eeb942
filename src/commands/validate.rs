use anyhow::Result;
use lifecycle::Event;

use crate::Context;
use crate::config::Settings;
use crate::engine::dispatcher::route;
use crate::resource::ResourceKind;
use crate::ui;

pub fn run(ctx: &Context, settings: &Settings, source: &str) -> Result<()> {
    let event = super::read_event(source)?;
    let kind = check(&event, settings.strict_kinds)?;
    if !ctx.quiet {
        ui::success(&format!(
            "{} is a valid {kind} ({})",
            event.logical_resource_id,
            kind.resource_type()
        ));
    }
    Ok(())
}

/// Properties check of an event, no server involved.
fn check(event: &Event, strict_kinds: bool) -> Result<ResourceKind> {
    let kind = route(&event.resource_type, strict_kinds)
        .ok_or_else(|| anyhow::anyhow!("unsupported resource type {}", event.resource_type))?;
    kind.validate(&event.resource_properties)?;
    if let Some(old) = &event.old_resource_properties
        && kind.validate(old).is_err()
    {
        ui::warn("Previous properties do not validate");
    }
    Ok(kind)
}
