//! Delivery of responses to the orchestrator

use anyhow::{Context, Result};
use lifecycle::Response;

/// The response as the orchestrator expects it.
pub fn body(response: &Response) -> Result<String> {
    serde_json::to_string(response).context("Failed to serialize response")
}

/// PUT the response to the URL the orchestrator waits on.
///
/// The URL is presigned for an empty content type.
pub fn send(response: &Response, url: &str) -> Result<()> {
    let body = body(response)?;
    log::info!(
        "Sending {:?} for {} to the response URL",
        response.status,
        response.logical_resource_id
    );

    let agent = ureq::Agent::new_with_defaults();
    agent
        .put(url)
        .header("Content-Type", "")
        .send(body.as_bytes())
        .context("Failed to deliver response")?;

    Ok(())
}
