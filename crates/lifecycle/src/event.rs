//! The request envelope delivered by the orchestrator

use crate::types::RequestType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Property bag as sent by the orchestrator
pub type Properties = Map<String, Value>;

/// Errors reading an event
#[derive(Debug, Error)]
pub enum EventError {
    /// The payload is not a valid event
    #[error("invalid event: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Update or Delete without the identity of the object to act on
    #[error("{0} request without PhysicalResourceId")]
    MissingPhysicalId(RequestType),
}

/// One create/update/delete request for a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Event {
    pub request_type: RequestType,

    /// Where the orchestrator waits for the response
    #[serde(rename = "ResponseURL", default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,

    #[serde(default)]
    pub stack_id: String,

    #[serde(default)]
    pub request_id: String,

    /// Declared resource kind, e.g. `Custom::MSSQLLogin`
    pub resource_type: String,

    /// Caller-declared name of the resource
    #[serde(default)]
    pub logical_resource_id: String,

    /// Identity returned by the previous successful call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,

    /// Desired state
    #[serde(default)]
    pub resource_properties: Properties,

    /// State declared by the previous call (Update only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Properties>,
}

impl Event {
    /// Parse and sanity-check an event.
    pub fn from_json(payload: &str) -> Result<Self, EventError> {
        let event: Self = serde_json::from_str(payload)?;
        event.check()?;
        Ok(event)
    }

    /// Build a request in code.
    pub fn new(
        request_type: RequestType,
        resource_type: impl Into<String>,
        logical_resource_id: impl Into<String>,
        resource_properties: Properties,
    ) -> Self {
        Self {
            request_type,
            response_url: None,
            stack_id: String::new(),
            request_id: String::new(),
            resource_type: resource_type.into(),
            logical_resource_id: logical_resource_id.into(),
            physical_resource_id: None,
            resource_properties,
            old_resource_properties: None,
        }
    }

    /// Attach the identity of the object to update or delete.
    pub fn with_physical_id(mut self, id: impl Into<String>) -> Self {
        self.physical_resource_id = Some(id.into());
        self
    }

    /// Attach the previous properties.
    pub fn with_old_properties(mut self, old: Properties) -> Self {
        self.old_resource_properties = Some(old);
        self
    }

    /// Update and Delete must name the object they act on.
    pub fn check(&self) -> Result<(), EventError> {
        if self.request_type != RequestType::Create && self.physical_resource_id.is_none() {
            return Err(EventError::MissingPhysicalId(self.request_type));
        }
        Ok(())
    }
}
