//! Outcome reporting
//!
//! Turns what a reconciler did into the response the orchestrator
//! receives. The reporter owns the identity rules the caller relies on
//! for retries and garbage collection:
//! - a successful response always carries a non-empty identity
//! - a failed Create carries [`NEVER_CREATED`], so the Delete the
//!   orchestrator sends during rollback is recognized as a no-op
//! - a failed Update or Delete keeps the identity it was given

use crate::event::Event;
use crate::types::{Change, RequestType, Status};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity stored for an object whose Create failed.
pub const NEVER_CREATED: &str = "could-not-create";

/// Longest failure reason sent back.
pub const MAX_REASON_LEN: usize = 200;

/// Public attributes of a managed object.
pub type Attributes = BTreeMap<String, String>;

/// Terminal result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        /// Freshly computed identity; may be empty when the operation does
        /// not recompute it (the prior identity is reused then)
        identity: String,
        attributes: Attributes,
        change: Change,
    },
    Failed {
        reason: String,
    },
}

impl Outcome {
    pub fn success(identity: impl Into<String>, change: Change) -> Self {
        Self::Success {
            identity: identity.into(),
            attributes: Attributes::new(),
            change,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Add a public attribute (ignored on failure).
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Self::Success { attributes, .. } = &mut self {
            attributes.insert(name.to_string(), value.into());
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// The response delivered to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    pub status: Status,

    /// Present iff the status is FAILED
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    pub physical_resource_id: String,

    #[serde(default)]
    pub stack_id: String,

    #[serde(default)]
    pub request_id: String,

    #[serde(default)]
    pub logical_resource_id: String,

    /// Public attributes
    #[serde(rename = "Data", default)]
    pub attributes: Attributes,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Cut a reason down to [`MAX_REASON_LEN`] characters.
pub fn truncate_reason(reason: &str) -> String {
    reason.chars().take(MAX_REASON_LEN).collect()
}

/// Package an outcome for the orchestrator.
pub fn report(event: &Event, outcome: Outcome) -> Response {
    let prior = event
        .physical_resource_id
        .as_deref()
        .filter(|id| !id.is_empty());

    let (status, reason, physical_resource_id, attributes) = match outcome {
        Outcome::Success {
            identity,
            attributes,
            ..
        } => {
            let identity = if identity.is_empty() {
                prior.map(str::to_string)
            } else {
                Some(identity)
            };
            match identity {
                Some(id) => (Status::Success, None, id, attributes),
                None => (
                    Status::Failed,
                    Some("no identity could be derived for the resource".to_string()),
                    failed_identity(event.request_type, prior),
                    Attributes::new(),
                ),
            }
        }
        Outcome::Failed { reason } => (
            Status::Failed,
            Some(truncate_reason(&reason)),
            failed_identity(event.request_type, prior),
            Attributes::new(),
        ),
    };

    Response {
        status,
        reason,
        physical_resource_id,
        stack_id: event.stack_id.clone(),
        request_id: event.request_id.clone(),
        logical_resource_id: event.logical_resource_id.clone(),
        attributes,
    }
}

fn failed_identity(request: RequestType, prior: Option<&str>) -> String {
    match (request, prior) {
        (RequestType::Create, _) | (_, None) => NEVER_CREATED.to_string(),
        (_, Some(id)) => id.to_string(),
    }
}
