//! Core types for custom resource lifecycles

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the orchestrator asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        };
        f.write_str(s)
    }
}

/// Terminal status reported back to the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Whether a Delete really removes server-side state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeletionPolicy {
    Drop,
    #[default]
    Retain,
}

impl DeletionPolicy {
    /// Parse the property value; anything but the two known words is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Drop" => Some(Self::Drop),
            "Retain" => Some(Self::Retain),
            _ => None,
        }
    }
}

/// The change a reconciler made to the managed object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// Nothing needed doing
    NoChange,
    /// Object was created
    Created,
    /// Object was altered or renamed in place
    Modified,
    /// Object was removed
    Removed,
    /// Delete succeeded without touching the server (retained or never created)
    Retained,
}

impl Change {
    /// Check if the server was mutated
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Created | Self::Modified | Self::Removed)
    }
}

/// Lifecycle state of the managed object during one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
    Failed,
}

impl State {
    /// State the object is assumed to be in when a request arrives.
    ///
    /// Create always starts from `Absent`; Update and Delete trust the
    /// caller's claim that the object is `Present`.
    pub fn initial(request: RequestType) -> Self {
        match request {
            RequestType::Create => Self::Absent,
            RequestType::Update | RequestType::Delete => Self::Present,
        }
    }

    /// Enter the transitional state for `request`.
    pub fn begin(self, request: RequestType) -> Self {
        match (self, request) {
            (Self::Absent, RequestType::Create) => Self::Creating,
            (Self::Present, RequestType::Update) => Self::Updating,
            (Self::Present, RequestType::Delete) => Self::Deleting,
            _ => Self::Failed,
        }
    }

    /// Leave a transitional state.
    pub fn complete(self, succeeded: bool) -> Self {
        if !succeeded {
            return Self::Failed;
        }
        match self {
            Self::Creating | Self::Updating => Self::Present,
            Self::Deleting => Self::Absent,
            other => other,
        }
    }

    /// Check if state is terminal for this invocation
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Absent | Self::Present | Self::Failed)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Absent => "absent",
            Self::Creating => "creating",
            Self::Present => "present",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
