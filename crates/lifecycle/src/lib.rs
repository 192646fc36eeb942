//! # Lifecycle
//!
//! The request/response model of declarative custom resources.
//!
//! An orchestrator sends one event per create, update or delete of a
//! declared resource and persists only the identity string it gets back.
//! This crate holds the pieces of that contract that do not depend on
//! what is being managed.
//!
//! ## Core Concepts
//!
//! - **Event**: one request, carrying desired and previous properties and
//!   the identity returned by the previous call
//! - **State**: the `Absent → Creating → Present → Updating/Deleting`
//!   machine a single invocation walks through
//! - **Outcome**: what a reconciler did, or why it failed
//! - **Response**: the packaged result, built by [`report`]
//!
//! ## Example
//!
//! ```
//! use lifecycle::{Change, Event, Outcome, Properties, RequestType, Status, report};
//!
//! let event = Event::new(RequestType::Create, "Custom::MSSQLDatabase", "MyDb", Properties::new());
//! let outcome = Outcome::success("mssql:MyDb:database:7", Change::Created)
//!     .with_attribute("Name", "MyDb");
//!
//! let response = report(&event, outcome);
//! assert_eq!(response.status, Status::Success);
//! assert_eq!(response.physical_resource_id, "mssql:MyDb:database:7");
//! ```

pub mod event;
pub mod report;
pub mod types;

// Re-export main types at crate root
pub use event::{Event, EventError, Properties};
pub use report::{Attributes, MAX_REASON_LEN, NEVER_CREATED, Outcome, Response, report, truncate_reason};
pub use types::{Change, DeletionPolicy, RequestType, State, Status};
