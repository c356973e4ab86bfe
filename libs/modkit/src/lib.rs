//! # ModKit - shared plumbing for profile-viewer modules
//!
//! Two building blocks used by every module that talks to the outside world:
//!
//! - **HTTP**: [`TracedClient`], a thin `reqwest` wrapper that opens an outgoing span per
//!   request and stamps it with a W3C `traceparent` header.
//! - **Lifecycle**: [`Lifecycle`], a controller for one cancellable background task with an
//!   idempotent stop.

pub use anyhow::Result;

// HTTP utilities
pub mod http;
pub use http::client::TracedClient;

pub mod lifecycle;
pub use lifecycle::{Lifecycle, LifecycleError, Status, StopReason};
