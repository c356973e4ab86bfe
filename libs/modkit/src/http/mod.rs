//! HTTP utilities for modkit
//!
//! Outgoing client plus the minimal trace-context helpers it relies on.

pub mod client;
pub mod simple_otel;
