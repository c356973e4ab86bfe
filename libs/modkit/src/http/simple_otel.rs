//! Minimal W3C Trace Context propagation for outgoing requests.
//!
//! Headers are formatted directly; no OpenTelemetry SDK is involved.

use http::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

const VERSION: &str = "00";
const SAMPLED: &str = "01";

/// A parsed `traceparent` value (`00-<trace_id>-<span_id>-<flags>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceParent {
    pub trace_id: String,
    pub span_id: String,
    pub flags: String,
}

impl TraceParent {
    /// Fresh sampled context with random ids.
    pub fn random() -> Self {
        Self {
            trace_id: format!("{:032x}", rand::random::<u128>()),
            span_id: format!("{:016x}", rand::random::<u64>()),
            flags: SAMPLED.to_string(),
        }
    }

    /// Parse a header value. Only version `00` is understood.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.trim().split('-');
        let (version, trace_id, span_id, flags) =
            (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
        if version != VERSION || parts.next().is_some() {
            return None;
        }
        let hex = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit());
        if !hex(trace_id, 32) || !hex(span_id, 16) || !hex(flags, 2) {
            return None;
        }
        Some(Self {
            trace_id: trace_id.to_string(),
            span_id: span_id.to_string(),
            flags: flags.to_string(),
        })
    }
}

impl fmt::Display for TraceParent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            VERSION, self.trace_id, self.span_id, self.flags
        )
    }
}

/// Read the `traceparent` header, if present and well-formed.
pub fn extract_trace_parent(headers: &HeaderMap) -> Option<TraceParent> {
    headers
        .get(TRACEPARENT)
        .and_then(|v| v.to_str().ok())
        .and_then(TraceParent::parse)
}

/// Stamp a new `traceparent` onto the headers and return it so the caller can record the
/// trace id on its span. An existing header is kept as-is.
pub fn inject_trace_context(headers: &mut HeaderMap) -> TraceParent {
    if let Some(existing) = extract_trace_parent(headers) {
        return existing;
    }

    let tp = TraceParent::random();
    if let Ok(value) = HeaderValue::from_str(&tp.to_string()) {
        headers.insert(HeaderName::from_static(TRACEPARENT), value);
    }
    tp
}
