// ABOUTME: HTTP middleware for cross-origin access, request tracing, and request correlation
// ABOUTME: Provides the CORS layer, request ID generation, and per-request spans

/// CORS layer configuration
pub mod cors;
/// Request IDs and request spans
pub mod request_tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing and correlation
pub use request_tracing::{make_request_span, RequestIdGenerator};
