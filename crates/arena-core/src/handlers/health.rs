//! Health check handler
//!
//! Liveness only: the services have no dependencies worth probing, so a
//! process that can answer is healthy.

use crate::Response;

/// Fixed `200 OK` plain-text body
pub fn health() -> Response {
    Response::text("OK")
}
