//! Shared response envelope for API handlers.
//!
//! All successful responses use a `{ "data": ... }` envelope; use
//! [`DataResponse`] instead of ad-hoc `serde_json::json!` so payload types
//! stay checked at compile time.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
