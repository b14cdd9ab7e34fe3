//! HTTP layer
//!
//! Axum server with:
//! - Credentialed CORS for the configured client origin
//! - Request tracing
//! - Graceful shutdown
//! - `{ success, data }` / `{ success, error, message }` JSON envelopes

pub mod error;
pub mod extract;
pub mod routes;
pub mod server;

use axum::Json;
use serde::Serialize;

pub use error::ApiError;
pub use server::run_server;

/// Success envelope wrapping every 2xx payload
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap a payload in the success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let Json(body) = ok(serde_json::json!({"n": 1}));
        let rendered = serde_json::to_value(&body).unwrap();
        assert_eq!(
            rendered,
            serde_json::json!({"success": true, "data": {"n": 1}})
        );
    }
}
