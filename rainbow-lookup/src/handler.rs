//! Transport-neutral request handling.
//!
//! An HTTP or API-gateway adapter only needs to pass the raw body in and copy
//! `status` and `body` back out.

use tracing::warn;

use crate::engine::Engine;
use crate::model::ErrorBody;
use crate::store::KeyedStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    fn error(status: u16, message: String) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message })
            .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
        Self { status, body }
    }
}

/// Handles one lookup request body, producing either a `ResultSet` or an
/// `{"error": ...}` payload.
pub async fn handle<S: KeyedStore>(engine: &Engine<S>, body: &[u8]) -> Response {
    match engine.lookup_body(body).await {
        Ok(results) => match serde_json::to_string(&results) {
            Ok(body) => Response { status: 200, body },
            Err(e) => Response::error(500, format!("failed to encode response: {e}")),
        },
        Err(e) => {
            if !e.is_caller_error() {
                warn!(error = %e, "lookup request failed");
            }
            Response::error(e.status(), e.public_message())
        }
    }
}
