//! Liveness endpoint

use axum::Json;

/// GET /status
pub async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "status": {
            "status": "available",
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
