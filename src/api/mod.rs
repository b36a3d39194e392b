//! HTTP routes and response envelope

pub mod auth;
pub mod health;
pub mod images;
pub mod orders;
pub mod products;

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::admin_auth::admin_auth_middleware;
use crate::error::ApiResult;
use crate::state::AppState;

/// Success envelope: `{"ok": true, "<key>": payload}`. The data key is
/// context-dependent (product, products, categories, orders, response).
pub fn envelope(key: &'static str, payload: impl Serialize) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true, key: payload }))
}

/// Handlers return the envelope or an `ApiError` that renders the
/// matching error envelope.
pub type EnvelopeResult = ApiResult<Json<serde_json::Value>>;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use tower::limit::ConcurrencyLimitLayer;

    // Admin console (bearer token verified in front of every handler)
    let admin = Router::new()
        .route("/v1/admin/editproduct", post(products::edit_product))
        .route("/v1/admin/deleteproduct/{id}", get(products::delete_product))
        .route("/v1/admin/orders", get(orders::list_orders))
        .route("/v1/admin/orderstatus", post(orders::update_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .route("/status", get(health::status))
        .route("/v1/signup", post(auth::signup))
        .route("/v1/signin", post(auth::signin))
        .route("/v1/product/{id}", get(products::get_one))
        .route("/v1/products", get(products::list_all))
        .route("/v1/products/{category_id}", get(products::list_by_category))
        .route("/v1/categories", get(products::list_categories))
        .route("/v1/cart", post(orders::submit_cart))
        .route("/v1/billing", post(orders::attach_billing))
        .route(
            "/image",
            post(images::upload)
                .layer::<_, std::convert::Infallible>(axum::extract::DefaultBodyLimit::max(
                    images::MAX_FILE_SIZE + 1024,
                ))
                // Uploads buffer whole files in memory, so cap them
                .layer(ConcurrencyLimitLayer::new(8)),
        )
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Parse a numeric path parameter, mapping failure to the generic 400
/// the clients expect.
pub fn parse_id(raw: &str) -> ApiResult<i32> {
    raw.parse()
        .map_err(|_| crate::error::ApiError::validation("invalid id parameter"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_payload_under_key() {
        let Json(body) = envelope("products", vec![1, 2, 3]);
        assert_eq!(body["ok"], true);
        assert_eq!(body["products"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn parse_id_rejects_non_numeric() {
        assert_eq!(parse_id("17").unwrap(), 17);
        assert!(parse_id("seventeen").is_err());
        assert!(parse_id("").is_err());
    }
}
