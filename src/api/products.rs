//! Catalog endpoints: public reads plus admin edit/delete

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::Identity;

use crate::db::products::{self, ProductInput};
use crate::error::ApiError;
use crate::state::AppState;

use super::{EnvelopeResult, envelope, parse_id};

/// GET /v1/product/{id}
pub async fn get_one(State(state): State<AppState>, Path(id): Path<String>) -> EnvelopeResult {
    let id = parse_id(&id)?;
    let product = products::get(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    Ok(envelope("product", product))
}

/// GET /v1/products
pub async fn list_all(State(state): State<AppState>) -> EnvelopeResult {
    let list = products::list(&state.pool, None).await?;
    Ok(envelope("products", list))
}

/// GET /v1/products/{category_id}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> EnvelopeResult {
    let category_id = parse_id(&category_id)?;
    let list = products::list(&state.pool, Some(category_id)).await?;
    Ok(envelope("products", list))
}

/// GET /v1/categories
pub async fn list_categories(State(state): State<AppState>) -> EnvelopeResult {
    let categories = products::list_categories(&state.pool).await?;
    Ok(envelope("categories", categories))
}

/// POST /v1/admin/editproduct
///
/// Create and update are explicit variants; there is no sentinel id.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditProductRequest {
    Create {
        #[serde(flatten)]
        product: ProductInput,
        category: i32,
    },
    Update {
        id: i32,
        #[serde(flatten)]
        product: ProductInput,
        category: i32,
    },
}

/// The old blob to reclaim after an update lands, if the payload swapped
/// the image out.
fn replaced_image<'a>(existing: &'a str, new: &str) -> Option<&'a str> {
    (!existing.is_empty() && existing != new).then_some(existing)
}

/// Reject payloads the schema would bounce anyway, so the client sees a
/// 400 instead of a store failure.
fn validate_product(product: &ProductInput) -> Result<(), ApiError> {
    if product.title.is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    if product.price < 0 {
        return Err(ApiError::validation("price must not be negative"));
    }
    if product.stock < 0 {
        return Err(ApiError::validation("stock must not be negative"));
    }
    if product.size.iter().any(|s| s.is_empty()) {
        return Err(ApiError::validation("size labels must not be empty"));
    }
    Ok(())
}

pub async fn edit_product(
    State(state): State<AppState>,
    Json(req): Json<EditProductRequest>,
) -> EnvelopeResult {
    match req {
        EditProductRequest::Create { product, category } => {
            validate_product(&product)?;
            let new_id = products::insert(&state.pool, &product, category).await?;
            tracing::info!(product_id = new_id, "product created");
            Ok(envelope("response", serde_json::json!({ "id": new_id })))
        }
        EditProductRequest::Update {
            id,
            product,
            category,
        } => {
            validate_product(&product)?;

            let existing = products::get(&state.pool, id)
                .await?
                .ok_or(ApiError::NotFound("product"))?;

            if !products::update(&state.pool, id, &product).await? {
                return Err(ApiError::NotFound("product"));
            }
            products::update_association(&state.pool, id, category).await?;

            // Replaced image: reclaim the previous blob only once the row
            // no longer references it. Reclaim failure is logged, not
            // surfaced; the catalog row is the source of truth.
            if let Some(stale) = replaced_image(&existing.image, &product.image) {
                if let Err(e) = state.images.remove(stale).await {
                    tracing::warn!(image = %stale, "failed to reclaim image: {e}");
                }
            }

            Ok(envelope("response", serde_json::json!({ "id": id })))
        }
    }
}

/// GET /v1/admin/deleteproduct/{id}
///
/// Deletes the row and returns the freed image reference after asking the
/// blob store to reclaim it.
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> EnvelopeResult {
    let id = parse_id(&id)?;

    let image = products::delete(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    tracing::info!(product_id = id, user_id = identity.user_id, "product deleted");

    if !image.is_empty() {
        if let Err(e) = state.images.remove(&image).await {
            tracing::warn!(image = %image, "failed to reclaim image: {e}");
        }
    }

    Ok(envelope("response", serde_json::json!({ "image": image })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_request_create_variant() {
        let req: EditProductRequest = serde_json::from_str(
            r#"{
                "op": "create",
                "title": "Sneaker",
                "price": 4999,
                "size": ["M", "L"],
                "description": "runs small",
                "image": "abc.jpg",
                "stock": 3,
                "shipping": true,
                "category": 2
            }"#,
        )
        .unwrap();

        match req {
            EditProductRequest::Create { product, category } => {
                assert_eq!(product.title, "Sneaker");
                assert_eq!(product.size, vec!["M", "L"]);
                assert_eq!(category, 2);
            }
            EditProductRequest::Update { .. } => panic!("expected create"),
        }
    }

    #[test]
    fn edit_request_update_variant_requires_id() {
        let req: EditProductRequest = serde_json::from_str(
            r#"{"op": "update", "id": 7, "title": "Sneaker", "price": 4999, "category": 2}"#,
        )
        .unwrap();

        match req {
            EditProductRequest::Update { id, product, .. } => {
                assert_eq!(id, 7);
                // Omitted optional fields default
                assert!(product.size.is_empty());
                assert!(!product.shipping);
            }
            EditProductRequest::Create { .. } => panic!("expected update"),
        }

        // No op tag at all is rejected; the old id-zero convention is gone.
        let bare = serde_json::from_str::<EditProductRequest>(
            r#"{"id": 0, "title": "Sneaker", "price": 4999, "category": 2}"#,
        );
        assert!(bare.is_err());
    }

    fn input(title: &str, price: i64, stock: i32, size: &[&str]) -> ProductInput {
        ProductInput {
            title: title.into(),
            price,
            size: size.iter().map(|s| s.to_string()).collect(),
            description: String::new(),
            image: String::new(),
            stock,
            shipping: false,
        }
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        assert!(validate_product(&input("Sneaker", 4999, 3, &["M"])).is_ok());
        assert!(validate_product(&input("", 4999, 3, &["M"])).is_err());
        assert!(validate_product(&input("Sneaker", -1, 3, &["M"])).is_err());
        // Negative stock must bounce here as a 400, not reach the store.
        assert!(validate_product(&input("Sneaker", 4999, -1, &["M"])).is_err());
        assert!(validate_product(&input("Sneaker", 4999, 3, &["M", ""])).is_err());
        // Absent sizes stay allowed.
        assert!(validate_product(&input("Sneaker", 4999, 3, &[])).is_ok());
    }

    #[test]
    fn replaced_image_only_when_swapped() {
        assert_eq!(replaced_image("old.jpg", "new.jpg"), Some("old.jpg"));
        assert_eq!(replaced_image("old.jpg", "old.jpg"), None);
        assert_eq!(replaced_image("", "new.jpg"), None);
    }
}
