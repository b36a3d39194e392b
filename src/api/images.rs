//! Image upload endpoint
//!
//! POST /image — multipart upload → validate → content-addressed write to
//! the image store. The returned reference goes into the product edit
//! payload's `image` field.

use axum::extract::{Multipart, State};

use crate::error::ApiError;
use crate::state::AppState;

use super::{EnvelopeResult, envelope};

/// Maximum file size (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> EnvelopeResult {
    let mut file_data: Option<Vec<u8>> = None;
    let mut original_filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("multipart error: {e}")))?
    {
        if field.name() == Some("image") {
            original_filename = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("read error: {e}")))?
                    .to_vec(),
            );
            break;
        }
    }

    let data = file_data.ok_or_else(|| ApiError::validation("no image provided"))?;

    if data.is_empty() {
        return Err(ApiError::validation("empty file"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(ApiError::validation(format!(
            "file too large: {} bytes (max {MAX_FILE_SIZE})",
            data.len()
        )));
    }

    let filename = original_filename.unwrap_or_default();
    let ext = std::path::Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(ApiError::validation(format!(
            "unsupported format: {ext:?} (want one of {SUPPORTED_FORMATS:?})"
        )));
    }

    let reference = state.images.save(&ext, &data).await?;

    Ok(envelope("response", serde_json::json!({ "image": reference })))
}
