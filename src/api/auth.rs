//! Signup and signin endpoints

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::token;
use crate::db;
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::{EnvelopeResult, envelope};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// POST /v1/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> EnvelopeResult {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::validation("email and password are required"));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("password hashing failed: {e}");
        ApiError::Internal
    })?;

    let user = db::users::NewUser {
        first_name: req.first_name,
        last_name: req.last_name,
        phone: req.phone,
        email,
        password_hash,
    };

    match db::users::create(&state.pool, &user).await? {
        Some(id) => Ok(envelope("response", serde_json::json!({ "id": id }))),
        None => Err(ApiError::conflict("email already in use")),
    }
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SigninResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub access_level: String,
    pub token: String,
}

/// POST /v1/signin
///
/// "No such email" and "wrong password" are deliberately indistinguishable:
/// both fall through to the same `Unauthorized`.
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> EnvelopeResult {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    let signed = token::issue(user.id, &state.token_domain, &state.jwt_secret).map_err(|e| {
        tracing::error!("token signing failed: {e}");
        ApiError::Internal
    })?;

    Ok(envelope(
        "response",
        SigninResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            email: user.email,
            access_level: user.access_level,
            token: signed,
        },
    ))
}
