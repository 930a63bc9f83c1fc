use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::auth::AuthAdmin;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::admin::LoginPayload;
use crate::state::AppState;
use crate::store::AdminStore;

/// POST /api/admin/login - Exchange credentials for a signed token
pub async fn login(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let input = json_body::<LoginPayload>(body)?.validate()?;

    tracing::info!("admin login attempt: {}", input.email);

    // One rejection for both unknown email and wrong password, so the
    // response never reveals which half failed.
    let admin = state
        .admins
        .find_by_email(&input.email)
        .await?
        .ok_or_else(|| ApiError::unauthenticated("Invalid email or password"))?;

    if !admin.verify_password(&input.password) {
        return Err(ApiError::unauthenticated("Invalid email or password"));
    }

    let token = state.tokens.issue(&admin.principal())?;
    tracing::info!("admin login successful: {}", admin.email);

    Ok(ApiResponse::success(json!({
        "admin": {
            "id": admin.id,
            "name": admin.name,
            "email": admin.email,
        },
        "token": token,
    }))
    .with_message("Login successful"))
}

/// GET /api/admin/profile - Fetch the authenticated principal's profile
pub async fn profile(
    State(state): State<AppState>,
    AuthAdmin(principal): AuthAdmin,
) -> ApiResult<Value> {
    let admin = state
        .admins
        .find_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Admin not found"))?;

    Ok(ApiResponse::success(json!({
        "admin": {
            "id": admin.id,
            "name": admin.name,
            "email": admin.email,
            "createdAt": admin.created_at,
        },
    })))
}
