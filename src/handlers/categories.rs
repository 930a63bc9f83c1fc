use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{json_body, parse_id};
use crate::middleware::auth::AuthAdmin;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::category::{Category, CategoryPayload};
use crate::rules;
use crate::state::AppState;
use crate::store::CategoryStore;

/// GET /api/categories - List categories, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let categories = state.categories.list().await?;
    tracing::debug!("found {} categories", categories.len());

    let count = categories.len();
    Ok(ApiResponse::success(json!(categories)).with_count(count))
}

/// GET /api/categories/:id - Fetch one category
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(ApiResponse::success(json!({ "category": category })))
}

/// POST /api/categories - Create a category
pub async fn create(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let input = json_body::<CategoryPayload>(body)?.validate()?;

    rules::ensure_category_name_available(state.categories.as_ref(), &input.name, None).await?;

    let category = Category::new(input);
    state.categories.insert(&category).await?;

    Ok(ApiResponse::created(json!({ "category": category }))
        .with_message("Category created successfully"))
}

/// PUT /api/categories/:id - Update a category
pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let input = json_body::<CategoryPayload>(body)?.validate()?;

    rules::ensure_category_name_available(state.categories.as_ref(), &input.name, Some(id))
        .await?;

    let mut category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    category.apply(input);

    if !state.categories.update(&category).await? {
        return Err(ApiError::not_found("Category not found"));
    }

    Ok(ApiResponse::success(json!({ "category": category }))
        .with_message("Category updated successfully"))
}

/// DELETE /api/categories/:id - Delete a category with no products left
pub async fn delete(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;

    rules::ensure_category_deletable(state.products.as_ref(), id).await?;

    if !state.categories.delete(id).await? {
        return Err(ApiError::not_found("Category not found"));
    }

    Ok(ApiResponse::message_only("Category deleted successfully"))
}
