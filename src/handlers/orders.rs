use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::{json_body, parse_id};
use crate::middleware::auth::AuthAdmin;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::order::{Order, OrderPayload, StatusPayload};
use crate::rules;
use crate::state::AppState;
use crate::store::OrderStore;

/// POST /api/orders - Public checkout; orders always open as pending
pub async fn create(State(state): State<AppState>, body: Option<Json<Value>>) -> ApiResult<Value> {
    let input = json_body::<OrderPayload>(body)?.validate()?;

    tracing::info!("creating order for {} ({} items)", input.customer_name, input.items.len());

    let order = Order::new(input);
    state.orders.insert(&order).await?;
    tracing::info!("order created: {}", order.id);

    Ok(ApiResponse::created(json!(order)).with_message("Order created successfully"))
}

/// GET /api/orders - List orders, newest first
pub async fn list(State(state): State<AppState>, _admin: AuthAdmin) -> ApiResult<Value> {
    let orders = state.orders.list().await?;
    tracing::debug!("found {} orders", orders.len());

    let count = orders.len();
    Ok(ApiResponse::success(json!(orders)).with_count(count))
}

/// GET /api/orders/:id - Fetch one order
pub async fn get(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let order = state
        .orders
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    Ok(ApiResponse::success(json!({ "order": order })))
}

/// PATCH /api/orders/:id/status - Transition an order to any of the four
/// statuses
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let payload = json_body::<StatusPayload>(body)?;
    let status = rules::parse_status(payload.status.as_deref())?;

    let order = state
        .orders
        .set_status(id, status)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    Ok(ApiResponse::success(json!({ "order": order }))
        .with_message("Order status updated successfully"))
}

/// DELETE /api/orders/:id - Delete an order
pub async fn delete(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;

    if !state.orders.delete(id).await? {
        return Err(ApiError::not_found("Order not found"));
    }

    Ok(ApiResponse::message_only("Order deleted successfully"))
}
