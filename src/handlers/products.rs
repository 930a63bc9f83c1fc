use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::{json_body, parse_id};
use crate::middleware::auth::AuthAdmin;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::models::category::Category;
use crate::models::product::{Product, ProductPayload, ProductView};
use crate::rules;
use crate::state::AppState;
use crate::store::{CategoryStore, ProductStore};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// GET /api/products - List products, optional category filter
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Value> {
    let category = query
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(parse_id)
        .transpose()?;

    let products = state.products.list(category).await?;
    tracing::debug!("found {} products", products.len());

    let views = populate_all(state.categories.as_ref(), products).await?;
    let count = views.len();
    Ok(ApiResponse::success(json!(views)).with_count(count))
}

/// GET /api/products/search?q= - Substring search over products and
/// their category names
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Value> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation_failed("Search query is required"))?;

    let matches =
        rules::search_products(state.products.as_ref(), state.categories.as_ref(), q).await?;

    let views = populate_all(state.categories.as_ref(), matches).await?;
    let count = views.len();
    Ok(ApiResponse::success(json!(views)).with_count(count))
}

/// GET /api/products/:id - Fetch one product
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let category = state.categories.find_by_id(product.category).await?;
    let view = ProductView::new(product, category.as_ref());
    Ok(ApiResponse::success(json!({ "product": view })))
}

/// POST /api/products - Create a product referencing an existing category
pub async fn create(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let input = json_body::<ProductPayload>(body)?.validate()?;

    let category = rules::ensure_category_exists(state.categories.as_ref(), input.category).await?;

    let product = Product::new(input);
    state.products.insert(&product).await?;
    tracing::info!("product created: {}", product.id);

    let view = ProductView::new(product, Some(&category));
    Ok(ApiResponse::created(json!({ "product": view }))
        .with_message("Product created successfully"))
}

/// PUT /api/products/:id - Update a product
pub async fn update(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    let input = json_body::<ProductPayload>(body)?.validate()?;

    let category = rules::ensure_category_exists(state.categories.as_ref(), input.category).await?;

    let mut product = state
        .products
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    product.apply(input);

    if !state.products.update(&product).await? {
        return Err(ApiError::not_found("Product not found"));
    }

    let view = ProductView::new(product, Some(&category));
    Ok(ApiResponse::success(json!({ "product": view }))
        .with_message("Product updated successfully"))
}

/// DELETE /api/products/:id - Delete a product
pub async fn delete(
    State(state): State<AppState>,
    _admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;

    if !state.products.delete(id).await? {
        return Err(ApiError::not_found("Product not found"));
    }

    Ok(ApiResponse::message_only("Product deleted successfully"))
}

/// Resolve category references for a batch of products in one listing
/// pass. A dangling reference renders as a null category, the same way
/// the dashboard has always seen it.
async fn populate_all(
    categories: &dyn CategoryStore,
    products: Vec<Product>,
) -> Result<Vec<ProductView>, ApiError> {
    let index: HashMap<Uuid, Category> =
        categories.list().await?.into_iter().map(|c| (c.id, c)).collect();

    Ok(products
        .into_iter()
        .map(|p| {
            let category = index.get(&p.category);
            ProductView::new(p, category)
        })
        .collect())
}
