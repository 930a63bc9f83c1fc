pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::admin::Admin;
use crate::models::category::Category;
use crate::models::order::{Order, OrderStatus};
use crate::models::product::Product;

/// Errors from the persistence collaborator. Handlers never surface these
/// directly; they collapse into a generic `Internal` rejection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("malformed document: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, StoreError>;
    async fn insert(&self, admin: &Admin) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, newest first.
    async fn list(&self) -> Result<Vec<Category>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError>;
    /// Case-insensitive exact name match, optionally excluding one id
    /// (the category being renamed).
    async fn find_by_name_ci(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, StoreError>;
    async fn insert(&self, category: &Category) -> Result<(), StoreError>;
    /// Replace by id; `false` when the category no longer exists.
    async fn update(&self, category: &Category) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products, newest first, optionally narrowed to one category.
    async fn list(&self, category: Option<Uuid>) -> Result<Vec<Product>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    async fn count_in_category(&self, category: Uuid) -> Result<u64, StoreError>;
    /// Case-insensitive substring match over name or description, newest
    /// first, capped at `limit`.
    async fn search_text(&self, query: &str, limit: usize) -> Result<Vec<Product>, StoreError>;
    /// Products belonging to any of the given categories, newest first.
    async fn list_in_categories(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError>;
    async fn insert(&self, product: &Product) -> Result<(), StoreError>;
    async fn update(&self, product: &Product) -> Result<bool, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Order>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError>;
    async fn insert(&self, order: &Order) -> Result<(), StoreError>;
    /// Returns the updated order, or `None` when it does not exist.
    async fn set_status(&self, id: Uuid, status: OrderStatus)
        -> Result<Option<Order>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Boolean readiness query over the collaborator's connection-health
/// lifecycle. The core only ever reads this; it never writes connection
/// state.
#[async_trait]
pub trait Readiness: Send + Sync {
    async fn is_ready(&self) -> bool;
}
