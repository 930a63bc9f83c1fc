//! In-process store used by the test suites (and handy for local
//! experimentation). Mirrors the semantics of the Postgres collaborator:
//! newest-first listings, case-insensitive name matching, substring
//! search over name and description.

use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

use crate::models::admin::Admin;
use crate::models::category::Category;
use crate::models::order::{Order, OrderStatus};
use crate::models::product::Product;
use crate::store::{
    AdminStore, CategoryStore, OrderStore, ProductStore, Readiness, StoreError,
};

#[derive(Default)]
pub struct MemoryStore {
    admins: RwLock<Vec<Admin>>,
    categories: RwLock<Vec<Category>>,
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

fn newest_first<T, F: Fn(&T) -> chrono::DateTime<chrono::Utc>>(mut rows: Vec<T>, created: F) -> Vec<T> {
    rows.sort_by_key(|row| std::cmp::Reverse(created(row)));
    rows
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let admins = self.admins.read().map_err(|_| lock_err())?;
        Ok(admins.iter().find(|a| a.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, StoreError> {
        let admins = self.admins.read().map_err(|_| lock_err())?;
        Ok(admins.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, admin: &Admin) -> Result<(), StoreError> {
        self.admins.write().map_err(|_| lock_err())?.push(admin.clone());
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        let categories = self.categories.read().map_err(|_| lock_err())?;
        Ok(newest_first(categories.clone(), |c| c.created_at))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let categories = self.categories.read().map_err(|_| lock_err())?;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name_ci(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, StoreError> {
        let categories = self.categories.read().map_err(|_| lock_err())?;
        Ok(categories
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase() && Some(c.id) != exclude)
            .cloned())
    }

    async fn insert(&self, category: &Category) -> Result<(), StoreError> {
        self.categories.write().map_err(|_| lock_err())?.push(category.clone());
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, StoreError> {
        let mut categories = self.categories.write().map_err(|_| lock_err())?;
        match categories.iter_mut().find(|c| c.id == category.id) {
            Some(slot) => {
                *slot = category.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut categories = self.categories.write().map_err(|_| lock_err())?;
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() < before)
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self, category: Option<Uuid>) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| lock_err())?;
        let rows = products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| lock_err())?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn count_in_category(&self, category: Uuid) -> Result<u64, StoreError> {
        let products = self.products.read().map_err(|_| lock_err())?;
        Ok(products.iter().filter(|p| p.category == category).count() as u64)
    }

    async fn search_text(&self, query: &str, limit: usize) -> Result<Vec<Product>, StoreError> {
        let needle = query.to_lowercase();
        let products = self.products.read().map_err(|_| lock_err())?;
        let rows = products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        let mut rows = newest_first(rows, |p: &Product| p.created_at);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn list_in_categories(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| lock_err())?;
        let rows = products.iter().filter(|p| ids.contains(&p.category)).cloned().collect();
        Ok(newest_first(rows, |p: &Product| p.created_at))
    }

    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        self.products.write().map_err(|_| lock_err())?.push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(|_| lock_err())?;
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(|_| lock_err())?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| lock_err())?;
        Ok(newest_first(orders.clone(), |o| o.created_at))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| lock_err())?;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        self.orders.write().map_err(|_| lock_err())?.push(order.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        let mut orders = self.orders.write().map_err(|_| lock_err())?;
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                order.updated_at = chrono::Utc::now();
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut orders = self.orders.write().map_err(|_| lock_err())?;
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }
}

#[async_trait]
impl Readiness for MemoryStore {
    async fn is_ready(&self) -> bool {
        true
    }
}
