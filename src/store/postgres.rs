//! Postgres-backed document store. Each entity lives in its own JSONB
//! table (`id UUID PRIMARY KEY, doc JSONB, created_at TIMESTAMPTZ`);
//! entity structs serialize whole into `doc`, so the SQL surface stays a
//! thin find/insert/replace/delete layer plus the few entity-specific
//! lookups the rules engine needs.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::admin::Admin;
use crate::models::category::Category;
use crate::models::order::{Order, OrderStatus};
use crate::models::product::Product;
use crate::store::{
    AdminStore, CategoryStore, OrderStore, ProductStore, Readiness, StoreError,
};

/// Connection-health lifecycle owned by this collaborator. The core only
/// sees it through the boolean `Readiness` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionHealth {
    Disconnected,
    Connecting,
    Ready,
}

#[derive(Debug, Default)]
struct HealthState(AtomicU8);

impl HealthState {
    fn set(&self, health: ConnectionHealth) {
        let raw = match health {
            ConnectionHealth::Disconnected => 0,
            ConnectionHealth::Connecting => 1,
            ConnectionHealth::Ready => 2,
        };
        self.0.store(raw, Ordering::Release);
    }

    fn get(&self) -> ConnectionHealth {
        match self.0.load(Ordering::Acquire) {
            1 => ConnectionHealth::Connecting,
            2 => ConnectionHealth::Ready,
            _ => ConnectionHealth::Disconnected,
        }
    }
}

pub struct Database {
    pool: PgPool,
    health: Arc<HealthState>,
}

impl Database {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let health = Arc::new(HealthState::default());
        health.set(ConnectionHealth::Connecting);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await
            .map_err(|e| {
                health.set(ConnectionHealth::Disconnected);
                StoreError::Unavailable(e.to_string())
            })?;

        let db = Self { pool, health };
        db.ensure_schema().await?;
        db.health.set(ConnectionHealth::Ready);
        info!("database connected");
        Ok(db)
    }

    pub fn health(&self) -> ConnectionHealth {
        self.health.get()
    }

    /// Pings the pool, moving the health state on failure.
    pub async fn ping(&self) -> Result<(), StoreError> {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => {
                self.health.set(ConnectionHealth::Ready);
                Ok(())
            }
            Err(e) => {
                warn!("database ping failed: {}", e);
                self.health.set(ConnectionHealth::Disconnected);
                Err(StoreError::Unavailable(e.to_string()))
            }
        }
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for table in ["admins", "categories", "products", "orders"] {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id UUID PRIMARY KEY,
                    doc JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL
                )"
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop all catalog rows; used by the seed binary before reloading
    /// the sample data.
    pub async fn reset_catalog(&self) -> Result<(), StoreError> {
        sqlx::query("TRUNCATE products, categories").execute(&self.pool).await?;
        Ok(())
    }

    fn admins(&self) -> Collection<Admin> {
        Collection::new(self.pool.clone(), "admins")
    }

    fn categories(&self) -> Collection<Category> {
        Collection::new(self.pool.clone(), "categories")
    }

    fn products(&self) -> Collection<Product> {
        Collection::new(self.pool.clone(), "products")
    }

    fn orders(&self) -> Collection<Order> {
        Collection::new(self.pool.clone(), "orders")
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Generic CRUD over one document table. Table names are compile-time
/// constants, never request input.
struct Collection<T> {
    pool: PgPool,
    table: &'static str,
    _marker: PhantomData<T>,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(pool: PgPool, table: &'static str) -> Self {
        Self { pool, table, _marker: PhantomData }
    }

    async fn all(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("SELECT doc FROM {} ORDER BY created_at DESC", self.table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(decode_doc).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", self.table);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(decode_doc).transpose()
    }

    async fn insert(
        &self,
        id: Uuid,
        doc: &T,
        created_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), StoreError> {
        let sql = format!("INSERT INTO {} (id, doc, created_at) VALUES ($1, $2, $3)", self.table);
        sqlx::query(&sql)
            .bind(id)
            .bind(encode_doc(doc)?)
            .bind(created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace(&self, id: Uuid, doc: &T) -> Result<bool, StoreError> {
        let sql = format!("UPDATE {} SET doc = $2 WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(encode_doc(doc)?)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn decode_doc<T: DeserializeOwned>(row: PgRow) -> Result<T, StoreError> {
    let doc: serde_json::Value = row.try_get("doc")?;
    serde_json::from_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn encode_doc<T: Serialize>(doc: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(doc).map_err(|e| StoreError::Corrupt(e.to_string()))
}

/// Escape LIKE metacharacters so a user query only ever matches as a
/// literal substring.
fn like_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl AdminStore for Database {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let row = sqlx::query("SELECT doc FROM admins WHERE lower(doc->>'email') = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.map(decode_doc).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, StoreError> {
        self.admins().get(id).await
    }

    async fn insert(&self, admin: &Admin) -> Result<(), StoreError> {
        self.admins().insert(admin.id, admin, admin.created_at).await
    }
}

#[async_trait]
impl CategoryStore for Database {
    async fn list(&self) -> Result<Vec<Category>, StoreError> {
        self.categories().all().await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        self.categories().get(id).await
    }

    async fn find_by_name_ci(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query(
            "SELECT doc FROM categories
             WHERE lower(doc->>'name') = lower($1)
               AND ($2::uuid IS NULL OR id <> $2::uuid)
             LIMIT 1",
        )
        .bind(name)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        row.map(decode_doc).transpose()
    }

    async fn insert(&self, category: &Category) -> Result<(), StoreError> {
        self.categories().insert(category.id, category, category.created_at).await
    }

    async fn update(&self, category: &Category) -> Result<bool, StoreError> {
        self.categories().replace(category.id, category).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.categories().remove(id).await
    }
}

#[async_trait]
impl ProductStore for Database {
    async fn list(&self, category: Option<Uuid>) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc FROM products
             WHERE ($1::uuid IS NULL OR (doc->>'category')::uuid = $1::uuid)
             ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(decode_doc).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        self.products().get(id).await
    }

    async fn count_in_category(&self, category: Uuid) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM products WHERE (doc->>'category')::uuid = $1",
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as u64)
    }

    async fn search_text(&self, query: &str, limit: usize) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc FROM products
             WHERE doc->>'name' ILIKE $1 OR doc->>'description' ILIKE $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(like_pattern(query))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(decode_doc).collect()
    }

    async fn list_in_categories(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc FROM products
             WHERE (doc->>'category')::uuid = ANY($1)
             ORDER BY created_at DESC",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(decode_doc).collect()
    }

    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        self.products().insert(product.id, product, product.created_at).await
    }

    async fn update(&self, product: &Product) -> Result<bool, StoreError> {
        self.products().replace(product.id, product).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.products().remove(id).await
    }
}

#[async_trait]
impl OrderStore for Database {
    async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.orders().all().await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        self.orders().get(id).await
    }

    async fn insert(&self, order: &Order) -> Result<(), StoreError> {
        self.orders().insert(order.id, order, order.created_at).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, StoreError> {
        // Read-modify-write; per-request races are accepted here the same
        // way they are for the category guards.
        let Some(mut order) = self.orders().get(id).await? else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = chrono::Utc::now();
        if self.orders().replace(order.id, &order).await? {
            Ok(Some(order))
        } else {
            Ok(None)
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.orders().remove(id).await
    }
}

#[async_trait]
impl Readiness for Database {
    async fn is_ready(&self) -> bool {
        match self.health.get() {
            ConnectionHealth::Connecting => false,
            // A ping can also move Disconnected back to Ready once the
            // pool recovers.
            ConnectionHealth::Ready | ConnectionHealth::Disconnected => {
                self.ping().await.is_ok()
            }
        }
    }
}
