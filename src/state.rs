use std::sync::Arc;

use crate::auth::TokenService;
use crate::store::memory::MemoryStore;
use crate::store::postgres::Database;
use crate::store::{AdminStore, CategoryStore, OrderStore, ProductStore, Readiness};

/// Shared request-handling context: the entity stores as abstract
/// capabilities, the token service, and the collaborator's readiness
/// probe. Handlers hold only transient references through this; no
/// cross-request mutable state lives in the core.
#[derive(Clone)]
pub struct AppState {
    pub admins: Arc<dyn AdminStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub products: Arc<dyn ProductStore>,
    pub orders: Arc<dyn OrderStore>,
    pub tokens: TokenService,
    pub readiness: Arc<dyn Readiness>,
}

impl AppState {
    /// Production wiring over the Postgres collaborator.
    pub fn postgres(database: Database) -> Self {
        let database = Arc::new(database);
        Self {
            admins: database.clone(),
            categories: database.clone(),
            products: database.clone(),
            orders: database.clone(),
            tokens: TokenService::from_config(),
            readiness: database,
        }
    }

    /// Hermetic wiring over the in-process store; used by the test
    /// suites.
    pub fn in_memory(tokens: TokenService) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            admins: store.clone(),
            categories: store.clone(),
            products: store.clone(),
            orders: store.clone(),
            tokens,
            readiness: store,
        }
    }
}
