//! Repository layer: key-value inventory storage and the support database

pub mod inventory;
pub mod kv;
pub mod support;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

/// Main repository struct holding the storage handles
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub inventory: inventory::InventoryRepository,
    pub support: support::SupportRepository,
}

impl Repository {
    /// Create a new repository over the database pool and key-value store
    pub fn new(pool: Pool<Postgres>, kv: Arc<dyn kv::KeyValueStore>) -> Self {
        Self {
            inventory: inventory::InventoryRepository::new(kv),
            support: support::SupportRepository::new(pool.clone()),
            pool,
        }
    }
}
