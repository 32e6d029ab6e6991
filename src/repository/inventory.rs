//! Inventory collections persisted in the key-value store

use std::sync::Arc;

use super::kv::KeyValueStore;
use crate::{
    error::AppResult,
    inventory::{ledger::AssignmentLedger, store::EntityStore, Inventory},
    models::Record,
};

#[derive(Clone)]
pub struct InventoryRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl InventoryRepository {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load one collection; a missing key loads as empty
    pub async fn load<T: Record>(&self) -> AppResult<EntityStore<T>> {
        let raw = self.kv.get(T::KEY).await?;
        EntityStore::from_json(raw.as_deref())
    }

    /// Rewrite one collection in full
    pub async fn save<T: Record>(&self, store: &EntityStore<T>) -> AppResult<()> {
        let json = store.to_json()?;
        self.kv.set(T::KEY, &json).await?;
        tracing::debug!(key = T::KEY, records = store.len(), "Collection persisted");
        Ok(())
    }

    pub async fn load_all(&self) -> AppResult<Inventory> {
        Ok(Inventory {
            epis: self.load().await?,
            employees: self.load().await?,
            ledger: AssignmentLedger::new(self.load().await?),
        })
    }
}
