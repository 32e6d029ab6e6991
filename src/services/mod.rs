//! Business logic services

pub mod inventory;
pub mod realtime;
pub mod support;

use std::sync::Arc;

use crate::{
    config::ExpirationConfig, error::AppResult, inventory::expiration::ExpirationPolicy,
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub inventory: inventory::InventoryService,
    pub support: support::SupportService,
}

impl Services {
    /// Create all services, loading the persisted inventory
    pub async fn new(repository: Repository, expiration: &ExpirationConfig) -> AppResult<Self> {
        let policy = ExpirationPolicy::new(expiration.warning_days);
        Ok(Self {
            inventory: inventory::InventoryService::load(repository.inventory.clone(), policy).await?,
            support: support::SupportService::new(
                Arc::new(repository.support.clone()),
                realtime::RealtimeHub::default(),
            ),
        })
    }
}
