//! Ordered in-memory collection of one record kind

use crate::{
    error::{AppError, AppResult},
    models::Record,
};

/// Ordered records, persisted as one JSON array under `T::KEY`
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore<T: Record> {
    items: Vec<T>,
}

impl<T: Record> Default for EntityStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> EntityStore<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Decode a persisted collection; a missing key is an empty store
    pub fn from_json(raw: Option<&str>) -> AppResult<Self> {
        match raw {
            None => Ok(Self::default()),
            Some(raw) => serde_json::from_str(raw).map(Self::new).map_err(|e| {
                AppError::Storage(format!("Corrupt '{}' collection: {}", T::KEY, e))
            }),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(&self.items)
            .map_err(|e| AppError::Internal(format!("Failed to encode '{}': {}", T::KEY, e)))
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replace the record with the same id in place, returning the old one
    pub fn replace(&mut self, item: T) -> Option<T> {
        let slot = self.items.iter_mut().find(|existing| existing.id() == item.id())?;
        Some(std::mem::replace(slot, item))
    }

    /// Remove every record with this id, keeping the order of the rest
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let mut removed = None;
        self.items.retain(|item| {
            if item.id() != id {
                return true;
            }
            if removed.is_none() {
                removed = Some(item.clone());
            }
            false
        });
        removed
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
