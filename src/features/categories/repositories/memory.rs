use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryFilter, CategoryStatus,
};
use crate::features::categories::repositories::CategoryRepository;
use crate::shared::types::Paging;

/// In-memory repository for tests. Counts every call so tests can assert that
/// rejected input never reached storage.
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepository {
    rows: Mutex<BTreeMap<Uuid, Category>>,
    calls: AtomicUsize,
    writes_rejected: AtomicBool,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make `insert`, `update` and `delete` report that no row was touched,
    /// as a store does when it loses a race with another writer
    pub fn reject_writes(&self) {
        self.writes_rejected.store(true, Ordering::SeqCst);
    }

    fn writes_rejected(&self) -> bool {
        self.writes_rejected.load(Ordering::SeqCst)
    }

    /// Raw row access, bypassing the call counter
    pub fn row(&self, id: Uuid) -> Option<Category> {
        self.lock().ok()?.get(&id).cloned()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<Uuid, Category>>> {
        self.rows
            .lock()
            .map_err(|_| AppError::Internal("category store lock poisoned".to_string()))
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn matches(filter: &CategoryFilter, category: &Category) -> bool {
    filter.name.as_ref().is_none_or(|n| *n == category.name)
        && filter.position.is_none_or(|p| Some(p) == category.position)
        && filter.parent_id.is_none_or(|p| Some(p) == category.parent_id)
        && filter.status.is_none_or(|s| s == category.status)
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        self.record_call();
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn list(&self, filter: &CategoryFilter, paging: &mut Paging) -> Result<Vec<Category>> {
        self.record_call();
        let rows = self.lock()?;

        // BTreeMap iterates ascending; reverse for id DESC
        let matching: Vec<&Category> = rows
            .values()
            .rev()
            .filter(|c| !c.is_deleted() && matches(filter, c))
            .collect();
        paging.total = matching.len() as i64;

        Ok(matching
            .into_iter()
            .skip(paging.offset() as usize)
            .take(paging.limit() as usize)
            .cloned()
            .collect())
    }

    async fn insert(&self, category: &Category) -> Result<bool> {
        self.record_call();
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut rows = self.lock()?;
        if rows.contains_key(&category.id) {
            return Ok(false);
        }
        rows.insert(category.id, category.clone());
        Ok(true)
    }

    async fn update(&self, id: Uuid, changes: &CategoryChanges) -> Result<bool> {
        self.record_call();
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut rows = self.lock()?;
        let Some(row) = rows.get_mut(&id) else {
            return Ok(false);
        };

        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(image) = &changes.image {
            row.image = Some(image.clone());
        }
        if let Some(position) = changes.position {
            row.position = Some(position);
        }
        if let Some(description) = &changes.description {
            row.description = Some(description.clone());
        }
        if let Some(parent_id) = changes.parent_id {
            row.parent_id = Some(parent_id);
        }
        if let Some(status) = changes.status {
            row.status = status;
        }
        row.updated_at = changes.updated_at;
        Ok(true)
    }

    async fn delete(&self, id: Uuid, hard: bool, updated_at: DateTime<Utc>) -> Result<bool> {
        self.record_call();
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut rows = self.lock()?;
        if hard {
            return Ok(rows.remove(&id).is_some());
        }
        match rows.get_mut(&id) {
            Some(row) => {
                row.status = CategoryStatus::Deleted;
                row.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
