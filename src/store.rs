// src/store.rs
//! Seams to the external collaborators: the persistent item store and the
//! entity (roster) store. The engine never talks to a database directly;
//! it sees these traits only.
//!
//! `MemoryStore` is an in-process reference backend that enforces the same
//! uniqueness constraints a relational schema would, so the race-recovery
//! path is exercisable without infrastructure.

use crate::entities::Entity;
use crate::types::{ClassifiedItem, EntityId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// `(id, title)` pair as returned by the recent-title queries,
/// most-recently-added first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredTitle {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The insert hit a uniqueness constraint (source URL or fingerprint).
    /// The orchestrator folds this into the duplicate outcome.
    #[error("unique constraint violated on {0}")]
    UniqueViolation(&'static str),
    /// Anything else the backend could not do.
    #[error("storage error: {0}")]
    Backend(String),
}

/// Persistent storage for classified items.
#[async_trait]
pub trait Store: Send + Sync {
    async fn url_exists(&self, url: &str) -> Result<bool, StoreError>;

    async fn fingerprint_exists(&self, fingerprint: &str) -> Result<bool, StoreError>;

    /// Up to `limit` most-recently-added titles since `since`.
    async fn recent_titles(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<StoredTitle>, StoreError>;

    /// Titles since `since` of items linked to at least two of `entity_ids`.
    async fn recent_titles_for_entities(
        &self,
        entity_ids: &[EntityId],
        since: DateTime<Utc>,
    ) -> Result<Vec<StoredTitle>, StoreError>;

    /// Insert one item; its own atomic unit, no batch-wide transaction.
    async fn insert_item(&self, item: &ClassifiedItem) -> Result<i64, StoreError>;

    /// Idempotent upsert of item→entity relations; no-op on existing links.
    async fn link_entities(
        &self,
        item_id: i64,
        entity_ids: &[EntityId],
    ) -> Result<(), StoreError>;
}

/// Read-only roster source, loaded once per sync run.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn active_roster(&self) -> anyhow::Result<Vec<Entity>>;
}

#[derive(Debug)]
struct StoredItem {
    id: i64,
    title: String,
    source_url: String,
    fingerprint: String,
    inserted_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    next_id: i64,
    items: Vec<StoredItem>,
    links: BTreeMap<i64, BTreeSet<EntityId>>,
}

/// In-memory `Store` with the same constraint behavior as the real schema.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_count(&self) -> usize {
        self.inner.lock().expect("memory store lock").items.len()
    }

    pub fn linked_entities(&self, item_id: i64) -> BTreeSet<EntityId> {
        self.inner
            .lock()
            .expect("memory store lock")
            .links
            .get(&item_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn url_exists(&self, url: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner.items.iter().any(|it| it.source_url == url))
    }

    async fn fingerprint_exists(&self, fingerprint: &str) -> Result<bool, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner.items.iter().any(|it| it.fingerprint == fingerprint))
    }

    async fn recent_titles(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<StoredTitle>, StoreError> {
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner
            .items
            .iter()
            .rev() // insertion order; newest last
            .filter(|it| it.inserted_at >= since)
            .take(limit)
            .map(|it| StoredTitle {
                id: it.id,
                title: it.title.clone(),
            })
            .collect())
    }

    async fn recent_titles_for_entities(
        &self,
        entity_ids: &[EntityId],
        since: DateTime<Utc>,
    ) -> Result<Vec<StoredTitle>, StoreError> {
        let wanted: BTreeSet<EntityId> = entity_ids.iter().copied().collect();
        let inner = self.inner.lock().expect("memory store lock");
        Ok(inner
            .items
            .iter()
            .rev()
            .filter(|it| it.inserted_at >= since)
            .filter(|it| {
                inner
                    .links
                    .get(&it.id)
                    .map(|linked| linked.intersection(&wanted).count() >= 2)
                    .unwrap_or(false)
            })
            .map(|it| StoredTitle {
                id: it.id,
                title: it.title.clone(),
            })
            .collect())
    }

    async fn insert_item(&self, item: &ClassifiedItem) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().expect("memory store lock");
        if inner.items.iter().any(|it| it.source_url == item.source_url) {
            return Err(StoreError::UniqueViolation("source_url"));
        }
        if inner.items.iter().any(|it| it.fingerprint == item.fingerprint) {
            return Err(StoreError::UniqueViolation("fingerprint"));
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.items.push(StoredItem {
            id,
            title: item.title.clone(),
            source_url: item.source_url.clone(),
            fingerprint: item.fingerprint.clone(),
            inserted_at: Utc::now(),
        });
        Ok(id)
    }

    async fn link_entities(
        &self,
        item_id: i64,
        entity_ids: &[EntityId],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store lock");
        inner
            .links
            .entry(item_id)
            .or_default()
            .extend(entity_ids.iter().copied());
        Ok(())
    }
}

/// Fixed roster handed out as-is; the common test and demo entity store.
#[derive(Debug, Clone, Default)]
pub struct StaticRoster {
    entities: Vec<Entity>,
}

impl StaticRoster {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }
}

#[async_trait]
impl EntityStore for StaticRoster {
    async fn active_roster(&self) -> anyhow::Result<Vec<Entity>> {
        Ok(self.entities.clone())
    }
}
