// src/lib.rs
// Public library surface for integration tests (and the embedding app).

pub mod classify;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod entities;
pub mod fingerprint;
pub mod normalize;
pub mod store;
pub mod types;

// ---- Re-exports for a stable public API ----
pub use crate::config::EngineConfig;
pub use crate::engine::SyncEngine;
pub use crate::entities::{Entity, Roster};
pub use crate::store::{EntityStore, MemoryStore, StaticRoster, Store, StoreError, StoredTitle};
pub use crate::types::{
    Category, ClassifiedItem, DuplicateReason, ItemOutcome, RawItem, SyncRunResult,
};
