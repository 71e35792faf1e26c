// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type EntityId = i64;

/// One raw feed entry, as handed over by the external fetcher.
/// Immutable; discarded once the pipeline resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub title: String,
    pub description: String,
    /// Globally unique per feed entry across all feeds.
    pub source_url: String,
    pub published_at: DateTime<Utc>,
}

impl RawItem {
    /// Boundary constructor: a missing description becomes an empty string
    /// here, not somewhere deep inside the classifier.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        source_url: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.unwrap_or_default(),
            source_url: source_url.into(),
            published_at,
        }
    }
}

/// Mutually exclusive story categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Roster / person news (the default bucket).
    Fighters,
    /// Matchup, card and event news.
    Events,
    /// Off-the-record: contracts, front office, beefs.
    Drama,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fighters => "fighters",
            Category::Events => "events",
            Category::Drama => "drama",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline output for an item that survived every gate; the unit handed
/// to the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedItem {
    pub title: String,
    pub description: String,
    pub source_url: String,
    pub published_at: DateTime<Utc>,
    /// SHA-256 hex of the normalized title; backs the unique constraint.
    pub fingerprint: String,
    pub category: Category,
    pub entity_ids: BTreeSet<EntityId>,
}

/// Why an item was suppressed as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    UrlExact,
    HashExact,
    SimilarTitle,
    SameStoryDifferentWording,
    /// Lost a race against a concurrent run; surfaced by the storage
    /// uniqueness constraint on insert.
    InsertRace,
}

impl DuplicateReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateReason::UrlExact => "url_exact",
            DuplicateReason::HashExact => "hash_exact",
            DuplicateReason::SimilarTitle => "similar_title",
            DuplicateReason::SameStoryDifferentWording => "same_story_different_wording",
            DuplicateReason::InsertRace => "insert_race",
        }
    }
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one item inside a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Added(i64),
    Duplicate(DuplicateReason),
    Rejected,
}

/// Aggregated result of one orchestrator invocation. The caller persists
/// this as an audit row; the engine only fills it in.
#[derive(Debug, Clone, Serialize)]
pub struct SyncRunResult {
    pub processed: u32,
    pub added: u32,
    pub duplicate: u32,
    pub rejected: u32,
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SyncRunResult {
    pub fn begin(started_at: DateTime<Utc>) -> Self {
        Self {
            processed: 0,
            added: 0,
            duplicate: 0,
            rejected: 0,
            errors: Vec::new(),
            started_at,
            finished_at: started_at,
        }
    }
}
