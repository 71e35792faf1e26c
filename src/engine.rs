// src/engine.rs
//! Sync orchestrator: drives the per-item decision pipeline over one batch.
//!
//! Strictly sequential, in input order — an item added early in the batch
//! must be able to suppress a near-identical item later in the same batch,
//! so the recent-title window is appended to after every successful insert.
//! One item's failure never aborts the batch; only a roster-load failure is
//! fatal, because every relevance and category decision depends on it.

use crate::classify::classify;
use crate::config::{EngineConfig, StopWords};
use crate::dedup::{find_similar_in, RecentWindow};
use crate::entities::Roster;
use crate::fingerprint::fingerprint;
use crate::normalize::keyword_set;
use crate::store::{EntityStore, Store, StoreError};
use crate::types::{
    ClassifiedItem, DuplicateReason, ItemOutcome, RawItem, SyncRunResult,
};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

/// One-time metrics registration (so series show up on the exporter the
/// embedding app wires in).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sync_processed_total", "Raw items fed into the pipeline.");
        describe_counter!("sync_added_total", "Items persisted as new stories.");
        describe_counter!(
            "sync_duplicate_total",
            "Items suppressed as duplicates, labeled by reason."
        );
        describe_counter!("sync_rejected_total", "Items rejected as out-of-domain.");
        describe_counter!("sync_errors_total", "Per-item persistence errors.");
        describe_gauge!("sync_last_run_ts", "Unix ts when a sync run last finished.");
    });
}

/// The engine's single entry point lives here; everything else in the crate
/// is a pure building block it composes.
pub struct SyncEngine<S, E> {
    store: S,
    entity_store: E,
    config: EngineConfig,
    stop: StopWords,
}

impl<S: Store, E: EntityStore> SyncEngine<S, E> {
    pub fn new(store: S, entity_store: E, config: EngineConfig) -> Self {
        let stop = StopWords::from_config(&config.stopwords);
        Self {
            store,
            entity_store,
            config,
            stop,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one batch of raw items, in input order. Always returns a
    /// summary for per-item problems; only roster loading can fail the run.
    pub async fn run_sync(&self, batch: Vec<RawItem>) -> Result<SyncRunResult> {
        ensure_metrics_described();
        let started_at = Utc::now();
        let mut result = SyncRunResult::begin(started_at);

        // Fatal by policy: without the roster, relevance and category
        // decisions cannot be trusted, so no item is processed at all.
        let roster = Roster::new(
            self.entity_store
                .active_roster()
                .await
                .context("loading entity roster")?,
        );

        let since = started_at - Duration::hours(self.config.dedup.window_hours);
        let seed = self
            .store
            .recent_titles(since, self.config.dedup.window_size)
            .await
            .context("seeding recent-title window")?;
        let seed: Vec<(i64, String)> = seed.into_iter().map(|t| (t.id, t.title)).collect();
        let mut window = RecentWindow::seed(self.config.dedup.window_size, &seed, &self.stop);

        for item in &batch {
            result.processed += 1;
            counter!("sync_processed_total").increment(1);

            let outcome = self
                .process_item(item, &roster, &mut window, &mut result.errors)
                .await;
            match outcome {
                Ok(ItemOutcome::Added(id)) => {
                    result.added += 1;
                    counter!("sync_added_total").increment(1);
                    debug!(id, url = %item.source_url, "item added");
                }
                Ok(ItemOutcome::Duplicate(reason)) => {
                    result.duplicate += 1;
                    counter!("sync_duplicate_total", "reason" => reason.as_str()).increment(1);
                    debug!(%reason, url = %item.source_url, "item suppressed as duplicate");
                }
                Ok(ItemOutcome::Rejected) => {
                    result.rejected += 1;
                    counter!("sync_rejected_total").increment(1);
                    debug!(url = %item.source_url, "item rejected as out-of-domain");
                }
                Err(e) => {
                    // Per-item failure: record, count as rejected, move on.
                    result.rejected += 1;
                    result.errors.push(format!("{}: {e:#}", item.source_url));
                    counter!("sync_errors_total").increment(1);
                    warn!(error = %e, url = %item.source_url, "item failed, continuing batch");
                }
            }
        }

        result.finished_at = Utc::now();
        gauge!("sync_last_run_ts").set(result.finished_at.timestamp() as f64);
        info!(
            processed = result.processed,
            added = result.added,
            duplicate = result.duplicate,
            rejected = result.rejected,
            errors = result.errors.len(),
            "sync run finished"
        );
        Ok(result)
    }

    /// The per-item pipeline. Each stage short-circuits to a terminal
    /// outcome; stage order is part of the contract (URL check first,
    /// relevance before any hashing or similarity work).
    async fn process_item(
        &self,
        item: &RawItem,
        roster: &Roster,
        window: &mut RecentWindow,
        errors: &mut Vec<String>,
    ) -> Result<ItemOutcome> {
        if self.store.url_exists(&item.source_url).await? {
            return Ok(ItemOutcome::Duplicate(DuplicateReason::UrlExact));
        }

        let raw_text = format!("{} {}", item.title, item.description);
        let entity_ids = roster.link(&raw_text);

        let decision = classify(
            &item.title,
            &item.description,
            &entity_ids,
            &self.config.relevance,
            &self.config.keywords,
        );
        if !decision.in_domain {
            return Ok(ItemOutcome::Rejected);
        }

        let fp = fingerprint(&item.title);
        if self.store.fingerprint_exists(&fp).await? {
            return Ok(ItemOutcome::Duplicate(DuplicateReason::HashExact));
        }

        let keywords = keyword_set(&item.title, &self.stop);
        if let Some((matched_id, similarity)) =
            window.find_similar(&keywords, self.config.dedup.similar_title_threshold)
        {
            debug!(matched_id, similarity, url = %item.source_url, "similar title in window");
            return Ok(ItemOutcome::Duplicate(DuplicateReason::SimilarTitle));
        }

        if entity_ids.len() >= 2 {
            let ids: Vec<_> = entity_ids.iter().copied().collect();
            let since = Utc::now() - Duration::hours(self.config.dedup.window_hours);
            let pool = self.store.recent_titles_for_entities(&ids, since).await?;
            let pool: Vec<_> = pool
                .iter()
                .map(|t| (t.id, keyword_set(&t.title, &self.stop)))
                .collect();
            if let Some((matched_id, similarity)) = find_similar_in(
                &keywords,
                pool.iter().map(|(id, kw)| (*id, kw)),
                self.config.dedup.shared_entity_threshold,
            ) {
                debug!(matched_id, similarity, url = %item.source_url, "same story, different wording");
                return Ok(ItemOutcome::Duplicate(
                    DuplicateReason::SameStoryDifferentWording,
                ));
            }
        }

        let classified = ClassifiedItem {
            title: item.title.clone(),
            description: item.description.clone(),
            source_url: item.source_url.clone(),
            published_at: item.published_at,
            fingerprint: fp,
            category: decision.category,
            entity_ids: entity_ids.clone(),
        };

        match self.store.insert_item(&classified).await {
            Ok(id) => {
                let ids: Vec<_> = entity_ids.iter().copied().collect();
                if let Err(e) = self.store.link_entities(id, &ids).await {
                    // The row is durable and linking is an idempotent
                    // upsert a later run can repair; keep the add.
                    errors.push(format!("{}: linking entities: {e}", item.source_url));
                }
                window.push(id, &item.title, &self.stop);
                Ok(ItemOutcome::Added(id))
            }
            // Lost a race against a concurrent run; the constraint is the
            // cross-run backstop, so this is a duplicate, not an error.
            Err(StoreError::UniqueViolation(_)) => {
                Ok(ItemOutcome::Duplicate(DuplicateReason::InsertRace))
            }
            Err(e) => Err(e.into()),
        }
    }
}
