// src/dedup.rs
//! Near-duplicate detection: token-set Jaccard similarity against a
//! bounded window of recently persisted titles.
//!
//! Two tiers, checked in order by the orchestrator:
//! 1. generic — any recent title with similarity above the generic
//!    threshold is the same story ("similar title");
//! 2. shared-entity — among stored items linked to the same two-or-more
//!    fighters, a lower threshold already counts as the same story told
//!    in different words.
//!
//! Both thresholds come from configuration, never from constants buried
//! in the comparison code.

use crate::config::StopWords;
use crate::normalize::keyword_set;
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};

/// Tunable dedup parameters, deserialized from the `[dedup]` config table.
#[derive(Debug, Clone, Deserialize)]
pub struct DedupParams {
    /// Generic tier: similarity above this is a duplicate of any window entry.
    pub similar_title_threshold: f32,
    /// Shared-entity tier: similarity above this is a duplicate among items
    /// linked to the same two-or-more entities.
    pub shared_entity_threshold: f32,
    /// Max entries kept in the recent-title window.
    pub window_size: usize,
    /// Lookback horizon for the window and the entity-scoped query.
    pub window_hours: i64,
}

impl DedupParams {
    /// Parameter hygiene: thresholds clamped to [0,1], window at least 1.
    pub fn sanitized(mut self) -> Self {
        self.similar_title_threshold = self.similar_title_threshold.clamp(0.0, 1.0);
        self.shared_entity_threshold = self.shared_entity_threshold.clamp(0.0, 1.0);
        self.window_size = self.window_size.max(1);
        self.window_hours = self.window_hours.max(1);
        self
    }
}

impl Default for DedupParams {
    fn default() -> Self {
        Self {
            similar_title_threshold: 0.70,
            shared_entity_threshold: 0.50,
            window_size: 100,
            window_hours: 24,
        }
    }
}

/// Jaccard similarity of two keyword sets, in [0,1]. An empty set never
/// matches anything (defined as 0.0) so near-empty titles cannot produce
/// false positives.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f32 / union as f32
}

#[derive(Debug, Clone)]
struct WindowEntry {
    id: i64,
    keywords: HashSet<String>,
}

/// Bounded, most-recent-first buffer of persisted titles' keyword sets.
///
/// Seeded from storage at the start of a run and appended to after every
/// successful insert, so later items in the same batch see earlier ones.
#[derive(Debug)]
pub struct RecentWindow {
    entries: VecDeque<WindowEntry>,
    cap: usize,
}

impl RecentWindow {
    /// Build from stored titles ordered most-recently-added first.
    pub fn seed(cap: usize, titles: &[(i64, String)], stop: &StopWords) -> Self {
        let cap = cap.max(1);
        let mut entries = VecDeque::with_capacity(cap);
        for (id, title) in titles.iter().take(cap) {
            entries.push_back(WindowEntry {
                id: *id,
                keywords: keyword_set(title, stop),
            });
        }
        Self { entries, cap }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a freshly persisted title; the oldest entry falls off the back.
    pub fn push(&mut self, id: i64, title: &str, stop: &StopWords) {
        if self.entries.len() == self.cap {
            self.entries.pop_back();
        }
        self.entries.push_front(WindowEntry {
            id,
            keywords: keyword_set(title, stop),
        });
    }

    /// First window entry (most recent first) whose similarity with
    /// `keywords` exceeds `threshold`.
    pub fn find_similar(
        &self,
        keywords: &HashSet<String>,
        threshold: f32,
    ) -> Option<(i64, f32)> {
        for entry in &self.entries {
            let sim = jaccard(keywords, &entry.keywords);
            if sim > threshold {
                return Some((entry.id, sim));
            }
        }
        None
    }
}

/// Same scan over an ad-hoc candidate pool (the entity-scoped query result).
pub fn find_similar_in<'a, I>(
    keywords: &HashSet<String>,
    candidates: I,
    threshold: f32,
) -> Option<(i64, f32)>
where
    I: IntoIterator<Item = (i64, &'a HashSet<String>)>,
{
    for (id, other) in candidates {
        let sim = jaccard(keywords, other);
        if sim > threshold {
            return Some((id, sim));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn kw(words: &[&str]) -> HashSet<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    fn stop() -> StopWords {
        StopWords::from_config(&EngineConfig::default().stopwords)
    }

    #[test]
    fn jaccard_is_bounded_and_symmetric() {
        let a = kw(&["jones", "retires", "champion"]);
        let b = kw(&["jones", "returns"]);
        let s1 = jaccard(&a, &b);
        let s2 = jaccard(&b, &a);
        assert!((0.0..=1.0).contains(&s1));
        assert!((s1 - s2).abs() < f32::EPSILON);
    }

    #[test]
    fn jaccard_self_is_one_and_empty_is_zero() {
        let a = kw(&["jones", "retires"]);
        assert!((jaccard(&a, &a) - 1.0).abs() < f32::EPSILON);
        let empty = kw(&[]);
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&a, &empty), 0.0);
    }

    #[test]
    fn window_evicts_oldest_beyond_capacity() {
        let stop = stop();
        let mut w = RecentWindow::seed(2, &[], &stop);
        w.push(1, "Topuria defends featherweight belt", &stop);
        w.push(2, "Pereira books light heavyweight rematch", &stop);
        w.push(3, "Jones announces heavyweight retirement", &stop);
        assert_eq!(w.len(), 2);
        // Entry 1 fell off; an exact repeat of it no longer matches.
        let kw1 = keyword_set("Topuria defends featherweight belt", &stop);
        assert!(w.find_similar(&kw1, 0.70).is_none());
    }

    #[test]
    fn find_similar_prefers_most_recent_entry() {
        let stop = stop();
        let mut w = RecentWindow::seed(10, &[], &stop);
        w.push(1, "Jones announces heavyweight retirement", &stop);
        w.push(2, "Jones announces heavyweight retirement again", &stop);
        let kws = keyword_set("Jones announces heavyweight retirement", &stop);
        let (id, sim) = w.find_similar(&kws, 0.70).unwrap();
        assert_eq!(id, 2);
        assert!(sim > 0.70);
    }

    #[test]
    fn empty_keyword_set_never_matches() {
        let stop = stop();
        let mut w = RecentWindow::seed(10, &[], &stop);
        w.push(1, "Jones announces heavyweight retirement", &stop);
        let empty = kw(&[]);
        assert!(w.find_similar(&empty, 0.0).is_none());
    }

    #[test]
    fn sanitize_clamps_out_of_range_params() {
        let p = DedupParams {
            similar_title_threshold: 1.7,
            shared_entity_threshold: -0.2,
            window_size: 0,
            window_hours: 0,
        }
        .sanitized();
        assert_eq!(p.similar_title_threshold, 1.0);
        assert_eq!(p.shared_entity_threshold, 0.0);
        assert_eq!(p.window_size, 1);
        assert_eq!(p.window_hours, 1);
    }
}
