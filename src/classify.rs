// src/classify.rs
//! Relevance gate and category assignment.
//!
//! An item is in-domain when the promotion's own brand vocabulary shows up
//! in its text, or when it mentions anyone from the tracked roster (the
//! catalog only carries the tracked promotion's fighters, so any entity hit
//! already implies relevance). The gate fails closed: degenerate input is
//! out-of-domain, never an error.
//!
//! Categories are mutually exclusive; the keyword list with the highest
//! match count wins. On a tie (including all-zero) the fallback order is
//! fixed policy: matchup signals first, then front-office vocabulary, then
//! the person-news default.

use crate::config::{CategoryKeywords, RelevanceConfig};
use crate::normalize::normalize;
use crate::types::{Category, EntityId};
use std::collections::BTreeSet;

/// Outcome of the relevance + category decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub in_domain: bool,
    pub category: Category,
}

/// Word-boundary containment of `term` in a space-padded normalized text.
/// Works for single words and multi-word phrases alike.
fn contains_term(padded: &str, term: &str) -> bool {
    let needle = normalize(term);
    if needle.is_empty() {
        return false;
    }
    padded.contains(&format!(" {needle} "))
}

fn count_matches(padded: &str, terms: &[String]) -> usize {
    terms.iter().filter(|t| contains_term(padded, t)).count()
}

/// Decide in-domain membership and category for one item.
/// Pure: catalogs and keyword tables arrive as arguments, not ambient state.
pub fn classify(
    title: &str,
    description: &str,
    entity_matches: &BTreeSet<EntityId>,
    relevance: &RelevanceConfig,
    keywords: &CategoryKeywords,
) -> Classification {
    let text = normalize(&format!("{title} {description}"));
    if text.is_empty() {
        // Fail closed: nothing to judge means not in-domain.
        return Classification {
            in_domain: false,
            category: Category::Fighters,
        };
    }
    let padded = format!(" {text} ");

    let brand_hit = relevance
        .brand_tokens
        .iter()
        .any(|t| contains_term(&padded, t));
    let in_domain = brand_hit || !entity_matches.is_empty();
    if !in_domain {
        return Classification {
            in_domain: false,
            category: Category::Fighters,
        };
    }

    let scored = [
        (Category::Fighters, count_matches(&padded, &keywords.fighters)),
        (Category::Events, count_matches(&padded, &keywords.events)),
        (Category::Drama, count_matches(&padded, &keywords.drama)),
    ];
    let best = scored.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let leaders: Vec<Category> = scored
        .iter()
        .filter(|(_, n)| *n == best && best > 0)
        .map(|(c, _)| *c)
        .collect();

    let category = if leaders.len() == 1 {
        leaders[0]
    } else if count_matches(&padded, &keywords.matchup_signals) > 0 {
        Category::Events
    } else if count_matches(&padded, &keywords.drama_signals) > 0 {
        Category::Drama
    } else {
        Category::Fighters
    };

    Classification { in_domain, category }
}
