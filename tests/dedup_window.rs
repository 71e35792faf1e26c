// tests/dedup_window.rs
//! Near-duplicate scenarios: exact hashes after normalization, the
//! shared-entity similarity tier, and the empty-keyword edge case.

use cagefeed::config::StopWords;
use cagefeed::dedup::jaccard;
use cagefeed::fingerprint::fingerprint;
use cagefeed::normalize::keyword_set;
use cagefeed::{Entity, EngineConfig, MemoryStore, RawItem, StaticRoster, SyncEngine};
use chrono::Utc;

fn roster() -> StaticRoster {
    StaticRoster::new(vec![
        Entity {
            id: 1,
            name: "Jon Jones".into(),
            aliases: vec![],
        },
        Entity {
            id: 2,
            name: "Stipe Miocic".into(),
            aliases: vec![],
        },
    ])
}

fn engine() -> SyncEngine<MemoryStore, StaticRoster> {
    SyncEngine::new(MemoryStore::new(), roster(), EngineConfig::default())
}

fn item(title: &str, url: &str) -> RawItem {
    RawItem::new(title, None, url, Utc::now())
}

#[tokio::test]
async fn punctuation_and_case_variants_share_a_fingerprint() {
    let a = "Jon Jones Signs New Deal With UFC";
    let b = "Jon Jones signs new deal with UFC!!";
    assert_eq!(fingerprint(a), fingerprint(b));

    let engine = engine();
    engine.run_sync(vec![item(a, "https://a/1")]).await.unwrap();
    let result = engine.run_sync(vec![item(b, "https://b/1")]).await.unwrap();

    assert_eq!(result.duplicate, 1);
    assert_eq!(result.added, 0);
    assert_eq!(engine.store().item_count(), 1);
}

#[tokio::test]
async fn same_story_different_wording_is_caught_via_shared_entities() {
    let first = "Jon Jones vs Stipe Miocic Set For Card 300";
    let second = "Card 300 Booking Jon Jones Meets Stipe Miocic In Vegas";

    // Sanity: the rewording sits between the two tiers — below the
    // generic threshold, above the shared-entity one.
    let cfg = EngineConfig::default();
    let stop = StopWords::from_config(&cfg.stopwords);
    let sim = jaccard(&keyword_set(first, &stop), &keyword_set(second, &stop));
    assert!(sim > cfg.dedup.shared_entity_threshold, "sim = {sim}");
    assert!(sim <= cfg.dedup.similar_title_threshold, "sim = {sim}");

    let engine = engine();
    let r1 = engine.run_sync(vec![item(first, "https://a/1")]).await.unwrap();
    assert_eq!(r1.added, 1);

    let r2 = engine.run_sync(vec![item(second, "https://b/1")]).await.unwrap();
    assert_eq!(r2.duplicate, 1);
    assert_eq!(r2.added, 0);
    assert_eq!(engine.store().item_count(), 1);
}

#[tokio::test]
async fn single_entity_rewording_below_generic_threshold_is_kept() {
    // Only one linked fighter: the shared-entity tier never applies, and
    // the generic tier alone does not trip at this similarity.
    let first = "Jon Jones vs Stipe Miocic Set For Card 300";
    let second = "Stipe Miocic Plans One Final Farewell Camp Before Card 300";

    let engine = engine();
    engine.run_sync(vec![item(first, "https://a/1")]).await.unwrap();
    let result = engine
        .run_sync(vec![item(second, "https://b/1")])
        .await
        .unwrap();

    assert_eq!(result.added, 1);
    assert_eq!(engine.store().item_count(), 2);
}

#[tokio::test]
async fn titles_with_no_meaningful_tokens_never_match_the_window() {
    let engine = engine();
    // Stop-words and domain noise only: the keyword set is empty.
    let r1 = engine
        .run_sync(vec![item("The UFC Fight News", "https://a/1")])
        .await
        .unwrap();
    let r2 = engine
        .run_sync(vec![item("UFC News For The Fighters", "https://b/1")])
        .await
        .unwrap();

    // Both are in-domain (brand token) and neither suppresses the other:
    // empty keyword sets have similarity 0 by definition.
    assert_eq!(r1.added, 1);
    assert_eq!(r2.added, 1);
    assert_eq!(engine.store().item_count(), 2);
}
