// tests/classify_categories.rs
//! Handpicked relevance and category decisions against the default
//! keyword tables.

use cagefeed::classify::classify;
use cagefeed::{Category, EngineConfig};
use std::collections::BTreeSet;

fn run(title: &str, desc: &str, entities: &[i64]) -> (bool, Category) {
    let cfg = EngineConfig::default();
    let out = classify(
        title,
        desc,
        &entities.iter().copied().collect::<BTreeSet<_>>(),
        &cfg.relevance,
        &cfg.keywords,
    );
    (out.in_domain, out.category)
}

#[test]
fn matchup_heavy_text_lands_in_events() {
    let (in_domain, category) = run(
        "Jon Jones vs Stipe Miocic official for UFC 309 main event card",
        "",
        &[1, 2],
    );
    assert!(in_domain);
    assert_eq!(category, Category::Events);
}

#[test]
fn front_office_text_lands_in_drama() {
    let (in_domain, category) = run(
        "Dana White confirms champion released after contract negotiations",
        "",
        &[],
    );
    assert!(in_domain); // brand vocabulary alone carries relevance
    assert_eq!(category, Category::Drama);
}

#[test]
fn person_news_lands_in_fighters() {
    let (in_domain, category) = run(
        "Topuria injury forces him out of training camp",
        "",
        &[3],
    );
    assert!(in_domain);
    assert_eq!(category, Category::Fighters);
}

#[test]
fn matchup_signals_outrank_contract_signals_on_a_tie() {
    // One events keyword, one drama keyword: the ordered fallback decides,
    // and matchup vocabulary is checked first.
    let (_, category) = run("Card negotiations continue", "", &[1]);
    assert_eq!(category, Category::Events);
}

#[test]
fn keywordless_roster_mention_defaults_to_fighters() {
    let (in_domain, category) = run("Quiet week for the roster", "", &[1]);
    assert!(in_domain);
    assert_eq!(category, Category::Fighters);
}

#[test]
fn unrelated_sport_is_out_of_domain_despite_shared_vocabulary() {
    let (in_domain, _) = run(
        "Boxing heavyweight title bout announced",
        "undercard and venue to follow",
        &[],
    );
    assert!(!in_domain);
}

#[test]
fn description_alone_can_carry_relevance() {
    let (in_domain, _) = run(
        "Weekend round-up",
        "All the action from the latest UFC card in one place",
        &[],
    );
    assert!(in_domain);
}
