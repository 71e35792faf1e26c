// src/normalize.rs
//! Canonical text reduction shared by fingerprinting, dedup and the
//! classifier: every comparison in the engine happens on the output of
//! `normalize`, never on raw feed text.

use crate::config::StopWords;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Reduce text to its canonical form: HTML entities decoded, tags removed,
/// NFD-decomposed with combining marks stripped, lower-cased, anything
/// outside `[a-z0-9]` folded to a single space, trimmed.
///
/// Deterministic and pure; empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    // Feeds promise plain text but occasionally still leak markup.
    let decoded = html_escape::decode_html_entities(text);
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    let stripped = re_tags.replace_all(&decoded, " ");

    let mut out = String::with_capacity(stripped.len());
    let mut pending_space = false;
    for ch in stripped.chars().nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        for lc in ch.to_lowercase() {
            if lc.is_ascii_alphanumeric() {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(lc);
            } else {
                pending_space = true;
            }
        }
    }
    out
}

/// Tokenize a normalized text into its keyword set: whitespace split,
/// tokens of length <= 2 dropped, stop-words and domain noise dropped.
///
/// Empty input yields an empty set, never an error.
pub fn keyword_set(text: &str, stop: &StopWords) -> HashSet<String> {
    normalize(text)
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .filter(|t| !stop.contains(t))
        .map(str::to_string)
        .collect()
}
