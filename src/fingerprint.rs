// src/fingerprint.rs
//! Exact-duplicate key: SHA-256 over the normalized title. Two items with
//! the same fingerprint are always the same story, whatever their
//! descriptions say; the storage layer enforces uniqueness on this value.

use crate::normalize::normalize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Hex digest of `normalize(title)`. Pure; equal normalized titles always
/// produce equal fingerprints.
pub fn fingerprint(title: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(title).as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest.iter() {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}
