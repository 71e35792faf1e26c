// src/entities.rs
//! Roster catalog and entity linker. Matching is case-insensitive exact
//! containment of canonical names and aliases against the raw text — no
//! fuzziness, no disambiguation. When an alias collides with another
//! fighter's name, both ids are reported; that imprecision is accepted
//! rather than papered over with guesswork.

use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A tracked fighter from the promotion's current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Read-only catalog for one sync run, with needles lowered once up front.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    needles: Vec<(EntityId, String)>,
}

impl Roster {
    pub fn new(entities: Vec<Entity>) -> Self {
        let mut needles = Vec::new();
        for e in entities {
            for name in std::iter::once(&e.name).chain(e.aliases.iter()) {
                let lowered = name.trim().to_lowercase();
                if !lowered.is_empty() {
                    needles.push((e.id, lowered));
                }
            }
        }
        Self { needles }
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    /// Ids of every entity whose name or alias occurs in `raw_text`
    /// (title concatenated with description, not normalized).
    /// O(entities) per call; roster catalogs are hundreds of names, not
    /// millions, so a linear scan is enough at this scale.
    pub fn link(&self, raw_text: &str) -> BTreeSet<EntityId> {
        let haystack = raw_text.to_lowercase();
        self.needles
            .iter()
            .filter(|(_, needle)| haystack.contains(needle.as_str()))
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(id: EntityId, name: &str, aliases: &[&str]) -> Entity {
        Entity {
            id,
            name: name.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn matches_names_case_insensitively() {
        let roster = Roster::new(vec![fighter(1, "Jon Jones", &[])]);
        let ids = roster.link("JON JONES eyes a heavyweight return");
        assert!(ids.contains(&1));
    }

    #[test]
    fn matches_aliases_and_multiple_entities() {
        let roster = Roster::new(vec![
            fighter(1, "Alexander Volkanovski", &["The Great"]),
            fighter(2, "Ilia Topuria", &["El Matador"]),
        ]);
        let ids = roster.link("El Matador wants The Great next");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn no_match_yields_empty_set() {
        let roster = Roster::new(vec![fighter(1, "Jon Jones", &[])]);
        assert!(roster.link("quarterly earnings call").is_empty());
    }

    #[test]
    fn colliding_alias_reports_both_entities() {
        // "Bones" is also a substring of the second fighter's nickname.
        let roster = Roster::new(vec![
            fighter(1, "Jon Jones", &["Bones"]),
            fighter(2, "Marvin Vettori", &["Bones Jr"]),
        ]);
        let ids = roster.link("Bones Jr steps in on short notice");
        assert!(ids.contains(&1) && ids.contains(&2));
    }

    #[test]
    fn blank_aliases_are_ignored() {
        let roster = Roster::new(vec![fighter(1, "Jon Jones", &["", "  "])]);
        assert!(!roster.is_empty());
        assert!(roster.link("an unrelated sentence").is_empty());
    }
}
