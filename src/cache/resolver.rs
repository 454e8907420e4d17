//! Dependency Resolver Module
//!
//! Expands a selector into the full set of internal keys to remove: the
//! directly selected entries plus every entry that declares a dependency
//! leading back to one of them.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::cache::{derive_key, Entry, Selector};

// == Resolve ==
/// Computes the removal closure of `selector` over `entries`.
///
/// A plain selector seeds the walk even when its key is not stored, so
/// dependents of a key that was never cached (or has already lapsed) are
/// still reached. Only stored keys are returned.
///
/// Each internal key is visited at most once, so cyclic dependency graphs
/// terminate. The walk uses an explicit worklist rather than recursion.
pub fn resolve(entries: &HashMap<String, Entry>, selector: &Selector) -> HashSet<String> {
    let seeds = match selector {
        Selector::Plain(key) => vec![(derive_key(key), key.clone())],
        Selector::Pattern(_) => direct_matches(entries, selector)
            .into_iter()
            .filter_map(|internal_key| with_logical_key(entries, internal_key))
            .collect(),
    };
    expand(entries, seeds)
}

// == Resolve From ==
/// Computes the removal closure of a set of already-selected internal keys.
///
/// Seeds that are not stored are ignored.
pub fn resolve_from(
    entries: &HashMap<String, Entry>,
    seeds: impl IntoIterator<Item = String>,
) -> HashSet<String> {
    let seeds = seeds
        .into_iter()
        .filter_map(|internal_key| with_logical_key(entries, internal_key))
        .collect();
    expand(entries, seeds)
}

// == Direct Matches ==
/// Returns the internal keys selected by `selector` without following dependencies.
pub fn direct_matches(entries: &HashMap<String, Entry>, selector: &Selector) -> Vec<String> {
    entries
        .iter()
        .filter(|(internal_key, entry)| selector.matches(internal_key, &entry.logical_key))
        .map(|(internal_key, _)| internal_key.clone())
        .collect()
}

fn with_logical_key(
    entries: &HashMap<String, Entry>,
    internal_key: String,
) -> Option<(String, String)> {
    let logical_key = entries.get(&internal_key)?.logical_key.clone();
    Some((internal_key, logical_key))
}

/// Worklist over (internal key, logical key) pairs.
fn expand(entries: &HashMap<String, Entry>, seeds: Vec<(String, String)>) -> HashSet<String> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut pending: VecDeque<(String, String)> = VecDeque::new();

    for (internal_key, logical_key) in seeds {
        if visited.insert(internal_key.clone()) {
            pending.push_back((internal_key, logical_key));
        }
    }

    while let Some((internal_key, logical_key)) = pending.pop_front() {
        for (candidate_key, candidate) in entries {
            if visited.contains(candidate_key) {
                continue;
            }
            let depends = candidate
                .depends_on
                .iter()
                .any(|dep| dep.matches(&internal_key, &logical_key));
            if depends {
                visited.insert(candidate_key.clone());
                pending.push_back((candidate_key.clone(), candidate.logical_key.clone()));
            }
        }
    }

    visited.retain(|internal_key| entries.contains_key(internal_key));
    visited
}
