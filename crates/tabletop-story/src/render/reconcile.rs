//! Keyed join between the elements on screen and the next record set.

use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Anything that carries a join key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// A key present both before and after.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<P, T> {
    pub previous: P,
    pub next: T,
}

/// Outcome of a keyed join.
///
/// `entering` and `updating` follow the order of the new records; `exiting`
/// keeps the order the elements were displayed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<P, T> {
    pub entering: Vec<T>,
    pub updating: Vec<Update<P, T>>,
    pub exiting: Vec<P>,
}

impl<P, T> Reconciliation<P, T> {
    pub fn is_empty(&self) -> bool {
        self.entering.is_empty() && self.updating.is_empty() && self.exiting.is_empty()
    }
}

/// Drop records whose key was already seen, keeping the first one.
pub fn dedup_by_key<T, F>(records: Vec<T>, key_fn: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        let key = key_fn(&record);
        if seen.insert(key.clone()) {
            kept.push(record);
        } else {
            warn!("Duplicate join key '{}' dropped", key);
        }
    }
    kept
}

/// Sort new records into entering and updating against `previous`, and the
/// previous elements with no new record into exiting.
pub fn reconcile<P, T, F>(previous: &[P], records: Vec<T>, key_fn: F) -> Reconciliation<P, T>
where
    P: Keyed + Clone,
    F: Fn(&T) -> String,
{
    let records = dedup_by_key(records, &key_fn);

    let previous_by_key: HashMap<&str, &P> = previous.iter().map(|p| (p.key(), p)).collect();
    let mut entering = Vec::new();
    let mut updating = Vec::new();
    let mut retained: HashSet<String> = HashSet::with_capacity(records.len());

    for record in records {
        let key = key_fn(&record);
        match previous_by_key.get(key.as_str()) {
            Some(&prev) => updating.push(Update {
                previous: prev.clone(),
                next: record,
            }),
            None => entering.push(record),
        }
        retained.insert(key);
    }

    let exiting = previous
        .iter()
        .filter(|p| !retained.contains(p.key()))
        .cloned()
        .collect();

    Reconciliation {
        entering,
        updating,
        exiting,
    }
}
