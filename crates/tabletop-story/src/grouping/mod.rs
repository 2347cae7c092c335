//! Grouping and binning of normalized rows.
//!
//! This module provides:
//! - [`group`]: partition rows by a key and reduce each group to a count and a
//!   representative row
//! - Key functions for precomputed era labels, threshold ranges and composite
//!   numeric keys
//! - Display helpers for bin labels

mod keys;
mod labels;

pub use keys::{BinRange, CompositeKey, FixedBin, KeyFn, ThresholdBins};
pub use labels::display_label;

use crate::types::{AggregateRecord, NormalizedRow};
use std::collections::HashMap;
use tracing::debug;

/// Group rows by `key_fn` and reduce each group.
///
/// Groups come out in the order their key first appears. Rows whose key is
/// undefined or empty are left out entirely. The representative of a group is
/// the member with the lowest `BGG Rank`; a NaN rank loses to any defined one
/// and ties keep the earliest row.
pub fn group<'a, K>(rows: &'a [NormalizedRow], key_fn: &K) -> Vec<AggregateRecord<'a>>
where
    K: KeyFn + ?Sized,
{
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<AggregateRecord<'a>> = Vec::new();
    let mut excluded = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let key = match key_fn.key(row) {
            Some(key) if !key.is_empty() => key,
            _ => {
                excluded += 1;
                continue;
            }
        };

        match index_by_key.get(&key) {
            Some(&slot) => {
                let record = &mut groups[slot];
                record.count += 1;
                if ranks_better(row.bgg_rank, record.representative.bgg_rank) {
                    record.representative = row;
                    record.representative_index = i;
                }
            }
            None => {
                index_by_key.insert(key.clone(), groups.len());
                groups.push(AggregateRecord {
                    key,
                    count: 1,
                    dimensions: key_fn.dimensions(row),
                    representative: row,
                    representative_index: i,
                });
            }
        }
    }

    if excluded > 0 {
        debug!("Excluded {} rows with no group key", excluded);
    }
    debug!("Grouped {} rows into {} groups", rows.len() - excluded, groups.len());

    groups
}

/// Whether `candidate` beats `current` as the more popular rank.
fn ranks_better(candidate: f64, current: f64) -> bool {
    if candidate.is_nan() {
        return false;
    }
    current.is_nan() || candidate < current
}
