//! Skew-aware scale selection.
//!
//! Continuous columns get a transform picked from their distribution so that
//! a handful of outliers does not squash the bulk of the points together.

use super::statistics::calculate_skewness;
use super::{ContinuousScale, DiscreteScale, Scale, TransformKind};
use crate::schema::{Column, DataTypeTag};
use crate::types::NormalizedRow;
use crate::utils::extent;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Outcome of transform selection for one continuous column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleDecision {
    pub kind: TransformKind,
    pub domain: [f64; 2],
    /// `None` when the small-range short circuit skipped the skew computation.
    pub skew: Option<f64>,
}

/// Pick a transform from the domain extent and the skew statistic.
///
/// Rules are checked in order and the first match wins:
/// 1. non-positive values and |skew| > 0.5 → symlog
/// 2. skew in (-1, -0.5) → pow 2
/// 3. skew in (0.5, 1) → sqrt
/// 4. skew <= -1 → pow 2
/// 5. skew >= 1 → log, domain minimum clamped to 1
/// 6. otherwise → linear
pub fn choose_transform(domain: [f64; 2], skew: f64) -> (TransformKind, [f64; 2]) {
    let has_non_positive = domain[0] <= 0.0;

    if has_non_positive && skew.abs() > 0.5 {
        (TransformKind::SYMLOG, domain)
    } else if skew > -1.0 && skew < -0.5 {
        (TransformKind::SQUARE, domain)
    } else if skew > 0.5 && skew < 1.0 {
        (TransformKind::Sqrt, domain)
    } else if skew <= -1.0 {
        (TransformKind::SQUARE, domain)
    } else if skew >= 1.0 {
        (TransformKind::Log, [domain[0].max(1.0), domain[1]])
    } else {
        (TransformKind::Linear, domain)
    }
}

/// Builds scales for columns and aggregate values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSelector {
    /// Domains whose span is at or below this stay linear without analysis.
    pub small_range_threshold: f64,
}

impl Default for ScaleSelector {
    fn default() -> Self {
        Self {
            small_range_threshold: 100.0,
        }
    }
}

impl ScaleSelector {
    pub fn new(small_range_threshold: f64) -> Self {
        Self {
            small_range_threshold,
        }
    }

    /// Decide the transform and domain for a set of values. NaN is ignored.
    pub fn decide(&self, values: &[f64]) -> ScaleDecision {
        let Some((min, max)) = extent(values) else {
            return ScaleDecision {
                kind: TransformKind::Linear,
                domain: [0.0, 0.0],
                skew: None,
            };
        };

        if max - min <= self.small_range_threshold {
            return ScaleDecision {
                kind: TransformKind::Linear,
                domain: [min, max],
                skew: None,
            };
        }

        let skew = calculate_skewness(values);
        let (kind, domain) = choose_transform([min, max], skew);
        ScaleDecision {
            kind,
            domain,
            skew: Some(skew),
        }
    }

    /// Continuous scale for raw values.
    pub fn continuous(&self, values: &[f64], range: [f64; 2]) -> ContinuousScale {
        let decision = self.decide(values);
        ContinuousScale::new(decision.kind, decision.domain, range)
    }

    /// Square-root area mapping for circle sizes, from zero to the maximum.
    pub fn size(&self, values: &[f64], range: [f64; 2]) -> ContinuousScale {
        let max = extent(values).map(|(_, hi)| hi.max(0.0)).unwrap_or(0.0);
        ContinuousScale::new(TransformKind::Sqrt, [0.0, max], range)
    }

    /// Scale for a column of the given rows, chosen by its tag.
    pub fn select(
        &self,
        rows: &[NormalizedRow],
        column: Column,
        tag: DataTypeTag,
        range: [f64; 2],
    ) -> Scale {
        let scale = match tag {
            DataTypeTag::Categorical | DataTypeTag::Ordinal => {
                Scale::Discrete(DiscreteScale::point(distinct_sorted(rows, column), range))
            }
            DataTypeTag::Nominal | DataTypeTag::Cyclic => Scale::Identity,
            DataTypeTag::Quantitative | DataTypeTag::Field => {
                let values: Vec<f64> = rows.iter().map(|row| row.number(column)).collect();
                Scale::Continuous(self.continuous(&values, range))
            }
        };
        debug!("Selected {} scale for '{}'", scale.kind_name(), column);
        scale
    }
}

/// Distinct defined values of a column, sorted numerically when every value
/// is a number and lexicographically otherwise.
pub(crate) fn distinct_sorted(rows: &[NormalizedRow], column: Column) -> Vec<String> {
    let mut keys: Vec<String> = rows
        .iter()
        .filter_map(|row| row.value(column).as_key())
        .collect();
    keys.sort_unstable();
    keys.dedup();

    let numeric: Option<Vec<f64>> = keys.iter().map(|k| k.parse::<f64>().ok()).collect();
    if let Some(numbers) = numeric {
        let mut paired: Vec<(f64, String)> = numbers.into_iter().zip(keys).collect();
        paired.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keys = paired.into_iter().map(|(_, k)| k).collect();
    }
    keys
}
