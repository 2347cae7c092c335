//! Key functions used to partition rows.

use crate::schema::Column;
use crate::types::NormalizedRow;
use crate::utils::format_number;
use serde::{Deserialize, Serialize};

/// Derives a group key from a row.
///
/// Returning `None` (or an empty string) excludes the row from grouping.
pub trait KeyFn {
    fn key(&self, row: &NormalizedRow) -> Option<String>;

    /// Grouping dimension values recorded on the aggregate.
    fn dimensions(&self, _row: &NormalizedRow) -> Vec<(Column, f64)> {
        Vec::new()
    }
}

impl<F> KeyFn for F
where
    F: Fn(&NormalizedRow) -> Option<String>,
{
    fn key(&self, row: &NormalizedRow) -> Option<String> {
        self(row)
    }
}

/// Uses the precomputed era label carried by the row.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedBin;

impl KeyFn for FixedBin {
    fn key(&self, row: &NormalizedRow) -> Option<String> {
        row.raw
            .bin
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
    }
}

/// One numeric range of a threshold binning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinRange {
    pub min: f64,
    pub max: f64,
}

impl BinRange {
    /// Half-open `[min, max)`, or exactly `min` for a singleton range.
    pub fn contains(&self, v: f64) -> bool {
        if self.min == self.max {
            v == self.min
        } else {
            self.min <= v && v < self.max
        }
    }

    pub fn label(&self) -> String {
        if self.min == self.max {
            format!("[{})", format_number(self.min))
        } else {
            format!("[{}, {})", format_number(self.min), format_number(self.max))
        }
    }
}

/// Buckets a numeric column into ranges derived from an ascending threshold
/// list: `[t0, t1)`, `[t1, t2)`, ..., then the singleton `[t_last]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdBins {
    column: Column,
    ranges: Vec<BinRange>,
}

impl ThresholdBins {
    pub fn new(column: Column, thresholds: &[f64]) -> Self {
        let mut ranges: Vec<BinRange> = thresholds
            .windows(2)
            .map(|pair| BinRange {
                min: pair[0],
                max: pair[1],
            })
            .collect();
        if let Some(&last) = thresholds.last() {
            ranges.push(BinRange {
                min: last,
                max: last,
            });
        }
        Self { column, ranges }
    }

    pub fn ranges(&self) -> &[BinRange] {
        &self.ranges
    }

    /// First range containing `v`, by linear scan.
    pub fn range_for(&self, v: f64) -> Option<&BinRange> {
        if v.is_nan() {
            return None;
        }
        self.ranges.iter().find(|range| range.contains(v))
    }

    pub fn label_for(&self, v: f64) -> Option<String> {
        self.range_for(v).map(BinRange::label)
    }

    /// Labels of every range, in threshold order.
    pub fn labels(&self) -> Vec<String> {
        self.ranges.iter().map(BinRange::label).collect()
    }
}

impl KeyFn for ThresholdBins {
    fn key(&self, row: &NormalizedRow) -> Option<String> {
        self.label_for(row.number(self.column))
    }
}

/// Joins several numeric columns into one key, e.g. `1995|2|4`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeKey {
    columns: Vec<Column>,
    separator: String,
}

impl CompositeKey {
    pub const DEFAULT_SEPARATOR: &'static str = "|";

    pub fn new(columns: impl Into<Vec<Column>>) -> Self {
        Self {
            columns: columns.into(),
            separator: Self::DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl KeyFn for CompositeKey {
    /// Undefined as soon as any component is NaN.
    fn key(&self, row: &NormalizedRow) -> Option<String> {
        let parts = self
            .columns
            .iter()
            .map(|&column| {
                let v = row.number(column);
                (!v.is_nan()).then(|| format_number(v))
            })
            .collect::<Option<Vec<String>>>()?;
        Some(parts.join(&self.separator))
    }

    fn dimensions(&self, row: &NormalizedRow) -> Vec<(Column, f64)> {
        self.columns
            .iter()
            .map(|&column| (column, row.number(column)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::types::RawRow;

    fn year_row(year: &str) -> NormalizedRow {
        normalize(&RawRow {
            year_published: year.to_string(),
            min_players: "2".to_string(),
            max_players: "4".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_threshold_labels() {
        let bins = ThresholdBins::new(Column::YearPublished, &[-3500.0, 1970.0, 1990.0]);
        assert_eq!(bins.key(&year_row("1980")), Some("[1970, 1990)".to_string()));
        assert_eq!(bins.key(&year_row("1970")), Some("[1970, 1990)".to_string()));
        assert_eq!(bins.key(&year_row("-3500")), Some("[-3500, 1970)".to_string()));
        assert_eq!(bins.key(&year_row("1990")), Some("[1990)".to_string()));
    }

    #[test]
    fn test_threshold_out_of_range_is_excluded() {
        let bins = ThresholdBins::new(Column::YearPublished, &[-3500.0, 1970.0, 1990.0]);
        assert_eq!(bins.key(&year_row("2005")), None);
        assert_eq!(bins.key(&year_row("-4000")), None);
        assert_eq!(bins.key(&year_row("")), None);
    }

    #[test]
    fn test_threshold_ranges() {
        let bins = ThresholdBins::new(Column::YearPublished, &[0.0, 10.0]);
        assert_eq!(
            bins.ranges(),
            &[BinRange { min: 0.0, max: 10.0 }, BinRange { min: 10.0, max: 10.0 }]
        );
        assert_eq!(bins.labels(), vec!["[0, 10)", "[10)"]);
        assert!(ThresholdBins::new(Column::YearPublished, &[]).ranges().is_empty());
    }

    #[test]
    fn test_fixed_bin() {
        let mut raw = RawRow {
            bin: Some("[-3500, 0)".to_string()),
            ..Default::default()
        };
        assert_eq!(FixedBin.key(&normalize(&raw)), Some("[-3500, 0)".to_string()));

        raw.bin = Some("  ".to_string());
        assert_eq!(FixedBin.key(&normalize(&raw)), None);

        raw.bin = None;
        assert_eq!(FixedBin.key(&normalize(&raw)), None);
    }

    #[test]
    fn test_composite_key() {
        let key = CompositeKey::new([Column::YearPublished, Column::MinPlayers, Column::MaxPlayers]);
        let row = year_row("1995");
        assert_eq!(key.key(&row), Some("1995|2|4".to_string()));
        assert_eq!(
            key.dimensions(&row),
            vec![
                (Column::YearPublished, 1995.0),
                (Column::MinPlayers, 2.0),
                (Column::MaxPlayers, 4.0)
            ]
        );
        assert_eq!(key.key(&year_row("")), None);
    }

    #[test]
    fn test_composite_key_separator() {
        let key = CompositeKey::new([Column::MinPlayers, Column::MaxPlayers]).with_separator("-");
        assert_eq!(key.key(&year_row("1995")), Some("2-4".to_string()));
    }
}
