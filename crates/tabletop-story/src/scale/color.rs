//! Color channel scales.

use super::ContinuousScale;
use super::selector::{ScaleSelector, distinct_sorted};
use crate::schema::{Column, DataTypeTag};
use crate::types::{FieldValue, NormalizedRow};
use serde::{Deserialize, Serialize};

/// Ten-color categorical palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Fill used when a channel has no color scale or a value is missing.
pub const NEUTRAL_FILL: &str = "#9e9e9e";

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Rgb> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation in RGB space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

/// Maps a column value to a fill color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColorScale {
    /// Palette entry by position in the domain, cycling past ten values.
    Categorical { domain: Vec<String> },
    /// Two-stop interpolation through a transformed continuous scale.
    Sequential {
        scale: ContinuousScale,
        from: Rgb,
        to: Rgb,
    },
    /// Every value gets the same fill.
    Constant { fill: String },
}

impl ColorScale {
    pub const SEQUENTIAL_FROM: Rgb = Rgb {
        r: 0xde,
        g: 0xeb,
        b: 0xf7,
    };
    pub const SEQUENTIAL_TO: Rgb = Rgb {
        r: 0x08,
        g: 0x51,
        b: 0x9c,
    };

    /// Color scale for a column.
    ///
    /// `domain_vocabulary` is the sorted set of every domain in the full
    /// table; when the column is the primary domain and the vocabulary is
    /// known, colors stay stable across steps regardless of which domains a
    /// step happens to show.
    pub fn for_column(
        selector: &ScaleSelector,
        rows: &[NormalizedRow],
        column: Column,
        domain_vocabulary: &[String],
    ) -> ColorScale {
        if column == Column::PrimaryDomain && !domain_vocabulary.is_empty() {
            return ColorScale::Categorical {
                domain: domain_vocabulary.to_vec(),
            };
        }

        match column.tag() {
            DataTypeTag::Categorical | DataTypeTag::Ordinal => ColorScale::Categorical {
                domain: distinct_sorted(rows, column),
            },
            DataTypeTag::Quantitative | DataTypeTag::Field => {
                let values: Vec<f64> = rows.iter().map(|row| row.number(column)).collect();
                ColorScale::Sequential {
                    scale: selector.continuous(&values, [0.0, 1.0]),
                    from: Self::SEQUENTIAL_FROM,
                    to: Self::SEQUENTIAL_TO,
                }
            }
            DataTypeTag::Nominal | DataTypeTag::Cyclic => ColorScale::Constant {
                fill: NEUTRAL_FILL.to_string(),
            },
        }
    }

    /// Fill for a value, `None` when the value is missing or unknown.
    pub fn color(&self, value: FieldValue<'_>) -> Option<String> {
        match self {
            Self::Categorical { domain } => {
                let key = value.as_key()?;
                let index = domain.iter().position(|d| *d == key)?;
                Some(CATEGORY10[index % CATEGORY10.len()].to_string())
            }
            Self::Sequential { scale, from, to } => {
                let t = scale.map(value.as_number()?)?;
                Some(from.lerp(*to, t).to_hex())
            }
            Self::Constant { fill } => Some(fill.clone()),
        }
    }

    /// Legend entries: one swatch per category, or the two sequential stops.
    pub fn legend(&self) -> Vec<(String, String)> {
        match self {
            Self::Categorical { domain } => domain
                .iter()
                .enumerate()
                .map(|(i, label)| (label.clone(), CATEGORY10[i % CATEGORY10.len()].to_string()))
                .collect(),
            Self::Sequential { scale, from, to } => vec![
                (crate::utils::format_number(scale.domain[0]), from.to_hex()),
                (crate::utils::format_number(scale.domain[1]), to.to_hex()),
            ],
            Self::Constant { .. } => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::types::RawRow;

    #[test]
    fn test_hex_round_trip() {
        let rgb = Rgb::from_hex("#1f77b4").unwrap();
        assert_eq!(rgb, Rgb { r: 0x1f, g: 0x77, b: 0xb4 });
        assert_eq!(rgb.to_hex(), "#1f77b4");
        assert_eq!(Rgb::from_hex("1f77b4"), None);
        assert_eq!(Rgb::from_hex("#12"), None);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb { r: 0, g: 0, b: 0 };
        let b = Rgb { r: 200, g: 100, b: 50 };
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb { r: 100, g: 50, b: 25 });
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn test_categorical_uses_vocabulary_for_primary_domain() {
        let rows = vec![normalize(&RawRow {
            domains: Some("Wargames".to_string()),
            ..Default::default()
        })];
        let vocab = vec!["Party Games".to_string(), "Wargames".to_string()];
        let scale =
            ColorScale::for_column(&ScaleSelector::default(), &rows, Column::PrimaryDomain, &vocab);
        assert_eq!(scale.color(rows[0].value(Column::PrimaryDomain)), Some(CATEGORY10[1].to_string()));
        assert_eq!(scale.color(FieldValue::Text("Abstract Games")), None);
        assert_eq!(scale.legend().len(), 2);
    }

    #[test]
    fn test_sequential_for_quantitative() {
        let rows: Vec<NormalizedRow> = ["1", "2", "3"]
            .iter()
            .map(|v| {
                normalize(&RawRow {
                    rating_average: v.to_string(),
                    ..Default::default()
                })
            })
            .collect();
        let scale = ColorScale::for_column(
            &ScaleSelector::default(),
            &rows,
            Column::RatingAverage,
            &[],
        );
        assert_eq!(
            scale.color(FieldValue::Number(1.0)),
            Some(ColorScale::SEQUENTIAL_FROM.to_hex())
        );
        assert_eq!(
            scale.color(FieldValue::Number(3.0)),
            Some(ColorScale::SEQUENTIAL_TO.to_hex())
        );
        assert_eq!(scale.color(FieldValue::Number(f64::NAN)), None);
    }

    #[test]
    fn test_nominal_is_constant() {
        let scale = ColorScale::for_column(&ScaleSelector::default(), &[], Column::Mechanics, &[]);
        assert_eq!(scale.color(FieldValue::Text("Dice Rolling")), Some(NEUTRAL_FILL.to_string()));
        assert!(scale.legend().is_empty());
    }
}
