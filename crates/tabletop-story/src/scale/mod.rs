//! Scales: mappings from data values to visual coordinates, sizes and colors.
//!
//! This module provides:
//! - [`ContinuousScale`]: linear, log, sqrt, pow and symlog mappings
//! - [`DiscreteScale`]: evenly spaced point and band mappings
//! - [`ScaleSelector`]: skew-aware choice of transform per column
//! - [`ColorScale`]: categorical and sequential colors

mod color;
mod selector;
mod statistics;

pub use color::{CATEGORY10, ColorScale, NEUTRAL_FILL, Rgb};
pub use selector::{ScaleDecision, ScaleSelector, choose_transform};

use crate::types::FieldValue;
use serde::{Deserialize, Serialize};

/// Transform applied to values before linear interpolation into the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformKind {
    Linear,
    /// Natural log; undefined for values <= 0.
    Log,
    /// Sign-preserving square root.
    Sqrt,
    /// Sign-preserving power.
    Pow { exponent: f64 },
    /// Sign-preserving `ln(1 + |x| / constant)`, defined everywhere.
    Symlog { constant: f64 },
}

impl TransformKind {
    pub const SQUARE: TransformKind = TransformKind::Pow { exponent: 2.0 };
    pub const SYMLOG: TransformKind = TransformKind::Symlog { constant: 1.0 };

    /// Transformed value, `None` where the transform is undefined.
    pub fn forward(self, v: f64) -> Option<f64> {
        if v.is_nan() {
            return None;
        }
        let t = match self {
            Self::Linear => v,
            Self::Log => {
                if v <= 0.0 {
                    return None;
                }
                v.ln()
            }
            Self::Sqrt => v.signum() * v.abs().sqrt(),
            Self::Pow { exponent } => v.signum() * v.abs().powf(exponent),
            Self::Symlog { constant } => v.signum() * (v.abs() / constant).ln_1p(),
        };
        Some(t)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Log => "log",
            Self::Sqrt => "sqrt",
            Self::Pow { .. } => "pow",
            Self::Symlog { .. } => "symlog",
        }
    }
}

/// A continuous mapping from `domain` to `range` through a transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    pub kind: TransformKind,
    pub domain: [f64; 2],
    pub range: [f64; 2],
}

impl ContinuousScale {
    pub fn new(kind: TransformKind, domain: [f64; 2], range: [f64; 2]) -> Self {
        Self {
            kind,
            domain,
            range,
        }
    }

    pub fn linear(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self::new(TransformKind::Linear, domain, range)
    }

    /// Position of `v` in transformed domain space: 0 at the domain start,
    /// 1 at its end. A degenerate domain puts everything at 0.5.
    pub fn normalize(&self, v: f64) -> Option<f64> {
        let t = self.kind.forward(v)?;
        let t0 = self.kind.forward(self.domain[0])?;
        let t1 = self.kind.forward(self.domain[1])?;
        let span = t1 - t0;
        if span == 0.0 || !span.is_finite() {
            return Some(0.5);
        }
        Some((t - t0) / span)
    }

    /// Output coordinate of `v`, `None` for NaN or values the transform
    /// cannot represent.
    pub fn map(&self, v: f64) -> Option<f64> {
        let n = self.normalize(v)?;
        Some(self.range[0] + n * (self.range[1] - self.range[0]))
    }

    pub fn with_range(mut self, range: [f64; 2]) -> Self {
        self.range = range;
        self
    }
}

/// Evenly spaced positions for an ordered set of discrete values.
///
/// With `padding_inner == 1` this is a point scale (zero bandwidth); smaller
/// inner padding produces bands, as used by the histogram bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteScale {
    pub domain: Vec<String>,
    pub range: [f64; 2],
    pub padding_inner: f64,
    pub padding_outer: f64,
}

impl DiscreteScale {
    pub fn point(domain: Vec<String>, range: [f64; 2]) -> Self {
        Self {
            domain,
            range,
            padding_inner: 1.0,
            padding_outer: 0.5,
        }
    }

    pub fn band(domain: Vec<String>, range: [f64; 2], padding: f64) -> Self {
        Self {
            domain,
            range,
            padding_inner: padding,
            padding_outer: padding,
        }
    }

    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let slots = (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        (self.range[1] - self.range[0]) / slots
    }

    fn start(&self) -> f64 {
        let n = self.domain.len() as f64;
        let extent = self.range[1] - self.range[0];
        self.range[0] + (extent - self.step() * (n - self.padding_inner)) * 0.5
    }

    /// Width of one band; zero for point scales.
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start of the band (or the point) for a domain value.
    pub fn map(&self, key: &str) -> Option<f64> {
        let index = self.domain.iter().position(|d| d == key)?;
        Some(self.start() + self.step() * index as f64)
    }
}

/// The scale produced for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scale {
    Continuous(ContinuousScale),
    Discrete(DiscreteScale),
    /// Label-only channel: values carry no position.
    Identity,
}

impl Scale {
    pub fn map(&self, value: FieldValue<'_>) -> Option<f64> {
        match self {
            Self::Continuous(scale) => value.as_number().and_then(|v| scale.map(v)),
            Self::Discrete(scale) => value.as_key().and_then(|key| scale.map(&key)),
            Self::Identity => None,
        }
    }

    /// Transform name for axis captions and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Continuous(scale) => scale.kind.name(),
            Self::Discrete(scale) if scale.padding_inner >= 1.0 => "point",
            Self::Discrete(_) => "band",
            Self::Identity => "identity",
        }
    }

    pub fn range(&self) -> Option<[f64; 2]> {
        match self {
            Self::Continuous(scale) => Some(scale.range),
            Self::Discrete(scale) => Some(scale.range),
            Self::Identity => None,
        }
    }
}
