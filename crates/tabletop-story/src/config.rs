//! Configuration types for the story.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use crate::render::Ease;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Space reserved around the plotting area, in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 20.0,
        }
    }
}

/// Where the three source tables live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFiles {
    /// Directory holding all tables.
    /// Default: "data"
    pub data_dir: PathBuf,

    /// Pre-binned early era table.
    /// Default: "step_1.csv"
    pub early_era: String,

    /// Pre-binned extended era table.
    /// Default: "step_2.csv"
    pub extended_era: String,

    /// Full game table.
    /// Default: "BGG_Data_Set_original.csv"
    pub games: String,

    /// Field separator of the CSV files.
    /// Default: b','
    pub separator: u8,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            early_era: "step_1.csv".to_string(),
            extended_era: "step_2.csv".to_string(),
            games: "BGG_Data_Set_original.csv".to_string(),
            separator: b',',
        }
    }
}

impl DataFiles {
    pub fn early_era_path(&self) -> PathBuf {
        self.data_dir.join(&self.early_era)
    }

    pub fn extended_era_path(&self) -> PathBuf {
        self.data_dir.join(&self.extended_era)
    }

    pub fn games_path(&self) -> PathBuf {
        self.data_dir.join(&self.games)
    }
}

/// Configuration for the story.
///
/// Use [`StoryConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust
/// use tabletop_story::config::StoryConfig;
///
/// let config = StoryConfig::builder()
///     .viewport(600.0, 400.0)
///     .duration_ms(500)
///     .build()
///     .unwrap();
/// assert_eq!(config.width, 600.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Viewport width.
    /// Default: 400
    pub width: f64,

    /// Viewport height.
    /// Default: 400
    pub height: f64,

    /// Margins around the plotting area.
    /// Default: 20 on every side
    pub margin: Margin,

    /// Continuous domains spanning at most this much stay linear.
    /// Default: 100
    pub small_range_threshold: f64,

    /// Duration of one element transition.
    /// Default: 750
    pub duration_ms: u64,

    /// Extra delay per element index within a lifecycle class.
    /// Default: 10
    pub stagger_ms: u64,

    /// Easing curve for transitions.
    /// Default: InOutCubic
    pub ease: Ease,

    /// Inner/outer padding of histogram bands (0.0 - 1.0).
    /// Default: 0.1
    pub band_padding: f64,

    /// Radius range of the bubble step, applied through a sqrt scale.
    /// Default: [2, 18]
    pub bubble_radius: [f64; 2],

    /// Radius of explorer points.
    /// Default: 3
    pub point_radius: f64,

    /// Early era keeps years strictly below this.
    /// Default: 1800
    pub early_era_cutoff: f64,

    /// Extended era keeps years strictly below this.
    /// Default: 2000
    pub extended_era_cutoff: f64,

    /// Ascending bin thresholds of the early era.
    pub early_era_thresholds: Vec<f64>,

    /// Ascending bin thresholds of the extended era.
    pub extended_era_thresholds: Vec<f64>,

    /// Source table locations.
    pub files: DataFiles,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            margin: Margin::default(),
            small_range_threshold: 100.0,
            duration_ms: 750,
            stagger_ms: 10,
            ease: Ease::default(),
            band_padding: 0.1,
            bubble_radius: [2.0, 18.0],
            point_radius: 3.0,
            early_era_cutoff: 1800.0,
            extended_era_cutoff: 2000.0,
            early_era_thresholds: default_early_thresholds(),
            extended_era_thresholds: default_extended_thresholds(),
            files: DataFiles::default(),
        }
    }
}

fn default_early_thresholds() -> Vec<f64> {
    vec![-3500.0, -2000.0, -1000.0, 0.0, 500.0, 1000.0, 1500.0, 1800.0]
}

fn default_extended_thresholds() -> Vec<f64> {
    vec![
        -3500.0, 0.0, 1000.0, 1500.0, 1800.0, 1900.0, 1950.0, 1970.0, 1980.0, 1990.0, 2000.0,
    ]
}

impl StoryConfig {
    /// Create a new configuration builder.
    pub fn builder() -> StoryConfigBuilder {
        StoryConfigBuilder::default()
    }

    /// Horizontal extent of the plotting area.
    pub fn x_range(&self) -> [f64; 2] {
        [self.margin.left, self.width - self.margin.right]
    }

    /// Vertical extent of the plotting area, bottom first so larger values
    /// sit higher.
    pub fn y_range(&self) -> [f64; 2] {
        [self.height - self.margin.bottom, self.margin.top]
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(self.width > self.margin.left + self.margin.right)
            || !(self.height > self.margin.top + self.margin.bottom)
        {
            return Err(ConfigValidationError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }

        if !(0.0..=1.0).contains(&self.band_padding) {
            return Err(ConfigValidationError::InvalidPadding(self.band_padding));
        }

        if !(self.small_range_threshold >= 0.0) {
            return Err(ConfigValidationError::InvalidThreshold(
                self.small_range_threshold,
            ));
        }

        if !(self.bubble_radius[0] >= 0.0 && self.bubble_radius[1] >= self.bubble_radius[0]) {
            return Err(ConfigValidationError::InvalidRadius {
                min: self.bubble_radius[0],
                max: self.bubble_radius[1],
            });
        }

        for (field, thresholds) in [
            ("early_era_thresholds", &self.early_era_thresholds),
            ("extended_era_thresholds", &self.extended_era_thresholds),
        ] {
            if thresholds.windows(2).any(|pair| !(pair[0] < pair[1])) {
                return Err(ConfigValidationError::UnsortedThresholds(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Viewport {width}x{height} leaves no room inside the margins")]
    InvalidViewport { width: f64, height: f64 },

    #[error("Invalid band padding: {0} (must be between 0.0 and 1.0)")]
    InvalidPadding(f64),

    #[error("Invalid small-range threshold: {0} (must be non-negative)")]
    InvalidThreshold(f64),

    #[error("Invalid radius range [{min}, {max}]")]
    InvalidRadius { min: f64, max: f64 },

    #[error("Thresholds in '{0}' must be strictly ascending")]
    UnsortedThresholds(String),
}

/// Builder for [`StoryConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct StoryConfigBuilder {
    viewport: Option<(f64, f64)>,
    margin: Option<Margin>,
    small_range_threshold: Option<f64>,
    duration_ms: Option<u64>,
    stagger_ms: Option<u64>,
    ease: Option<Ease>,
    band_padding: Option<f64>,
    bubble_radius: Option<[f64; 2]>,
    point_radius: Option<f64>,
    early_era_cutoff: Option<f64>,
    extended_era_cutoff: Option<f64>,
    early_era_thresholds: Option<Vec<f64>>,
    extended_era_thresholds: Option<Vec<f64>>,
    files: Option<DataFiles>,
}

impl StoryConfigBuilder {
    /// Set the viewport size.
    pub fn viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Some((width, height));
        self
    }

    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = Some(margin);
        self
    }

    /// Set the span at or below which continuous scales skip skew analysis.
    pub fn small_range_threshold(mut self, threshold: f64) -> Self {
        self.small_range_threshold = Some(threshold);
        self
    }

    pub fn duration_ms(mut self, duration: u64) -> Self {
        self.duration_ms = Some(duration);
        self
    }

    pub fn stagger_ms(mut self, stagger: u64) -> Self {
        self.stagger_ms = Some(stagger);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn band_padding(mut self, padding: f64) -> Self {
        self.band_padding = Some(padding);
        self
    }

    pub fn bubble_radius(mut self, min: f64, max: f64) -> Self {
        self.bubble_radius = Some([min, max]);
        self
    }

    pub fn point_radius(mut self, radius: f64) -> Self {
        self.point_radius = Some(radius);
        self
    }

    /// Set the exclusive upper year of the two era tables.
    pub fn era_cutoffs(mut self, early: f64, extended: f64) -> Self {
        self.early_era_cutoff = Some(early);
        self.extended_era_cutoff = Some(extended);
        self
    }

    pub fn early_era_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.early_era_thresholds = Some(thresholds);
        self
    }

    pub fn extended_era_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.extended_era_thresholds = Some(thresholds);
        self
    }

    /// Set the directory holding the source tables, keeping default names.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let mut files = self.files.take().unwrap_or_default();
        files.data_dir = path.into();
        self.files = Some(files);
        self
    }

    pub fn files(mut self, files: DataFiles) -> Self {
        self.files = Some(files);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `StoryConfig` or an error if validation fails.
    pub fn build(self) -> Result<StoryConfig, ConfigValidationError> {
        let defaults = StoryConfig::default();
        let (width, height) = self.viewport.unwrap_or((defaults.width, defaults.height));

        let config = StoryConfig {
            width,
            height,
            margin: self.margin.unwrap_or_default(),
            small_range_threshold: self
                .small_range_threshold
                .unwrap_or(defaults.small_range_threshold),
            duration_ms: self.duration_ms.unwrap_or(defaults.duration_ms),
            stagger_ms: self.stagger_ms.unwrap_or(defaults.stagger_ms),
            ease: self.ease.unwrap_or_default(),
            band_padding: self.band_padding.unwrap_or(defaults.band_padding),
            bubble_radius: self.bubble_radius.unwrap_or(defaults.bubble_radius),
            point_radius: self.point_radius.unwrap_or(defaults.point_radius),
            early_era_cutoff: self.early_era_cutoff.unwrap_or(defaults.early_era_cutoff),
            extended_era_cutoff: self
                .extended_era_cutoff
                .unwrap_or(defaults.extended_era_cutoff),
            early_era_thresholds: self
                .early_era_thresholds
                .unwrap_or(defaults.early_era_thresholds),
            extended_era_thresholds: self
                .extended_era_thresholds
                .unwrap_or(defaults.extended_era_thresholds),
            files: self.files.unwrap_or(defaults.files),
        };

        config.validate()?;
        Ok(config)
    }
}
