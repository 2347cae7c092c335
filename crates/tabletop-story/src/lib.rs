//! Tabletop Story Library
//!
//! A step-based data story over a board game dataset, built with Rust and
//! Polars.
//!
//! # Overview
//!
//! A viewer pages through four animated steps: two era histograms, a bubble
//! chart of games by year and player count, and a free-form scatterplot. The
//! library provides the data-to-visual-encoding pipeline behind them:
//!
//! - **Normalization**: string-typed rows parsed into numeric records
//! - **Grouping & Binning**: precomputed labels, threshold ranges and
//!   composite keys, each group reduced to a count and a representative game
//! - **Scale Selection**: skew-aware choice of linear, log, sqrt, pow or
//!   symlog mappings
//! - **Navigation**: a step state machine with free navigation unlocked at the
//!   final step
//! - **Reconciliation**: keyed enter/update/exit joins driving eased,
//!   staggered transitions
//!
//! Drawing is delegated to a [`RenderSink`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabletop_story::{CsvDataSource, RecordingSink, Story, StoryConfig, UiEvent};
//!
//! let config = StoryConfig::builder().data_dir("data").build()?;
//! let source = CsvDataSource::new(config.files.clone());
//!
//! let mut story = Story::new(config, RecordingSink::new())?;
//! story.load(&source)?;
//!
//! story.handle(UiEvent::Next)?;
//! for call in story.sink_mut().take() {
//!     println!("{}", serde_json::to_string(&call)?);
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`StoryConfig`] to change the viewport, animation timing, era cutoffs
//! and bin thresholds:
//!
//! ```rust,ignore
//! use tabletop_story::{Ease, StoryConfig};
//!
//! let config = StoryConfig::builder()
//!     .viewport(600.0, 400.0)
//!     .duration_ms(500)
//!     .ease(Ease::OutCubic)
//!     .small_range_threshold(50.0)
//!     .build()?;
//! ```

pub mod config;
pub mod eras;
pub mod error;
pub mod grouping;
pub mod loader;
pub mod navigation;
pub mod normalizer;
pub mod render;
pub mod scale;
pub mod schema;
pub mod story;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, DataFiles, Margin, StoryConfig, StoryConfigBuilder};
pub use error::{Result as StoryResult, ResultExt, StoryError};
pub use grouping::{CompositeKey, FixedBin, KeyFn, ThresholdBins, display_label, group};
pub use loader::{CsvDataSource, DataSource, DataStore, DerivedEraSource, StoryData, Table};
pub use navigation::{
    Affordances, Channel, ChartKind, ExplorerSelection, NavigationState, Step, UiEvent,
    affordances,
};
pub use normalizer::{normalize, normalize_all};
pub use render::{
    CancellationToken, ClosureSink, Ease, Frame, FrameBuilder, Lifecycle, Mark, RecordingSink,
    RenderSink, SinkCall, TransitionCommand, TransitionScheduler, reconcile,
};
pub use scale::{ColorScale, ContinuousScale, DiscreteScale, Scale, ScaleSelector, TransformKind};
pub use schema::{Column, DataTypeTag, classify};
pub use story::Story;
pub use types::{AggregateRecord, FieldValue, NormalizedRow, RawRow};
