//! Rendering: from grouped data to keyed, animated marks.
//!
//! This module provides:
//! - [`FrameBuilder`]: marks, axes and legend for each step
//! - [`reconcile`]: keyed enter/update/exit join against what is displayed
//! - [`TransitionScheduler`]: eased, staggered commands with per-key
//!   supersession
//! - [`RenderSink`]: the interface of the drawing surface

mod ease;
mod frame;
mod reconcile;
mod sink;
mod transition;

pub use ease::Ease;
pub use frame::{
    AxisSpec, BAR_FILL, Frame, FrameBuilder, LegendEntry, Mark, Tick, Tooltip, VisualAttrs,
};
pub use reconcile::{Keyed, Reconciliation, Update, dedup_by_key, reconcile};
pub use sink::{Callout, ClosureSink, RecordingSink, RenderSink, SinkCall};
pub use transition::{CancellationToken, Lifecycle, TransitionCommand, TransitionScheduler};
