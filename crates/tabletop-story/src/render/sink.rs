//! The drawing collaborator interface.

use super::frame::{AxisSpec, LegendEntry, Tooltip, VisualAttrs};
use super::transition::TransitionCommand;
use crate::navigation::{Affordances, ChartKind};
use serde::{Deserialize, Serialize};

/// Hover annotation for one mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    pub key: String,
    /// Target attributes of the hovered mark, for anchoring.
    pub anchor: VisualAttrs,
    pub tooltip: Tooltip,
}

/// Receives the output of render passes.
///
/// Implement this trait to draw frames on a concrete surface. Calls arrive in
/// render order: clears first, then axes and legend, then transitions, then
/// controls.
pub trait RenderSink {
    /// Remove every element of a chart layer immediately.
    fn clear_layer(&mut self, layer: ChartKind);

    fn clear_callout(&mut self);

    fn clear_legend(&mut self);

    fn draw_axes(&mut self, x: &AxisSpec, y: &AxisSpec);

    fn draw_legend(&mut self, entries: &[LegendEntry]);

    /// Start transitions. Commands whose token is cancelled later should be
    /// dropped by the implementation.
    fn apply(&mut self, commands: &[TransitionCommand]);

    fn update_controls(&mut self, affordances: &Affordances);

    fn show_callout(&mut self, callout: &Callout);
}

/// One call received by a sink, in a serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SinkCall {
    ClearLayer { layer: ChartKind },
    ClearCallout,
    ClearLegend,
    DrawAxes { x: AxisSpec, y: AxisSpec },
    DrawLegend { entries: Vec<LegendEntry> },
    Apply { commands: Vec<TransitionCommand> },
    UpdateControls { affordances: Affordances },
    ShowCallout { callout: Callout },
}

/// Sink that forwards every call to a closure as a [`SinkCall`].
///
/// Useful for bridging to a frontend that consumes JSON messages.
pub struct ClosureSink<F>
where
    F: FnMut(SinkCall),
{
    callback: F,
}

impl<F> ClosureSink<F>
where
    F: FnMut(SinkCall),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> RenderSink for ClosureSink<F>
where
    F: FnMut(SinkCall),
{
    fn clear_layer(&mut self, layer: ChartKind) {
        (self.callback)(SinkCall::ClearLayer { layer });
    }

    fn clear_callout(&mut self) {
        (self.callback)(SinkCall::ClearCallout);
    }

    fn clear_legend(&mut self) {
        (self.callback)(SinkCall::ClearLegend);
    }

    fn draw_axes(&mut self, x: &AxisSpec, y: &AxisSpec) {
        (self.callback)(SinkCall::DrawAxes {
            x: x.clone(),
            y: y.clone(),
        });
    }

    fn draw_legend(&mut self, entries: &[LegendEntry]) {
        (self.callback)(SinkCall::DrawLegend {
            entries: entries.to_vec(),
        });
    }

    fn apply(&mut self, commands: &[TransitionCommand]) {
        (self.callback)(SinkCall::Apply {
            commands: commands.to_vec(),
        });
    }

    fn update_controls(&mut self, affordances: &Affordances) {
        (self.callback)(SinkCall::UpdateControls {
            affordances: affordances.clone(),
        });
    }

    fn show_callout(&mut self, callout: &Callout) {
        (self.callback)(SinkCall::ShowCallout {
            callout: callout.clone(),
        });
    }
}

/// Sink that keeps every call for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }
}

impl RenderSink for RecordingSink {
    fn clear_layer(&mut self, layer: ChartKind) {
        self.calls.push(SinkCall::ClearLayer { layer });
    }

    fn clear_callout(&mut self) {
        self.calls.push(SinkCall::ClearCallout);
    }

    fn clear_legend(&mut self) {
        self.calls.push(SinkCall::ClearLegend);
    }

    fn draw_axes(&mut self, x: &AxisSpec, y: &AxisSpec) {
        self.calls.push(SinkCall::DrawAxes {
            x: x.clone(),
            y: y.clone(),
        });
    }

    fn draw_legend(&mut self, entries: &[LegendEntry]) {
        self.calls.push(SinkCall::DrawLegend {
            entries: entries.to_vec(),
        });
    }

    fn apply(&mut self, commands: &[TransitionCommand]) {
        self.calls.push(SinkCall::Apply {
            commands: commands.to_vec(),
        });
    }

    fn update_controls(&mut self, affordances: &Affordances) {
        self.calls.push(SinkCall::UpdateControls {
            affordances: affordances.clone(),
        });
    }

    fn show_callout(&mut self, callout: &Callout) {
        self.calls.push(SinkCall::ShowCallout {
            callout: callout.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavigationState, affordances};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_closure_sink_forwards_calls() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let received_clone = Rc::clone(&received);
        let mut sink = ClosureSink::new(move |call| received_clone.borrow_mut().push(call));

        sink.clear_layer(ChartKind::Scatter);
        sink.clear_callout();
        sink.update_controls(&affordances(&NavigationState::new()));

        let calls = received.borrow();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], SinkCall::ClearLayer { layer: ChartKind::Scatter }));
        assert!(matches!(calls[1], SinkCall::ClearCallout));
    }

    #[test]
    fn test_recording_sink_take_drains() {
        let mut sink = RecordingSink::new();
        sink.clear_legend();
        sink.draw_legend(&[LegendEntry {
            label: "Wargames".to_string(),
            fill: "#1f77b4".to_string(),
        }]);
        assert_eq!(sink.calls().len(), 2);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn test_sink_call_json_shape() {
        let call = SinkCall::ClearLayer {
            layer: ChartKind::Histogram,
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["call"], "clear_layer");
        assert_eq!(json["layer"], "histogram");
    }
}
