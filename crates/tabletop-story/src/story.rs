//! The story driver.
//!
//! [`Story`] owns every piece of session state: configuration, loaded data,
//! navigation, the explorer selection, the marks currently displayed on each
//! layer and the transition scheduler. UI events are dispatched into one
//! state transition followed by at most one render pass through the
//! [`RenderSink`].

use crate::config::StoryConfig;
use crate::error::{Result, ResultExt};
use crate::loader::{DataSource, DataStore, StoryData};
use crate::navigation::{
    ChartKind, ExplorerSelection, NavigationState, Step, UiEvent, affordances,
};
use crate::render::{
    Callout, Frame, FrameBuilder, Mark, RenderSink, TransitionScheduler, dedup_by_key, reconcile,
};
use crate::schema::validate_column_table;
use std::collections::HashMap;
use tracing::{debug, info};

/// A story session bound to one drawing surface.
pub struct Story<S: RenderSink> {
    config: StoryConfig,
    store: DataStore,
    navigation: NavigationState,
    selection: ExplorerSelection,
    displayed: HashMap<ChartKind, Vec<Mark>>,
    scheduler: TransitionScheduler,
    sink: S,
}

impl<S: RenderSink> Story<S> {
    /// Create a session. Fails when the column table or the configuration is
    /// invalid.
    pub fn new(config: StoryConfig, sink: S) -> Result<Self> {
        validate_column_table()?;
        config.validate()?;
        let scheduler = TransitionScheduler::new(&config);
        Ok(Self {
            config,
            store: DataStore::new(),
            navigation: NavigationState::new(),
            selection: ExplorerSelection::default(),
            displayed: HashMap::new(),
            scheduler,
            sink,
        })
    }

    /// Load the tables once and render the first step. Later calls do
    /// nothing and return `Ok(false)`.
    pub fn load(&mut self, source: &dyn DataSource) -> Result<bool> {
        if !self.store.load(source).context("Loading story data")? {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    /// Use already-loaded data and render the first step.
    pub fn load_data(&mut self, data: StoryData) -> Result<()> {
        self.store.insert(data);
        self.render()
    }

    /// Apply one UI event.
    ///
    /// Navigation and selection errors leave the state unchanged.
    pub fn handle(&mut self, event: UiEvent) -> Result<()> {
        debug!("Handling {:?} at {}", event, self.navigation.current());
        match event {
            UiEvent::Next => {
                if self.navigation.forward() {
                    self.render()?;
                }
            }
            UiEvent::Previous => {
                if self.navigation.backward() {
                    self.render()?;
                }
            }
            UiEvent::Jump { step } => {
                self.navigation.jump(step)?;
                self.render()?;
            }
            UiEvent::Reset => {
                self.navigation.reset();
                self.render()?;
            }
            UiEvent::Select { channel, column } => {
                if self.navigation.current() != Step::Explorer {
                    debug!("Selection of {} ignored outside the explorer", channel);
                    return Ok(());
                }
                self.selection.set_by_name(channel, &column)?;
                info!("Explorer {} set to '{}'", channel, self.selection.get(channel));
                self.render()?;
            }
            UiEvent::HoverEnter { key } => self.hover(key),
            UiEvent::HoverLeave => {
                self.navigation.clear_hover();
                self.sink.clear_callout();
            }
        }
        Ok(())
    }

    /// Run the full pipeline for the current step and draw it.
    pub fn render(&mut self) -> Result<()> {
        let data = self.store.data()?;
        let step = self.navigation.current();
        let layer = step.chart();

        for other in [ChartKind::Histogram, ChartKind::Scatter] {
            if other != layer {
                self.scheduler.cancel_layer(other);
                self.displayed.remove(&other);
                self.sink.clear_layer(other);
            }
        }
        self.navigation.clear_hover();
        self.sink.clear_callout();
        self.sink.clear_legend();

        let frame = FrameBuilder::new(&self.config).build(step, data, &self.selection);
        let Frame {
            marks,
            x_axis,
            y_axis,
            legend,
            baseline,
            ..
        } = frame;

        let marks = dedup_by_key(marks, |m: &Mark| m.key.clone());
        let previous = self.displayed.remove(&layer).unwrap_or_default();
        let reconciliation = reconcile(&previous, marks.clone(), |m: &Mark| m.key.clone());
        let commands = self.scheduler.schedule(layer, &reconciliation, baseline);

        self.sink.draw_axes(&x_axis, &y_axis);
        if !legend.is_empty() {
            self.sink.draw_legend(&legend);
        }
        self.sink.apply(&commands);
        self.sink.update_controls(&affordances(&self.navigation));

        info!(
            "Rendered {}: {} entering, {} updating, {} exiting",
            step,
            reconciliation.entering.len(),
            reconciliation.updating.len(),
            reconciliation.exiting.len()
        );
        self.displayed.insert(layer, marks);
        Ok(())
    }

    fn hover(&mut self, key: String) {
        let layer = self.navigation.current().chart();
        let Some(mark) = self
            .displayed
            .get(&layer)
            .and_then(|marks| marks.iter().find(|m| m.key == key))
        else {
            debug!("Hover on unknown key '{}' ignored", key);
            return;
        };
        let callout = Callout {
            key: mark.key.clone(),
            anchor: mark.attrs.clone(),
            tooltip: mark.tooltip.clone(),
        };
        self.navigation.set_hover(key);
        self.sink.show_callout(&callout);
    }

    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn selection(&self) -> &ExplorerSelection {
        &self.selection
    }

    /// Marks currently shown on a layer, in display order.
    pub fn displayed(&self, layer: ChartKind) -> &[Mark] {
        self.displayed.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn data(&self) -> Result<&StoryData> {
        self.store.data()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoryError;
    use crate::navigation::Channel;
    use crate::render::{Lifecycle, RecordingSink, SinkCall};
    use crate::types::RawRow;

    fn raw(id: &str, name: &str, year: &str, bin: Option<&str>) -> RawRow {
        RawRow {
            id: id.to_string(),
            name: name.to_string(),
            year_published: year.to_string(),
            min_players: "2".to_string(),
            max_players: "4".to_string(),
            users_rated: format!("{}0", id),
            bgg_rank: id.to_string(),
            domains: Some("Strategy Games".to_string()),
            bin: bin.map(str::to_string),
            ..Default::default()
        }
    }

    fn data() -> StoryData {
        let early = vec![
            raw("1", "Senet", "-3500", Some("[-3500, -2000)")),
            raw("2", "Chess", "1475", Some("[1000, 1500)")),
        ];
        let extended = vec![
            raw("1", "Senet", "-3500", Some("[-3500, 0)")),
            raw("3", "Monopoly", "1935", Some("[1900, 1950)")),
        ];
        let games = vec![
            raw("1", "Senet", "-3500", None),
            raw("2", "Chess", "1475", None),
            raw("3", "Monopoly", "1935", None),
            raw("4", "Catan", "1995", None),
        ];
        StoryData::from_raw(&early, &extended, &games)
    }

    fn story() -> Story<RecordingSink> {
        let mut story = Story::new(StoryConfig::default(), RecordingSink::new()).unwrap();
        story.load_data(data()).unwrap();
        story
    }

    fn commands(calls: &[SinkCall]) -> Vec<(String, Lifecycle)> {
        calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Apply { commands } => Some(commands),
                _ => None,
            })
            .flatten()
            .map(|c| (c.key.clone(), c.lifecycle))
            .collect()
    }

    #[test]
    fn test_render_requires_data() {
        let mut story = Story::new(StoryConfig::default(), RecordingSink::new()).unwrap();
        assert!(matches!(story.render(), Err(StoryError::DataNotLoaded)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = StoryConfig {
            width: -1.0,
            ..Default::default()
        };
        let err = Story::new(config, RecordingSink::new()).err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_first_render_enters_bars() {
        let mut story = story();
        let calls = story.sink_mut().take();
        assert!(matches!(calls[0], SinkCall::ClearLayer { layer: ChartKind::Scatter }));
        assert_eq!(
            commands(&calls),
            vec![
                ("[-3500, -2000)".to_string(), Lifecycle::Enter),
                ("[1000, 1500)".to_string(), Lifecycle::Enter),
            ]
        );
        assert_eq!(story.displayed(ChartKind::Histogram).len(), 2);
    }

    #[test]
    fn test_histogram_to_histogram_reconciles() {
        let mut story = story();
        story.sink_mut().take();
        story.handle(UiEvent::Next).unwrap();
        let calls = story.sink_mut().take();
        assert_eq!(
            commands(&calls),
            vec![
                ("[-3500, 0)".to_string(), Lifecycle::Enter),
                ("[1900, 1950)".to_string(), Lifecycle::Enter),
                ("[-3500, -2000)".to_string(), Lifecycle::Exit),
                ("[1000, 1500)".to_string(), Lifecycle::Exit),
            ]
        );
    }

    #[test]
    fn test_scatter_step_clears_bars() {
        let mut story = story();
        story.handle(UiEvent::Next).unwrap();
        story.handle(UiEvent::Next).unwrap();
        assert_eq!(story.navigation().current(), Step::Bubbles);
        assert!(story.displayed(ChartKind::Histogram).is_empty());
        assert_eq!(story.displayed(ChartKind::Scatter).len(), 4);

        let calls = story.sink().calls();
        assert!(
            calls
                .iter()
                .any(|c| matches!(c, SinkCall::ClearLayer { layer: ChartKind::Histogram }))
        );
        assert!(calls.iter().any(|c| matches!(c, SinkCall::DrawLegend { .. })));
    }

    #[test]
    fn test_locked_jump_leaves_state() {
        let mut story = story();
        story.sink_mut().take();
        let err = story.handle(UiEvent::Jump { step: Step::Explorer }).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(story.navigation().current(), Step::EarlyEra);
        assert!(story.sink().calls().is_empty());
    }

    #[test]
    fn test_jump_to_current_step_rerenders_as_updates() {
        let mut story = story();
        for _ in 0..3 {
            story.handle(UiEvent::Next).unwrap();
        }
        story.sink_mut().take();
        story.handle(UiEvent::Jump { step: Step::Explorer }).unwrap();
        let lifecycles: Vec<Lifecycle> = commands(story.sink().calls())
            .into_iter()
            .map(|(_, l)| l)
            .collect();
        assert!(!lifecycles.is_empty());
        assert!(lifecycles.iter().all(|l| *l == Lifecycle::Update));
    }

    #[test]
    fn test_selection_only_applies_in_explorer() {
        let mut story = story();
        story
            .handle(UiEvent::Select {
                channel: Channel::X,
                column: "Min Players".to_string(),
            })
            .unwrap();
        assert_eq!(story.selection(), &ExplorerSelection::default());

        for _ in 0..3 {
            story.handle(UiEvent::Next).unwrap();
        }
        story
            .handle(UiEvent::Select {
                channel: Channel::X,
                column: "minPlayers".to_string(),
            })
            .unwrap();
        assert_eq!(story.selection().x, crate::schema::Column::MinPlayers);

        let err = story
            .handle(UiEvent::Select {
                channel: Channel::Y,
                column: "Name".to_string(),
            })
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_SELECTION");
    }

    #[test]
    fn test_hover_shows_and_clears_callout() {
        let mut story = story();
        story.sink_mut().take();
        story
            .handle(UiEvent::HoverEnter {
                key: "[1000, 1500)".to_string(),
            })
            .unwrap();
        assert_eq!(story.navigation().hover_id(), Some("[1000, 1500)"));
        match story.sink().calls().last() {
            Some(SinkCall::ShowCallout { callout }) => {
                assert_eq!(callout.tooltip.title, "1000 - 1500");
            }
            other => panic!("expected callout, got {other:?}"),
        }

        story.handle(UiEvent::HoverLeave).unwrap();
        assert_eq!(story.navigation().hover_id(), None);
        assert!(matches!(story.sink().calls().last(), Some(SinkCall::ClearCallout)));

        story
            .handle(UiEvent::HoverEnter {
                key: "missing".to_string(),
            })
            .unwrap();
        assert_eq!(story.navigation().hover_id(), None);
    }
}
