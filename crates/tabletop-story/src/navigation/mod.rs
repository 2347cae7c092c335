//! Step sequencing and navigation state.
//!
//! The story is a fixed sequence of four steps. The viewer moves one step at
//! a time until the final step has been reached once; from then on any step
//! can be jumped to directly.

mod affordances;
mod events;

pub use affordances::{Affordances, affordances};
pub use events::{Channel, ExplorerSelection, UiEvent};

use crate::error::{Result, StoryError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Kind of chart a step draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    Scatter,
}

/// One visual step of the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Histogram of game counts in the early era.
    EarlyEra,
    /// Histogram of game counts up to the extended era cutoff.
    ExtendedEra,
    /// Bubbles by year, popularity and player counts.
    Bubbles,
    /// Free-form scatterplot with user-selected axes.
    Explorer,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::EarlyEra, Step::ExtendedEra, Step::Bubbles, Step::Explorer];
    pub const FIRST: Step = Step::EarlyEra;
    pub const LAST: Step = Step::Explorer;

    pub fn index(self) -> usize {
        match self {
            Self::EarlyEra => 0,
            Self::ExtendedEra => 1,
            Self::Bubbles => 2,
            Self::Explorer => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn chart(self) -> ChartKind {
        match self {
            Self::EarlyEra | Self::ExtendedEra => ChartKind::Histogram,
            Self::Bubbles | Self::Explorer => ChartKind::Scatter,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.index())
    }
}

/// The single navigation state of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    current: Step,
    free_navigation_unlocked: bool,
    hover_id: Option<String>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            current: Step::FIRST,
            free_navigation_unlocked: false,
            hover_id: None,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn free_navigation_unlocked(&self) -> bool {
        self.free_navigation_unlocked
    }

    pub fn hover_id(&self) -> Option<&str> {
        self.hover_id.as_deref()
    }

    /// Advance one step. Returns `false` (no-op) at the last step.
    pub fn forward(&mut self) -> bool {
        match self.current.next() {
            Some(step) => {
                self.enter(step);
                true
            }
            None => {
                debug!("Forward ignored at {}", self.current);
                false
            }
        }
    }

    /// Retreat one step. Returns `false` (no-op) at the first step.
    pub fn backward(&mut self) -> bool {
        match self.current.previous() {
            Some(step) => {
                self.enter(step);
                true
            }
            None => {
                debug!("Backward ignored at {}", self.current);
                false
            }
        }
    }

    /// Jump directly to a step; only allowed once free navigation is unlocked.
    pub fn jump(&mut self, step: Step) -> Result<()> {
        if !self.free_navigation_unlocked {
            return Err(StoryError::NavigationLocked {
                requested: step.index(),
            });
        }
        self.enter(step);
        Ok(())
    }

    /// Back to the first step with navigation locked again.
    pub fn reset(&mut self) {
        info!("Resetting navigation");
        self.current = Step::FIRST;
        self.free_navigation_unlocked = false;
        self.hover_id = None;
    }

    pub fn set_hover(&mut self, id: impl Into<String>) {
        self.hover_id = Some(id.into());
    }

    pub fn clear_hover(&mut self) {
        self.hover_id = None;
    }

    fn enter(&mut self, step: Step) {
        debug!("Navigating from {} to {}", self.current, step);
        self.current = step;
        self.hover_id = None;
        if step == Step::LAST && !self.free_navigation_unlocked {
            info!("Final step reached, free navigation unlocked");
            self.free_navigation_unlocked = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = NavigationState::new();
        assert_eq!(state.current(), Step::EarlyEra);
        assert!(!state.free_navigation_unlocked());
        assert_eq!(state.hover_id(), None);
    }

    #[test]
    fn test_forward_to_last_unlocks() {
        let mut state = NavigationState::new();
        assert!(state.forward());
        assert!(state.forward());
        assert!(!state.free_navigation_unlocked());
        assert!(state.forward());
        assert_eq!(state.current(), Step::Explorer);
        assert!(state.free_navigation_unlocked());

        // Fourth forward is a no-op
        assert!(!state.forward());
        assert_eq!(state.current(), Step::Explorer);
    }

    #[test]
    fn test_backward_at_first_is_noop() {
        let mut state = NavigationState::new();
        assert!(!state.backward());
        assert_eq!(state.current(), Step::EarlyEra);
    }

    #[test]
    fn test_jump_requires_unlock() {
        let mut state = NavigationState::new();
        let err = state.jump(Step::Bubbles).unwrap_err();
        assert!(matches!(err, StoryError::NavigationLocked { requested: 2 }));
        assert_eq!(state.current(), Step::EarlyEra);

        for _ in 0..3 {
            state.forward();
        }
        state.jump(Step::EarlyEra).unwrap();
        assert_eq!(state.current(), Step::EarlyEra);
        // Unlock survives leaving the last step
        assert!(state.free_navigation_unlocked());
        state.jump(Step::Bubbles).unwrap();
        assert_eq!(state.current(), Step::Bubbles);
    }

    #[test]
    fn test_reset_relocks() {
        let mut state = NavigationState::new();
        for _ in 0..3 {
            state.forward();
        }
        state.set_hover("13");
        state.reset();
        assert_eq!(state, NavigationState::new());
        assert!(state.jump(Step::Explorer).is_err());
    }

    #[test]
    fn test_navigation_clears_hover() {
        let mut state = NavigationState::new();
        state.set_hover("42");
        assert_eq!(state.hover_id(), Some("42"));
        state.forward();
        assert_eq!(state.hover_id(), None);
    }

    #[test]
    fn test_step_helpers() {
        assert_eq!(Step::EarlyEra.previous(), None);
        assert_eq!(Step::Explorer.next(), None);
        assert_eq!(Step::from_index(2), Some(Step::Bubbles));
        assert_eq!(Step::from_index(4), None);
        assert_eq!(Step::ExtendedEra.chart(), ChartKind::Histogram);
        assert_eq!(Step::Bubbles.chart(), ChartKind::Scatter);
    }
}
