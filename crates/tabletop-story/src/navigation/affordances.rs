//! UI affordances derived from navigation state.

use super::{NavigationState, Step};
use serde::{Deserialize, Serialize};

/// Enabled/visible state of every navigation control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordances {
    pub previous_enabled: bool,
    pub next_enabled: bool,
    /// Per-step jump buttons, indexed by step.
    pub jump_enabled: [bool; 4],
    /// Per-step descriptive text, indexed by step.
    pub description_visible: [bool; 4],
    /// Axis and color selectors of the free-form step.
    pub explorer_controls_visible: bool,
}

/// Compute affordances from `{current step, free navigation unlocked}` only.
pub fn affordances(state: &NavigationState) -> Affordances {
    let current = state.current();
    let unlocked = state.free_navigation_unlocked();

    Affordances {
        previous_enabled: current.previous().is_some(),
        next_enabled: current.next().is_some(),
        jump_enabled: [unlocked; 4],
        description_visible: Step::ALL.map(|step| step == current),
        explorer_controls_visible: current == Step::Explorer,
    }
}
