//! Transition scheduling and supersession.
//!
//! A reconciliation is turned into one [`TransitionCommand`] per element.
//! Each command carries a [`CancellationToken`]; scheduling a new command for
//! a key cancels the token of the command it replaces, so a sink can drop a
//! transition that is still running for that element.

use super::ease::Ease;
use super::frame::{Mark, VisualAttrs};
use super::reconcile::Reconciliation;
use crate::config::StoryConfig;
use crate::navigation::ChartKind;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Token marking a scheduled transition as superseded.
///
/// Clones share state, so the sink can hold one while the scheduler cancels
/// another.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(CancellationToken: Send, Sync);
static_assertions::assert_impl_all!(TransitionCommand: Send, Sync);

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Which side of the join an element fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Enter,
    Update,
    Exit,
}

/// An animated attribute change for one element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCommand {
    pub key: String,
    pub layer: ChartKind,
    pub lifecycle: Lifecycle,
    pub from: VisualAttrs,
    pub to: VisualAttrs,
    pub delay_ms: u64,
    pub duration_ms: u64,
    pub ease: Ease,
    /// Remove the element once the transition ends.
    pub remove_on_end: bool,
    #[serde(skip)]
    pub token: CancellationToken,
}

impl TransitionCommand {
    /// Interpolated attributes at `elapsed_ms` since scheduling.
    ///
    /// Numeric attributes are eased between `from` and `to`; the fill
    /// switches to the target color once the transition starts.
    pub fn sample(&self, elapsed_ms: u64) -> VisualAttrs {
        let Some(active) = elapsed_ms.checked_sub(self.delay_ms) else {
            return self.from.clone();
        };
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            active as f64 / self.duration_ms as f64
        };
        let k = self.ease.apply(t);
        let lerp = |a: f64, b: f64| a + (b - a) * k;
        VisualAttrs {
            x: lerp(self.from.x, self.to.x),
            y: lerp(self.from.y, self.to.y),
            width: lerp(self.from.width, self.to.width),
            height: lerp(self.from.height, self.to.height),
            radius: lerp(self.from.radius, self.to.radius),
            fill: self.to.fill.clone(),
            opacity: lerp(self.from.opacity, self.to.opacity),
        }
    }
}

/// Turns reconciliations into staggered commands and tracks the latest token
/// per element.
///
/// Only keys scheduled by the most recent pass over a layer are tracked; an
/// element that exited in an earlier pass is forgotten once a later pass no
/// longer mentions it.
#[derive(Debug, Clone)]
pub struct TransitionScheduler {
    duration_ms: u64,
    stagger_ms: u64,
    ease: Ease,
    latest: HashMap<(ChartKind, String), CancellationToken>,
}

impl TransitionScheduler {
    pub fn new(config: &StoryConfig) -> Self {
        Self {
            duration_ms: config.duration_ms,
            stagger_ms: config.stagger_ms,
            ease: config.ease,
            latest: HashMap::new(),
        }
    }

    /// Commands for one reconciliation of a layer, in the order enter,
    /// update, exit. Each class is staggered from index zero, and the last
    /// element of a class starts at most one duration after the first.
    pub fn schedule(
        &mut self,
        layer: ChartKind,
        reconciliation: &Reconciliation<Mark, Mark>,
        baseline: f64,
    ) -> Vec<TransitionCommand> {
        let mut commands = Vec::with_capacity(
            reconciliation.entering.len()
                + reconciliation.updating.len()
                + reconciliation.exiting.len(),
        );

        let stagger = self.stagger_for(reconciliation.entering.len());
        for (i, mark) in reconciliation.entering.iter().enumerate() {
            let from = mark.attrs.neutral(layer, baseline);
            let delay = i as u64 * stagger;
            commands.push(self.command(layer, Lifecycle::Enter, &mark.key, from, mark.attrs.clone(), delay));
        }
        let stagger = self.stagger_for(reconciliation.updating.len());
        for (i, update) in reconciliation.updating.iter().enumerate() {
            commands.push(self.command(
                layer,
                Lifecycle::Update,
                &update.next.key,
                update.previous.attrs.clone(),
                update.next.attrs.clone(),
                i as u64 * stagger,
            ));
        }
        let stagger = self.stagger_for(reconciliation.exiting.len());
        for (i, mark) in reconciliation.exiting.iter().enumerate() {
            let to = mark.attrs.neutral(layer, baseline);
            let delay = i as u64 * stagger;
            commands.push(self.command(layer, Lifecycle::Exit, &mark.key, mark.attrs.clone(), to, delay));
        }

        let scheduled: HashSet<&str> = commands.iter().map(|c| c.key.as_str()).collect();
        self.latest
            .retain(|(l, key), _| *l != layer || scheduled.contains(key.as_str()));

        debug!(
            "Scheduled {} enter, {} update, {} exit transitions on {:?}",
            reconciliation.entering.len(),
            reconciliation.updating.len(),
            reconciliation.exiting.len(),
            layer
        );
        commands
    }

    /// Cancel everything still running on a layer.
    pub fn cancel_layer(&mut self, layer: ChartKind) {
        self.latest.retain(|(l, _), token| {
            if *l == layer {
                token.cancel();
                false
            } else {
                true
            }
        });
    }

    /// Elements whose latest command was scheduled by the last pass over its
    /// layer. A finished transition stays tracked until that layer is
    /// scheduled again or cancelled.
    pub fn tracked(&self) -> usize {
        self.latest.values().filter(|t| !t.is_cancelled()).count()
    }

    /// Per-element delay for a class of `count` elements.
    fn stagger_for(&self, count: usize) -> u64 {
        match count {
            0 | 1 => self.stagger_ms,
            n => self.stagger_ms.min(self.duration_ms / (n as u64 - 1)),
        }
    }

    fn command(
        &mut self,
        layer: ChartKind,
        lifecycle: Lifecycle,
        key: &str,
        from: VisualAttrs,
        to: VisualAttrs,
        delay_ms: u64,
    ) -> TransitionCommand {
        let token = CancellationToken::new();
        if let Some(previous) = self.latest.insert((layer, key.to_string()), token.clone()) {
            previous.cancel();
        }
        TransitionCommand {
            key: key.to_string(),
            layer,
            lifecycle,
            from,
            to,
            delay_ms,
            duration_ms: self.duration_ms,
            ease: self.ease,
            remove_on_end: lifecycle == Lifecycle::Exit,
            token,
        }
    }
}
