//! Deferred bootstrap actions
//!
//! Composition does not talk to the host directly. It schedules a one-shot
//! action on a named bootstrap phase, and the host fires the phase once its
//! own subsystems are ready. Within a phase, actions run by ascending
//! priority, and in scheduling order among equal priorities.

use log::{debug, warn};
use parking_lot::Mutex;

use super::block::BlockError;
use super::host::BlockHost;

/// Bootstrap phase on which block registration runs
pub const INIT_PHASE: &str = "init";

/// Priority used by hosts for ordinary init work
pub const DEFAULT_PRIORITY: i32 = 10;

/// Priority of block registration, after ordinary init work
pub const REGISTRATION_PRIORITY: i32 = 20;

/// One-shot action fired when its phase runs
pub type DeferredAction = Box<dyn FnOnce(&dyn BlockHost) -> Result<(), BlockError> + Send>;

/// Host hook system used to defer work to a later bootstrap phase
pub trait HookSystem: Send + Sync {
    /// Schedule `action` on `phase`; `label` identifies it in diagnostics
    fn add_action(&self, phase: &str, priority: i32, label: String, action: DeferredAction);
}

struct PendingAction {
    phase: String,
    priority: i32,
    sequence: u64,
    label: String,
    action: DeferredAction,
}

#[derive(Default)]
struct QueueState {
    pending: Vec<PendingAction>,
    next_sequence: u64,
}

/// Ordered in-process bootstrap queue
#[derive(Default)]
pub struct HookQueue {
    state: Mutex<QueueState>,
}

impl HookQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions waiting on any phase
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels of the actions waiting on `phase`, in firing order
    pub fn scheduled(&self, phase: &str) -> Vec<String> {
        let state = self.state.lock();
        let mut waiting: Vec<&PendingAction> = state
            .pending
            .iter()
            .filter(|pending| pending.phase == phase)
            .collect();
        waiting.sort_by_key(|pending| (pending.priority, pending.sequence));
        waiting.iter().map(|pending| pending.label.clone()).collect()
    }

    /// Fire every action waiting on `phase` against `host`
    ///
    /// Actions are removed before they run, so each fires at most once and
    /// may schedule further actions. The first failing action aborts the
    /// phase; actions ordered after it go back on the queue and run the next
    /// time the phase fires.
    ///
    /// # Returns
    /// The number of actions that ran successfully
    pub fn do_action(&self, phase: &str, host: &dyn BlockHost) -> Result<usize, BlockError> {
        let mut due = {
            let mut state = self.state.lock();
            let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
                .into_iter()
                .partition(|pending| pending.phase == phase);
            state.pending = rest;
            due
        };
        due.sort_by_key(|pending| (pending.priority, pending.sequence));

        let mut fired = 0;
        let mut due = due.into_iter();
        while let Some(PendingAction {
            priority,
            label,
            action,
            ..
        }) = due.next()
        {
            debug!("event=hook_fire phase={} priority={} label={}", phase, priority, label);
            if let Err(err) = action(host) {
                let unrun: Vec<_> = due.collect();
                warn!(
                    "event=hook_abort phase={} label={} requeued={}",
                    phase,
                    label,
                    unrun.len()
                );
                self.state.lock().pending.extend(unrun);
                return Err(err);
            }
            fired += 1;
        }
        Ok(fired)
    }
}

impl HookSystem for HookQueue {
    fn add_action(&self, phase: &str, priority: i32, label: String, action: DeferredAction) {
        let mut state = self.state.lock();
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.pending.push(PendingAction {
            phase: phase.to_string(),
            priority,
            sequence,
            label,
            action,
        });
    }
}
