use std::time::Duration;

use crate::runtime::scheduler::{Handle, Scheduler, Task};

/// Where a widget is in its visibility lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Hidden,
    Entering,
    Animating,
    Settled,
}

/// Run state owned by one widget's controller.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct WidgetRunState {
    pub phase: Phase,
    /// Eased arc progress in `[0, 1]`. Never decreases within one animating run.
    pub progress: f64,
    pub hovered_segment: Option<usize>,
    /// Fade-in has been triggered and the tweens are waiting on (or past) the arming
    /// delay.
    pub is_armed: bool,
}

/// Every timer and frame request a widget currently has outstanding.
///
/// At most one arming timer, one arc frame and one counter frame are live at a time,
/// plus one reveal timer per row not yet revealed. A delivery whose handle is not held
/// here is stale and must be ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingHandles {
    pub arming: Option<Handle>,
    pub arc_frame: Option<Handle>,
    pub counter_frame: Option<Handle>,
    pub reveals: Vec<Handle>,
}

impl PendingHandles {
    /// Cancel and forget everything. Returns how many handles were live.
    pub fn cancel_all(&mut self, sched: &mut dyn Scheduler) -> usize {
        let handles: Vec<Handle> = self
            .arming
            .take()
            .into_iter()
            .chain(self.arc_frame.take())
            .chain(self.counter_frame.take())
            .chain(self.reveals.drain(..))
            .collect();
        for &h in &handles {
            sched.cancel(h);
        }
        handles.len()
    }

    pub fn len(&self) -> usize {
        usize::from(self.arming.is_some())
            + usize::from(self.arc_frame.is_some())
            + usize::from(self.counter_frame.is_some())
            + self.reveals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arm the single arming timer, replacing (and cancelling) any previous one.
    pub fn arm(&mut self, sched: &mut dyn Scheduler, delay: Duration, task: Task) -> Handle {
        if let Some(old) = self.arming.take() {
            sched.cancel(old);
        }
        let h = sched.set_timeout(delay, task);
        self.arming = Some(h);
        h
    }

    /// Consume the arming handle if `h` is it.
    pub fn take_arming(&mut self, h: Handle) -> bool {
        if self.arming == Some(h) {
            self.arming = None;
            true
        } else {
            false
        }
    }

    /// Consume a reveal handle if it is still live.
    pub fn take_reveal(&mut self, h: Handle) -> bool {
        match self.reveals.iter().position(|&r| r == h) {
            Some(pos) => {
                self.reveals.swap_remove(pos);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/state.rs"]
mod tests;
