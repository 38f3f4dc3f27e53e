use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::core::Timestamp,
    runtime::scheduler::{Fired, Handle, Scheduler, Task},
};

/// A time-based `0 -> 1` progression through an easing curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub start: Timestamp,
    pub duration: Duration,
    pub ease: Ease,
}

/// One sample of a [`Tween`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TweenSample {
    /// `min(1, elapsed / duration)`.
    pub raw: f64,
    /// `raw` mapped through the tween's ease.
    pub eased: f64,
    pub finished: bool,
}

impl Tween {
    pub fn new(start: Timestamp, duration: Duration, ease: Ease) -> Self {
        Self {
            start,
            duration,
            ease,
        }
    }

    pub fn sample(&self, now: Timestamp) -> TweenSample {
        let raw = if self.duration.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_since(self.start).as_nanos() as f64;
            (elapsed / self.duration.as_nanos() as f64).min(1.0)
        };
        TweenSample {
            raw,
            eased: self.ease.apply(raw),
            finished: raw >= 1.0,
        }
    }
}

/// Drives a [`Tween`] once per display frame.
///
/// The frame handle itself is stored by the caller in its pending-handle registry
/// (`slot`), so one `cancel_all` there invalidates every outstanding request. A frame
/// delivered after [`AnimationScheduler::cancel`] or for a handle other than the one in
/// `slot` is ignored.
#[derive(Clone, Debug, Default)]
pub struct AnimationScheduler {
    tween: Option<Tween>,
    live: bool,
}

impl AnimationScheduler {
    /// Start a fresh tween at the scheduler's current time and request its first frame.
    pub fn start(
        &mut self,
        sched: &mut dyn Scheduler,
        slot: &mut Option<Handle>,
        task: Task,
        duration: Duration,
        ease: Ease,
    ) {
        self.tween = Some(Tween::new(sched.now(), duration, ease));
        self.live = true;
        *slot = Some(sched.request_frame(task));
    }

    /// Handle a delivered frame. Returns `None` for stale deliveries.
    pub fn on_frame(
        &mut self,
        sched: &mut dyn Scheduler,
        slot: &mut Option<Handle>,
        fired: &Fired,
    ) -> Option<TweenSample> {
        if !self.live || *slot != Some(fired.handle) {
            return None;
        }
        let tween = self.tween?;
        let sample = tween.sample(fired.at);
        if sample.finished {
            self.live = false;
            *slot = None;
        } else {
            *slot = Some(sched.request_frame(fired.task));
        }
        Some(sample)
    }

    /// Stop reacting to frames. Already-requested frames become no-ops.
    pub fn cancel(&mut self) {
        self.live = false;
        self.tween = None;
    }

    pub fn is_running(&self) -> bool {
        self.live
    }
}

/// Rounded counter value for an eased progress.
pub fn counter_value(target: u64, eased: f64) -> u64 {
    (target as f64 * eased.clamp(0.0, 1.0)).round() as u64
}

/// Integer counter tween `0 -> target`, sharing the frame discipline of
/// [`AnimationScheduler`] but with its own handle.
#[derive(Clone, Debug, Default)]
pub struct CounterTween {
    target: u64,
    frames: AnimationScheduler,
}

/// Counter value produced on one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterTick {
    pub value: u64,
    pub finished: bool,
}

impl CounterTween {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            frames: AnimationScheduler::default(),
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn start(
        &mut self,
        sched: &mut dyn Scheduler,
        slot: &mut Option<Handle>,
        task: Task,
        duration: Duration,
        ease: Ease,
    ) {
        self.frames.start(sched, slot, task, duration, ease);
    }

    pub fn on_frame(
        &mut self,
        sched: &mut dyn Scheduler,
        slot: &mut Option<Handle>,
        fired: &Fired,
    ) -> Option<CounterTick> {
        let sample = self.frames.on_frame(sched, slot, fired)?;
        Some(CounterTick {
            value: counter_value(self.target, sample.eased),
            finished: sample.finished,
        })
    }

    pub fn cancel(&mut self) {
        self.frames.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
