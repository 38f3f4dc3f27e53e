use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use crate::{
    foundation::core::Timestamp,
    runtime::scheduler::{Fired, Handle, Scheduler, Task},
};

/// Deterministic virtual-time event loop.
///
/// Timers fire in `(due, issue order)`. Frame requests are serviced together on display
/// ticks (multiples of `frame_interval`); a request made during a tick runs on the next
/// one. When a timer and a tick fall on the same instant the timer runs first.
#[derive(Debug)]
pub struct EventLoop {
    now: Timestamp,
    frame_interval: Duration,
    next_handle: u64,
    timers: BTreeMap<(Timestamp, u64), (Handle, Task)>,
    frames: Vec<(Handle, Task)>,
    frames_since: Option<Timestamp>,
    batch: VecDeque<(Handle, Task)>,
}

impl EventLoop {
    /// `frame_interval` of zero is treated as one nanosecond.
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Timestamp::ZERO,
            frame_interval: frame_interval.max(Duration::from_nanos(1)),
            next_handle: 1,
            timers: BTreeMap::new(),
            frames: Vec::new(),
            frames_since: None,
            batch: VecDeque::new(),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Number of timers and frame requests not yet delivered.
    pub fn pending_len(&self) -> usize {
        self.timers.len() + self.frames.len() + self.batch.len()
    }

    pub fn is_pending(&self, handle: Handle) -> bool {
        self.timers.values().any(|(h, _)| *h == handle)
            || self.frames.iter().any(|(h, _)| *h == handle)
            || self.batch.iter().any(|(h, _)| *h == handle)
    }

    /// Pop the next delivery due at or before `until`, advancing virtual time to it.
    /// When nothing is due, time advances to `until` and `None` is returned.
    pub fn next_due(&mut self, until: Timestamp) -> Option<Fired> {
        if let Some((handle, task)) = self.batch.pop_front() {
            return Some(self.fired(handle, task));
        }

        let timer_due = self.timers.keys().next().map(|(due, _)| *due);
        let tick = self.next_tick();
        let take_timer = match (timer_due, tick) {
            (Some(due), Some(tick)) => due <= tick,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => {
                self.advance_to(until);
                return None;
            }
        };

        if take_timer {
            let due = timer_due?;
            if due > until {
                self.advance_to(until);
                return None;
            }
            let ((due, _), (handle, task)) = self.timers.pop_first()?;
            self.advance_to(due);
            return Some(self.fired(handle, task));
        }

        let tick = tick?;
        if tick > until {
            self.advance_to(until);
            return None;
        }
        self.advance_to(tick);
        self.batch.extend(self.frames.drain(..));
        self.frames_since = None;
        let (handle, task) = self.batch.pop_front()?;
        Some(self.fired(handle, task))
    }

    /// Deliver everything due up to `until` to `dispatch`, then park at `until`.
    pub fn run_until<F>(&mut self, until: Timestamp, mut dispatch: F)
    where
        F: FnMut(&mut EventLoop, Fired),
    {
        while let Some(fired) = self.next_due(until) {
            dispatch(self, fired);
        }
    }

    fn fired(&self, handle: Handle, task: Task) -> Fired {
        Fired {
            handle,
            task,
            at: self.now,
        }
    }

    fn advance_to(&mut self, t: Timestamp) {
        self.now = self.now.max(t);
    }

    /// First tick boundary strictly after the oldest outstanding frame request.
    fn next_tick(&self) -> Option<Timestamp> {
        if self.frames.is_empty() {
            return None;
        }
        let since = self.frames_since.unwrap_or(self.now);
        let interval = self.frame_interval.as_nanos();
        let k = since.0.as_nanos() / interval + 1;
        let nanos = u64::try_from(k * interval).unwrap_or(u64::MAX);
        Some(Timestamp(Duration::from_nanos(nanos)))
    }

    fn issue(&mut self) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;
        handle
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Duration::from_micros(16_667))
    }
}

impl Scheduler for EventLoop {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn set_timeout(&mut self, delay: Duration, task: Task) -> Handle {
        let handle = self.issue();
        self.timers
            .insert((self.now + delay, handle.0), (handle, task));
        handle
    }

    fn request_frame(&mut self, task: Task) -> Handle {
        let handle = self.issue();
        if self.frames.is_empty() {
            self.frames_since = Some(self.now);
        }
        self.frames.push((handle, task));
        handle
    }

    fn cancel(&mut self, handle: Handle) {
        self.timers.retain(|_, (h, _)| *h != handle);
        self.frames.retain(|(h, _)| *h != handle);
        self.batch.retain(|(h, _)| *h != handle);
        if self.frames.is_empty() {
            self.frames_since = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/event_loop.rs"]
mod tests;
