use std::time::Duration;

use crate::foundation::core::Timestamp;

/// Opaque handle for a timer or a frame request. Never reused within one scheduler.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Handle(pub u64);

/// Index of a widget within its page.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct WidgetId(pub usize);

/// What a fired timer or frame should do once it reaches its widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskKind {
    /// Short settle delay after the widget became visible.
    EnterDebounce,
    /// Fade-in plus pad elapsed; tweens may start.
    ArmDelay,
    /// Unconditional start when no viewport observer exists.
    FallbackStart,
    ArcFrame,
    CounterFrame,
    RevealRow { index: usize },
}

/// A unit of deferred work addressed to one widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Task {
    pub widget: WidgetId,
    pub kind: TaskKind,
}

impl Task {
    pub fn new(widget: WidgetId, kind: TaskKind) -> Self {
        Self { widget, kind }
    }
}

/// A task delivered by the scheduler, with the handle it was issued under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Fired {
    pub handle: Handle,
    pub task: Task,
    /// Timer due time or frame tick time.
    pub at: Timestamp,
}

/// Cooperative timer/frame source the widgets schedule against.
///
/// Cancellation is best effort from the widget's point of view: widgets keep their own
/// registry of live handles and ignore deliveries for anything they no longer hold.
pub trait Scheduler {
    fn now(&self) -> Timestamp;

    /// Run `task` once after `delay`.
    fn set_timeout(&mut self, delay: Duration, task: Task) -> Handle;

    /// Run `task` on the next display frame.
    fn request_frame(&mut self, task: Task) -> Handle;

    /// Forget a timer or frame request. Unknown handles are ignored.
    fn cancel(&mut self, handle: Handle);
}
