use super::*;
use crate::runtime::{
    event_loop::EventLoop,
    scheduler::{TaskKind, WidgetId},
};

fn task(kind: TaskKind) -> Task {
    Task::new(WidgetId(0), kind)
}

#[test]
fn cancel_all_clears_registry_and_scheduler() {
    let mut lp = EventLoop::default();
    let mut pending = PendingHandles::default();
    pending.arm(&mut lp, Duration::from_millis(500), task(TaskKind::ArmDelay));
    pending.arc_frame = Some(lp.request_frame(task(TaskKind::ArcFrame)));
    pending.counter_frame = Some(lp.request_frame(task(TaskKind::CounterFrame)));
    pending
        .reveals
        .push(lp.set_timeout(Duration::ZERO, task(TaskKind::RevealRow { index: 0 })));
    assert_eq!(pending.len(), 4);
    assert_eq!(lp.pending_len(), 4);

    assert_eq!(pending.cancel_all(&mut lp), 4);
    assert!(pending.is_empty());
    assert_eq!(lp.pending_len(), 0);
    assert_eq!(pending.cancel_all(&mut lp), 0);
}

#[test]
fn arming_keeps_a_single_live_timer() {
    let mut lp = EventLoop::default();
    let mut pending = PendingHandles::default();
    let first = pending.arm(&mut lp, Duration::from_millis(120), task(TaskKind::EnterDebounce));
    let second = pending.arm(&mut lp, Duration::from_millis(500), task(TaskKind::ArmDelay));
    assert!(!lp.is_pending(first));
    assert_eq!(lp.pending_len(), 1);

    assert!(!pending.take_arming(first));
    assert!(pending.take_arming(second));
    assert!(!pending.take_arming(second));
}

#[test]
fn reveal_handles_are_consumed_once() {
    let mut pending = PendingHandles {
        reveals: vec![Handle(3), Handle(4)],
        ..PendingHandles::default()
    };
    assert!(pending.take_reveal(Handle(4)));
    assert!(!pending.take_reveal(Handle(4)));
    assert!(!pending.take_reveal(Handle(9)));
    assert_eq!(pending.len(), 1);
}
