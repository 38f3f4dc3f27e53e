use super::*;
use crate::runtime::{
    event_loop::EventLoop,
    scheduler::{TaskKind, WidgetId},
};

fn arc_task() -> Task {
    Task::new(WidgetId(0), TaskKind::ArcFrame)
}

#[test]
fn tween_samples_clamp_and_ease() {
    let tween = Tween::new(
        Timestamp::from_millis(100),
        Duration::from_millis(1400),
        Ease::OutCubic,
    );
    let mid = tween.sample(Timestamp::from_millis(800));
    assert_eq!(mid.raw, 0.5);
    assert_eq!(mid.eased, 0.875);
    assert!(!mid.finished);

    let early = tween.sample(Timestamp::from_millis(50));
    assert_eq!(early.raw, 0.0);

    let late = tween.sample(Timestamp::from_millis(5000));
    assert_eq!(late.raw, 1.0);
    assert!(late.finished);
}

#[test]
fn zero_duration_finishes_immediately() {
    let tween = Tween::new(Timestamp::ZERO, Duration::ZERO, Ease::OutCubic);
    let s = tween.sample(Timestamp::ZERO);
    assert_eq!(s.eased, 1.0);
    assert!(s.finished);
}

#[test]
fn counter_value_rounds_to_nearest() {
    assert_eq!(counter_value(120, 0.875), 105);
    assert_eq!(counter_value(120, 0.0), 0);
    assert_eq!(counter_value(120, 1.0), 120);
    assert_eq!(counter_value(3, 0.5), 2);
}

#[test]
fn scheduler_drives_progress_to_completion_once_per_frame() {
    let mut lp = EventLoop::new(Duration::from_millis(10));
    let mut anim = AnimationScheduler::default();
    let mut slot = None;
    anim.start(
        &mut lp,
        &mut slot,
        arc_task(),
        Duration::from_millis(100),
        Ease::OutCubic,
    );
    assert!(anim.is_running());

    let mut samples = Vec::new();
    lp.run_until(Timestamp::from_millis(500), |lp, fired| {
        if let Some(s) = anim.on_frame(lp, &mut slot, &fired) {
            samples.push(s);
        }
    });

    assert_eq!(samples.len(), 10);
    assert!(samples.windows(2).all(|w| w[0].eased <= w[1].eased));
    let last = samples.last().unwrap();
    assert!(last.finished);
    assert_eq!(last.eased, 1.0);
    assert!(slot.is_none());
    assert!(!anim.is_running());
    assert_eq!(lp.pending_len(), 0);
}

#[test]
fn cancelled_scheduler_ignores_already_requested_frame() {
    let mut lp = EventLoop::new(Duration::from_millis(10));
    let mut anim = AnimationScheduler::default();
    let mut slot = None;
    anim.start(
        &mut lp,
        &mut slot,
        arc_task(),
        Duration::from_millis(100),
        Ease::OutCubic,
    );

    anim.cancel();
    let fired = lp.next_due(Timestamp::from_millis(10)).unwrap();
    assert!(anim.on_frame(&mut lp, &mut slot, &fired).is_none());
    assert_eq!(lp.pending_len(), 0);
}

#[test]
fn frame_for_a_superseded_handle_is_ignored() {
    let mut lp = EventLoop::new(Duration::from_millis(10));
    let mut anim = AnimationScheduler::default();
    let mut slot = None;
    anim.start(
        &mut lp,
        &mut slot,
        arc_task(),
        Duration::from_millis(100),
        Ease::OutCubic,
    );
    let stale = lp.next_due(Timestamp::from_millis(10)).unwrap();

    anim.start(
        &mut lp,
        &mut slot,
        arc_task(),
        Duration::from_millis(100),
        Ease::OutCubic,
    );
    assert!(anim.on_frame(&mut lp, &mut slot, &stale).is_none());
}

#[test]
fn scheduler_samples_through_the_chosen_curve() {
    let mut lp = EventLoop::new(Duration::from_millis(50));
    let mut anim = AnimationScheduler::default();
    let mut slot = None;
    anim.start(
        &mut lp,
        &mut slot,
        arc_task(),
        Duration::from_millis(100),
        Ease::Linear,
    );

    let mut eased = Vec::new();
    lp.run_until(Timestamp::from_millis(500), |lp, fired| {
        if let Some(s) = anim.on_frame(lp, &mut slot, &fired) {
            eased.push(s.eased);
        }
    });
    assert_eq!(eased, vec![0.5, 1.0]);
}

#[test]
fn counter_tween_reports_rounded_values() {
    let mut lp = EventLoop::new(Duration::from_millis(700));
    let mut counter = CounterTween::new(120);
    let mut slot = None;
    counter.start(
        &mut lp,
        &mut slot,
        Task::new(WidgetId(0), TaskKind::CounterFrame),
        Duration::from_millis(1400),
        Ease::OutCubic,
    );

    let mut values = Vec::new();
    lp.run_until(Timestamp::from_millis(2000), |lp, fired| {
        if let Some(tick) = counter.on_frame(lp, &mut slot, &fired) {
            values.push((tick.value, tick.finished));
        }
    });
    assert_eq!(values, vec![(105, false), (120, true)]);
    assert_eq!(counter.target(), 120);
}
