use std::time::Duration;

use super::*;
use crate::{
    foundation::core::Timestamp,
    geometry::arc::polar,
    runtime::{event_loop::EventLoop, scheduler::Handle},
};

const DONUT: &str = r#"[{"label":"PI","count":30},{"label":"Students","count":70}]"#;
const BARS: &str = r#"[{"label":"Ada","count":12,"category":"PI"},{"label":"Bo","count":6},{"label":"Cy","count":3}]"#;

fn spec() -> WidgetSpec {
    WidgetSpec::new("team")
        .with_donut_data(DONUT)
        .with_bar_data(BARS)
        .with_total_target(120)
}

fn widget(spec: &WidgetSpec) -> Widget {
    Widget::new(
        WidgetId(0),
        spec,
        Arc::new(WidgetConfig::default()),
        &Palette::default(),
        Theme::Light,
    )
}

fn run(lp: &mut EventLoop, w: &mut Widget, until_ms: u64) {
    lp.run_until(Timestamp::from_millis(until_ms), |lp, fired| {
        w.on_task(lp, fired)
    });
}

/// Host that never honours cancellation, so every stale delivery reaches the widget.
struct LeakyHost {
    inner: EventLoop,
}

impl Scheduler for LeakyHost {
    fn now(&self) -> Timestamp {
        self.inner.now()
    }

    fn set_timeout(&mut self, delay: Duration, task: Task) -> Handle {
        self.inner.set_timeout(delay, task)
    }

    fn request_frame(&mut self, task: Task) -> Handle {
        self.inner.request_frame(task)
    }

    fn cancel(&mut self, _handle: Handle) {}
}

impl LeakyHost {
    fn run(&mut self, w: &mut Widget, until_ms: u64) {
        while let Some(fired) = self.inner.next_due(Timestamp::from_millis(until_ms)) {
            w.on_task(self, fired);
        }
    }
}

fn assert_zero_state(w: &Widget) {
    assert_eq!(w.state().progress, 0.0);
    assert!(!w.state().is_armed);
    assert_eq!(w.view().counter_text(), Some("0"));
    assert_eq!(w.view().donut_opacity(), Some(0.0));
    assert!(w.view().donut.as_ref().unwrap().scene.arcs.is_empty());
    assert!(w.view().rows.iter().all(|r| !r.revealed && r.width_pct == 0.0));
    assert!(!w.view().tooltip_visible());
}

#[test]
fn full_run_walks_every_phase() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    assert_eq!(w.state().phase, Phase::Hidden);
    assert_zero_state(&w);

    w.on_viewport(&mut lp, true);
    assert_eq!(w.state().phase, Phase::Entering);
    assert!(!w.state().is_armed);

    run(&mut lp, &mut w, 120);
    assert!(w.state().is_armed);
    assert_eq!(w.view().donut_opacity(), Some(1.0));
    assert_eq!(w.view().donut.as_ref().unwrap().fade_ms, Some(420));
    assert_eq!(w.state().phase, Phase::Entering);

    run(&mut lp, &mut w, 619);
    assert_eq!(w.state().phase, Phase::Entering);
    assert_eq!(w.state().progress, 0.0);

    run(&mut lp, &mut w, 620);
    assert_eq!(w.state().phase, Phase::Animating);
    assert!(w.view().rows[0].revealed);

    let mut last = 0.0;
    lp.run_until(Timestamp::from_millis(3000), |lp, fired| {
        w.on_task(lp, fired);
        assert!(w.state().progress >= last);
        last = w.state().progress;
    });

    assert_eq!(w.state().phase, Phase::Settled);
    assert_eq!(w.state().progress, 1.0);
    assert_eq!(w.view().counter_text(), Some("120"));
    let widths: Vec<f64> = w.view().rows.iter().map(|r| r.width_pct).collect();
    assert_eq!(widths, vec![100.0, 50.0, 25.0]);
    assert!(w.view().rows.iter().all(|r| r.value_opacity == 1.0));
    assert!(w.pending().is_empty());
    assert_eq!(lp.pending_len(), 0);

    let arcs = &w.view().donut.as_ref().unwrap().scene.arcs;
    assert_eq!(arcs.len(), 2);
    assert!(arcs[1].large_arc());
}

#[test]
fn leaving_mid_animation_resets_everything() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 1200);
    assert_eq!(w.state().phase, Phase::Animating);
    assert!(w.state().progress > 0.0);
    assert_ne!(w.view().counter_text(), Some("0"));

    w.on_viewport(&mut lp, false);
    assert_eq!(w.state().phase, Phase::Hidden);
    assert_zero_state(&w);
    assert!(w.pending().is_empty());
    assert_eq!(lp.pending_len(), 0);

    run(&mut lp, &mut w, 5000);
    assert_eq!(w.state().phase, Phase::Hidden);
    assert_zero_state(&w);
}

#[test]
fn reentry_restarts_from_zero_before_any_new_tween() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 1000);
    w.on_viewport(&mut lp, false);
    run(&mut lp, &mut w, 1100);

    w.on_viewport(&mut lp, true);
    assert_eq!(w.state().phase, Phase::Entering);
    assert_zero_state(&w);

    lp.run_until(Timestamp::from_millis(1100 + 619), |lp, fired| {
        w.on_task(lp, fired);
        assert_eq!(w.state().progress, 0.0);
        assert_eq!(w.view().counter_text(), Some("0"));
    });
    assert_eq!(w.state().phase, Phase::Entering);

    run(&mut lp, &mut w, 1100 + 700);
    assert_eq!(w.state().phase, Phase::Animating);
    assert!(w.state().progress > 0.0);
}

#[test]
fn leaving_before_the_debounce_never_starts() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 50);
    w.on_viewport(&mut lp, false);
    run(&mut lp, &mut w, 3000);
    assert_eq!(w.state().phase, Phase::Hidden);
    assert_zero_state(&w);
}

#[test]
fn repeated_enter_signals_do_not_restart() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 1000);
    let progress = w.state().progress;

    w.on_viewport(&mut lp, true);
    assert_eq!(w.state().phase, Phase::Animating);
    assert_eq!(w.state().progress, progress);
}

#[test]
fn stale_deliveries_after_reset_are_ignored() {
    let mut host = LeakyHost {
        inner: EventLoop::default(),
    };
    let mut w = widget(&spec());
    w.init(&mut host, ObserverSupport::Available);
    w.on_viewport(&mut host, true);
    host.run(&mut w, 700);
    assert_eq!(w.state().phase, Phase::Animating);

    w.on_viewport(&mut host, false);
    w.on_viewport(&mut host, true);
    assert!(
        host.inner.pending_len() > w.pending().len(),
        "old run's work is still queued"
    );

    host.run(&mut w, 700 + 619);
    assert_eq!(w.state().phase, Phase::Entering);
    assert_eq!(w.state().progress, 0.0);
    assert_eq!(w.view().counter_text(), Some("0"));
    assert!(w.view().rows.iter().all(|r| !r.revealed));
    assert!(w.view().donut.as_ref().unwrap().scene.arcs.is_empty());

    host.run(&mut w, 5000);
    assert_eq!(w.state().phase, Phase::Settled);
    assert_eq!(w.view().counter_text(), Some("120"));
    assert_eq!(w.state().progress, 1.0);
}

#[test]
fn arc_hover_expands_segment_and_shows_tooltip() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 3000);

    let at = Point::new(40.0, 60.0);
    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::Arc(1), at));
    assert_eq!(w.state().hovered_segment, Some(1));
    let tip = w.view().tooltip.as_ref().unwrap();
    assert!(tip.visible);
    assert_eq!(tip.text, "Students: 70");
    assert_eq!(tip.position, Point::new(54.0, 74.0));
    let arcs = &w.view().donut.as_ref().unwrap().scene.arcs;
    assert_eq!(arcs[0].outer_radius, 122.0);
    assert_eq!(arcs[1].outer_radius, 132.0);

    w.on_pointer(PointerEvent::new(
        PointerPhase::Move,
        PointerTarget::Arc(1),
        Point::new(0.0, 0.0),
    ));
    assert_eq!(
        w.view().tooltip.as_ref().unwrap().position,
        Point::new(14.0, 14.0)
    );

    w.on_pointer(PointerEvent::new(PointerPhase::Leave, PointerTarget::Arc(1), at));
    assert_eq!(w.state().hovered_segment, None);
    assert!(!w.view().tooltip_visible());
    assert_eq!(
        w.view().donut.as_ref().unwrap().scene.arcs[1].outer_radius,
        122.0
    );
    assert_eq!(w.state().phase, Phase::Settled);
}

#[test]
fn surface_pointer_clears_arc_hover() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 3000);

    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::Arc(0), Point::ZERO));
    w.on_pointer(PointerEvent::new(
        PointerPhase::Move,
        PointerTarget::DonutSurface,
        Point::ZERO,
    ));
    assert_eq!(w.state().hovered_segment, None);
    assert!(!w.view().tooltip_visible());
}

#[test]
fn raw_donut_pointer_is_hit_tested() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 3000);
    let c = Point::new(160.0, 160.0);

    w.on_donut_pointer(PointerPhase::Enter, polar(c, 100.0, 45.0));
    assert_eq!(w.state().hovered_segment, Some(0));
    assert_eq!(w.view().tooltip.as_ref().unwrap().text, "PI: 30");

    w.on_donut_pointer(PointerPhase::Move, polar(c, 100.0, 270.0));
    assert_eq!(w.state().hovered_segment, Some(1));
    assert_eq!(w.view().tooltip.as_ref().unwrap().text, "Students: 70");

    w.on_donut_pointer(PointerPhase::Move, polar(c, 128.0, 270.0));
    assert_eq!(w.state().hovered_segment, Some(1), "expanded arc still hit");

    w.on_donut_pointer(PointerPhase::Move, c);
    assert_eq!(w.state().hovered_segment, None);

    w.on_donut_pointer(PointerPhase::Move, polar(c, 100.0, 45.0));
    w.on_donut_pointer(PointerPhase::Leave, polar(c, 100.0, 45.0));
    assert_eq!(w.state().hovered_segment, None);
    assert!(!w.view().tooltip_visible());
}

#[test]
fn hover_on_undrawn_arc_is_ignored() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::Arc(0), Point::ZERO));
    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::Arc(9), Point::ZERO));
    assert_eq!(w.state().hovered_segment, None);
    assert!(!w.view().tooltip_visible());
}

#[test]
fn bar_rows_hover_in_any_phase() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);

    w.on_pointer(PointerEvent::new(
        PointerPhase::Enter,
        PointerTarget::BarRow(0),
        Point::new(5.0, 5.0),
    ));
    assert!(w.view().rows[0].hover);
    assert_eq!(w.view().tooltip.as_ref().unwrap().text, "12 publications");

    w.on_pointer(PointerEvent::new(PointerPhase::Leave, PointerTarget::BarRow(0), Point::ZERO));
    assert!(!w.view().rows[0].hover);
    assert!(!w.view().tooltip_visible());

    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::BarRow(7), Point::ZERO));
    assert!(!w.view().tooltip_visible());
}

#[test]
fn fallback_start_runs_without_visibility() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Unavailable);
    assert_eq!(w.state().phase, Phase::Hidden);

    run(&mut lp, &mut w, 100);
    assert_eq!(w.state().phase, Phase::Entering);
    assert!(w.state().is_armed);

    w.on_viewport(&mut lp, false);
    assert!(w.state().is_armed);

    run(&mut lp, &mut w, 3000);
    assert_eq!(w.state().phase, Phase::Settled);
    assert_eq!(w.view().counter_text(), Some("120"));
}

#[test]
fn missing_elements_are_tolerated() {
    let mut lp = EventLoop::default();
    let spec = spec().without_tooltip().without_counter().without_donut();
    let mut w = widget(&spec);
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 3000);

    assert_eq!(w.state().phase, Phase::Settled);
    assert_eq!(w.view().counter_text(), None);
    assert_eq!(w.view().donut_opacity(), None);
    assert!(w.view().rows.iter().all(|r| r.revealed));

    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::Arc(0), Point::ZERO));
    w.on_pointer(PointerEvent::new(PointerPhase::Enter, PointerTarget::BarRow(1), Point::ZERO));
    w.on_donut_pointer(PointerPhase::Move, Point::new(160.0, 60.0));
    assert!(w.view().rows[1].hover);
    assert!(!w.view().tooltip_visible());
}

#[test]
fn malformed_data_renders_an_empty_donut() {
    let mut lp = EventLoop::default();
    let spec = WidgetSpec::new("broken")
        .with_donut_data("[{")
        .with_bar_data("{\"not\":\"an array\"}");
    let mut w = widget(&spec);
    assert!(w.segments().is_empty());
    assert!(w.view().rows.is_empty());

    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    run(&mut lp, &mut w, 3000);

    assert_eq!(w.state().phase, Phase::Settled);
    assert_eq!(w.view().counter_text(), Some("0"));
    let scene = &w.view().donut.as_ref().unwrap().scene;
    assert!(scene.arcs.is_empty());
    assert_eq!(scene.ops().count(), 2);
}

#[test]
fn counter_target_defaults_to_segment_total() {
    let w = widget(&WidgetSpec::new("t").with_donut_data(DONUT));
    assert_eq!(w.view().counter.as_ref().unwrap().target, 100);
}

#[test]
fn tasks_for_other_widgets_are_ignored() {
    let mut lp = EventLoop::default();
    let mut w = widget(&spec());
    w.init(&mut lp, ObserverSupport::Available);
    w.on_viewport(&mut lp, true);
    let foreign = Fired {
        handle: w.pending().arming.unwrap(),
        task: Task::new(WidgetId(5), TaskKind::EnterDebounce),
        at: Timestamp::from_millis(120),
    };
    w.on_task(&mut lp, foreign);
    assert!(!w.state().is_armed);
    assert!(w.pending().arming.is_some());
}
