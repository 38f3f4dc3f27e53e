use std::sync::Arc;

use crate::{
    animation::tween::{AnimationScheduler, CounterTween},
    config::{model::WidgetConfig, page::WidgetSpec},
    foundation::core::Point,
    geometry::arc::compute_scene,
    ingest::{
        decode::{ingest_bars, ingest_segments},
        records::Segment,
    },
    interact::{
        pointer::{PointerEvent, PointerPhase, PointerTarget},
        tooltip::TooltipPresenter,
    },
    reveal::bars::BarRevealEngine,
    runtime::scheduler::{Fired, Scheduler, Task, TaskKind, WidgetId},
    style::palette::{Palette, Theme},
    widget::{
        state::{PendingHandles, Phase, WidgetRunState},
        view::{BarRowView, CounterText, DonutSurface, LegendItem, WidgetView},
    },
};

/// Whether the host can report viewport intersections.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverSupport {
    #[default]
    Available,
    /// Start unconditionally after a short delay, without visibility gating.
    Unavailable,
}

/// One donut + bar list widget and the state machine that animates it.
///
/// `Hidden -> Entering -> Animating -> Settled`, and back to `Hidden` whenever the
/// widget leaves the viewport. Every transition into `Entering` or `Hidden` runs a full
/// reset first, which cancels all outstanding timers and frames before anything new is
/// armed.
#[derive(Debug)]
pub struct Widget {
    id: WidgetId,
    name: String,
    config: Arc<WidgetConfig>,
    theme: Theme,
    segments: Vec<Segment>,
    state: WidgetRunState,
    pending: PendingHandles,
    in_view: bool,
    gated: bool,
    arc: AnimationScheduler,
    counter: CounterTween,
    bars: BarRevealEngine,
    view: WidgetView,
}

impl Widget {
    /// Ingest the widget's payloads and build its zero-state view.
    pub fn new(
        id: WidgetId,
        spec: &WidgetSpec,
        config: Arc<WidgetConfig>,
        palette: &Palette,
        theme: Theme,
    ) -> Self {
        let segments = ingest_segments(spec.donut_data.as_str(), palette);
        let rows: Vec<BarRowView> = ingest_bars(spec.bar_data.as_str())
            .iter()
            .map(|row| BarRowView::new(row, palette))
            .collect();
        let target = spec
            .total_target
            .unwrap_or_else(|| segments.iter().map(|s| s.count).fold(0, u64::saturating_add));

        let view = WidgetView {
            donut: spec.donut.then(|| DonutSurface {
                scene: compute_scene(&segments, 0.0, None, &config.geometry, theme),
                opacity: 0.0,
                fade_ms: None,
            }),
            counter: spec.counter.then(|| CounterText {
                text: "0".to_owned(),
                target,
            }),
            rows,
            tooltip: spec
                .tooltip
                .then(|| TooltipPresenter::new(config.tooltip_offset)),
            legend: spec
                .legend
                .iter()
                .map(|label| LegendItem {
                    label: label.clone(),
                    color: palette.resolve(label),
                })
                .collect(),
        };

        tracing::debug!(
            widget = %spec.id,
            segments = segments.len(),
            rows = view.rows.len(),
            target,
            "widget initialised"
        );

        Self {
            id,
            name: spec.id.clone(),
            bars: BarRevealEngine::new(config.bar_stagger()),
            config,
            theme,
            segments,
            state: WidgetRunState::default(),
            pending: PendingHandles::default(),
            in_view: false,
            gated: true,
            arc: AnimationScheduler::default(),
            counter: CounterTween::new(target),
            view,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &WidgetRunState {
        &self.state
    }

    pub fn view(&self) -> &WidgetView {
        &self.view
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn pending(&self) -> &PendingHandles {
        &self.pending
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    /// Attach to the host. Without an observer the widget starts after the fallback
    /// delay regardless of visibility.
    pub fn init(&mut self, sched: &mut dyn Scheduler, observer: ObserverSupport) {
        self.redraw();
        if observer == ObserverSupport::Unavailable {
            self.gated = false;
            let task = self.task(TaskKind::FallbackStart);
            self.pending.arm(sched, self.config.fallback_delay(), task);
            tracing::debug!(widget = %self.name, "no viewport observer, fallback start armed");
        }
    }

    /// Viewport intersection changed.
    pub fn on_viewport(&mut self, sched: &mut dyn Scheduler, visible: bool) {
        if !self.gated {
            tracing::trace!(widget = %self.name, "viewport signal ignored without observer");
            return;
        }
        match (visible, self.in_view) {
            (true, false) => {
                self.in_view = true;
                self.full_reset(sched);
                self.set_phase(Phase::Entering);
                let task = self.task(TaskKind::EnterDebounce);
                self.pending.arm(sched, self.config.enter_debounce(), task);
            }
            (false, true) => {
                self.in_view = false;
                self.full_reset(sched);
                self.set_phase(Phase::Hidden);
            }
            _ => {}
        }
    }

    /// A timer or frame issued by this widget fired.
    pub fn on_task(&mut self, sched: &mut dyn Scheduler, fired: Fired) {
        if fired.task.widget != self.id {
            tracing::warn!(widget = %self.name, task = ?fired.task, "task addressed to another widget");
            return;
        }

        let live = match fired.task.kind {
            TaskKind::EnterDebounce => {
                let live = self.pending.take_arming(fired.handle);
                if live && self.in_view {
                    self.begin_fade_in(sched);
                }
                live
            }
            TaskKind::FallbackStart => {
                let live = self.pending.take_arming(fired.handle);
                if live {
                    self.begin_fade_in(sched);
                }
                live
            }
            TaskKind::ArmDelay => {
                let live = self.pending.take_arming(fired.handle);
                if live && self.state.is_armed && (self.in_view || !self.gated) {
                    self.start_tweens(sched);
                }
                live
            }
            TaskKind::ArcFrame => {
                match self
                    .arc
                    .on_frame(sched, &mut self.pending.arc_frame, &fired)
                {
                    Some(sample) => {
                        self.state.progress = self.state.progress.max(sample.eased);
                        self.redraw();
                        true
                    }
                    None => false,
                }
            }
            TaskKind::CounterFrame => {
                match self
                    .counter
                    .on_frame(sched, &mut self.pending.counter_frame, &fired)
                {
                    Some(tick) => {
                        if let Some(counter) = self.view.counter.as_mut() {
                            counter.text = tick.value.to_string();
                        }
                        true
                    }
                    None => false,
                }
            }
            TaskKind::RevealRow { index } => {
                let live = self.pending.take_reveal(fired.handle);
                if live {
                    self.bars.apply(&mut self.view.rows, index);
                }
                live
            }
        };

        if !live {
            tracing::trace!(widget = %self.name, handle = ?fired.handle, "stale callback ignored");
            return;
        }
        self.maybe_settle();
    }

    /// Pointer event delivered to one of the widget's hover targets.
    pub fn on_pointer(&mut self, event: PointerEvent) {
        match event.target {
            PointerTarget::Arc(index) => self.on_arc_pointer(index, event.phase, event.position),
            PointerTarget::BarRow(index) => self.on_row_pointer(index, event.phase, event.position),
            PointerTarget::DonutSurface => {
                if event.phase == PointerPhase::Leave || self.state.hovered_segment.is_some() {
                    self.reset_hover();
                }
            }
        }
    }

    /// Raw pointer position over the donut surface, resolved to arc targets by hit
    /// testing the current scene.
    pub fn on_donut_pointer(&mut self, phase: PointerPhase, position: Point) {
        let hit = match phase {
            PointerPhase::Leave => None,
            PointerPhase::Enter | PointerPhase::Move => self
                .view
                .donut
                .as_ref()
                .and_then(|d| d.scene.hit_test(position)),
        };

        match (self.state.hovered_segment, hit) {
            (Some(current), Some(index)) if current == index => {
                self.on_arc_pointer(index, PointerPhase::Move, position);
            }
            (previous, Some(index)) => {
                if let Some(previous) = previous {
                    self.on_arc_pointer(previous, PointerPhase::Leave, position);
                }
                self.on_arc_pointer(index, PointerPhase::Enter, position);
            }
            (_, None) => {
                let phase = if phase == PointerPhase::Leave {
                    PointerPhase::Leave
                } else {
                    PointerPhase::Move
                };
                self.on_pointer(PointerEvent::new(
                    phase,
                    PointerTarget::DonutSurface,
                    position,
                ));
            }
        }
    }

    fn on_arc_pointer(&mut self, index: usize, phase: PointerPhase, position: Point) {
        let drawn = self
            .view
            .donut
            .as_ref()
            .is_some_and(|d| d.scene.arcs.iter().any(|a| a.index == index));
        let Some(segment) = self.segments.get(index).filter(|_| drawn) else {
            tracing::warn!(widget = %self.name, index, "pointer on an arc that is not drawn");
            return;
        };
        let text = format!("{}: {}", segment.label, segment.count);

        match phase {
            PointerPhase::Enter => {
                self.state.hovered_segment = Some(index);
                self.redraw();
                if let Some(tip) = self.view.tooltip.as_mut() {
                    tip.show(position, text);
                }
            }
            PointerPhase::Move => {
                if let Some(tip) = self.view.tooltip.as_mut() {
                    tip.move_to(position, text);
                }
            }
            PointerPhase::Leave => self.reset_hover(),
        }
    }

    fn on_row_pointer(&mut self, index: usize, phase: PointerPhase, position: Point) {
        let unit = &self.config.bar_unit;
        let Some(row) = self.view.rows.get_mut(index) else {
            tracing::warn!(widget = %self.name, index, "pointer on a missing bar row");
            return;
        };
        let text = format!("{} {unit}", row.count);

        match phase {
            PointerPhase::Enter | PointerPhase::Move => {
                row.hover = true;
                if let Some(tip) = self.view.tooltip.as_mut() {
                    tip.move_to(position, text);
                }
            }
            PointerPhase::Leave => {
                row.hover = false;
                if let Some(tip) = self.view.tooltip.as_mut() {
                    tip.hide();
                }
            }
        }
    }

    fn reset_hover(&mut self) {
        self.state.hovered_segment = None;
        if let Some(tip) = self.view.tooltip.as_mut() {
            tip.hide();
        }
        self.redraw();
    }

    /// Cancel everything outstanding, then return every visual to its zero state.
    fn full_reset(&mut self, sched: &mut dyn Scheduler) {
        let cancelled = self.pending.cancel_all(sched);
        self.arc.cancel();
        self.counter.cancel();

        self.state.is_armed = false;
        self.state.progress = 0.0;
        self.reset_hover();
        if let Some(donut) = self.view.donut.as_mut() {
            donut.opacity = 0.0;
            donut.fade_ms = None;
        }
        if let Some(counter) = self.view.counter.as_mut() {
            counter.text = "0".to_owned();
        }
        self.bars.reset(&mut self.view.rows);

        tracing::debug!(widget = %self.name, cancelled, "full reset");
    }

    fn begin_fade_in(&mut self, sched: &mut dyn Scheduler) {
        if self.state.is_armed {
            return;
        }
        self.state.is_armed = true;
        if self.state.phase == Phase::Hidden {
            self.set_phase(Phase::Entering);
        }
        let fade_ms = self.config.fade_duration_ms;
        if let Some(donut) = self.view.donut.as_mut() {
            donut.fade_ms = Some(fade_ms);
            donut.opacity = 1.0;
        }
        let task = self.task(TaskKind::ArmDelay);
        self.pending.arm(sched, self.config.arm_delay(), task);
    }

    fn start_tweens(&mut self, sched: &mut dyn Scheduler) {
        self.set_phase(Phase::Animating);
        let arc_task = self.task(TaskKind::ArcFrame);
        self.arc.start(
            sched,
            &mut self.pending.arc_frame,
            arc_task,
            self.config.donut_duration(),
            self.config.ease,
        );
        if self.view.counter.is_some() {
            let counter_task = self.task(TaskKind::CounterFrame);
            self.counter.start(
                sched,
                &mut self.pending.counter_frame,
                counter_task,
                self.config.counter_duration(),
                self.config.ease,
            );
        }
        self.bars
            .reveal(sched, &mut self.pending.reveals, self.id, &self.view.rows);
    }

    fn maybe_settle(&mut self) {
        if self.state.phase == Phase::Animating && !self.arc.is_running() && self.pending.is_empty()
        {
            self.set_phase(Phase::Settled);
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.state.phase != phase {
            tracing::debug!(widget = %self.name, from = ?self.state.phase, to = ?phase, "phase");
            self.state.phase = phase;
        }
    }

    fn redraw(&mut self) {
        if let Some(donut) = self.view.donut.as_mut() {
            donut.scene = compute_scene(
                &self.segments,
                self.state.progress,
                self.state.hovered_segment,
                &self.config.geometry,
                self.theme,
            );
        }
    }

    fn task(&self, kind: TaskKind) -> Task {
        Task::new(self.id, kind)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/controller.rs"]
mod tests;
