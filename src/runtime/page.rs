use std::{sync::Arc, time::Duration};

use crate::{
    config::{
        model::WidgetConfig,
        page::{PageSpec, WidgetSpec},
    },
    foundation::{
        core::{Point, Timestamp},
        error::{RevealError, RevealResult},
    },
    interact::pointer::{PointerEvent, PointerPhase},
    runtime::{
        event_loop::EventLoop,
        scheduler::{Fired, Scheduler, WidgetId},
    },
    style::palette::{Palette, Theme},
    widget::controller::{ObserverSupport, Widget},
};

/// A host page: one event loop shared by any number of independent widgets.
///
/// Widgets only share the read-only config and palette. Every delivery the loop produces
/// is routed to the widget its task names, so one widget's timers can never touch
/// another's state.
#[derive(Debug)]
pub struct Page {
    event_loop: EventLoop,
    widgets: Vec<Widget>,
    config: Arc<WidgetConfig>,
    palette: Arc<Palette>,
    theme: Theme,
    observer: ObserverSupport,
}

impl Page {
    pub fn new(
        config: WidgetConfig,
        palette: Palette,
        theme: Theme,
        observer: ObserverSupport,
    ) -> RevealResult<Self> {
        config.validate()?;
        Ok(Self {
            event_loop: EventLoop::new(config.frame_interval()),
            widgets: Vec::new(),
            config: Arc::new(config),
            palette: Arc::new(palette),
            theme,
            observer,
        })
    }

    /// Build a page and attach every widget it describes.
    #[tracing::instrument(skip(spec), fields(widgets = spec.widgets.len()))]
    pub fn from_spec(spec: &PageSpec) -> RevealResult<Self> {
        spec.validate()?;
        let observer = if spec.observer {
            ObserverSupport::Available
        } else {
            ObserverSupport::Unavailable
        };
        let mut page = Self::new(
            spec.config.clone(),
            spec.palette.clone(),
            spec.theme,
            observer,
        )?;
        for widget in &spec.widgets {
            page.add_widget(widget)?;
        }
        Ok(page)
    }

    /// Create a widget from `spec` and attach it to the page.
    #[tracing::instrument(skip(self, spec), fields(widget = %spec.id))]
    pub fn add_widget(&mut self, spec: &WidgetSpec) -> RevealResult<WidgetId> {
        if spec.id.trim().is_empty() {
            return Err(RevealError::validation("widget id must not be empty"));
        }
        if self.widget_by_name(&spec.id).is_some() {
            return Err(RevealError::validation(format!(
                "duplicate widget id \"{}\"",
                spec.id
            )));
        }

        let id = WidgetId(self.widgets.len());
        let mut widget = Widget::new(
            id,
            spec,
            Arc::clone(&self.config),
            &self.palette,
            self.theme,
        );
        widget.init(&mut self.event_loop, self.observer);
        self.widgets.push(widget);
        Ok(id)
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0)
    }

    pub fn widget_by_name(&self, name: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.name() == name)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn observer(&self) -> ObserverSupport {
        self.observer
    }

    pub fn now(&self) -> Timestamp {
        self.event_loop.now()
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Whether an intersection ratio counts as "in view" under this page's threshold.
    pub fn is_visible(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.config.visibility_threshold
    }

    /// Report the widget's current viewport intersection ratio.
    #[tracing::instrument(skip(self))]
    pub fn observe(&mut self, id: WidgetId, ratio: f64) -> RevealResult<()> {
        let visible = self.is_visible(ratio);
        let widget = self
            .widgets
            .get_mut(id.0)
            .ok_or_else(|| unknown_widget(id))?;
        widget.on_viewport(&mut self.event_loop, visible);
        Ok(())
    }

    /// Deliver a pointer event aimed at one of the widget's hover targets.
    pub fn pointer(&mut self, id: WidgetId, event: PointerEvent) -> RevealResult<()> {
        self.widgets
            .get_mut(id.0)
            .ok_or_else(|| unknown_widget(id))?
            .on_pointer(event);
        Ok(())
    }

    /// Deliver a raw pointer position over the widget's donut surface.
    pub fn pointer_over_donut(
        &mut self,
        id: WidgetId,
        phase: PointerPhase,
        position: Point,
    ) -> RevealResult<()> {
        self.widgets
            .get_mut(id.0)
            .ok_or_else(|| unknown_widget(id))?
            .on_donut_pointer(phase, position);
        Ok(())
    }

    /// Advance virtual time to `until`, dispatching everything due on the way.
    #[tracing::instrument(skip(self, until), fields(until_ms = until.as_millis_f64()))]
    pub fn run_until(&mut self, until: Timestamp) {
        self.run_until_traced(until, |_, _| {});
    }

    pub fn run_for(&mut self, span: Duration) {
        let until = self.now() + span;
        self.run_until(until);
    }

    /// Like [`Page::run_until`], calling `observe` after each delivery with the widget
    /// that handled it.
    pub fn run_until_traced<F>(&mut self, until: Timestamp, mut observe: F)
    where
        F: FnMut(&Fired, &Widget),
    {
        let Page {
            event_loop,
            widgets,
            ..
        } = self;
        event_loop.run_until(until, |lp, fired| {
            let Some(widget) = widgets.get_mut(fired.task.widget.0) else {
                tracing::warn!(task = ?fired.task, "delivery for an unknown widget");
                return;
            };
            widget.on_task(lp, fired);
            observe(&fired, widget);
        });
    }
}

fn unknown_widget(id: WidgetId) -> RevealError {
    RevealError::validation(format!("unknown widget {}", id.0))
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/page.rs"]
mod tests;
