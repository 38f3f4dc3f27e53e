use crate::{
    foundation::core::Color,
    geometry::arc::DonutScene,
    interact::tooltip::TooltipPresenter,
    ingest::records::BarRow,
    style::palette::Palette,
};

/// The donut drawing surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DonutSurface {
    pub scene: DonutScene,
    pub opacity: f64,
    /// Opacity transition length once the fade-in has been triggered.
    pub fade_ms: Option<u64>,
}

/// Text node showing the animated total.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CounterText {
    pub text: String,
    pub target: u64,
}

/// Visual state of one bar row.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BarRowView {
    pub label: String,
    pub count: u64,
    /// Value of the row's category colour variable.
    pub color: Color,
    pub revealed: bool,
    pub hover: bool,
    /// Bar length as a percentage of the track.
    pub width_pct: f64,
    pub value_opacity: f64,
}

impl BarRowView {
    pub fn new(row: &BarRow, palette: &Palette) -> Self {
        Self {
            label: row.label.clone(),
            count: row.count,
            color: palette.resolve(row.style_key()),
            revealed: false,
            hover: false,
            width_pct: 0.0,
            value_opacity: 0.0,
        }
    }
}

/// Pre-rendered legend entry with its colour variable applied.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LegendItem {
    pub label: String,
    pub color: Color,
}

/// Retained model of everything a widget shows.
///
/// Optional parts model surface elements the host page may not provide; operations
/// on a missing part are no-ops.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct WidgetView {
    pub donut: Option<DonutSurface>,
    pub counter: Option<CounterText>,
    pub rows: Vec<BarRowView>,
    pub tooltip: Option<TooltipPresenter>,
    pub legend: Vec<LegendItem>,
}

impl WidgetView {
    pub fn counter_text(&self) -> Option<&str> {
        self.counter.as_ref().map(|c| c.text.as_str())
    }

    pub fn tooltip_visible(&self) -> bool {
        self.tooltip.as_ref().is_some_and(|t| t.visible)
    }

    pub fn donut_opacity(&self) -> Option<f64> {
        self.donut.as_ref().map(|d| d.opacity)
    }
}
