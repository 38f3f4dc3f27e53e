//! donut-reveal is a headless engine for a combined donut chart and ranked bar list that
//! animates into view when scrolled into the viewport.
//!
//! The browser is replaced by a deterministic host model:
//!
//! 1. **Ingest**: two embedded JSON payloads (single or double encoded) become
//!    [`Segment`]s and [`BarRow`]s. Malformed input degrades to empty data, never an error.
//! 2. **Schedule**: a [`Page`] owns a virtual-time [`EventLoop`] (timers plus 60 Hz display
//!    frames) and routes viewport, pointer and timer events to its [`Widget`]s.
//! 3. **Animate**: each widget runs `Hidden -> Entering -> Animating -> Settled`, driving an
//!    out-cubic arc sweep, a counter tween and a staggered bar reveal. Leaving the viewport
//!    cancels everything and resets to a zero state.
//! 4. **Render**: the widget's retained [`WidgetView`] is written as SVG
//!    ([`render::svg`]) and optionally rasterised to PNG ([`render::raster`]).
//!
//! Geometry is pure: [`compute_arcs`] and [`compute_scene`] map `(segments, progress, hover)`
//! to declarative draw instructions with no side effects.
#![forbid(unsafe_code)]

mod animation;
mod config;
mod foundation;
mod geometry;
mod ingest;
mod interact;
mod reveal;
mod runtime;
mod style;
mod widget;

/// SVG and raster output for widget views.
pub mod render;

pub use animation::ease::Ease;
pub use animation::tween::{
    AnimationScheduler, CounterTick, CounterTween, Tween, TweenSample, counter_value,
};
pub use config::model::{GeometryConfig, WidgetConfig};
pub use config::page::{PageSpec, RawPayload, WidgetSpec};
pub use foundation::core::{BezPath, Color, Point, Timestamp, Vec2};
pub use foundation::error::{RevealError, RevealResult};
pub use geometry::arc::{
    ArcInstruction, DonutScene, DrawOp, HoleDisc, MAX_DRAWN_SWEEP_DEG, MIN_SWEEP_DEG, TrackRing,
    compute_arcs, compute_scene, polar,
};
pub use ingest::decode::{decode_records, ingest_bars, ingest_segments};
pub use ingest::records::{BarRow, Segment};
pub use interact::pointer::{PointerEvent, PointerPhase, PointerTarget};
pub use interact::tooltip::TooltipPresenter;
pub use render::raster::{Raster, RasterOptions, rasterize_svg, write_png};
pub use render::svg::{WidgetLayout, donut_svg, escape_xml, widget_svg};
pub use reveal::bars::{BarRevealEngine, RevealStep};
pub use runtime::event_loop::EventLoop;
pub use runtime::page::Page;
pub use runtime::scheduler::{Fired, Handle, Scheduler, Task, TaskKind, WidgetId};
pub use style::palette::{CATEGORY_COLOR_VAR, DEFAULT_CATEGORY_COLOR, Palette, Theme};
pub use widget::controller::{ObserverSupport, Widget};
pub use widget::state::{PendingHandles, Phase, WidgetRunState};
pub use widget::view::{BarRowView, CounterText, DonutSurface, LegendItem, WidgetView};
