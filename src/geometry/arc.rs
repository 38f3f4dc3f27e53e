use std::fmt::Write as _;

use kurbo::Shape as _;

use crate::{
    config::model::GeometryConfig,
    foundation::core::{BezPath, Color, Point, Vec2},
    ingest::records::Segment,
    style::palette::Theme,
};

/// Sweeps at or below this many degrees produce no path.
pub const MIN_SWEEP_DEG: f64 = 0.01;

/// Longest sweep actually drawn. A full 360 deg arc has coincident endpoints, which the
/// SVG arc command renders as nothing.
pub const MAX_DRAWN_SWEEP_DEG: f64 = 360.0 - MIN_SWEEP_DEG;

const FLATTEN_TOLERANCE: f64 = 0.1;

/// Declarative draw instruction for one donut segment.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ArcInstruction {
    /// Index of the segment in the ingested sequence.
    pub index: usize,
    pub label: String,
    pub count: u64,
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Degrees, 0 = up, clockwise.
    pub start_deg: f64,
    pub end_deg: f64,
    pub fill: Color,
}

impl ArcInstruction {
    pub fn sweep_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    /// SVG large-arc flag for both arcs of the path.
    pub fn large_arc(&self) -> bool {
        self.sweep_deg() > 180.0
    }

    fn drawn_end_deg(&self) -> f64 {
        self.end_deg.min(self.start_deg + MAX_DRAWN_SWEEP_DEG)
    }

    /// Closed ring-sector path: outer arc start -> end, line in, inner arc end -> start.
    pub fn to_svg_path(&self) -> String {
        let end = self.drawn_end_deg();
        let outer_start = polar(self.center, self.outer_radius, self.start_deg);
        let outer_end = polar(self.center, self.outer_radius, end);
        let inner_end = polar(self.center, self.inner_radius, end);
        let inner_start = polar(self.center, self.inner_radius, self.start_deg);
        let large = u8::from(self.large_arc());
        let (ro, ri) = (self.outer_radius, self.inner_radius);

        let mut d = String::with_capacity(160);
        let _ = write!(
            d,
            "M {} {} A {ro} {ro} 0 {large} 1 {} {} L {} {} A {ri} {ri} 0 {large} 0 {} {} Z",
            outer_start.x,
            outer_start.y,
            outer_end.x,
            outer_end.y,
            inner_end.x,
            inner_end.y,
            inner_start.x,
            inner_start.y,
        );
        d
    }

    /// Same outline as [`ArcInstruction::to_svg_path`], flattened to cubic segments.
    pub fn to_bez_path(&self) -> BezPath {
        let end = self.drawn_end_deg();
        let sweep = (end - self.start_deg).to_radians();
        let outer = kurbo::Arc {
            center: self.center,
            radii: Vec2::new(self.outer_radius, self.outer_radius),
            start_angle: screen_radians(self.start_deg),
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        let inner = kurbo::Arc {
            center: self.center,
            radii: Vec2::new(self.inner_radius, self.inner_radius),
            start_angle: screen_radians(end),
            sweep_angle: -sweep,
            x_rotation: 0.0,
        };

        let mut path = BezPath::new();
        path.move_to(polar(self.center, self.outer_radius, self.start_deg));
        path.extend(outer.append_iter(FLATTEN_TOLERANCE));
        path.line_to(polar(self.center, self.inner_radius, end));
        path.extend(inner.append_iter(FLATTEN_TOLERANCE));
        path.close_path();
        path
    }

    pub fn contains(&self, pt: Point) -> bool {
        self.to_bez_path().contains(pt)
    }
}

/// Full-circle ring drawn beneath the segments.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TrackRing {
    pub center: Point,
    pub radius: f64,
    pub stroke_width: f64,
    pub stroke: Color,
}

/// Solid disc drawn over the segments to cut out the donut hole.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct HoleDisc {
    pub center: Point,
    pub radius: f64,
    pub fill: Color,
}

/// Everything the donut surface draws for one progress value, in paint order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DonutScene {
    pub track: TrackRing,
    pub arcs: Vec<ArcInstruction>,
    pub hole: HoleDisc,
}

/// Borrowed view of one scene element.
#[derive(Clone, Copy, Debug)]
pub enum DrawOp<'a> {
    Track(&'a TrackRing),
    Arc(&'a ArcInstruction),
    Hole(&'a HoleDisc),
}

impl DonutScene {
    /// Track first, arcs in segment order, hole last.
    pub fn ops(&self) -> impl Iterator<Item = DrawOp<'_>> {
        std::iter::once(DrawOp::Track(&self.track))
            .chain(self.arcs.iter().map(DrawOp::Arc))
            .chain(std::iter::once(DrawOp::Hole(&self.hole)))
    }

    /// Segment index under `pt`, if any. Points over the hole never hit.
    pub fn hit_test(&self, pt: Point) -> Option<usize> {
        if (pt - self.hole.center).hypot() <= self.hole.radius {
            return None;
        }
        self.arcs
            .iter()
            .rev()
            .find(|arc| arc.contains(pt))
            .map(|arc| arc.index)
    }
}

/// Cartesian point for `deg` degrees (0 = up, clockwise) at radius `r`.
pub fn polar(center: Point, r: f64, deg: f64) -> Point {
    let rad = screen_radians(deg);
    Point::new(center.x + r * rad.cos(), center.y + r * rad.sin())
}

fn screen_radians(deg: f64) -> f64 {
    (deg - 90.0).to_radians()
}

/// Arc draw instructions for `segments` at global `progress` (clamped to `[0, 1]`).
///
/// Angles accumulate in input order from 0 deg; each sweep is
/// `count / total * 360 * progress`. Sweeps of at most [`MIN_SWEEP_DEG`] are skipped
/// and do not advance the angle. The hovered segment's outer radius grows by
/// `hover_delta`.
pub fn compute_arcs(
    segments: &[Segment],
    progress: f64,
    hovered: Option<usize>,
    geometry: &GeometryConfig,
) -> Vec<ArcInstruction> {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let total = segments
        .iter()
        .map(|s| s.count as f64)
        .sum::<f64>()
        .max(1.0);

    let mut angle = 0.0;
    let mut arcs = Vec::with_capacity(segments.len());
    for (index, seg) in segments.iter().enumerate() {
        let sweep = (seg.count as f64 / total) * 360.0 * progress;
        if sweep <= MIN_SWEEP_DEG {
            continue;
        }
        let outer_radius = if hovered == Some(index) {
            geometry.outer_radius + geometry.hover_delta
        } else {
            geometry.outer_radius
        };
        arcs.push(ArcInstruction {
            index,
            label: seg.label.clone(),
            count: seg.count,
            center: geometry.center,
            outer_radius,
            inner_radius: geometry.inner_radius,
            start_deg: angle,
            end_deg: angle + sweep,
            fill: seg.color,
        });
        angle += sweep;
    }
    arcs
}

/// Track ring, segment arcs and hole disc for one frame.
pub fn compute_scene(
    segments: &[Segment],
    progress: f64,
    hovered: Option<usize>,
    geometry: &GeometryConfig,
    theme: Theme,
) -> DonutScene {
    DonutScene {
        track: TrackRing {
            center: geometry.center,
            radius: geometry.track_radius(),
            stroke_width: geometry.track_width(),
            stroke: theme.track_stroke(),
        },
        arcs: compute_arcs(segments, progress, hovered, geometry),
        hole: HoleDisc {
            center: geometry.center,
            radius: geometry.hole_radius,
            fill: theme.hole_fill(),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/arc.rs"]
mod tests;
