use std::fmt::Write as _;

use crate::{
    config::model::{GeometryConfig, WidgetConfig},
    foundation::core::Color,
    geometry::arc::{DonutScene, DrawOp},
    style::palette::CATEGORY_COLOR_VAR,
    widget::view::{BarRowView, WidgetView},
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const FONT_FAMILY: &str = "sans-serif";
const TEXT_FILL: Color = Color::rgb(0x0f, 0x17, 0x2a);
const MUTED_FILL: Color = Color::rgb(0x64, 0x74, 0x8b);
const BAR_TRACK_FILL: Color = Color::rgba(148, 163, 184, 0.25);
const TOOLTIP_FILL: Color = Color::rgba(15, 23, 42, 0.92);

/// Horizontal gap between the donut view box and the bar list.
pub const BAR_PANEL_GAP: f64 = 40.0;
/// Room reserved for a bar row's label, left of its track.
pub const BAR_LABEL_WIDTH: f64 = 110.0;
/// Length of a bar track at 100 %.
pub const BAR_TRACK_WIDTH: f64 = 240.0;
pub const BAR_ROW_HEIGHT: f64 = 32.0;
const BAR_HEIGHT: f64 = 10.0;
const BAR_VALUE_WIDTH: f64 = 56.0;
const LEGEND_ROW_HEIGHT: f64 = 22.0;
const PANEL_TOP: f64 = 16.0;

/// Pixel size of the document [`widget_svg`] writes for a view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WidgetLayout {
    pub width: f64,
    pub height: f64,
    /// Left edge of the bar list.
    pub bars_x: f64,
}

impl WidgetLayout {
    pub fn for_view(view: &WidgetView, geometry: &GeometryConfig) -> Self {
        let bars_x = geometry.view_size + BAR_PANEL_GAP;
        let donut_column = geometry.view_size + legend_height(view.legend.len());
        let bar_column = PANEL_TOP + view.rows.len() as f64 * BAR_ROW_HEIGHT;
        Self {
            width: bars_x + BAR_LABEL_WIDTH + BAR_TRACK_WIDTH + BAR_VALUE_WIDTH,
            height: donut_column.max(bar_column),
            bars_x,
        }
    }
}

fn legend_height(items: usize) -> f64 {
    if items == 0 {
        0.0
    } else {
        PANEL_TOP + items as f64 * LEGEND_ROW_HEIGHT
    }
}

/// Standalone SVG document of one donut scene, sized to the geometry's view box.
pub fn donut_svg(scene: &DonutScene, geometry: &GeometryConfig) -> String {
    let size = geometry.view_size;
    let mut out = String::with_capacity(1024);
    open_document(&mut out, size, size);
    write_scene(&mut out, scene);
    out.push_str("</svg>\n");
    out
}

/// Full widget snapshot: donut surface, counter, bar list, legend and tooltip.
///
/// Parts the view does not have are simply not written.
pub fn widget_svg(view: &WidgetView, config: &WidgetConfig) -> String {
    let geometry = &config.geometry;
    let layout = WidgetLayout::for_view(view, geometry);
    let mut out = String::with_capacity(4096);
    open_document(&mut out, layout.width, layout.height);

    if let Some(donut) = &view.donut {
        let _ = write!(out, r#"<g class="donut" opacity="{}""#, donut.opacity);
        if let Some(ms) = donut.fade_ms {
            let _ = write!(out, r#" style="transition: opacity {ms}ms ease""#);
        }
        out.push_str(">\n");
        write_scene(&mut out, &donut.scene);
        out.push_str("</g>\n");
    }

    if let Some(counter) = &view.counter {
        let _ = writeln!(
            out,
            r#"<text class="counter" x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-family="{FONT_FAMILY}" font-size="40" font-weight="700" fill="{TEXT_FILL}" data-target="{}">{}</text>"#,
            geometry.center.x,
            geometry.center.y,
            counter.target,
            escape_xml(&counter.text),
        );
    }

    for (index, row) in view.rows.iter().enumerate() {
        write_bar_row(&mut out, layout.bars_x, index, row);
    }

    for (index, item) in view.legend.iter().enumerate() {
        let y = geometry.view_size + PANEL_TOP + index as f64 * LEGEND_ROW_HEIGHT;
        let _ = writeln!(
            out,
            r#"<g class="legend-item" style="{CATEGORY_COLOR_VAR}: {color}"><rect x="8" y="{y}" width="12" height="12" rx="3" fill="{color}"/><text x="28" y="{}" font-family="{FONT_FAMILY}" font-size="13" fill="{TEXT_FILL}">{}</text></g>"#,
            y + 10.0,
            escape_xml(&item.label),
            color = item.color,
        );
    }

    if let Some(tip) = view.tooltip.as_ref().filter(|t| t.visible) {
        let width = 16.0 + 7.0 * tip.text.chars().count() as f64;
        let _ = writeln!(
            out,
            r#"<g class="tooltip" transform="translate({} {})"><rect width="{width}" height="24" rx="4" fill="{TOOLTIP_FILL}"/><text x="8" y="16" font-family="{FONT_FAMILY}" font-size="12" fill="{}">{}</text></g>"#,
            tip.position.x,
            tip.position.y,
            Color::rgb(0xff, 0xff, 0xff),
            escape_xml(&tip.text),
        );
    }

    out.push_str("</svg>\n");
    out
}

fn open_document(out: &mut String, width: f64, height: f64) {
    let _ = writeln!(
        out,
        r#"<svg xmlns="{SVG_NS}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
}

fn write_scene(out: &mut String, scene: &DonutScene) {
    for op in scene.ops() {
        match op {
            DrawOp::Track(track) => {
                let _ = writeln!(
                    out,
                    r#"<circle class="track" cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                    track.center.x, track.center.y, track.radius, track.stroke, track.stroke_width,
                );
            }
            DrawOp::Arc(arc) => {
                let _ = writeln!(
                    out,
                    r#"<path class="arc" data-index="{}" data-label="{}" d="{}" fill="{}"/>"#,
                    arc.index,
                    escape_xml(&arc.label),
                    arc.to_svg_path(),
                    arc.fill,
                );
            }
            DrawOp::Hole(hole) => {
                let _ = writeln!(
                    out,
                    r#"<circle class="hole" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                    hole.center.x, hole.center.y, hole.radius, hole.fill,
                );
            }
        }
    }
}

fn write_bar_row(out: &mut String, x: f64, index: usize, row: &BarRowView) {
    let top = PANEL_TOP + index as f64 * BAR_ROW_HEIGHT;
    let track_x = x + BAR_LABEL_WIDTH;
    let bar_y = top + (BAR_ROW_HEIGHT - BAR_HEIGHT) / 2.0;
    let text_y = top + BAR_ROW_HEIGHT / 2.0 + 4.0;
    let bar_width = BAR_TRACK_WIDTH * row.width_pct.clamp(0.0, 100.0) / 100.0;
    let mut class = String::from("bar-row");
    if row.revealed {
        class.push_str(" is-revealed");
    }
    if row.hover {
        class.push_str(" is-hover");
    }

    let _ = writeln!(
        out,
        r#"<g class="{class}" data-index="{index}" style="{CATEGORY_COLOR_VAR}: {color}">"#,
        color = row.color,
    );
    let _ = writeln!(
        out,
        r#"<text x="{x}" y="{text_y}" font-family="{FONT_FAMILY}" font-size="13" fill="{TEXT_FILL}">{}</text>"#,
        escape_xml(&row.label),
    );
    let _ = writeln!(
        out,
        r#"<rect class="bar-track" x="{track_x}" y="{bar_y}" width="{BAR_TRACK_WIDTH}" height="{BAR_HEIGHT}" rx="5" fill="{BAR_TRACK_FILL}"/>"#,
    );
    if bar_width > 0.0 {
        let stroke = if row.hover {
            format!(r#" stroke="{TEXT_FILL}" stroke-width="1""#)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            r#"<rect class="bar" x="{track_x}" y="{bar_y}" width="{bar_width}" height="{BAR_HEIGHT}" rx="5" fill="{}"{stroke}/>"#,
            row.color,
        );
    }
    let _ = writeln!(
        out,
        r#"<text class="bar-value" x="{}" y="{text_y}" font-family="{FONT_FAMILY}" font-size="12" fill="{MUTED_FILL}" opacity="{}">{}</text>"#,
        track_x + BAR_TRACK_WIDTH + 8.0,
        row.value_opacity,
        row.count,
    );
    out.push_str("</g>\n");
}

/// Escape text for use in SVG character data and double-quoted attributes.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
