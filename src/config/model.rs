use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::Point,
        error::{RevealError, RevealResult},
    },
};

/// Donut geometry in SVG user units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    /// Radius of the disc drawn over the arcs to cut out the donut hole.
    pub hole_radius: f64,
    /// Extra outer radius of the hovered segment.
    pub hover_delta: f64,
    /// Square view box edge.
    pub view_size: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            center: Point::new(160.0, 160.0),
            outer_radius: 122.0,
            inner_radius: 76.0,
            hole_radius: 72.0,
            hover_delta: 10.0,
            view_size: 320.0,
        }
    }
}

impl GeometryConfig {
    pub fn validate(&self) -> RevealResult<()> {
        let finite = [
            self.center.x,
            self.center.y,
            self.outer_radius,
            self.inner_radius,
            self.hole_radius,
            self.hover_delta,
            self.view_size,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(RevealError::validation("geometry values must be finite"));
        }
        if self.inner_radius <= 0.0 || self.inner_radius >= self.outer_radius {
            return Err(RevealError::validation(
                "geometry requires 0 < inner_radius < outer_radius",
            ));
        }
        if self.hole_radius < 0.0 || self.hover_delta < 0.0 {
            return Err(RevealError::validation(
                "hole_radius and hover_delta must be >= 0",
            ));
        }
        if self.view_size <= 0.0 {
            return Err(RevealError::validation("view_size must be > 0"));
        }
        Ok(())
    }

    /// Radius of the track ring's centre line.
    pub fn track_radius(&self) -> f64 {
        (self.outer_radius + self.inner_radius) / 2.0
    }

    pub fn track_width(&self) -> f64 {
        self.outer_radius - self.inner_radius
    }
}

/// Timing, presentation and geometry settings shared by every widget on a page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub donut_duration_ms: u64,
    pub counter_duration_ms: u64,
    pub bar_stagger_ms: u64,
    pub fade_duration_ms: u64,
    /// Added to the fade-in before the tweens are armed.
    pub arm_pad_ms: u64,
    pub enter_debounce_ms: u64,
    pub fallback_delay_ms: u64,
    /// Curve shared by the arc sweep and the counter.
    pub ease: Ease,
    /// Minimum visible fraction that counts as "in view".
    pub visibility_threshold: f64,
    pub frame_interval_us: u64,
    /// Tooltip distance from the pointer, both axes, in pixels.
    pub tooltip_offset: f64,
    /// Noun appended to bar row counts in tooltips.
    pub bar_unit: String,
    pub geometry: GeometryConfig,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            donut_duration_ms: 1600,
            counter_duration_ms: 1400,
            bar_stagger_ms: 60,
            fade_duration_ms: 420,
            arm_pad_ms: 80,
            enter_debounce_ms: 120,
            fallback_delay_ms: 100,
            ease: Ease::OutCubic,
            visibility_threshold: 0.1,
            frame_interval_us: 16_667,
            tooltip_offset: 14.0,
            bar_unit: "publications".to_owned(),
            geometry: GeometryConfig::default(),
        }
    }
}

impl WidgetConfig {
    pub fn validate(&self) -> RevealResult<()> {
        if self.frame_interval_us == 0 {
            return Err(RevealError::validation("frame_interval_us must be > 0"));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(RevealError::validation(
                "visibility_threshold must be in (0, 1]",
            ));
        }
        if !self.tooltip_offset.is_finite() {
            return Err(RevealError::validation("tooltip_offset must be finite"));
        }
        self.geometry.validate()
    }

    pub fn donut_duration(&self) -> Duration {
        Duration::from_millis(self.donut_duration_ms)
    }

    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    pub fn bar_stagger(&self) -> Duration {
        Duration::from_millis(self.bar_stagger_ms)
    }

    /// Fade-in duration plus pad: the wait between fade-in start and the tweens.
    pub fn arm_delay(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms.saturating_add(self.arm_pad_ms))
    }

    pub fn enter_debounce(&self) -> Duration {
        Duration::from_millis(self.enter_debounce_ms)
    }

    pub fn fallback_delay(&self) -> Duration {
        Duration::from_millis(self.fallback_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(self.frame_interval_us)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
