//! Easing curves and frame-driven tweens.

pub mod ease;
pub mod tween;
