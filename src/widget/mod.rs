/// Visibility-driven lifecycle of one widget.
pub mod controller;
pub mod state;
/// Retained visual model the renderers read.
pub mod view;
