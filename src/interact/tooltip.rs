use crate::foundation::core::{Point, Vec2};

/// Floating label anchored near the pointer.
///
/// Independent of the widget's animation phase: hover targets call
/// [`TooltipPresenter::show`], [`TooltipPresenter::move_to`] and
/// [`TooltipPresenter::hide`] whenever pointer events arrive.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TooltipPresenter {
    pub text: String,
    pub visible: bool,
    /// Top-left corner in page pixels.
    pub position: Point,
    offset: Vec2,
}

impl TooltipPresenter {
    /// Hidden tooltip placed `offset` pixels right of and below the pointer when shown.
    pub fn new(offset: f64) -> Self {
        Self {
            text: String::new(),
            visible: false,
            position: Point::ZERO,
            offset: Vec2::new(offset, offset),
        }
    }

    pub fn show(&mut self, pointer: Point, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
        self.position = pointer + self.offset;
    }

    pub fn move_to(&mut self, pointer: Point, text: impl Into<String>) {
        self.show(pointer, text);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interact/tooltip.rs"]
mod tests;
