use crate::foundation::core::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Enter,
    Move,
    Leave,
}

/// Element a pointer event was delivered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// Drawn arc of the segment with this index.
    Arc(usize),
    /// Bar row at this document-order index.
    BarRow(usize),
    /// Donut drawing surface outside any arc.
    DonutSurface,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub target: PointerTarget,
    pub position: Point,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, target: PointerTarget, position: Point) -> Self {
        Self {
            phase,
            target,
            position,
        }
    }
}
