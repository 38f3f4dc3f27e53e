use crate::foundation::core::Color;

/// One donut segment. `count` is always > 0 once ingested.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Segment {
    pub label: String,
    pub count: u64,
    pub color: Color,
}

impl Segment {
    pub fn new(label: impl Into<String>, count: u64, color: Color) -> Self {
        Self {
            label: label.into(),
            count,
            color,
        }
    }
}

/// One row of the ranked bar list, in document order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BarRow {
    pub label: String,
    pub count: u64,
    /// Styling category; the label is used when absent.
    pub category: Option<String>,
}

impl BarRow {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Key used for palette lookup.
    pub fn style_key(&self) -> &str {
        self.category.as_deref().unwrap_or(&self.label)
    }
}
