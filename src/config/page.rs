use std::collections::BTreeSet;

use crate::{
    config::model::WidgetConfig,
    foundation::error::{RevealError, RevealResult},
    style::palette::{Palette, Theme},
};

/// Embedded chart data exactly as the page carries it.
///
/// In a page description a payload may be written as a string (the raw text, possibly
/// itself string-encoded JSON) or as an inline JSON array, which is kept as its text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawPayload(pub String);

impl RawPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawPayload {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl serde::Serialize for RawPayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for RawPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Self(s),
            serde_json::Value::Null => Self::default(),
            other => Self(other.to_string()),
        })
    }
}

fn yes() -> bool {
    true
}

/// One widget instance on the page and which optional elements it has.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WidgetSpec {
    pub id: String,
    #[serde(default)]
    pub donut_data: RawPayload,
    #[serde(default)]
    pub bar_data: RawPayload,
    /// Counter target; the sum of segment counts when absent.
    #[serde(default)]
    pub total_target: Option<u64>,
    /// Pre-rendered legend categories.
    #[serde(default)]
    pub legend: Vec<String>,
    #[serde(default = "yes")]
    pub tooltip: bool,
    #[serde(default = "yes")]
    pub counter: bool,
    #[serde(default = "yes")]
    pub donut: bool,
}

impl WidgetSpec {
    /// Widget with every optional element present and no data.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            donut_data: RawPayload::default(),
            bar_data: RawPayload::default(),
            total_target: None,
            legend: Vec::new(),
            tooltip: true,
            counter: true,
            donut: true,
        }
    }

    pub fn with_donut_data(mut self, text: impl Into<String>) -> Self {
        self.donut_data = RawPayload(text.into());
        self
    }

    pub fn with_bar_data(mut self, text: impl Into<String>) -> Self {
        self.bar_data = RawPayload(text.into());
        self
    }

    pub fn with_total_target(mut self, target: u64) -> Self {
        self.total_target = Some(target);
        self
    }

    pub fn with_legend<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legend = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn without_tooltip(mut self) -> Self {
        self.tooltip = false;
        self
    }

    pub fn without_counter(mut self) -> Self {
        self.counter = false;
        self
    }

    pub fn without_donut(mut self) -> Self {
        self.donut = false;
        self
    }
}

/// A page: shared settings plus the widgets it hosts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSpec {
    #[serde(default)]
    pub theme: Theme,
    /// Whether the host reports viewport intersections.
    #[serde(default = "yes")]
    pub observer: bool,
    #[serde(default)]
    pub config: WidgetConfig,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
}

impl PageSpec {
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let spec: Self = serde_json::from_str(s)?;
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> RevealResult<()> {
        self.config.validate()?;
        let mut seen = BTreeSet::new();
        for w in &self.widgets {
            if w.id.trim().is_empty() {
                return Err(RevealError::validation("widget id must not be empty"));
            }
            if !seen.insert(w.id.as_str()) {
                return Err(RevealError::validation(format!(
                    "duplicate widget id \"{}\"",
                    w.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/page.rs"]
mod tests;
