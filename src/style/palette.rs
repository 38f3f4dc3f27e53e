use std::collections::BTreeMap;

use crate::foundation::core::Color;

/// CSS custom property that surrounding static styling reads a category colour from.
pub const CATEGORY_COLOR_VAR: &str = "--cat-color";

/// Colour for labels the palette does not know.
pub const DEFAULT_CATEGORY_COLOR: Color = Color::rgb(0x64, 0x74, 0x8b);

/// Immutable label -> colour table.
///
/// Built once and shared read-only between widgets (`Arc<Palette>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub entries: BTreeMap<String, Color>,
    #[serde(default = "default_category_color")]
    pub default: Color,
}

fn default_category_color() -> Color {
    DEFAULT_CATEGORY_COLOR
}

impl Default for Palette {
    /// Team membership categories.
    fn default() -> Self {
        let entries = [
            ("PI", Color::rgb(0xd7, 0x26, 0x3d)),
            ("Researchers", Color::rgb(0x25, 0x63, 0xeb)),
            ("Students", Color::rgb(0x7c, 0x3a, 0xed)),
            ("Co-supervised Students", Color::rgb(0xf5, 0x9e, 0x0b)),
            ("Intern", Color::rgb(0x10, 0xb9, 0x81)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();
        Self {
            entries,
            default: DEFAULT_CATEGORY_COLOR,
        }
    }
}

impl Palette {
    pub fn new(entries: BTreeMap<String, Color>, default: Color) -> Self {
        Self { entries, default }
    }

    /// Colour for `label`, or the palette default.
    pub fn resolve(&self, label: &str) -> Color {
        self.entries.get(label).copied().unwrap_or(self.default)
    }
}

/// Page colour scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Low-opacity stroke of the full-circle track ring.
    pub fn track_stroke(self) -> Color {
        match self {
            Self::Light => Color::rgba(148, 163, 184, 0.22),
            Self::Dark => Color::rgba(148, 163, 184, 0.18),
        }
    }

    /// Fill of the inner hole disc.
    pub fn hole_fill(self) -> Color {
        match self {
            Self::Light => Color::rgb(0xff, 0xff, 0xff),
            Self::Dark => Color::rgba(23, 28, 41, 0.98),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/palette.rs"]
mod tests;
