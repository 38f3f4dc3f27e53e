use super::*;

#[test]
fn known_labels_resolve_and_unknown_fall_back() {
    let p = Palette::default();
    assert_eq!(p.resolve("PI").to_css(), "#d7263d");
    assert_eq!(p.resolve("Intern").to_css(), "#10b981");
    assert_eq!(p.resolve("Visitors"), DEFAULT_CATEGORY_COLOR);
    assert_eq!(p.resolve("").to_css(), "#64748b");
}

#[test]
fn palette_deserializes_with_defaults() {
    let p: Palette = serde_json::from_str(r##"{ "entries": { "Alumni": "#000000" } }"##).unwrap();
    assert_eq!(p.resolve("Alumni"), Color::rgb(0, 0, 0));
    assert_eq!(p.resolve("PI"), DEFAULT_CATEGORY_COLOR);
}

#[test]
fn themes_pick_track_and_hole_colours() {
    assert_eq!(Theme::Light.track_stroke().to_css(), "rgba(148,163,184,0.22)");
    assert_eq!(Theme::Dark.track_stroke().to_css(), "rgba(148,163,184,0.18)");
    assert_eq!(Theme::Light.hole_fill().to_css(), "#ffffff");
    assert_eq!(Theme::Dark.hole_fill().to_css(), "rgba(23,28,41,0.98)");
}
