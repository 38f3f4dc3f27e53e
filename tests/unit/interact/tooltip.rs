use super::*;

#[test]
fn show_offsets_from_pointer() {
    let mut tip = TooltipPresenter::new(14.0);
    assert!(!tip.visible);

    tip.show(Point::new(100.0, 40.0), "PI: 2");
    assert!(tip.visible);
    assert_eq!(tip.text, "PI: 2");
    assert_eq!(tip.position, Point::new(114.0, 54.0));

    tip.move_to(Point::new(0.0, 0.0), "PI: 2");
    assert_eq!(tip.position, Point::new(14.0, 14.0));
}

#[test]
fn hide_keeps_last_text() {
    let mut tip = TooltipPresenter::new(14.0);
    tip.show(Point::new(1.0, 1.0), "12 publications");
    tip.hide();
    assert!(!tip.visible);
    assert_eq!(tip.text, "12 publications");
    tip.hide();
    assert!(!tip.visible);
}
