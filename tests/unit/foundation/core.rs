use super::*;

#[test]
fn canvas_center_is_half_extent() {
    let c = Canvas::new(1920, 1080);
    assert_eq!(c.center(), Point::new(960.0, 540.0));
    assert!(!c.is_empty());
    assert!(Canvas::new(0, 10).is_empty());
}

#[test]
fn premul_from_straight_rounds() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert!(Rgba8Premul::transparent().is_transparent());
}
