use super::*;

#[test]
fn canvas_rejects_empty_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, Canvas::MAX_EDGE + 1).is_err());
    let c = Canvas::new(1080, 1350).unwrap();
    assert_eq!(c.byte_len(), 1080 * 1350 * 4);
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 1080.0, 1350.0));
}

#[test]
fn rgba_premul_matches_rounding() {
    let c = Rgba8::rgba(100, 50, 200, 128);
    assert_eq!(
        c.to_premul(),
        [
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128
        ]
    );
    assert_eq!(Rgba8::WHITE.to_premul(), [255, 255, 255, 255]);
}

#[test]
fn lerp_endpoints_and_midpoint() {
    let a = Rgba8::rgb(0, 0, 0);
    let b = Rgba8::rgba(200, 100, 50, 55);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::rgba(100, 50, 25, 155));
    assert_eq!(a.lerp(b, 7.0), b);
}

#[test]
fn with_opacity_replaces_alpha() {
    assert_eq!(Rgba8::WHITE.with_opacity(0.5).a, 128);
    assert_eq!(Rgba8::WHITE.with_opacity(-1.0).a, 0);
}
