use super::*;
use serde_json::json;

#[test]
fn parses_hex_rgb_and_rgba() {
    let c: Rgba8 = serde_json::from_value(json!("#cccccc")).unwrap();
    assert_eq!(c, Rgba8::opaque(0xcc, 0xcc, 0xcc));

    let c: Rgba8 = serde_json::from_value(json!("0000ff80")).unwrap();
    assert_eq!(
        c,
        Rgba8 {
            r: 0,
            g: 0,
            b: 255,
            a: 128
        }
    );

    assert!(serde_json::from_value::<Rgba8>(json!("#abc")).is_err());
    assert!(serde_json::from_value::<Rgba8>(json!("#zzzzzz")).is_err());
}

#[test]
fn hex_round_trips_through_serialize() {
    let c = Rgba8::from_hex_u32(0x636e72);
    assert_eq!(c.to_hex(), "#636e72");
    assert_eq!(serde_json::to_value(c).unwrap(), json!("#636e72"));
}

#[test]
fn premul_scales_color_by_alpha() {
    let c = Rgba8 {
        r: 200,
        g: 100,
        b: 0,
        a: 128,
    };
    assert_eq!(c.to_premul(), [100, 50, 0, 128]);
    assert_eq!(Rgba8::opaque(1, 2, 3).to_premul(), [1, 2, 3, 255]);
}

#[test]
fn clip_handles_negative_and_overflowing_rects() {
    assert_eq!(
        PixelRect::new(-2, -2, 4, 4).clip_to(10, 10),
        Some((0, 0, 2, 2))
    );
    assert_eq!(PixelRect::new(8, 0, 4, 4).clip_to(10, 10), Some((8, 0, 2, 4)));
    assert_eq!(PixelRect::new(10, 0, 4, 4).clip_to(10, 10), None);
}
