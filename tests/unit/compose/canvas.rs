use super::*;

fn two_band_image(id: u64) -> DecodedImage {
    // 1x2: red on top, blue at the bottom.
    let img = image::RgbaImage::from_raw(1, 2, vec![255, 0, 0, 255, 0, 0, 255, 255]).unwrap();
    DecodedImage {
        id: ImageId(id),
        width: 1,
        height: 2,
        rgba8: Arc::new(img),
    }
}

#[test]
fn fill_rect_is_clipped_to_the_canvas() {
    let mut canvas = PixelCanvas::new(4, 4);
    canvas.fill_rect(PixelRect::new(-1, -1, 3, 3), Rgba8::opaque(9, 9, 9));
    let tex = canvas.into_texture();
    assert_eq!(tex.pixel(0, 0), [9, 9, 9, 255]);
    assert_eq!(tex.pixel(1, 1), [9, 9, 9, 255]);
    assert_eq!(tex.pixel(2, 2), [0, 0, 0, 0]);
}

#[test]
fn draw_image_unflipped_keeps_orientation() {
    let mut canvas = PixelCanvas::with_filter(2, 4, FilterType::Nearest);
    canvas.draw_image(&two_band_image(1), PixelRect::new(0, 0, 2, 4), false);
    let tex = canvas.into_texture();
    assert_eq!(tex.pixel(0, 0), [255, 0, 0, 255]);
    assert_eq!(tex.pixel(1, 1), [255, 0, 0, 255]);
    assert_eq!(tex.pixel(0, 3), [0, 0, 255, 255]);
}

#[test]
fn draw_image_flipped_mirrors_within_the_same_cell() {
    let mut canvas = PixelCanvas::with_filter(2, 4, FilterType::Nearest);
    canvas.draw_image(&two_band_image(1), PixelRect::new(0, 0, 2, 4), true);
    let tex = canvas.into_texture();
    assert_eq!(tex.pixel(0, 0), [0, 0, 255, 255]);
    assert_eq!(tex.pixel(1, 3), [255, 0, 0, 255]);
}

#[test]
fn partially_offscreen_draw_uses_matching_source_rows() {
    let mut canvas = PixelCanvas::with_filter(1, 1, FilterType::Nearest);
    // Only the bottom (blue) half of the 1x2 image lands on the canvas.
    canvas.draw_image(&two_band_image(1), PixelRect::new(0, -1, 1, 2), false);
    assert_eq!(canvas.into_texture().pixel(0, 0), [0, 0, 255, 255]);
}

#[test]
fn scaled_variants_are_cached_per_size_and_flip() {
    let img = two_band_image(3);
    let mut canvas = PixelCanvas::new(8, 8);
    for x in 0..4 {
        canvas.draw_image(&img, PixelRect::new(x * 2, 0, 2, 2), false);
    }
    assert_eq!(canvas.scaled.len(), 1);
    canvas.draw_image(&img, PixelRect::new(0, 4, 2, 2), true);
    assert_eq!(canvas.scaled.len(), 2);
}

#[test]
fn to_rgba_image_round_trips_opaque_pixels() {
    let tex = RasterTexture::solid(2, 1, Rgba8::opaque(10, 20, 30));
    let img = tex.to_rgba_image().unwrap();
    assert_eq!(img.get_pixel(1, 0).0, [10, 20, 30, 255]);
}

#[test]
fn sample_wrapped_repeats() {
    let mut canvas = PixelCanvas::with_filter(2, 1, FilterType::Nearest);
    canvas.fill_rect(PixelRect::new(0, 0, 1, 1), Rgba8::opaque(1, 1, 1));
    canvas.fill_rect(PixelRect::new(1, 0, 1, 1), Rgba8::opaque(2, 2, 2));
    let tex = canvas.into_texture();
    assert_eq!(tex.sample_wrapped(0.25, 0.0), [1, 1, 1, 255]);
    assert_eq!(tex.sample_wrapped(1.75, 0.5), [2, 2, 2, 255]);
    assert_eq!(tex.sample_wrapped(-0.25, 0.0), [2, 2, 2, 255]);
}
