use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_pixels() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8, 1, 2, 3, 255];
    let img = image::RgbaImage::from_raw(2, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = ImageCrateDecoder.decode(ImageId(7), &buf).unwrap();
    assert_eq!(decoded.id, ImageId(7));
    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.height, 1);
    assert_eq!(decoded.rgba8.as_raw().as_slice(), src_rgba.as_slice());
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_image(ImageId(1), b"definitely not an image").unwrap_err();
    assert!(matches!(err, TilewallError::Decode(_)));
}
