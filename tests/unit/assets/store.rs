use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::assets::decode::{ImageCrateDecoder, decode_image};

fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct CountingDecoder {
    calls: AtomicUsize,
}

impl ImageDecoder for CountingDecoder {
    fn decode(&self, id: ImageId, bytes: &[u8]) -> TilewallResult<DecodedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        decode_image(id, bytes)
    }
}

#[test]
fn identical_sources_decode_once() {
    let red = ImageSource::memory("red", png_bytes([255, 0, 0, 255]));
    let blue = ImageSource::memory("blue", png_bytes([0, 0, 255, 255]));
    let sources = vec![red.clone(), blue.clone(), red.clone(), red.clone()];

    let decoder = CountingDecoder {
        calls: AtomicUsize::new(0),
    };
    let set = DecodedImageSet::decode_all(&sources, &decoder);

    assert_eq!(decoder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(set.len(), 2);
    assert!(set.get(&red).is_some());
    assert!(set.get(&blue).is_some());
    assert!(set.failures().is_empty());
}

#[test]
fn one_failure_does_not_abort_the_others() {
    let good = ImageSource::memory("good", png_bytes([0, 255, 0, 255]));
    let bad = ImageSource::memory("bad", b"nope".to_vec());
    let missing = ImageSource::file("/definitely/not/here/tile.png");

    let set = DecodedImageSet::decode_all([&good, &bad, &missing], &ImageCrateDecoder);

    assert_eq!(set.len(), 1);
    assert!(set.get(&good).is_some());
    assert!(set.get(&bad).is_none());
    assert!(set.get(&missing).is_none());
    assert_eq!(set.failures().len(), 2);
    assert!(
        set.failures()
            .iter()
            .all(|f| matches!(f.error, TilewallError::Decode(_)))
    );
}

#[test]
fn keys_distinguish_files_from_memory() {
    let a = ImageSource::file("tiles/a.png");
    let b = ImageSource::memory("tiles/a.png", vec![0u8]);
    assert_ne!(a.key(), b.key());
    assert_ne!(a.id(), b.id());
    assert_eq!(
        ImageSource::file("tiles\\a.png").id(),
        ImageSource::file("tiles/a.png").id()
    );
}

#[test]
fn empty_input_yields_empty_set() {
    let set = DecodedImageSet::decode_all(std::iter::empty(), &ImageCrateDecoder);
    assert!(set.is_empty());
    assert!(set.failures().is_empty());
}

#[test]
fn same_label_with_different_bytes_stays_distinct() {
    let red = ImageSource::memory("tile.png", png_bytes([255, 0, 0, 255]));
    let blue = ImageSource::memory("tile.png", png_bytes([0, 0, 255, 255]));
    assert_ne!(red.key(), blue.key());
    assert_eq!(
        red.key(),
        ImageSource::memory("tile.png", png_bytes([255, 0, 0, 255])).key()
    );

    let decoder = CountingDecoder {
        calls: AtomicUsize::new(0),
    };
    let set = DecodedImageSet::decode_all([&red, &blue], &decoder);
    assert_eq!(decoder.calls.load(Ordering::SeqCst), 2);
    assert_eq!(set.len(), 2);
    assert_eq!(set.get(&red).unwrap().rgba8.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(set.get(&blue).unwrap().rgba8.get_pixel(0, 0).0, [0, 0, 255, 255]);
}
