use image::AnimationDecoder;

use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "tilewall_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: rgba.repeat((w * h) as usize),
        premultiplied: true,
    }
}

#[test]
fn writes_looping_gif_with_all_frames() {
    let dir = temp_dir("gif_frames");
    let path = dir.join("anim.gif");

    let mut enc = GifEncoderSink::new(&path);
    enc.begin(EncoderConfig::new(8, 6)).unwrap();
    enc.add_frame(&solid(8, 6, [255, 0, 0, 255])).unwrap();
    enc.add_frame(&solid(8, 6, [0, 0, 255, 255])).unwrap();
    enc.add_frame(&solid(8, 6, [0, 255, 0, 255])).unwrap();
    enc.finish().unwrap();

    let file = std::io::BufReader::new(File::open(&path).unwrap());
    let decoder = image::codecs::gif::GifDecoder::new(file).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].buffer().dimensions(), (8, 6));
    // GIF stores centiseconds, so 16 ms is rounded but never dropped.
    let (num, _den) = frames[0].delay().numer_denom_ms();
    assert!(num > 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rejects_frames_before_begin_and_wrong_sizes() {
    let dir = temp_dir("gif_errors");
    let mut enc = GifEncoderSink::new(dir.join("x.gif"));
    assert!(enc.add_frame(&solid(2, 2, [0, 0, 0, 255])).is_err());

    enc.begin(EncoderConfig::new(2, 2)).unwrap();
    assert!(enc.add_frame(&solid(4, 4, [0, 0, 0, 255])).is_err());
    enc.finish().unwrap();
    assert!(enc.finish().is_err());

    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(target_os = "linux")]
#[test]
fn finish_reports_write_failures() {
    let full = Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let mut enc = GifEncoderSink::new(full);
    enc.begin(EncoderConfig::new(2, 2)).unwrap();
    // Small frames stay buffered, so the failure surfaces when the file is flushed.
    let result = enc
        .add_frame(&solid(2, 2, [0, 0, 0, 255]))
        .and_then(|()| enc.finish());
    assert!(matches!(result, Err(TilewallError::Encode(_))));
}
