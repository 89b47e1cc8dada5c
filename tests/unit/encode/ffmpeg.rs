use super::*;

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, Rgba8::opaque(10, 20, 30)).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let mut dst = vec![0u8; 4];
    flatten_premul_over_bg_to_opaque_rgba8(&mut dst, &src, Rgba8::opaque(10, 20, 30)).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut enc = FfmpegEncoder::new(FfmpegEncoderOpts::new(
        std::env::temp_dir().join("tilewall_odd.mp4"),
    ));
    let err = enc.begin(EncoderConfig::new(511, 512)).unwrap_err();
    assert!(matches!(err, TilewallError::Validation(_)));
}

#[test]
fn finish_without_begin_is_an_error() {
    let mut enc = FfmpegEncoder::new(FfmpegEncoderOpts::new("never.mp4"));
    assert!(enc.finish().is_err());
}
