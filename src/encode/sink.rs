use std::path::Path;

use crate::{
    encode::ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts},
    encode::gif::GifEncoderSink,
    foundation::error::{TilewallError, TilewallResult},
    render::backend::FrameRGBA,
};

/// Delay between exported animation frames, in milliseconds.
pub const EXPORT_FRAME_DELAY_MS: u32 = 16;

/// Configuration provided to a [`FrameEncoder`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Display time of each frame.
    pub frame_delay_ms: u32,
}

impl EncoderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_delay_ms: EXPORT_FRAME_DELAY_MS,
        }
    }
}

/// Consumer of rendered animation frames, in the order they were produced.
pub trait FrameEncoder {
    /// Called once before any frame is added.
    fn begin(&mut self, cfg: EncoderConfig) -> TilewallResult<()>;
    /// Append one frame. The frame must be fully consumed before returning.
    fn add_frame(&mut self, frame: &FrameRGBA) -> TilewallResult<()>;
    /// Called once after the last frame.
    fn finish(&mut self) -> TilewallResult<()>;
}

/// In-memory encoder for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryEncoder {
    cfg: Option<EncoderConfig>,
    pub(crate) frames: Vec<FrameRGBA>,
    finished: bool,
}

impl InMemoryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<EncoderConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[FrameRGBA] {
        &self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> TilewallResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn add_frame(&mut self, frame: &FrameRGBA) -> TilewallResult<()> {
        if self.cfg.is_none() {
            return Err(TilewallError::encode("in-memory encoder not started"));
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> TilewallResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Pick an animation encoder from the output extension (`.gif` or `.mp4`).
pub fn encoder_for_path(path: &Path) -> TilewallResult<Box<dyn FrameEncoder>> {
    match lowercase_extension(path).as_deref() {
        Some("gif") => Ok(Box::new(GifEncoderSink::new(path))),
        Some("mp4") => Ok(Box::new(FfmpegEncoder::new(FfmpegEncoderOpts::new(path)))),
        _ => Err(TilewallError::validation(format!(
            "unsupported animation output '{}': expected .gif or .mp4",
            path.display()
        ))),
    }
}

pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub(crate) fn check_frame_size(cfg: &EncoderConfig, frame: &FrameRGBA) -> TilewallResult<()> {
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(TilewallError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != cfg.width as usize * cfg.height as usize * 4 {
        return Err(TilewallError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
