use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::Context as _;
use image::{
    Delay, Frame,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::ffmpeg::ensure_parent_dir,
    encode::sink::{EncoderConfig, FrameEncoder, check_frame_size},
    foundation::error::{TilewallError, TilewallResult},
    render::backend::FrameRGBA,
};

/// Output file shared between the GIF encoder and the sink.
///
/// The encoder writes its trailer on drop and discards any error, so writes are routed through
/// here and the first failure is kept for [`FrameEncoder::finish`].
#[derive(Clone)]
struct GifOutput(Arc<Mutex<GifOutputState>>);

struct GifOutputState {
    file: BufWriter<File>,
    error: Option<String>,
}

impl GifOutput {
    fn new(file: File) -> Self {
        Self(Arc::new(Mutex::new(GifOutputState {
            file: BufWriter::new(file),
            error: None,
        })))
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut GifOutputState) -> std::io::Result<T>,
    ) -> std::io::Result<T> {
        let mut state = self
            .0
            .lock()
            .map_err(|_| std::io::Error::other("gif output lock poisoned"))?;
        let result = f(&mut *state);
        if let Err(e) = &result {
            state.error.get_or_insert_with(|| e.to_string());
        }
        result
    }

    /// Flush buffered bytes and report any write error seen so far.
    fn close(&self) -> TilewallResult<()> {
        self.with_state(|state| {
            if let Some(error) = state.error.take() {
                return Err(std::io::Error::other(error));
            }
            state.file.flush()?;
            state.file.get_ref().sync_all()
        })
        .map_err(|e| TilewallError::encode(format!("gif write: {e}")))
    }
}

impl Write for GifOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.with_state(|state| state.file.write(buf))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.with_state(|state| state.file.flush())
    }
}

/// Animated GIF written to a file, looping forever.
pub struct GifEncoderSink {
    out_path: PathBuf,
    encoder: Option<GifEncoder<GifOutput>>,
    output: Option<GifOutput>,
    cfg: Option<EncoderConfig>,
    frames: u64,
}

impl GifEncoderSink {
    pub fn new(out_path: impl AsRef<Path>) -> Self {
        Self {
            out_path: out_path.as_ref().to_path_buf(),
            encoder: None,
            output: None,
            cfg: None,
            frames: 0,
        }
    }
}

impl FrameEncoder for GifEncoderSink {
    fn begin(&mut self, cfg: EncoderConfig) -> TilewallResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(TilewallError::validation(
                "gif width/height must be non-zero",
            ));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(TilewallError::validation("gif dimensions exceed 65535"));
        }
        ensure_parent_dir(&self.out_path)?;
        let file = File::create(&self.out_path)
            .with_context(|| format!("failed to create '{}'", self.out_path.display()))?;

        let output = GifOutput::new(file);
        let mut encoder = GifEncoder::new(output.clone());
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| TilewallError::encode(format!("gif repeat: {e}")))?;

        self.encoder = Some(encoder);
        self.output = Some(output);
        self.cfg = Some(cfg);
        self.frames = 0;
        Ok(())
    }

    fn add_frame(&mut self, frame: &FrameRGBA) -> TilewallResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| TilewallError::encode("gif encoder not started"))?;
        check_frame_size(&cfg, frame)?;
        let Some(encoder) = self.encoder.as_mut() else {
            return Err(TilewallError::encode("gif encoder is already finished"));
        };

        let rgba = frame.to_rgba_image()?;
        let delay = Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);
        encoder
            .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
            .map_err(|e| TilewallError::encode(format!("gif frame {}: {e}", self.frames)))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> TilewallResult<()> {
        let (Some(encoder), Some(output)) = (self.encoder.take(), self.output.take()) else {
            return Err(TilewallError::encode("gif encoder not started"));
        };
        self.cfg = None;
        // Dropping the encoder writes the trailer.
        drop(encoder);
        output.close()?;
        tracing::debug!(frames = self.frames, path = %self.out_path.display(), "gif written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
