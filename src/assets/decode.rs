use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{TilewallError, TilewallResult};

/// Stable identifier of an image source, derived from its source key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub(crate) u64);

impl ImageId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Decoded bitmap in straight-alpha RGBA8.
///
/// Owned by the image set that decoded it; compositing only ever reads it.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    pub rgba8: Arc<image::RgbaImage>,
}

/// Image decode service.
///
/// Implementations must be shareable across threads: distinct sources decode in parallel.
pub trait ImageDecoder: Sync {
    fn decode(&self, id: ImageId, bytes: &[u8]) -> TilewallResult<DecodedImage>;
}

/// Decoder backed by the `image` crate's format sniffing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, id: ImageId, bytes: &[u8]) -> TilewallResult<DecodedImage> {
        decode_image(id, bytes)
    }
}

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_image(id: ImageId, bytes: &[u8]) -> TilewallResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| TilewallError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TilewallError::decode("image has zero width or height"));
    }

    Ok(DecodedImage {
        id,
        width,
        height,
        rgba8: Arc::new(rgba),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
