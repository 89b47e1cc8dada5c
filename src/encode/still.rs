use std::{fs::File, io::BufWriter, path::Path};

use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;

use crate::{
    encode::ffmpeg::ensure_parent_dir,
    encode::sink::lowercase_extension,
    foundation::error::{TilewallError, TilewallResult},
};

/// Quality used for JPEG stills.
pub const JPEG_QUALITY: u8 = 90;

/// Write `image` as PNG or JPEG, chosen by the extension of `path`.
///
/// JPEG drops the alpha channel.
pub fn write_still(image: &image::RgbaImage, path: &Path) -> TilewallResult<()> {
    let ext = lowercase_extension(path);
    match ext.as_deref() {
        Some("png") => {
            ensure_parent_dir(path)?;
            image
                .save_with_format(path, image::ImageFormat::Png)
                .map_err(|e| TilewallError::encode(format!("png '{}': {e}", path.display())))?;
        }
        Some("jpg" | "jpeg") => {
            ensure_parent_dir(path)?;
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(|e| TilewallError::encode(format!("jpeg '{}': {e}", path.display())))?;
        }
        _ => {
            return Err(TilewallError::validation(format!(
                "unsupported still output '{}': expected .png, .jpg or .jpeg",
                path.display()
            )));
        }
    }
    tracing::debug!(path = %path.display(), "still written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;
