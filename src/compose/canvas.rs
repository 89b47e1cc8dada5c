use std::{collections::HashMap, sync::Arc};

use image::imageops::FilterType;

use crate::{
    assets::decode::{DecodedImage, ImageId},
    foundation::core::{PixelRect, Rgba8},
    foundation::error::{TilewallError, TilewallResult},
    foundation::math::{over_premul, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

/// 2D drawing surface sized in pixels.
pub trait RasterCanvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Replace every pixel of `rect` (clipped) with `color`.
    fn fill_rect(&mut self, rect: PixelRect, color: Rgba8);

    /// Draw `image` scaled to `dest`, mirrored vertically inside `dest` when `flipped`.
    fn draw_image(&mut self, image: &DecodedImage, dest: PixelRect, flipped: bool);
}

/// Owned raster in premultiplied RGBA8, row-major, tightly packed.
///
/// Top row first: pixel row 0 is the top of the wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterTexture {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Vec<u8>,
}

impl RasterTexture {
    pub fn solid(width: u32, height: u32, color: Rgba8) -> Self {
        let px = color.to_premul();
        let mut rgba8_premul = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            rgba8_premul.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            rgba8_premul,
        }
    }

    /// Premultiplied copy of a decoded bitmap.
    pub fn from_decoded(image: &DecodedImage) -> Self {
        let mut rgba8_premul = image.rgba8.as_raw().clone();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width: image.width,
            height: image.height,
            rgba8_premul,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.rgba8_premul[idx],
            self.rgba8_premul[idx + 1],
            self.rgba8_premul[idx + 2],
            self.rgba8_premul[idx + 3],
        ]
    }

    /// Nearest-neighbour lookup with wrap-around; `u`/`v` in texture repeats, `v = 0` at the top.
    pub fn sample_wrapped(&self, u: f64, v: f64) -> [u8; 4] {
        let fu = u - u.floor();
        let fv = v - v.floor();
        let x = ((fu * f64::from(self.width)) as u32).min(self.width.saturating_sub(1));
        let y = ((fv * f64::from(self.height)) as u32).min(self.height.saturating_sub(1));
        self.pixel(x, y)
    }

    /// Straight-alpha image for writing to disk.
    pub fn to_rgba_image(&self) -> TilewallResult<image::RgbaImage> {
        let mut data = self.rgba8_premul.clone();
        unpremultiply_rgba8_in_place(&mut data);
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| TilewallError::validation("texture buffer does not match its size"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ScaledKey {
    id: ImageId,
    width: u32,
    height: u32,
    flipped: bool,
}

/// CPU [`RasterCanvas`] writing premultiplied RGBA8.
///
/// Scaled and mirrored variants are cached per image, so drawing the same tile into many cells
/// only resamples it once.
pub struct PixelCanvas {
    target: RasterTexture,
    filter: FilterType,
    scaled: HashMap<ScaledKey, Arc<Vec<u8>>>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_filter(width, height, FilterType::Triangle)
    }

    pub fn with_filter(width: u32, height: u32, filter: FilterType) -> Self {
        Self {
            target: RasterTexture::solid(width, height, Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            }),
            filter,
            scaled: HashMap::new(),
        }
    }

    pub fn into_texture(self) -> RasterTexture {
        self.target
    }

    fn scaled_variant(&mut self, image: &DecodedImage, w: u32, h: u32, flipped: bool) -> Arc<Vec<u8>> {
        let key = ScaledKey {
            id: image.id,
            width: w,
            height: h,
            flipped,
        };
        if let Some(buf) = self.scaled.get(&key) {
            return buf.clone();
        }

        let mut scaled = if image.width == w && image.height == h {
            (*image.rgba8).clone()
        } else {
            image::imageops::resize(&*image.rgba8, w, h, self.filter)
        };
        if flipped {
            image::imageops::flip_vertical_in_place(&mut scaled);
        }
        let mut data = scaled.into_raw();
        premultiply_rgba8_in_place(&mut data);

        let buf = Arc::new(data);
        self.scaled.insert(key, buf.clone());
        buf
    }
}

impl RasterCanvas for PixelCanvas {
    fn width(&self) -> u32 {
        self.target.width
    }

    fn height(&self) -> u32 {
        self.target.height
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba8) {
        let Some((x0, y0, w, h)) = rect.clip_to(self.target.width, self.target.height) else {
            return;
        };
        let px = color.to_premul();
        let stride = self.target.width as usize * 4;
        for y in y0..y0 + h {
            let row = y as usize * stride;
            for x in x0..x0 + w {
                let idx = row + x as usize * 4;
                self.target.rgba8_premul[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    fn draw_image(&mut self, image: &DecodedImage, dest: PixelRect, flipped: bool) {
        if dest.width == 0 || dest.height == 0 {
            return;
        }
        let Some((x0, y0, w, h)) = dest.clip_to(self.target.width, self.target.height) else {
            return;
        };
        let src = self.scaled_variant(image, dest.width, dest.height, flipped);

        let dst_stride = self.target.width as usize * 4;
        let src_stride = dest.width as usize * 4;
        let sx0 = (i64::from(x0) - dest.x) as usize;
        let sy0 = (i64::from(y0) - dest.y) as usize;

        for row in 0..h as usize {
            let src_row = (sy0 + row) * src_stride + sx0 * 4;
            let dst_row = (y0 as usize + row) * dst_stride + x0 as usize * 4;
            for col in 0..w as usize {
                let s = src_row + col * 4;
                let d = dst_row + col * 4;
                let out = over_premul(
                    [
                        self.target.rgba8_premul[d],
                        self.target.rgba8_premul[d + 1],
                        self.target.rgba8_premul[d + 2],
                        self.target.rgba8_premul[d + 3],
                    ],
                    [src[s], src[s + 1], src[s + 2], src[s + 3]],
                );
                self.target.rgba8_premul[d..d + 4].copy_from_slice(&out);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
