use crate::{
    foundation::error::{TilewallError, TilewallResult},
    scene::camera::CameraPose,
    scene::room::SceneSink,
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**; the room renderer always produces opaque pixels, so the
/// flag matters only for frames built elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha image for writing to disk.
    pub fn to_rgba_image(&self) -> TilewallResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            crate::foundation::math::unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| TilewallError::validation("frame buffer does not match its size"))
    }
}

/// Output size of rendered frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

impl RenderSettings {
    pub fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    pub fn validate(&self) -> TilewallResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TilewallError::validation(
                "render width/height must be non-zero",
            ));
        }
        Ok(())
    }
}

/// A scene target that can draw what was applied to it from a camera pose.
pub trait RoomRenderer: SceneSink {
    fn settings(&self) -> RenderSettings;

    fn render_frame(&self, pose: &CameraPose) -> TilewallResult<FrameRGBA>;
}
