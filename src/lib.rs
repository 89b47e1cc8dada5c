//! Tilewall builds tiled room walls and walks a camera through them.
//!
//! The crate is organised around a [`RoomSession`]:
//!
//! - Describe walls as an ordered list of tile rows and composite them into textures
//!   ([`composite_wall`]); the last row entered lands at the bottom of each wall
//! - Build a [`RoomScene`] and hand its face materials to any [`SceneSink`]
//! - Move the camera in real time with a [`PreviewAnimator`], or frame by frame with
//!   [`export_animation`] into a [`FrameEncoder`] (GIF or MP4)
//! - Render stills and animations on the CPU with [`SoftwareRoomRenderer`]
#![forbid(unsafe_code)]

mod animation;
mod assets;
mod compose;
mod encode;
mod foundation;
mod render;
mod scene;
mod session;

pub use crate::foundation::core::{PixelRect, Rgba8, SLOT_PX, TILE_UNIT_HEIGHT, TILE_UNIT_LENGTH};
pub use crate::foundation::error::{TilewallError, TilewallResult};
pub use crate::foundation::math::Vec3;

pub use crate::assets::decode::{DecodedImage, ImageCrateDecoder, ImageDecoder, ImageId, decode_image};
pub use crate::assets::store::{DecodeFailure, DecodedImageSet, ImageSource};

pub use crate::compose::canvas::{PixelCanvas, RasterCanvas, RasterTexture};
pub use crate::compose::wall::{
    MAX_WALL_TEXTURE_BYTES, MAX_WALL_TEXTURE_DIM, RowAssignment, TileSpec, WallGrid,
    WallTextureRequest, cell_size, composite_wall, composite_wall_with, draw_wall,
    plan_wall_rows,
};

pub use crate::animation::ease::Ease;
pub use crate::animation::export::{
    ExportFrame, ExportStage, ExportStepper, ExportSummary, RenderedCamera, expected_frames,
    export_animation,
};
pub use crate::animation::preview::{
    FramePump, PreviewAnimator, TickHandle, TickOutcome, TickScheduler, run_realtime,
};
pub use crate::animation::step::{
    CameraAnimationStep, CameraParam, CameraTarget, EXPORT_FRAMES_PER_STEP, default_sequence,
    interpolate,
};

pub use crate::scene::camera::{CAMERA_FOV_Y_DEG, CameraParams, CameraPose, CameraRig};
pub use crate::scene::room::{
    FaceMaterial, FaceTexture, FloorSpec, Lighting, RecordingSceneSink, RoomDimensions, RoomFace,
    RoomPalette, RoomScene, RoomSceneRequest, SceneEvent, SceneSink, build_room_scene,
    build_room_scene_with,
};

pub use crate::render::backend::{FrameRGBA, RenderSettings, RoomRenderer};
pub use crate::render::cpu::SoftwareRoomRenderer;

pub use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegEncoderOpts, is_ffmpeg_on_path};
pub use crate::encode::gif::GifEncoderSink;
pub use crate::encode::sink::{
    EXPORT_FRAME_DELAY_MS, EncoderConfig, FrameEncoder, InMemoryEncoder, encoder_for_path,
};
pub use crate::encode::still::{JPEG_QUALITY, write_still};

pub use crate::session::config::{FloorConfig, RoomConfig, TileRowConfig};
pub use crate::session::room_session::{RoomSession, TileRow, TileRowId};
