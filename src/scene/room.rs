use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    assets::decode::ImageDecoder,
    assets::store::{DecodedImageSet, ImageSource},
    compose::canvas::RasterTexture,
    compose::wall::{TileSpec, WallTextureRequest, composite_wall},
    foundation::core::Rgba8,
    foundation::error::{TilewallError, TilewallResult},
    foundation::math::Vec3,
};

/// Interior box size in room units, centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDimensions {
    pub width: f64,
    pub height: f64,
    pub length: f64,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 7.0,
            length: 8.0,
        }
    }
}

impl RoomDimensions {
    pub fn validate(&self) -> TilewallResult<()> {
        for (name, v) in [
            ("width", self.width),
            ("height", self.height),
            ("length", self.length),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(TilewallError::validation(format!(
                    "room {name} must be positive, got {v}"
                )));
            }
        }
        Ok(())
    }

    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width / 2.0, self.height / 2.0, self.length / 2.0)
    }
}

/// Inner faces of the room box, in mesh material order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomFace {
    Right,
    Left,
    Ceiling,
    Floor,
    Front,
    Back,
}

impl RoomFace {
    pub const ALL: [RoomFace; 6] = [
        RoomFace::Right,
        RoomFace::Left,
        RoomFace::Ceiling,
        RoomFace::Floor,
        RoomFace::Front,
        RoomFace::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Right => "right",
            Self::Left => "left",
            Self::Ceiling => "ceiling",
            Self::Floor => "floor",
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// Unit normal pointing into the room.
    pub fn inward_normal(self) -> Vec3 {
        match self {
            Self::Right => Vec3::new(-1.0, 0.0, 0.0),
            Self::Left => Vec3::new(1.0, 0.0, 0.0),
            Self::Ceiling => Vec3::new(0.0, -1.0, 0.0),
            Self::Floor => Vec3::new(0.0, 1.0, 0.0),
            Self::Front => Vec3::new(0.0, 0.0, -1.0),
            Self::Back => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Texture stretched over a face `repeat_u × repeat_v` times.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceTexture {
    pub texture: Arc<RasterTexture>,
    pub repeat_u: f64,
    pub repeat_v: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FaceMaterial {
    Color(Rgba8),
    Texture(FaceTexture),
}

impl FaceMaterial {
    pub fn is_textured(&self) -> bool {
        matches!(self, Self::Texture(_))
    }
}

/// Ambient plus one point light, scaled by the brightness control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: f64,
    pub point: f64,
    pub point_position: Vec3,
}

impl Lighting {
    pub fn from_brightness(brightness: f64) -> Self {
        Self {
            ambient: 0.6 * brightness,
            point: 0.8 * brightness,
            point_position: Vec3::new(0.0, 2.0, 2.0),
        }
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::from_brightness(1.0)
    }
}

/// Floor image tiled every `tile_size` room units.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorSpec {
    pub image: Option<ImageSource>,
    pub tile_size: f64,
}

impl Default for FloorSpec {
    fn default() -> Self {
        Self {
            image: None,
            tile_size: 1.0,
        }
    }
}

/// Plain colors used wherever no texture applies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomPalette {
    /// Grout fill and untextured wall color.
    pub wall: Rgba8,
    pub floor: Rgba8,
    pub ceiling: Rgba8,
    pub background: Rgba8,
}

impl Default for RoomPalette {
    fn default() -> Self {
        Self {
            wall: Rgba8::from_hex_u32(0xcccccc),
            floor: Rgba8::from_hex_u32(0x636e72),
            ceiling: Rgba8::from_hex_u32(0xffffff),
            background: Rgba8::from_hex_u32(0x404040),
        }
    }
}

/// Receives face materials as a room scene is (re)built.
pub trait SceneSink {
    /// Drop whatever material is currently bound to `face`.
    fn release_face(&mut self, face: RoomFace);

    fn apply_face(&mut self, face: RoomFace, material: &FaceMaterial);

    fn set_room(&mut self, _room: RoomDimensions) {}

    fn set_lighting(&mut self, _lighting: Lighting) {}

    fn set_background(&mut self, _color: Rgba8) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    Released(RoomFace),
    Applied { face: RoomFace, textured: bool },
}

/// [`SceneSink`] that records every call; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSceneSink {
    pub events: Vec<SceneEvent>,
    pub faces: [Option<FaceMaterial>; 6],
    pub lighting: Option<Lighting>,
}

impl RecordingSceneSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn material(&self, face: RoomFace) -> Option<&FaceMaterial> {
        self.faces[face.index()].as_ref()
    }
}

impl SceneSink for RecordingSceneSink {
    fn release_face(&mut self, face: RoomFace) {
        self.faces[face.index()] = None;
        self.events.push(SceneEvent::Released(face));
    }

    fn apply_face(&mut self, face: RoomFace, material: &FaceMaterial) {
        self.faces[face.index()] = Some(material.clone());
        self.events.push(SceneEvent::Applied {
            face,
            textured: material.is_textured(),
        });
    }

    fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = Some(lighting);
    }
}

/// Inputs for one scene build.
#[derive(Clone, Debug)]
pub struct RoomSceneRequest {
    pub room: RoomDimensions,
    pub wall_tiles: Vec<TileSpec>,
    pub grout_gap_px: u32,
    pub palette: RoomPalette,
    pub floor: FloorSpec,
    pub brightness: f64,
}

impl RoomSceneRequest {
    /// Every image this request needs, walls first.
    pub fn image_sources(&self) -> impl Iterator<Item = &ImageSource> {
        self.wall_tiles
            .iter()
            .filter_map(|t| t.image.as_ref())
            .chain(self.floor.image.as_ref())
    }

    fn wall_request(&self, wall_width: f64) -> WallTextureRequest {
        WallTextureRequest {
            wall_width,
            wall_height: self.room.height,
            tiles: self.wall_tiles.clone(),
            grout_gap_px: self.grout_gap_px,
            grout_color: self.palette.wall,
        }
    }
}

/// Materials and lighting for all six faces.
#[derive(Clone, Debug, PartialEq)]
pub struct RoomScene {
    pub room: RoomDimensions,
    pub materials: [FaceMaterial; 6],
    pub lighting: Lighting,
    pub background: Rgba8,
}

impl RoomScene {
    pub fn material(&self, face: RoomFace) -> &FaceMaterial {
        &self.materials[face.index()]
    }

    /// Bind this scene to `sink`, releasing every face of `previous` first.
    pub fn present(&self, sink: &mut dyn SceneSink, previous: Option<&RoomScene>) {
        if previous.is_some() {
            for face in RoomFace::ALL {
                sink.release_face(face);
            }
        }
        sink.set_room(self.room);
        sink.set_background(self.background);
        sink.set_lighting(self.lighting);
        for face in RoomFace::ALL {
            sink.apply_face(face, self.material(face));
        }
    }
}

/// Decode everything the request references, then build the scene.
pub fn build_room_scene_with<D>(request: &RoomSceneRequest, decoder: &D) -> TilewallResult<RoomScene>
where
    D: ImageDecoder + ?Sized,
{
    let images = DecodedImageSet::decode_all(request.image_sources(), decoder);
    build_room_scene(request, &images)
}

/// Build materials for every face from already decoded images.
///
/// The back wall spans the room width, the side walls its length; both side walls share one
/// texture.
pub fn build_room_scene(
    request: &RoomSceneRequest,
    images: &DecodedImageSet,
) -> TilewallResult<RoomScene> {
    request.room.validate()?;
    let palette = request.palette;
    let plain_wall = FaceMaterial::Color(palette.wall);

    let has_wall_images = request.wall_tiles.iter().any(|t| !t.is_inert());
    let (back, side) = if has_wall_images {
        let back_req = request.wall_request(request.room.width);
        let side_req = request.wall_request(request.room.length);
        let (back, side) = rayon::join(
            || composite_wall(&back_req, images),
            || composite_wall(&side_req, images),
        );
        (
            FaceMaterial::Texture(FaceTexture {
                texture: Arc::new(back?),
                repeat_u: 1.0,
                repeat_v: 1.0,
            }),
            FaceMaterial::Texture(FaceTexture {
                texture: Arc::new(side?),
                repeat_u: 1.0,
                repeat_v: 1.0,
            }),
        )
    } else {
        (plain_wall.clone(), plain_wall.clone())
    };

    let floor = floor_material(request, images)?;

    // Mesh order: right, left, ceiling, floor, front, back.
    let materials = [
        side.clone(),
        side,
        FaceMaterial::Color(palette.ceiling),
        floor,
        plain_wall,
        back,
    ];

    tracing::debug!(
        textured_walls = has_wall_images,
        textured_floor = materials[RoomFace::Floor.index()].is_textured(),
        "room scene built"
    );

    Ok(RoomScene {
        room: request.room,
        materials,
        lighting: Lighting::from_brightness(request.brightness),
        background: palette.background,
    })
}

fn floor_material(
    request: &RoomSceneRequest,
    images: &DecodedImageSet,
) -> TilewallResult<FaceMaterial> {
    let plain = FaceMaterial::Color(request.palette.floor);
    let Some(source) = request.floor.image.as_ref() else {
        return Ok(plain);
    };
    let tile_size = request.floor.tile_size;
    if !(tile_size.is_finite() && tile_size > 0.0) {
        return Err(TilewallError::validation(format!(
            "floor tile size must be positive, got {tile_size}"
        )));
    }
    let Some(image) = images.get(source) else {
        tracing::warn!(source = %source.key(), "floor image unavailable; using floor color");
        return Ok(plain);
    };
    Ok(FaceMaterial::Texture(FaceTexture {
        texture: Arc::new(RasterTexture::from_decoded(image)),
        repeat_u: request.room.width / tile_size,
        repeat_v: request.room.length / tile_size,
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/room.rs"]
mod tests;
