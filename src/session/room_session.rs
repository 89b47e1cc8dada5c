use crate::{
    animation::export::{ExportSummary, RenderedCamera, export_animation},
    animation::preview::{PreviewAnimator, TickOutcome, TickScheduler},
    animation::step::{CameraAnimationStep, CameraParam, CameraTarget, default_sequence},
    assets::decode::{ImageCrateDecoder, ImageDecoder},
    assets::store::ImageSource,
    compose::canvas::RasterTexture,
    compose::wall::{TileSpec, WallTextureRequest, composite_wall_with},
    encode::sink::FrameEncoder,
    foundation::core::Rgba8,
    foundation::error::{TilewallError, TilewallResult},
    render::backend::{FrameRGBA, RoomRenderer},
    scene::camera::{CameraParams, CameraRig},
    scene::room::{
        FloorSpec, Lighting, RoomDimensions, RoomFace, RoomPalette, RoomScene, RoomSceneRequest,
        SceneSink, build_room_scene_with,
    },
    session::config::RoomConfig,
};

/// Stable handle of a wall tile row; survives removal of other rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileRowId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct TileRow {
    pub id: TileRowId,
    pub image: Option<ImageSource>,
    pub rows: u32,
    pub flipped: bool,
}

/// Everything one room visualizer instance owns.
///
/// Edits that change wall or floor pixels mark the scene dirty; [`RoomSession::regenerate`]
/// rebuilds it. Camera edits only request a render.
pub struct RoomSession {
    room: RoomDimensions,
    rows: Vec<TileRow>,
    next_row_id: u64,
    grout_gap_px: u32,
    palette: RoomPalette,
    floor: FloorSpec,
    brightness: f64,
    rig: CameraRig,
    steps: Vec<CameraAnimationStep>,
    preview: PreviewAnimator,
    scene: Option<RoomScene>,
    dirty: bool,
    decoder: Box<dyn ImageDecoder>,
}

impl Default for RoomSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoomSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomSession")
            .field("room", &self.room)
            .field("rows", &self.rows.len())
            .field("grout_gap_px", &self.grout_gap_px)
            .field("brightness", &self.brightness)
            .field("camera", &self.rig.params)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl RoomSession {
    pub fn new() -> Self {
        let room = RoomDimensions::default();
        Self {
            room,
            rows: Vec::new(),
            next_row_id: 0,
            grout_gap_px: 1,
            palette: RoomPalette::default(),
            floor: FloorSpec::default(),
            brightness: 1.0,
            rig: CameraRig::new(room, CameraParams::default()),
            steps: default_sequence(),
            preview: PreviewAnimator::new(),
            scene: None,
            dirty: true,
            decoder: Box::new(ImageCrateDecoder),
        }
    }

    pub fn from_config(cfg: &RoomConfig) -> TilewallResult<Self> {
        cfg.room.validate()?;
        let mut session = Self::new();
        session.room = cfg.room;
        session.grout_gap_px = cfg.grout_gap_px;
        session.palette = cfg.palette;
        session.floor = FloorSpec {
            image: cfg.floor.image.clone().map(ImageSource::file),
            tile_size: cfg.floor.tile_size,
        };
        session.brightness = check_brightness(cfg.brightness)?;
        session.rig = CameraRig::new(cfg.room, cfg.camera);
        session.steps = cfg.animation_steps();
        for row in &cfg.wall_tiles {
            let id = session.add_tile_row(row.image.clone().map(ImageSource::file), row.rows)?;
            session.set_tile_flipped(id, row.flipped)?;
        }
        Ok(session)
    }

    pub fn with_decoder(mut self, decoder: Box<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self.dirty = true;
        self
    }

    pub fn room(&self) -> RoomDimensions {
        self.room
    }

    pub fn set_room(&mut self, room: RoomDimensions) -> TilewallResult<()> {
        room.validate()?;
        self.room = room;
        self.rig.room = room;
        self.rig.request_render();
        self.dirty = true;
        Ok(())
    }

    pub fn tile_rows(&self) -> &[TileRow] {
        &self.rows
    }

    /// Wall tile list in entry order, as the compositor consumes it.
    pub fn tile_specs(&self) -> Vec<TileSpec> {
        self.rows
            .iter()
            .map(|r| TileSpec {
                image: r.image.clone(),
                rows: r.rows,
                flipped: r.flipped,
            })
            .collect()
    }

    /// Append a row below the existing ones. `rows` must be at least 1.
    pub fn add_tile_row(
        &mut self,
        image: Option<ImageSource>,
        rows: u32,
    ) -> TilewallResult<TileRowId> {
        check_row_count(rows)?;
        self.next_row_id += 1;
        let id = TileRowId(self.next_row_id);
        self.rows.push(TileRow {
            id,
            image,
            rows,
            flipped: false,
        });
        self.dirty = true;
        Ok(id)
    }

    /// Returns whether a row was removed.
    pub fn remove_tile_row(&mut self, id: TileRowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        let removed = self.rows.len() != before;
        self.dirty |= removed;
        removed
    }

    pub fn set_tile_rows(&mut self, id: TileRowId, rows: u32) -> TilewallResult<()> {
        check_row_count(rows)?;
        self.row_mut(id)?.rows = rows;
        self.dirty = true;
        Ok(())
    }

    pub fn set_tile_flipped(&mut self, id: TileRowId, flipped: bool) -> TilewallResult<()> {
        self.row_mut(id)?.flipped = flipped;
        self.dirty = true;
        Ok(())
    }

    pub fn set_tile_image(
        &mut self,
        id: TileRowId,
        image: Option<ImageSource>,
    ) -> TilewallResult<()> {
        self.row_mut(id)?.image = image;
        self.dirty = true;
        Ok(())
    }

    pub fn grout_gap_px(&self) -> u32 {
        self.grout_gap_px
    }

    pub fn set_grout_gap(&mut self, px: u32) {
        if px != self.grout_gap_px {
            self.grout_gap_px = px;
            self.dirty = true;
        }
    }

    pub fn set_palette(&mut self, palette: RoomPalette) {
        self.palette = palette;
        self.dirty = true;
    }

    pub fn set_ceiling_color(&mut self, color: Rgba8) {
        self.palette.ceiling = color;
        self.dirty = true;
    }

    pub fn set_floor_image(&mut self, image: Option<ImageSource>) {
        self.floor.image = image;
        self.dirty = true;
    }

    pub fn set_floor_tile_size(&mut self, tile_size: f64) -> TilewallResult<()> {
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(TilewallError::validation(format!(
                "floor tile size must be positive, got {tile_size}"
            )));
        }
        self.floor.tile_size = tile_size;
        self.dirty = true;
        Ok(())
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    /// Relight immediately; no texture work is needed.
    pub fn set_brightness(
        &mut self,
        brightness: f64,
        sink: &mut dyn SceneSink,
    ) -> TilewallResult<()> {
        self.brightness = check_brightness(brightness)?;
        let lighting = Lighting::from_brightness(brightness);
        if let Some(scene) = self.scene.as_mut() {
            scene.lighting = lighting;
        }
        sink.set_lighting(lighting);
        self.rig.request_render();
        Ok(())
    }

    pub fn camera(&self) -> &CameraRig {
        &self.rig
    }

    pub fn set_camera_param(&mut self, param: CameraParam, value: f64) {
        self.rig.set_param(param, value);
        self.rig.request_render();
    }

    pub fn animation_steps(&self) -> &[CameraAnimationStep] {
        &self.steps
    }

    pub fn set_animation_steps(&mut self, steps: Vec<CameraAnimationStep>) {
        self.steps = steps;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn scene(&self) -> Option<&RoomScene> {
        self.scene.as_ref()
    }

    /// Rebuild the scene and hand it to `sink` when an edit made it stale (or `force`).
    ///
    /// Returns whether a new scene was applied.
    pub fn regenerate(&mut self, sink: &mut dyn SceneSink, force: bool) -> TilewallResult<bool> {
        if !force && !self.dirty && self.scene.is_some() {
            return Ok(false);
        }
        let request = RoomSceneRequest {
            room: self.room,
            wall_tiles: self.tile_specs(),
            grout_gap_px: self.grout_gap_px,
            palette: self.palette,
            floor: self.floor.clone(),
            brightness: self.brightness,
        };
        let scene = build_room_scene_with(&request, &*self.decoder)?;
        scene.present(sink, self.scene.as_ref());
        self.scene = Some(scene);
        self.dirty = false;
        self.rig.request_render();
        Ok(true)
    }

    /// Composite a single wall texture without touching the scene.
    pub fn wall_texture(&self, face: RoomFace) -> TilewallResult<RasterTexture> {
        let wall_width = match face {
            RoomFace::Back | RoomFace::Front => self.room.width,
            RoomFace::Left | RoomFace::Right => self.room.length,
            RoomFace::Ceiling | RoomFace::Floor => {
                return Err(TilewallError::validation(format!(
                    "{} is not a tiled wall",
                    face.as_str()
                )));
            }
        };
        let request = WallTextureRequest {
            wall_width,
            wall_height: self.room.height,
            tiles: self.tile_specs(),
            grout_gap_px: self.grout_gap_px,
            grout_color: self.palette.wall,
        };
        composite_wall_with(&request, &*self.decoder)
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_active()
    }

    /// Start the camera walkthrough. No-op (returns `false`) while one is running.
    pub fn start_preview(
        &mut self,
        scheduler: &mut dyn TickScheduler,
        on_finish: Option<Box<dyn FnOnce()>>,
    ) -> bool {
        let steps = self.steps.clone();
        self.preview.start(steps, on_finish, scheduler, &mut self.rig)
    }

    pub fn preview_tick(&mut self, now_ms: f64, scheduler: &mut dyn TickScheduler) -> TickOutcome {
        self.preview.on_tick(now_ms, scheduler, &mut self.rig)
    }

    pub fn stop_preview(&mut self, scheduler: &mut dyn TickScheduler) {
        self.preview.stop(scheduler);
    }

    /// Split borrow used by real-time drivers.
    pub fn preview_parts(&mut self) -> (&mut PreviewAnimator, &mut CameraRig) {
        (&mut self.preview, &mut self.rig)
    }

    /// Bring `renderer` up to date and render the current camera.
    pub fn render_still<R: RoomRenderer>(&mut self, renderer: &mut R) -> TilewallResult<FrameRGBA> {
        self.regenerate(renderer, false)?;
        self.rig.take_render_requests();
        renderer.render_frame(&self.rig.pose())
    }

    /// Export the walkthrough frame by frame. Camera parameters end at the last step's values.
    pub fn export_animation<R: RoomRenderer>(
        &mut self,
        renderer: &mut R,
        encoder: &mut dyn FrameEncoder,
        progress: impl FnMut(f64),
    ) -> TilewallResult<ExportSummary> {
        if self.preview.is_active() {
            return Err(TilewallError::validation(
                "cannot export while a preview is running",
            ));
        }
        self.regenerate(renderer, false)?;
        let mut stage = RenderedCamera {
            rig: &mut self.rig,
            renderer: &*renderer,
        };
        export_animation(&self.steps, &mut stage, encoder, progress)
    }

    fn row_mut(&mut self, id: TileRowId) -> TilewallResult<&mut TileRow> {
        self.rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TilewallError::validation(format!("unknown tile row {}", id.0)))
    }
}

fn check_row_count(rows: u32) -> TilewallResult<()> {
    if rows == 0 {
        return Err(TilewallError::validation("tile row count must be at least 1"));
    }
    Ok(())
}

fn check_brightness(brightness: f64) -> TilewallResult<f64> {
    if !(brightness.is_finite() && brightness >= 0.0) {
        return Err(TilewallError::validation(format!(
            "brightness must be a non-negative number, got {brightness}"
        )));
    }
    Ok(brightness)
}

#[cfg(test)]
#[path = "../../tests/unit/session/room_session.rs"]
mod tests;
