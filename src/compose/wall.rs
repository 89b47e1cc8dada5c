use crate::{
    assets::decode::ImageDecoder,
    assets::store::{DecodedImageSet, ImageSource},
    compose::canvas::{PixelCanvas, RasterCanvas, RasterTexture},
    foundation::core::{PixelRect, Rgba8, SLOT_PX, TILE_UNIT_HEIGHT, TILE_UNIT_LENGTH},
    foundation::error::{TilewallError, TilewallResult},
};

/// One entry of the wall tile list.
///
/// Lists are ordered top-down as entered; the last entry is laid at the bottom of the wall.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSpec {
    pub image: Option<ImageSource>,
    pub rows: u32,
    pub flipped: bool,
}

impl TileSpec {
    pub fn new(image: ImageSource, rows: u32) -> Self {
        Self {
            image: Some(image),
            rows,
            flipped: false,
        }
    }

    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    /// Specs without an image or rows are skipped without consuming wall rows.
    pub fn is_inert(&self) -> bool {
        self.image.is_none() || self.rows == 0
    }
}

/// Slot grid covering one wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallGrid {
    pub tiles_per_row: u32,
    pub total_rows: u32,
}

impl WallGrid {
    pub fn for_wall(wall_width: f64, wall_height: f64) -> TilewallResult<Self> {
        if !(wall_width.is_finite() && wall_width > 0.0) {
            return Err(TilewallError::validation("wall width must be positive"));
        }
        if !(wall_height.is_finite() && wall_height > 0.0) {
            return Err(TilewallError::validation("wall height must be positive"));
        }
        let tiles_per_row = slot_count(wall_width / TILE_UNIT_LENGTH, "width")?;
        let total_rows = slot_count(wall_height / TILE_UNIT_HEIGHT, "height")?;
        let grid = Self {
            tiles_per_row,
            total_rows,
        };

        let bytes = u64::from(grid.texture_width())
            .checked_mul(u64::from(grid.texture_height()))
            .and_then(|px| px.checked_mul(4));
        match bytes {
            Some(b) if b <= MAX_WALL_TEXTURE_BYTES => Ok(grid),
            _ => Err(TilewallError::validation(format!(
                "wall texture {}x{} px exceeds {MAX_WALL_TEXTURE_BYTES} bytes",
                grid.texture_width(),
                grid.texture_height()
            ))),
        }
    }

    pub fn texture_width(self) -> u32 {
        self.tiles_per_row.saturating_mul(SLOT_PX)
    }

    pub fn texture_height(self) -> u32 {
        self.total_rows.saturating_mul(SLOT_PX)
    }
}

/// Largest wall texture edge in pixels.
pub const MAX_WALL_TEXTURE_DIM: u32 = 16_384;
/// Largest wall texture allocation (RGBA8) in bytes.
pub const MAX_WALL_TEXTURE_BYTES: u64 = 256 * 1024 * 1024;

/// Whole slots needed to cover `units`, bounded so the pixel edge fits [`MAX_WALL_TEXTURE_DIM`].
fn slot_count(units: f64, axis: &str) -> TilewallResult<u32> {
    let max_slots = MAX_WALL_TEXTURE_DIM / SLOT_PX;
    let slots = units.ceil();
    if slots > f64::from(max_slots) {
        return Err(TilewallError::validation(format!(
            "wall {axis} needs {slots} tiles; at most {max_slots} fit in one texture"
        )));
    }
    Ok(slots as u32)
}

/// Drawable tile edge in pixels once the grout gap is taken out of a slot. Never below 1.
pub fn cell_size(grout_gap_px: u32) -> u32 {
    SLOT_PX.saturating_sub(grout_gap_px).max(1)
}

/// Which spec fills one logical wall row (row 0 is the bottom).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowAssignment {
    pub row: u32,
    pub spec_index: usize,
    pub flipped: bool,
}

/// Assign wall rows bottom-up by walking `tiles` in reverse.
///
/// `is_drawable` decides whether a non-inert spec actually has pixels (a failed decode does not).
/// Rows past `total_rows` are dropped.
pub fn plan_wall_rows(
    tiles: &[TileSpec],
    total_rows: u32,
    mut is_drawable: impl FnMut(&TileSpec) -> bool,
) -> Vec<RowAssignment> {
    let mut out = Vec::with_capacity(total_rows as usize);
    let mut row = 0u32;

    for (spec_index, spec) in tiles.iter().enumerate().rev() {
        if row >= total_rows {
            break;
        }
        if spec.is_inert() || !is_drawable(spec) {
            continue;
        }
        for _ in 0..spec.rows {
            if row >= total_rows {
                break;
            }
            out.push(RowAssignment {
                row,
                spec_index,
                flipped: spec.flipped,
            });
            row += 1;
        }
    }
    out
}

/// Everything needed to build one wall texture.
#[derive(Clone, Debug)]
pub struct WallTextureRequest {
    pub wall_width: f64,
    pub wall_height: f64,
    pub tiles: Vec<TileSpec>,
    pub grout_gap_px: u32,
    pub grout_color: Rgba8,
}

/// Composite a wall from already decoded images.
#[tracing::instrument(skip(request, images), fields(tiles = request.tiles.len()))]
pub fn composite_wall(
    request: &WallTextureRequest,
    images: &DecodedImageSet,
) -> TilewallResult<RasterTexture> {
    let grid = WallGrid::for_wall(request.wall_width, request.wall_height)?;
    let mut canvas = PixelCanvas::new(grid.texture_width(), grid.texture_height());
    draw_wall(&mut canvas, grid, request, images);
    Ok(canvas.into_texture())
}

/// Decode the request's images (all-settled) and composite the wall.
pub fn composite_wall_with<D>(
    request: &WallTextureRequest,
    decoder: &D,
) -> TilewallResult<RasterTexture>
where
    D: ImageDecoder + ?Sized,
{
    let images = DecodedImageSet::decode_all(
        request.tiles.iter().filter_map(|t| t.image.as_ref()),
        decoder,
    );
    composite_wall(request, &images)
}

/// Paint grout and tiles for `grid` onto any [`RasterCanvas`].
pub fn draw_wall<C>(
    canvas: &mut C,
    grid: WallGrid,
    request: &WallTextureRequest,
    images: &DecodedImageSet,
) where
    C: RasterCanvas + ?Sized,
{
    let width = canvas.width();
    let height = canvas.height();
    canvas.fill_rect(PixelRect::new(0, 0, width, height), request.grout_color);

    let cell = cell_size(request.grout_gap_px);
    let half_gap = i64::from(request.grout_gap_px / 2);
    let slot = i64::from(SLOT_PX);

    let plan = plan_wall_rows(&request.tiles, grid.total_rows, |spec| {
        spec.image.as_ref().is_some_and(|src| images.get(src).is_some())
    });

    for assignment in &plan {
        let spec = &request.tiles[assignment.spec_index];
        let Some(img) = spec.image.as_ref().and_then(|src| images.get(src)) else {
            continue;
        };
        let row_y = i64::from(height) - (i64::from(assignment.row) + 1) * slot + half_gap;
        for col in 0..grid.tiles_per_row {
            let col_x = i64::from(col) * slot + half_gap;
            canvas.draw_image(
                img,
                PixelRect::new(col_x, row_y, cell, cell),
                assignment.flipped,
            );
        }
    }

    tracing::debug!(
        rows_drawn = plan.len(),
        total_rows = grid.total_rows,
        tiles_per_row = grid.tiles_per_row,
        "wall composited"
    );
}

#[cfg(test)]
#[path = "../../tests/unit/compose/wall.rs"]
mod tests;
