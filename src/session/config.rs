use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    animation::step::{CameraAnimationStep, default_sequence},
    foundation::error::{TilewallError, TilewallResult},
    scene::camera::CameraParams,
    scene::room::{RoomDimensions, RoomPalette},
};

/// One user-entered wall tile row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileRowConfig {
    pub image: Option<PathBuf>,
    pub rows: u32,
    pub flipped: bool,
}

impl Default for TileRowConfig {
    fn default() -> Self {
        Self {
            image: None,
            rows: 1,
            flipped: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub image: Option<PathBuf>,
    pub tile_size: f64,
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            image: None,
            tile_size: 1.0,
        }
    }
}

/// JSON description of a room. Every field is optional.
///
/// ```json
/// {
///   "room": { "width": 6, "height": 7, "length": 8 },
///   "wall_tiles": [ { "image": "tiles/border.png", "rows": 1 }, { "image": "tiles/base.png", "rows": 3 } ],
///   "grout_gap_px": 2,
///   "palette": { "wall": "#cccccc", "ceiling": "#ffffff" },
///   "floor": { "image": "floor.jpg", "tile_size": 2.0 },
///   "brightness": 1.2,
///   "camera": { "pan": 0, "zoom": 1, "tilt_deg": 0 }
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub room: RoomDimensions,
    /// Top-down, as entered; the last row lands at the bottom of each wall.
    pub wall_tiles: Vec<TileRowConfig>,
    pub grout_gap_px: u32,
    pub palette: RoomPalette,
    pub floor: FloorConfig,
    pub brightness: f64,
    pub camera: CameraParams,
    /// Camera walkthrough; the built-in sequence when absent.
    pub animation: Option<Vec<CameraAnimationStep>>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room: RoomDimensions::default(),
            wall_tiles: Vec::new(),
            grout_gap_px: 1,
            palette: RoomPalette::default(),
            floor: FloorConfig::default(),
            brightness: 1.0,
            camera: CameraParams::default(),
            animation: None,
        }
    }
}

impl RoomConfig {
    pub fn from_json_str(s: &str) -> TilewallResult<Self> {
        serde_json::from_str(s).map_err(|e| TilewallError::serde(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> TilewallResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TilewallError::serde(e.to_string()))
    }

    /// Read a config file; relative image paths resolve against the file's directory.
    pub fn load(path: &Path) -> TilewallResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let Some(base) = path.parent() {
            cfg.resolve_paths(base);
        }
        Ok(cfg)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for row in &mut self.wall_tiles {
            if let Some(p) = row.image.as_mut() {
                resolve(p);
            }
        }
        if let Some(p) = self.floor.image.as_mut() {
            resolve(p);
        }
    }

    pub fn animation_steps(&self) -> Vec<CameraAnimationStep> {
        self.animation.clone().unwrap_or_else(default_sequence)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
