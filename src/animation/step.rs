use serde::{Deserialize, Serialize};

use crate::{
    animation::ease::Ease,
    foundation::error::{TilewallError, TilewallResult},
};

/// Frames produced per step when exporting.
pub const EXPORT_FRAMES_PER_STEP: u32 = 60;

/// Camera scalar driven by an animation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraParam {
    Pan,
    Zoom,
    Tilt,
}

impl CameraParam {
    pub const ALL: [CameraParam; 3] = [CameraParam::Pan, CameraParam::Zoom, CameraParam::Tilt];

    /// Value every animation starts from, regardless of prior UI state.
    pub fn baseline(self) -> f64 {
        match self {
            Self::Pan => 0.0,
            Self::Zoom => 1.0,
            Self::Tilt => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Zoom => "zoom",
            Self::Tilt => "tilt",
        }
    }
}

/// One segment of a camera animation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraAnimationStep {
    pub param: CameraParam,
    pub from: f64,
    pub to: f64,
    /// Preview duration; export ignores it and uses [`EXPORT_FRAMES_PER_STEP`].
    pub duration_ms: u64,
}

impl CameraAnimationStep {
    pub fn new(param: CameraParam, from: f64, to: f64, duration_ms: u64) -> Self {
        Self {
            param,
            from,
            to,
            duration_ms,
        }
    }

    pub fn validate(&self) -> TilewallResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(TilewallError::invalid_step(format!(
                "{} step has non-numeric endpoints ({} -> {})",
                self.param.as_str(),
                self.from,
                self.to
            )));
        }
        Ok(())
    }

    /// Per-frame increment used by the export driver.
    pub fn export_increment(&self) -> f64 {
        (self.to - self.from) / f64::from(EXPORT_FRAMES_PER_STEP)
    }
}

/// Shared interpolation law: `from + (to - from) * ease(progress)`.
///
/// Progress 1 returns `to` exactly so completed steps never leave rounding residue behind.
pub fn interpolate(step: &CameraAnimationStep, progress: f64, ease: Ease) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    if t >= 1.0 {
        return step.to;
    }
    step.from + (step.to - step.from) * ease.apply(t)
}

/// The built-in walkthrough: pan left, zoom in, pan right, settle back.
pub fn default_sequence() -> Vec<CameraAnimationStep> {
    vec![
        CameraAnimationStep::new(CameraParam::Pan, 0.0, -2.0, 1500),
        CameraAnimationStep::new(CameraParam::Zoom, 1.0, 4.5, 1500),
        CameraAnimationStep::new(CameraParam::Pan, -2.0, 0.5, 1500),
        CameraAnimationStep::new(CameraParam::Zoom, 4.5, 2.0, 1500),
    ]
}

/// Something the animation drivers can push camera values into.
pub trait CameraTarget {
    fn set_param(&mut self, param: CameraParam, value: f64);

    /// Ask for a redraw after parameters changed.
    fn request_render(&mut self);
}

/// Push the baseline of every parameter driven by `steps` into `target`.
///
/// Parameters the sequence never touches keep whatever the user set.
pub(crate) fn reset_to_baseline(steps: &[CameraAnimationStep], target: &mut dyn CameraTarget) {
    for param in CameraParam::ALL {
        if steps.iter().any(|s| s.param == param) {
            target.set_param(param, param.baseline());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/step.rs"]
mod tests;
