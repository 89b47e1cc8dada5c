use crate::{
    animation::step::{
        CameraAnimationStep, CameraParam, CameraTarget, EXPORT_FRAMES_PER_STEP, reset_to_baseline,
    },
    encode::sink::{EncoderConfig, FrameEncoder},
    foundation::error::TilewallResult,
    render::backend::{FrameRGBA, RoomRenderer},
    scene::camera::CameraRig,
};

/// Camera value for one exported frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportFrame {
    pub step_index: usize,
    pub param: CameraParam,
    pub value: f64,
}

/// Deterministic, count-based walk over a step sequence.
///
/// Each step starts at `from` and adds `(to - from) / 60` per frame, clamping to `to` once it is
/// reached or passed. The 60th frame of a step is always exactly `to`. Steps with non-finite
/// endpoints are logged and skipped.
#[derive(Clone, Debug)]
pub struct ExportStepper<'a> {
    steps: &'a [CameraAnimationStep],
    step_index: usize,
    value: f64,
    increment: f64,
    frame_in_step: u32,
    in_step: bool,
    skipped: usize,
}

impl<'a> ExportStepper<'a> {
    pub fn new(steps: &'a [CameraAnimationStep]) -> Self {
        Self {
            steps,
            step_index: 0,
            value: 0.0,
            increment: 0.0,
            frame_in_step: 0,
            in_step: false,
            skipped: 0,
        }
    }

    /// Steps dropped so far because of invalid data.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl Iterator for ExportStepper<'_> {
    type Item = ExportFrame;

    fn next(&mut self) -> Option<ExportFrame> {
        loop {
            let step = self.steps.get(self.step_index)?;
            if !self.in_step {
                if let Err(error) = step.validate() {
                    tracing::warn!(step_index = self.step_index, %error, "skipping export step");
                    self.skipped += 1;
                    self.step_index += 1;
                    continue;
                }
                self.value = step.from;
                self.increment = step.export_increment();
                self.frame_in_step = 0;
                self.in_step = true;
            }

            let step_index = self.step_index;
            self.value += self.increment;
            self.frame_in_step += 1;

            let reached = (self.increment < 0.0 && self.value <= step.to)
                || (self.increment > 0.0 && self.value >= step.to);
            if reached || self.frame_in_step >= EXPORT_FRAMES_PER_STEP {
                self.value = step.to;
                self.step_index += 1;
                self.in_step = false;
            }

            return Some(ExportFrame {
                step_index,
                param: step.param,
                value: self.value,
            });
        }
    }
}

/// Upper bound on frames an export of `steps` produces.
pub fn expected_frames(steps: &[CameraAnimationStep]) -> u64 {
    let valid = steps.iter().filter(|s| s.validate().is_ok()).count() as u64;
    valid * u64::from(EXPORT_FRAMES_PER_STEP)
}

/// Something that can be posed and photographed frame by frame.
pub trait ExportStage: CameraTarget {
    fn frame_size(&self) -> (u32, u32);

    fn capture(&mut self) -> TilewallResult<FrameRGBA>;
}

/// A camera rig rendered through a [`RoomRenderer`].
pub struct RenderedCamera<'a, R: RoomRenderer + ?Sized> {
    pub rig: &'a mut CameraRig,
    pub renderer: &'a R,
}

impl<R: RoomRenderer + ?Sized> CameraTarget for RenderedCamera<'_, R> {
    fn set_param(&mut self, param: CameraParam, value: f64) {
        self.rig.set_param(param, value);
    }

    fn request_render(&mut self) {
        self.rig.request_render();
    }
}

impl<R: RoomRenderer + ?Sized> ExportStage for RenderedCamera<'_, R> {
    fn frame_size(&self) -> (u32, u32) {
        let s = self.renderer.settings();
        (s.width, s.height)
    }

    fn capture(&mut self) -> TilewallResult<FrameRGBA> {
        self.rig.take_render_requests();
        self.renderer.render_frame(&self.rig.pose())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub frames: u64,
    pub skipped_steps: usize,
}

/// Render every export frame of `steps` and feed it to `encoder`.
///
/// Each frame is handed to the encoder before the next camera value is applied. `progress`
/// receives values in `0..=1`, ending with exactly `1.0` after the encoder finished.
#[tracing::instrument(skip_all, fields(steps = steps.len()))]
pub fn export_animation(
    steps: &[CameraAnimationStep],
    stage: &mut dyn ExportStage,
    encoder: &mut dyn FrameEncoder,
    mut progress: impl FnMut(f64),
) -> TilewallResult<ExportSummary> {
    reset_to_baseline(steps, stage);

    let (width, height) = stage.frame_size();
    encoder.begin(EncoderConfig::new(width, height))?;

    let expected = expected_frames(steps).max(1) as f64;
    let mut stepper = ExportStepper::new(steps);
    let mut frames = 0u64;
    for frame in stepper.by_ref() {
        stage.set_param(frame.param, frame.value);
        stage.request_render();
        let image = stage.capture()?;
        encoder.add_frame(&image)?;
        frames += 1;
        tracing::trace!(
            step_index = frame.step_index,
            param = frame.param.as_str(),
            value = frame.value,
            "export frame"
        );
        progress((frames as f64 / expected).min(1.0));
    }

    encoder.finish()?;
    progress(1.0);

    let summary = ExportSummary {
        frames,
        skipped_steps: stepper.skipped(),
    };
    tracing::debug!(frames, skipped = summary.skipped_steps, "export finished");
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/export.rs"]
mod tests;
