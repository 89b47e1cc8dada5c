use std::time::{Duration, Instant};

use crate::animation::{
    ease::Ease,
    step::{CameraAnimationStep, CameraParam, CameraTarget, interpolate, reset_to_baseline},
};

/// Handle to a tick requested from a [`TickScheduler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Display-refresh style scheduler: one callback per requested tick, cancellable.
pub trait TickScheduler {
    fn schedule_tick(&mut self) -> TickHandle;
    fn cancel_tick(&mut self, handle: TickHandle);
}

/// Scheduler holding at most one pending tick, pumped by an external loop or a test.
#[derive(Debug, Default)]
pub struct FramePump {
    next_id: u64,
    pending: Option<TickHandle>,
}

impl FramePump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Remove the pending tick so it can be delivered.
    pub fn take_pending(&mut self) -> Option<TickHandle> {
        self.pending.take()
    }
}

impl TickScheduler for FramePump {
    fn schedule_tick(&mut self) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Result of delivering one tick to a [`PreviewAnimator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The animator is not running; nothing happened.
    Idle,
    /// A value was pushed to the camera.
    Applied {
        step_index: usize,
        param: CameraParam,
        value: f64,
        progress: f64,
    },
    /// A malformed step was dropped.
    Skipped { step_index: usize },
    /// All steps completed; the completion callback ran.
    Finished,
}

/// Real-time, cancellable camera animation.
///
/// Time comes from the timestamps passed to [`PreviewAnimator::on_tick`], so tests can feed
/// synthetic clocks.
#[derive(Default)]
pub struct PreviewAnimator {
    active: bool,
    step_index: usize,
    steps: Vec<CameraAnimationStep>,
    step_start_ms: Option<f64>,
    pending: Option<TickHandle>,
    on_finish: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for PreviewAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewAnimator")
            .field("active", &self.active)
            .field("step_index", &self.step_index)
            .field("steps", &self.steps.len())
            .field("step_start_ms", &self.step_start_ms)
            .field("pending", &self.pending)
            .finish()
    }
}

impl PreviewAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending
    }

    /// Begin playing `steps`. Returns `false` (and changes nothing) when already running.
    pub fn start(
        &mut self,
        steps: Vec<CameraAnimationStep>,
        on_finish: Option<Box<dyn FnOnce()>>,
        scheduler: &mut dyn TickScheduler,
        target: &mut dyn CameraTarget,
    ) -> bool {
        if self.active {
            tracing::debug!("preview animation already active");
            return false;
        }
        tracing::debug!(steps = steps.len(), "starting preview animation");

        reset_to_baseline(&steps, target);
        target.request_render();

        self.steps = steps;
        self.step_index = 0;
        self.step_start_ms = None;
        self.on_finish = on_finish;
        self.active = true;
        self.pending = Some(scheduler.schedule_tick());
        true
    }

    /// Deliver one tick at `now_ms` (milliseconds on any monotonic clock).
    pub fn on_tick(
        &mut self,
        now_ms: f64,
        scheduler: &mut dyn TickScheduler,
        target: &mut dyn CameraTarget,
    ) -> TickOutcome {
        self.pending = None;
        if !self.active {
            return TickOutcome::Idle;
        }

        if self.step_index >= self.steps.len() {
            self.active = false;
            self.step_index = 0;
            self.step_start_ms = None;
            self.steps.clear();
            tracing::debug!("preview animation finished");
            if let Some(done) = self.on_finish.take() {
                done();
            }
            return TickOutcome::Finished;
        }

        let step_index = self.step_index;
        let step = self.steps[step_index];
        if let Err(error) = step.validate() {
            tracing::warn!(step_index, %error, "skipping animation step");
            self.advance();
            self.pending = Some(scheduler.schedule_tick());
            return TickOutcome::Skipped { step_index };
        }

        let start = *self.step_start_ms.get_or_insert(now_ms);
        let progress = if step.duration_ms == 0 {
            1.0
        } else {
            ((now_ms - start) / step.duration_ms as f64).clamp(0.0, 1.0)
        };
        let value = interpolate(&step, progress, Ease::InOutCubic);
        target.set_param(step.param, value);
        target.request_render();

        if progress >= 1.0 {
            self.advance();
        }
        self.pending = Some(scheduler.schedule_tick());

        TickOutcome::Applied {
            step_index,
            param: step.param,
            value,
            progress,
        }
    }

    /// Stop immediately without running the completion callback. Safe to call when idle.
    pub fn stop(&mut self, scheduler: &mut dyn TickScheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_tick(handle);
        }
        if self.active {
            tracing::debug!(step_index = self.step_index, "preview animation stopped");
        }
        self.active = false;
        self.step_index = 0;
        self.step_start_ms = None;
        self.steps.clear();
        self.on_finish = None;
    }

    fn advance(&mut self) {
        self.step_index += 1;
        self.step_start_ms = None;
    }
}

/// Drive `animator` in real time until it stops scheduling ticks.
///
/// Blocks the calling thread, sleeping `frame_interval` between ticks. Returns the number of
/// ticks delivered.
pub fn run_realtime(
    animator: &mut PreviewAnimator,
    pump: &mut FramePump,
    target: &mut dyn CameraTarget,
    frame_interval: Duration,
) -> u64 {
    let clock = Instant::now();
    let mut ticks = 0u64;
    while pump.take_pending().is_some() {
        std::thread::sleep(frame_interval);
        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        animator.on_tick(now_ms, pump, target);
        ticks += 1;
    }
    ticks
}

#[cfg(test)]
#[path = "../../tests/unit/animation/preview.rs"]
mod tests;
