//! Frame scheduling for the layout loop.
//!
//! The physics step stays synchronous; something outside decides when the
//! next one happens. A host wires `FrameScheduler` to its repaint signal,
//! tests use `ManualScheduler`.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag that invalidates every request made under it.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// The "request next frame" primitive.
pub trait FrameScheduler {
    /// Asks for one more frame. The frame must be skipped if `token` has been
    /// cancelled by the time it would run.
    fn request_step(&mut self, token: &CancelToken);
}

/// Owns the token of the loop currently in flight; at most one is live.
#[derive(Debug, Default)]
pub struct FrameLoop {
    token: Option<CancelToken>,
}

impl FrameLoop {
    /// Cancels any previous loop and starts a new one.
    pub fn arm(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel();
        let token = CancelToken::new();
        scheduler.request_step(&token);
        self.token = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Schedules the next frame of the live loop, if any.
    pub fn request_next(&self, scheduler: &mut dyn FrameScheduler) {
        if let Some(token) = self.token.as_ref().filter(|token| !token.is_cancelled()) {
            scheduler.request_step(token);
        }
    }
}

/// Turns wall-clock frame time into a whole number of fixed physics steps.
///
/// Forces and decay are tuned for about 60 steps per second, so a 144 Hz
/// display runs fewer steps per frame and a stalled frame catches up, up to a
/// cap.
#[derive(Clone, Copy, Debug)]
pub struct FixedStepClock {
    step_seconds: f32,
    max_steps_per_frame: usize,
    pending: f32,
}

impl FixedStepClock {
    pub fn new(steps_per_second: f32, max_steps_per_frame: usize) -> Self {
        let steps_per_second = if steps_per_second.is_finite() && steps_per_second > 0.0 {
            steps_per_second
        } else {
            60.0
        };
        Self {
            step_seconds: 1.0 / steps_per_second,
            max_steps_per_frame: max_steps_per_frame.max(1),
            pending: 0.0,
        }
    }

    pub fn advance(&mut self, frame_seconds: f32) -> usize {
        if frame_seconds.is_finite() && frame_seconds > 0.0 {
            self.pending += frame_seconds;
        }

        let due = (self.pending / self.step_seconds).floor() as usize;
        let steps = due.min(self.max_steps_per_frame);
        self.pending -= steps as f32 * self.step_seconds;
        if due > steps {
            // Drop the backlog instead of carrying it into later frames.
            self.pending = 0.0;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.pending = 0.0;
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(60.0, 4)
    }
}

/// Headless scheduler: holds the latest live request until `run_until_idle`
/// consumes it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: Option<CancelToken>,
    requests: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requests received, live or not.
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Removes the pending request; `true` when it was still live.
    pub fn take_pending(&mut self) -> bool {
        self.pending
            .take()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Runs `frame` for every live request, stopping once none is pending or
    /// after `max_frames`. Returns the number of frames run.
    pub fn run_until_idle<F>(&mut self, max_frames: usize, mut frame: F) -> usize
    where
        F: FnMut(&mut Self),
    {
        let mut frames = 0;
        while frames < max_frames && self.take_pending() {
            frame(self);
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_step(&mut self, token: &CancelToken) {
        self.requests += 1;
        self.pending = Some(token.clone());
    }
}
