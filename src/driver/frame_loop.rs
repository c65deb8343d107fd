use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::PromoCopy;
use crate::draw::surface::Surface;
use crate::foundation::core::Timestamp;
use crate::foundation::error::ReelResult;
use crate::host::event_loop::{FrameRequestId, FrameScheduler};
use crate::scene::SceneFrame;
use crate::scene::compose::compose_frame;
use crate::timeline::model::Timeline;
use crate::timeline::playback::{PlaybackState, ProgressReadout};

/// Lifecycle of an [`AnimationLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// `start` has not been called.
    NotStarted,
    /// Frame callbacks are being requested.
    Running,
    /// Cancelled; no more callbacks will be requested.
    Stopped,
}

/// What a frame callback did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// First callback: origin recorded, nothing painted.
    Primed,
    /// A frame was painted at `progress`.
    Painted {
        /// Global progress of the painted frame.
        progress: f64,
    },
    /// The loop is not running; nothing painted or rescheduled.
    Stopped,
}

/// Cloneable cancellation flag observed by the loop at the next tick boundary.
#[derive(Clone, Debug, Default)]
pub struct LoopCancel(Arc<AtomicBool>);

impl LoopCancel {
    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Frame-synchronized driver: derives playback progress from callback timestamps and paints the
/// composed frame on each callback after the first.
///
/// The loop never stops by itself; past the end it keeps repainting the final frame.
#[derive(Debug)]
pub struct AnimationLoop {
    timeline: Timeline,
    copy: PromoCopy,
    state: LoopState,
    playback: PlaybackState,
    pending: Option<FrameRequestId>,
    cancel: LoopCancel,
    readout: ProgressReadout,
    ticks: u64,
}

impl AnimationLoop {
    /// Loop over `timeline`, drawing `copy`.
    pub fn new(timeline: Timeline, copy: PromoCopy) -> Self {
        Self {
            timeline,
            copy,
            state: LoopState::NotStarted,
            playback: PlaybackState::default(),
            pending: None,
            cancel: LoopCancel::default(),
            readout: ProgressReadout::new(),
            ticks: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Latest playback state.
    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// Timeline being played.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Frames painted so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Shared progress readout updated after every painted frame.
    pub fn readout(&self) -> ProgressReadout {
        self.readout.clone()
    }

    /// Token that stops the loop at its next callback.
    pub fn cancel_token(&self) -> LoopCancel {
        self.cancel.clone()
    }

    /// Begin requesting frame callbacks. Has no effect unless the loop is `NotStarted`.
    pub fn start(&mut self, sched: &mut dyn FrameScheduler) {
        if self.state != LoopState::NotStarted {
            return;
        }
        self.state = LoopState::Running;
        self.pending = Some(sched.request_frame());
        tracing::debug!("animation loop started");
    }

    /// Handle a frame callback at `now`.
    pub fn on_frame(
        &mut self,
        now: Timestamp,
        surface: &mut dyn Surface,
        sched: &mut dyn FrameScheduler,
    ) -> ReelResult<TickOutcome> {
        if self.state != LoopState::Running {
            return Ok(TickOutcome::Stopped);
        }
        self.pending = None;
        if self.cancel.is_cancelled() {
            self.stop();
            return Ok(TickOutcome::Stopped);
        }

        let primed = self.playback.is_primed();
        self.playback = self.playback.advance(now, &self.timeline);
        if !primed {
            tracing::debug!(origin_ms = now.ms(), "animation origin recorded");
            self.pending = Some(sched.request_frame());
            return Ok(TickOutcome::Primed);
        }

        let canvas = surface.canvas();
        let frame = SceneFrame::new(f64::from(canvas.width), f64::from(canvas.height), &self.copy);
        let progress = self.playback.global_progress;
        compose_frame(surface, &self.timeline, &frame, progress)?;
        self.readout.publish(&self.playback);
        self.ticks += 1;
        self.pending = Some(sched.request_frame());
        Ok(TickOutcome::Painted { progress })
    }

    /// Stop the loop and withdraw its pending frame request. Safe to call repeatedly.
    pub fn cancel(&mut self, sched: &mut dyn FrameScheduler) {
        self.cancel.cancel();
        if let Some(id) = self.pending.take() {
            sched.cancel_frame(id);
        }
        if self.state != LoopState::Stopped {
            self.stop();
        }
    }

    fn stop(&mut self) {
        self.state = LoopState::Stopped;
        tracing::debug!(ticks = self.ticks, "animation loop stopped");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/frame_loop.rs"]
mod tests;
