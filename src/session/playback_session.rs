use crate::capture::pipeline::{CaptureArtifact, CapturePipeline, CaptureState};
use crate::capture::recorder::Recorder;
use crate::config::ReelConfig;
use crate::draw::surface::Surface;
use crate::driver::frame_loop::{AnimationLoop, LoopState, TickOutcome};
use crate::foundation::core::{Fps, Timestamp};
use crate::foundation::error::{ReelError, ReelResult};
use crate::host::event_loop::{EventLoop, HostEvent};
use crate::render::frame::FrameSource;
use crate::timeline::model::Timeline;
use crate::timeline::playback::ProgressSnapshot;

/// Plays the promo on a surface and optionally captures it.
///
/// Animation and capture are cancelled independently: stopping one leaves the other running.
#[derive(Debug)]
pub struct PlaybackSession<S, R>
where
    S: Surface + FrameSource,
    R: Recorder,
{
    events: EventLoop,
    animation: AnimationLoop,
    capture: CapturePipeline<R>,
    surface: S,
    fps: Fps,
    duration_ms: f64,
    capture_on_origin: bool,
}

impl<S, R> PlaybackSession<S, R>
where
    S: Surface + FrameSource,
    R: Recorder,
{
    /// Session over the promo timeline described by `config`.
    pub fn new(config: &ReelConfig, surface: S, recorder: R) -> ReelResult<Self> {
        config.validate()?;
        let fps = config.fps()?;
        let timeline = Timeline::promo(config.duration_ms, fps)?;
        Self::with_timeline(config, timeline, surface, recorder)
    }

    /// Session over a custom `timeline`.
    pub fn with_timeline(
        config: &ReelConfig,
        timeline: Timeline,
        surface: S,
        recorder: R,
    ) -> ReelResult<Self> {
        let fps = timeline.fps();
        let duration_ms = timeline.duration_ms();
        let capture = CapturePipeline::new(recorder, surface.frame_size())
            .with_bitrate(config.video_bits_per_second)
            .with_guard_ms(config.capture_guard_ms)
            .with_artifact_stem(config.artifact_stem.clone());
        Ok(Self {
            events: EventLoop::from_config(config)?,
            animation: AnimationLoop::new(timeline, config.copy.clone()),
            capture,
            surface,
            fps,
            duration_ms,
            capture_on_origin: false,
        })
    }

    /// Begin playback.
    pub fn start_playback(&mut self) {
        self.animation.start(&mut self.events);
    }

    /// Stop playback. Capture is unaffected.
    pub fn cancel_playback(&mut self) {
        self.animation.cancel(&mut self.events);
    }

    /// Animation loop state.
    pub fn playback_state(&self) -> LoopState {
        self.animation.state()
    }

    /// Latest published progress.
    pub fn progress(&self) -> ProgressSnapshot {
        self.animation.readout().snapshot()
    }

    /// Current virtual time.
    pub fn now(&self) -> Timestamp {
        self.events.now()
    }

    /// Drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Capture pipeline.
    pub fn capture(&self) -> &CapturePipeline<R> {
        &self.capture
    }

    /// Start a capture session now.
    pub fn start_capture(&mut self) -> ReelResult<()> {
        let now = self.events.now();
        self.capture
            .start(now, self.fps, self.duration_ms, &mut self.events)
    }

    /// Finalize the running capture session.
    pub fn stop_capture(&mut self) -> ReelResult<()> {
        self.capture.stop(&mut self.events)
    }

    /// Abandon the running capture session.
    pub fn cancel_capture(&mut self) {
        self.capture.cancel(&mut self.events);
    }

    /// Current capture state.
    pub fn capture_state(&self) -> CaptureState {
        self.capture.state()
    }

    /// Artifact of the latest completed capture.
    pub fn artifact(&self) -> Option<&CaptureArtifact> {
        self.capture.artifact()
    }

    /// Dispatch one host event. Returns `None` when nothing is scheduled.
    pub fn step(&mut self) -> ReelResult<Option<HostEvent>> {
        let Some(event) = self.events.next_event() else {
            return Ok(None);
        };
        match event {
            HostEvent::Frame(ts) => {
                match self
                    .animation
                    .on_frame(ts, &mut self.surface, &mut self.events)?
                {
                    TickOutcome::Primed if self.capture_on_origin => {
                        self.capture_on_origin = false;
                        self.capture
                            .start(ts, self.fps, self.duration_ms, &mut self.events)?;
                    }
                    TickOutcome::Painted { .. } => {
                        self.capture.on_frame(ts, &self.surface)?;
                    }
                    TickOutcome::Primed | TickOutcome::Stopped => {}
                }
                self.capture.poll();
            }
            HostEvent::Timer(id) => {
                if self.capture.is_stop_timer(id) {
                    self.capture.stop(&mut self.events)?;
                }
            }
        }
        Ok(Some(event))
    }

    /// Dispatch every event due at or before `until`.
    pub fn run_until(&mut self, until: Timestamp) -> ReelResult<()> {
        while self.events.peek_time().is_some_and(|t| t <= until) {
            self.step()?;
        }
        Ok(())
    }

    /// Play from the start and capture the whole timeline, returning the artifact.
    ///
    /// Capture begins at the first frame callback. Playback keeps running afterwards.
    pub fn record(&mut self) -> ReelResult<CaptureArtifact> {
        if matches!(
            self.capture.state(),
            CaptureState::Recording | CaptureState::Finalizing
        ) {
            return Err(ReelError::AlreadyRecording);
        }
        match self.animation.state() {
            LoopState::NotStarted => {
                self.capture_on_origin = true;
                self.start_playback();
            }
            LoopState::Running => self.start_capture()?,
            LoopState::Stopped => {
                return Err(ReelError::validation(
                    "playback was cancelled; create a new session to record",
                ));
            }
        }
        tracing::info!(duration_ms = self.duration_ms, "recording promo");

        loop {
            match self.capture.state() {
                CaptureState::Complete => break,
                CaptureState::Failed => {
                    return Err(ReelError::encode("capture session failed"));
                }
                CaptureState::Idle | CaptureState::Recording | CaptureState::Finalizing => {}
            }
            if self.step()?.is_none() {
                return Err(ReelError::encode(
                    "event loop went idle before the capture completed",
                ));
            }
        }
        self.capture
            .artifact()
            .cloned()
            .ok_or_else(|| ReelError::encode("capture completed without an artifact"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/playback_session.rs"]
mod tests;
