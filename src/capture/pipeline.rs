use std::sync::Arc;

use crate::capture::blob::{BlobHandle, BlobRegistry};
use crate::capture::recorder::{ContainerFormat, Recorder, RecorderConfig};
use crate::foundation::core::{Fps, Timestamp};
use crate::foundation::error::{ReelError, ReelResult};
use crate::host::event_loop::{TimerId, TimerScheduler};
use crate::render::frame::FrameSource;

/// Slack when comparing a callback timestamp against the sampling schedule.
const SCHEDULE_EPSILON_MS: f64 = 1e-6;

/// Lifecycle of a capture session. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureState {
    /// No session has been started.
    Idle,
    /// Frames are being admitted.
    Recording,
    /// The recorder is flushing.
    Finalizing,
    /// The artifact is available.
    Complete,
    /// Negotiation, encoding or finalization failed, or the session was cancelled.
    Failed,
}

/// A finished recording.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CaptureArtifact {
    /// Registry handle of the encoded bytes.
    pub handle: BlobHandle,
    /// Negotiated container.
    pub format: ContainerFormat,
    /// Encoded size in bytes.
    pub bytes: usize,
    /// Frames handed to the recorder.
    pub frame_count: u64,
    /// Media duration implied by the frame count.
    pub duration_ms: f64,
    stem: String,
}

impl CaptureArtifact {
    /// Download file name, `<stem>.<ext>`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, self.format.extension())
    }
}

/// One capture attempt.
#[derive(Debug)]
pub struct CaptureSession {
    id: u64,
    state: CaptureState,
    format: Option<ContainerFormat>,
    chunks: Vec<Vec<u8>>,
    frames_admitted: u64,
    max_frames: u64,
    started_at: Timestamp,
    frame_interval_ms: f64,
    stop_timer: Option<TimerId>,
    result: Option<CaptureArtifact>,
}

impl CaptureSession {
    /// Session number, starting at 1.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Current state.
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Negotiated container, if negotiation succeeded.
    pub fn format(&self) -> Option<ContainerFormat> {
        self.format
    }

    /// Chunks collected so far, in arrival order. Emptied once they are joined into the artifact.
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Frames admitted so far.
    pub fn frames_admitted(&self) -> u64 {
        self.frames_admitted
    }

    /// Upper bound on admitted frames.
    pub fn max_frames(&self) -> u64 {
        self.max_frames
    }

    /// The finished artifact when `Complete`.
    pub fn result(&self) -> Option<&CaptureArtifact> {
        self.result.as_ref()
    }

    /// Sampling slots that are due at `now` and still fit under the frame bound.
    fn slots_due(&self, now: Timestamp) -> u64 {
        let mut due = 0;
        while self.frames_admitted + due < self.max_frames {
            let slot = self
                .started_at
                .offset((self.frames_admitted + due) as f64 * self.frame_interval_ms);
            if now.ms() + SCHEDULE_EPSILON_MS < slot.ms() {
                break;
            }
            due += 1;
        }
        due
    }
}

/// Captures composed frames into a container through a [`Recorder`].
///
/// Frames are admitted on a fixed-rate schedule measured from the session start, so the recording
/// holds `round(bound · fps / 1000)` frames however the display refresh is timed.
#[derive(Debug)]
pub struct CapturePipeline<R: Recorder> {
    recorder: R,
    frame_size: (u32, u32),
    video_bits_per_second: u32,
    guard_ms: f64,
    artifact_stem: String,
    blobs: BlobRegistry,
    session: Option<CaptureSession>,
    sessions_started: u64,
}

impl<R: Recorder> CapturePipeline<R> {
    /// Pipeline encoding `frame_size` pixel frames with `recorder`.
    pub fn new(recorder: R, frame_size: (u32, u32)) -> Self {
        Self {
            recorder,
            frame_size,
            video_bits_per_second: 5_000_000,
            guard_ms: 120.0,
            artifact_stem: "capture".to_owned(),
            blobs: BlobRegistry::new(),
            session: None,
            sessions_started: 0,
        }
    }

    /// Target bitrate handed to the recorder.
    pub fn with_bitrate(mut self, video_bits_per_second: u32) -> Self {
        self.video_bits_per_second = video_bits_per_second;
        self
    }

    /// Extra time past the duration bound before the automatic stop.
    pub fn with_guard_ms(mut self, guard_ms: f64) -> Self {
        self.guard_ms = guard_ms.max(0.0);
        self
    }

    /// File name stem of produced artifacts.
    pub fn with_artifact_stem(mut self, stem: impl Into<String>) -> Self {
        self.artifact_stem = stem.into();
        self
    }

    /// State of the latest session, or `Idle`.
    pub fn state(&self) -> CaptureState {
        self.session
            .as_ref()
            .map_or(CaptureState::Idle, |s| s.state)
    }

    /// Latest session.
    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// Artifact of the latest session when it completed.
    pub fn artifact(&self) -> Option<&CaptureArtifact> {
        self.session.as_ref().and_then(|s| s.result.as_ref())
    }

    /// Encoded bytes of the latest artifact.
    pub fn artifact_bytes(&self) -> Option<Arc<[u8]>> {
        self.artifact().and_then(|a| self.blobs.get(&a.handle))
    }

    /// Registry holding artifacts.
    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }

    /// Recorder backend.
    pub fn recorder(&self) -> &R {
        &self.recorder
    }

    fn is_recording(&self) -> bool {
        self.state() == CaptureState::Recording
    }

    fn negotiate(&self) -> Option<ContainerFormat> {
        for format in ContainerFormat::PREFERENCE {
            if self.recorder.supports(format) {
                return Some(format);
            }
            tracing::warn!(%format, "container not supported, trying next");
        }
        None
    }

    /// Start a session at `now` recording up to `duration_bound_ms` at `fps`.
    ///
    /// Fails with [`ReelError::AlreadyRecording`] while a session is recording or finalizing; the
    /// running session is left untouched. Any previous artifact handle is revoked.
    #[tracing::instrument(skip(self, fps, timers), fields(fps = fps.as_f64()))]
    pub fn start(
        &mut self,
        now: Timestamp,
        fps: Fps,
        duration_bound_ms: f64,
        timers: &mut dyn TimerScheduler,
    ) -> ReelResult<()> {
        if matches!(
            self.state(),
            CaptureState::Recording | CaptureState::Finalizing
        ) {
            return Err(ReelError::AlreadyRecording);
        }
        if !duration_bound_ms.is_finite() || duration_bound_ms <= 0.0 {
            return Err(ReelError::validation(
                "capture duration bound must be finite and > 0",
            ));
        }
        if let Some(prev) = self.session.take()
            && let Some(artifact) = prev.result
        {
            self.blobs.revoke(&artifact.handle);
            tracing::debug!(handle = %artifact.handle, "released previous capture");
        }

        self.sessions_started += 1;
        let mut session = CaptureSession {
            id: self.sessions_started,
            state: CaptureState::Recording,
            format: None,
            chunks: Vec::new(),
            frames_admitted: 0,
            max_frames: fps.frames_in_ms(duration_bound_ms),
            started_at: now,
            frame_interval_ms: fps.frame_interval_ms(),
            stop_timer: None,
            result: None,
        };

        let Some(format) = self.negotiate() else {
            session.state = CaptureState::Failed;
            self.session = Some(session);
            tracing::warn!("no supported container; capture failed");
            return Err(ReelError::NoEncoderAvailable);
        };
        session.format = Some(format);

        let cfg = RecorderConfig {
            width: self.frame_size.0,
            height: self.frame_size.1,
            fps,
            video_bits_per_second: self.video_bits_per_second,
            format,
        };
        if let Err(err) = self.recorder.begin(cfg) {
            session.state = CaptureState::Failed;
            self.session = Some(session);
            return Err(err);
        }

        session.stop_timer = Some(timers.set_timeout(duration_bound_ms + self.guard_ms));
        tracing::info!(
            session = session.id,
            %format,
            max_frames = session.max_frames,
            "capture started"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Offer the frame painted at `now`. Returns whether it was admitted.
    ///
    /// When the display refreshes slower than the capture rate, the frame is pushed once for every
    /// sampling slot that has come due since the last callback, so the recording keeps its length.
    pub fn on_frame(&mut self, now: Timestamp, source: &dyn FrameSource) -> ReelResult<bool> {
        let Some(session) = self.session.as_mut() else {
            return Ok(false);
        };
        if session.state != CaptureState::Recording {
            return Ok(false);
        }
        let due = session.slots_due(now);
        if due == 0 {
            return Ok(false);
        }

        let recorder = &mut self.recorder;
        let pushed = source.read_frame().and_then(|frame| {
            let mut chunks = Vec::new();
            for _ in 0..due {
                chunks.extend(recorder.push_frame(&frame)?);
            }
            Ok(chunks)
        });
        match pushed {
            Ok(chunks) => {
                session.chunks.extend(chunks);
                session.frames_admitted += due;
                if due > 1 {
                    tracing::trace!(
                        session = session.id,
                        repeated = due,
                        "frame repeated to catch up"
                    );
                }
                Ok(true)
            }
            Err(err) => {
                session.state = CaptureState::Failed;
                self.recorder.abort();
                tracing::warn!(session = session.id, %err, "capture failed while encoding");
                Err(err)
            }
        }
    }

    /// Collect chunks the recorder produced asynchronously.
    pub fn poll(&mut self) {
        if let Some(session) = self.session.as_mut()
            && matches!(
                session.state,
                CaptureState::Recording | CaptureState::Finalizing
            )
        {
            session.chunks.extend(self.recorder.take_chunks());
        }
    }

    /// Whether `id` is the automatic stop timer of the running session.
    pub fn is_stop_timer(&self, id: TimerId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.stop_timer == Some(id))
    }

    /// Finalize the running session into an artifact. No-op unless recording.
    #[tracing::instrument(skip(self, timers))]
    pub fn stop(&mut self, timers: &mut dyn TimerScheduler) -> ReelResult<()> {
        if !self.is_recording() {
            return Ok(());
        }
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        session.state = CaptureState::Finalizing;
        if let Some(timer) = session.stop_timer.take() {
            timers.clear_timeout(timer);
        }
        session.chunks.extend(self.recorder.take_chunks());

        let rest = match self.recorder.finish() {
            Ok(rest) => rest,
            Err(err) => {
                session.state = CaptureState::Failed;
                tracing::warn!(session = session.id, %err, "capture finalization failed");
                return Err(err);
            }
        };
        session.chunks.extend(rest);

        let bytes = std::mem::take(&mut session.chunks).concat();
        let size = bytes.len();
        let Some(format) = session.format else {
            session.state = CaptureState::Failed;
            return Err(ReelError::encode("capture session has no negotiated format"));
        };
        let handle = self.blobs.create(bytes);
        let artifact = CaptureArtifact {
            handle,
            format,
            bytes: size,
            frame_count: session.frames_admitted,
            duration_ms: session.frames_admitted as f64 * session.frame_interval_ms,
            stem: self.artifact_stem.clone(),
        };
        tracing::info!(
            session = session.id,
            handle = %artifact.handle,
            bytes = size,
            frames = artifact.frame_count,
            "capture complete"
        );
        session.result = Some(artifact);
        session.state = CaptureState::Complete;
        Ok(())
    }

    /// Abandon the running session without producing output.
    pub fn cancel(&mut self, timers: &mut dyn TimerScheduler) {
        if !self.is_recording() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(timer) = session.stop_timer.take() {
            timers.clear_timeout(timer);
        }
        self.recorder.abort();
        session.chunks.clear();
        session.state = CaptureState::Failed;
        tracing::info!(session = session.id, "capture cancelled");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/pipeline.rs"]
mod tests;
