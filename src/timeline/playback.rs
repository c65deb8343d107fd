use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering, fence};

use crate::foundation::core::Timestamp;
use crate::timeline::model::Timeline;

/// Where playback is: the origin timestamp and the progress derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct PlaybackState {
    /// Timestamp of the first frame callback. Set once.
    pub origin: Option<Timestamp>,
    /// Milliseconds since `origin`.
    pub elapsed_ms: f64,
    /// Progress in `[0, 1]`.
    pub global_progress: f64,
}

impl PlaybackState {
    /// State after a frame callback at `now`.
    ///
    /// The first call fixes the origin at `now`; later calls only move elapsed time and progress.
    pub fn advance(self, now: Timestamp, timeline: &Timeline) -> PlaybackState {
        let origin = self.origin.unwrap_or(now);
        let elapsed_ms = now.since(origin).max(0.0);
        PlaybackState {
            origin: Some(origin),
            elapsed_ms,
            global_progress: timeline.global_progress(elapsed_ms),
        }
    }

    /// Whether the origin has been recorded.
    pub fn is_primed(&self) -> bool {
        self.origin.is_some()
    }
}

/// Snapshot of playback progress published for readers.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct ProgressSnapshot {
    /// Global progress in `[0, 1]`.
    pub global_progress: f64,
    /// Elapsed playback time in seconds.
    pub elapsed_secs: f64,
}

/// Shared, lock-free progress publication point.
///
/// Clones observe the same values. Each publish is guarded by a sequence number, so a reader on
/// another thread always gets both fields from the same tick. There is one publisher at a time.
#[derive(Clone, Debug, Default)]
pub struct ProgressReadout {
    inner: Arc<Published>,
}

#[derive(Debug, Default)]
struct Published {
    seq: AtomicU64,
    progress_bits: AtomicU64,
    elapsed_bits: AtomicU64,
}

impl ProgressReadout {
    /// Empty readout (progress 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `state`.
    pub fn publish(&self, state: &PlaybackState) {
        let p = &self.inner;
        let seq = p.seq.load(Ordering::Relaxed);
        p.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);
        p.progress_bits
            .store(state.global_progress.to_bits(), Ordering::Relaxed);
        p.elapsed_bits
            .store((state.elapsed_ms / 1000.0).to_bits(), Ordering::Relaxed);
        p.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let p = &self.inner;
        loop {
            let before = p.seq.load(Ordering::Acquire);
            if before % 2 == 0 {
                let progress = p.progress_bits.load(Ordering::Relaxed);
                let elapsed = p.elapsed_bits.load(Ordering::Relaxed);
                fence(Ordering::Acquire);
                if p.seq.load(Ordering::Relaxed) == before {
                    return ProgressSnapshot {
                        global_progress: f64::from_bits(progress),
                        elapsed_secs: f64::from_bits(elapsed),
                    };
                }
            }
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/playback.rs"]
mod tests;
