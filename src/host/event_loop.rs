use std::collections::BTreeSet;

use crate::config::ReelConfig;
use crate::foundation::core::Timestamp;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::Rng64;

/// Handle for a pending frame-callback request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequestId(u64);

/// Handle for a pending one-shot timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Requests a callback at the next display refresh.
pub trait FrameScheduler {
    /// Ask for one frame callback.
    fn request_frame(&mut self) -> FrameRequestId;
    /// Withdraw a request. Unknown or already-delivered ids are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Schedules one-shot timeouts.
pub trait TimerScheduler {
    /// Fire a timer `delay_ms` from now.
    fn set_timeout(&mut self, delay_ms: f64) -> TimerId;
    /// Cancel a timer. Unknown or already-fired ids are ignored.
    fn clear_timeout(&mut self, id: TimerId);
}

/// An event delivered by [`EventLoop::next_event`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// Display refresh at the given timestamp; all pending frame requests are consumed.
    Frame(Timestamp),
    /// A timer fired.
    Timer(TimerId),
}

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    id: TimerId,
    due: Timestamp,
}

/// Deterministic single-threaded event loop over a virtual millisecond clock.
///
/// Refreshes happen at `k · interval + jitter_k`. When a timer and a refresh are due at the same
/// instant the timer runs first; timers due together run in registration order.
#[derive(Debug)]
pub struct EventLoop {
    now: Timestamp,
    interval_ms: f64,
    jitter_ms: f64,
    rng: Rng64,
    next_vsync: u64,
    next_jitter: f64,
    next_id: u64,
    frames: BTreeSet<FrameRequestId>,
    timers: Vec<PendingTimer>,
}

impl EventLoop {
    /// Event loop refreshing at `refresh_hz`, starting at time zero.
    pub fn new(refresh_hz: f64) -> ReelResult<Self> {
        if !refresh_hz.is_finite() || refresh_hz <= 0.0 {
            return Err(ReelError::validation(format!(
                "refresh rate must be finite and > 0, got {refresh_hz}"
            )));
        }
        Ok(Self {
            now: Timestamp::ZERO,
            interval_ms: 1000.0 / refresh_hz,
            jitter_ms: 0.0,
            rng: Rng64::new(0),
            next_vsync: 1,
            next_jitter: 0.0,
            next_id: 0,
            frames: BTreeSet::new(),
            timers: Vec::new(),
        })
    }

    /// Event loop using the refresh rate and jitter settings of `config`.
    pub fn from_config(config: &ReelConfig) -> ReelResult<Self> {
        Ok(Self::new(config.refresh_hz)?.with_jitter(config.jitter_ms, config.jitter_seed))
    }

    /// Delay each refresh by a seeded pseudo-random amount in `[0, max_ms)`.
    ///
    /// The jitter is capped below one refresh interval so timestamps stay increasing.
    pub fn with_jitter(mut self, max_ms: f64, seed: u64) -> Self {
        self.jitter_ms = if max_ms.is_finite() {
            max_ms.clamp(0.0, self.interval_ms * 0.5)
        } else {
            0.0
        };
        self.rng = Rng64::new(seed);
        self.next_jitter = self.draw_jitter();
        self
    }

    fn draw_jitter(&mut self) -> f64 {
        if self.jitter_ms > 0.0 {
            self.rng.next_f64_01() * self.jitter_ms
        } else {
            0.0
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Milliseconds between refreshes.
    pub fn refresh_interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Whether any frame request is waiting for a refresh.
    pub fn has_pending_frame(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of timers that have not fired or been cleared.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Whether nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty() && self.timers.is_empty()
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn next_timer_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, t) in self.timers.iter().enumerate() {
            match best {
                Some(b) if self.timers[b].due <= t.due => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Index of the next refresh that is not in the past.
    ///
    /// A refresh exactly at `now` still counts, so a timer firing on a boundary does not push that
    /// boundary's frame back an interval.
    fn upcoming_vsync(&self) -> u64 {
        let min_k = (self.now.ms() / self.interval_ms - 1e-9).ceil().max(0.0) as u64;
        self.next_vsync.max(min_k)
    }

    fn upcoming_frame_time(&self) -> Option<Timestamp> {
        if self.frames.is_empty() {
            return None;
        }
        let base = Timestamp(self.upcoming_vsync() as f64 * self.interval_ms);
        Some(base.offset(self.next_jitter))
    }

    /// Time of the event [`EventLoop::next_event`] would return, without consuming it.
    pub fn peek_time(&self) -> Option<Timestamp> {
        let timer = self.next_timer_index().map(|i| self.timers[i].due);
        match (timer, self.upcoming_frame_time()) {
            (Some(t), Some(f)) => Some(if t <= f { t } else { f }),
            (t, f) => t.or(f),
        }
    }

    /// Advance the clock to the earliest due event and return it, or `None` when idle.
    pub fn next_event(&mut self) -> Option<HostEvent> {
        let frame_at = self.upcoming_frame_time();
        let timer = self.next_timer_index();

        let take_timer = match (timer, frame_at) {
            (None, None) => return None,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (Some(i), Some(at)) => self.timers[i].due <= at,
        };

        if take_timer {
            let i = timer?;
            let fired = self.timers.remove(i);
            if fired.due > self.now {
                self.now = fired.due;
            }
            tracing::trace!(timer = fired.id.0, at_ms = self.now.ms(), "timer fired");
            return Some(HostEvent::Timer(fired.id));
        }

        let at = frame_at?;
        self.next_vsync = self.upcoming_vsync() + 1;
        if at > self.now {
            self.now = at;
        }
        self.next_jitter = self.draw_jitter();
        self.frames.clear();
        Some(HostEvent::Frame(self.now))
    }
}

impl FrameScheduler for EventLoop {
    fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.alloc_id());
        self.frames.insert(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.frames.remove(&id);
    }
}

impl TimerScheduler for EventLoop {
    fn set_timeout(&mut self, delay_ms: f64) -> TimerId {
        let id = TimerId(self.alloc_id());
        let delay = if delay_ms.is_finite() {
            delay_ms.max(0.0)
        } else {
            0.0
        };
        self.timers.push(PendingTimer {
            id,
            due: self.now.offset(delay),
        });
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/event_loop.rs"]
mod tests;
