use crate::draw::surface::Surface;
use crate::foundation::core::Fps;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::clamp01;
use crate::scene::renderers::{
    render_call_to_action, render_demonstration, render_intro, render_value_proposition,
};
use crate::scene::{SceneFrame, SceneRenderer};

/// Identifies one of the promo's scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    /// Title and subtitle fade-in.
    Intro,
    /// House, stove and device with the animated cable.
    Demonstration,
    /// Headline and tagline.
    ValueProposition,
    /// Offer card with the brand glyph.
    CallToAction,
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::Demonstration => "demonstration",
            Self::ValueProposition => "value_proposition",
            Self::CallToAction => "call_to_action",
        };
        f.write_str(s)
    }
}

/// A scene's `[start, end)` window as fractions of the total duration.
#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct SceneWindow {
    /// Scene identity.
    pub id: SceneId,
    /// Inclusive start fraction.
    pub start: f64,
    /// Exclusive end fraction (inclusive when it is `1.0` and progress is exactly `1.0`).
    pub end: f64,
    /// Renderer invoked while the window is active.
    #[serde(skip)]
    pub renderer: SceneRenderer,
}

impl SceneWindow {
    /// Build a window; bounds are checked by [`Timeline::new`].
    pub fn new(id: SceneId, start: f64, end: f64, renderer: SceneRenderer) -> Self {
        Self {
            id,
            start,
            end,
            renderer,
        }
    }

    /// Progress through this window at global progress `p`, clamped to `[0, 1]`.
    pub fn local_progress(&self, p: f64) -> f64 {
        clamp01((p - self.start) / (self.end - self.start))
    }

    fn check(&self) -> ReelResult<()> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if !in_unit(self.start) || !in_unit(self.end) || self.end <= self.start {
            return Err(ReelError::InvalidWindow {
                scene: self.id.to_string(),
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// A window active at some global progress, with its local progress.
#[derive(Clone, Copy, Debug)]
pub struct ActiveScene<'a> {
    /// The active window.
    pub window: &'a SceneWindow,
    /// Local progress in `[0, 1]`.
    pub local: f64,
}

/// Immutable schedule: total duration, capture frame rate and ordered scene windows.
#[derive(Clone, Debug)]
pub struct Timeline {
    duration_ms: f64,
    fps: Fps,
    windows: Vec<SceneWindow>,
}

impl Timeline {
    /// Build a timeline. Windows may overlap; overlapping windows paint in list order.
    pub fn new(duration_ms: f64, fps: Fps, windows: Vec<SceneWindow>) -> ReelResult<Self> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(ReelError::validation(format!(
                "timeline duration must be finite and > 0, got {duration_ms}"
            )));
        }
        for w in &windows {
            w.check()?;
        }
        Ok(Self {
            duration_ms,
            fps,
            windows,
        })
    }

    /// The four-scene promo schedule.
    pub fn promo(duration_ms: f64, fps: Fps) -> ReelResult<Self> {
        Self::new(
            duration_ms,
            fps,
            vec![
                SceneWindow::new(SceneId::Intro, 0.0, 0.2, render_intro),
                SceneWindow::new(SceneId::Demonstration, 0.2, 0.6, render_demonstration),
                SceneWindow::new(
                    SceneId::ValueProposition,
                    0.6,
                    0.8,
                    render_value_proposition,
                ),
                SceneWindow::new(SceneId::CallToAction, 0.8, 1.0, render_call_to_action),
            ],
        )
    }

    /// Total duration in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Capture frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Windows in paint order.
    pub fn windows(&self) -> &[SceneWindow] {
        &self.windows
    }

    /// Number of frames a full-length capture contains.
    pub fn frame_count(&self) -> u64 {
        self.fps.frames_in_ms(self.duration_ms)
    }

    /// `elapsed / duration` clamped to `[0, 1]`; negative or non-finite elapsed maps to 0.
    pub fn global_progress(&self, elapsed_ms: f64) -> f64 {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0.0;
        }
        clamp01(elapsed_ms / self.duration_ms)
    }

    /// Windows active at `p`, in list order.
    pub fn active_scenes(&self, p: f64) -> impl Iterator<Item = ActiveScene<'_>> + '_ {
        let last = self.windows.len().checked_sub(1);
        self.windows
            .iter()
            .enumerate()
            .filter(move |(i, w)| {
                (w.start <= p && p < w.end) || (Some(*i) == last && w.end == 1.0 && p == 1.0)
            })
            .map(move |(_, w)| ActiveScene {
                window: w,
                local: w.local_progress(p),
            })
    }

    /// Invoke every active renderer at `p`.
    pub fn paint_scenes(&self, surface: &mut dyn Surface, frame: &SceneFrame<'_>, p: f64) {
        for active in self.active_scenes(p) {
            (active.window.renderer)(surface, frame, active.local);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
