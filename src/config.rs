//! Runtime configuration: timing constants, pixel ratio, font, capture tuning and on-screen copy.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Largest supported device pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// All strings drawn by the promo.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromoCopy {
    /// Intro title.
    pub title: String,
    /// Intro subtitle.
    pub subtitle: String,
    /// Demonstration caption.
    pub caption: String,
    /// Value proposition headline.
    pub value_headline: String,
    /// Value proposition tagline.
    pub value_tagline: String,
    /// Call-to-action offer line.
    pub cta_offer: String,
    /// Call-to-action instruction line.
    pub cta_action: String,
    /// Footer watermark.
    pub footer: String,
}

impl Default for PromoCopy {
    fn default() -> Self {
        Self {
            title: "Gas Safety Device".to_owned(),
            subtitle: "Prevent gas leaks & accidents at home".to_owned(),
            caption: "Safe, Reliable, Easy Installation".to_owned(),
            value_headline: "Safe • Reliable • Easy".to_owned(),
            value_tagline: "Instant alerts. Peace of mind.".to_owned(),
            cta_offer: "Cash on Delivery Available".to_owned(),
            cta_action: "Order now via WhatsApp".to_owned(),
            footer: "15s promo • Gas Safety Device".to_owned(),
        }
    }
}

/// Compositor and capture configuration.
///
/// Canvas size is fixed at [`Canvas::PROMO`]; everything else has a default matching the
/// original 15 s / 30 fps promo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    /// Device pixels per logical pixel, in `(0, 2]`.
    pub pixel_ratio: f64,
    /// Total playback duration in milliseconds.
    pub duration_ms: f64,
    /// Target capture frame rate.
    pub fps: u32,
    /// Display refresh rate driving frame callbacks.
    pub refresh_hz: f64,
    /// Maximum frame-callback jitter in milliseconds (0 disables).
    pub jitter_ms: f64,
    /// Seed for the jitter generator.
    pub jitter_seed: u64,
    /// Extra time before the automatic capture stop.
    pub capture_guard_ms: f64,
    /// Target video bitrate passed to the recorder.
    pub video_bits_per_second: u32,
    /// TTF/OTF font used for all text. Text is skipped when unset.
    pub font_path: Option<PathBuf>,
    /// Artifact file name without extension.
    pub artifact_stem: String,
    /// On-screen strings.
    pub copy: PromoCopy,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            duration_ms: 15_000.0,
            fps: 30,
            refresh_hz: 60.0,
            jitter_ms: 0.0,
            jitter_seed: 0x5eed,
            capture_guard_ms: 120.0,
            video_bits_per_second: 5_000_000,
            font_path: None,
            artifact_stem: "gas-safety-15s".to_owned(),
            copy: PromoCopy::default(),
        }
    }
}

impl ReelConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a JSON configuration string.
    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        serde_json::from_str(text).map_err(|e| ReelError::serde(e.to_string()))
    }

    /// Apply `PROMOREEL_PIXEL_RATIO`, `PROMOREEL_REFRESH_HZ` and `PROMOREEL_FONT` overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("PROMOREEL_PIXEL_RATIO").and_then(|v| v.parse::<f64>().ok()) {
            self.pixel_ratio = v;
        }
        if let Some(v) = var("PROMOREEL_REFRESH_HZ").and_then(|v| v.parse::<f64>().ok()) {
            self.refresh_hz = v;
        }
        if let Some(v) = var("PROMOREEL_FONT").filter(|v| !v.is_empty()) {
            self.font_path = Some(PathBuf::from(v));
        }
        self
    }

    /// Reject values the compositor cannot run with.
    pub fn validate(&self) -> ReelResult<()> {
        if !self.pixel_ratio.is_finite()
            || self.pixel_ratio <= 0.0
            || self.pixel_ratio > MAX_PIXEL_RATIO
        {
            return Err(ReelError::validation(format!(
                "pixel_ratio must be in (0, {MAX_PIXEL_RATIO}], got {}",
                self.pixel_ratio
            )));
        }
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(ReelError::validation("duration_ms must be finite and > 0"));
        }
        if !self.refresh_hz.is_finite() || self.refresh_hz <= 0.0 {
            return Err(ReelError::validation("refresh_hz must be finite and > 0"));
        }
        if !self.jitter_ms.is_finite() || self.jitter_ms < 0.0 {
            return Err(ReelError::validation("jitter_ms must be finite and >= 0"));
        }
        if !self.capture_guard_ms.is_finite() || self.capture_guard_ms < 0.0 {
            return Err(ReelError::validation(
                "capture_guard_ms must be finite and >= 0",
            ));
        }
        if self.artifact_stem.is_empty() || self.artifact_stem.contains(['/', '\\']) {
            return Err(ReelError::validation(
                "artifact_stem must be a non-empty file name",
            ));
        }
        let fps = self.fps()?;
        let interval = self.refresh_interval_ms();
        let worst_gap = interval + self.jitter_ms.min(interval * 0.5);
        if worst_gap >= fps.frame_interval_ms() + self.capture_guard_ms {
            return Err(ReelError::validation(format!(
                "a {:.1} ms refresh gap would miss the last capture frame; \
                 raise refresh_hz or capture_guard_ms",
                worst_gap
            )));
        }
        Ok(())
    }

    /// The fixed promo canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas::PROMO
    }

    /// Capture frame rate.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Interval between display refreshes in milliseconds.
    pub fn refresh_interval_ms(&self) -> f64 {
        1000.0 / self.refresh_hz
    }
}
