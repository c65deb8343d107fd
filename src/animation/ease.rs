//! Easing curves for scene fades and motion.

/// Symmetric quadratic ease-in/out.
///
/// `2p²` below the midpoint, `-1 + (4 - 2p)p` above it. The input is not clamped; callers pass
/// progress already in `[0, 1]`.
pub fn ease_in_out(p: f64) -> f64 {
    if p < 0.5 {
        2.0 * p * p
    } else {
        -1.0 + (4.0 - 2.0 * p) * p
    }
}

/// Eased fade-in alpha for a scene at `local` progress, ramping `rate` times faster than the scene.
///
/// A `rate` above 1 reaches full opacity before the scene window ends: the Intro uses 1.3 and the
/// call-to-action 1.2 so the text is settled before the cut. This is not a general pattern; other
/// scenes use a rate of 1.
pub fn fade_in(local: f64, rate: f64) -> f64 {
    ease_in_out((local * rate).min(1.0))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
