//! Scene content: the four timed scene renderers and the global background/foreground layers.

pub(crate) mod compose;
pub(crate) mod layers;
pub(crate) mod renderers;

use crate::config::PromoCopy;
use crate::draw::surface::Surface;

/// Per-frame inputs shared by every scene renderer.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame<'a> {
    /// Logical canvas width.
    pub width: f64,
    /// Logical canvas height.
    pub height: f64,
    /// On-screen strings.
    pub copy: &'a PromoCopy,
}

impl<'a> SceneFrame<'a> {
    /// Frame inputs for a canvas of `width × height` logical pixels.
    pub fn new(width: f64, height: f64, copy: &'a PromoCopy) -> Self {
        Self {
            width,
            height,
            copy,
        }
    }
}

/// A scene renderer paints one scene at `local` progress in `[0, 1]`. It holds no state.
pub type SceneRenderer = fn(&mut dyn Surface, &SceneFrame<'_>, f64);
