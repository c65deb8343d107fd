use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::ReelResult;

/// Horizontal anchoring of a text run relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Anchor is the left edge of the run.
    Start,
    /// Anchor is the horizontal center of the run.
    #[default]
    Center,
    /// Anchor is the right edge of the run.
    End,
}

/// Font and paint settings for one text run. The anchor's `y` is the alphabetic baseline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TextStyle {
    /// Font size in logical pixels.
    pub size_px: f32,
    /// CSS-style weight (400 regular, 700 bold).
    pub weight: u16,
    /// Fill color.
    pub color: Rgba8,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl TextStyle {
    /// Centered text of the given weight, size and color.
    pub fn centered(weight: u16, size_px: f32, color: Rgba8) -> Self {
        Self {
            size_px,
            weight,
            color,
            align: TextAlign::Center,
        }
    }
}

/// Raster surface capability consumed by drawing primitives and scene renderers.
///
/// All coordinates are logical canvas units; implementations apply their own pixel-ratio scaling.
/// Drawing calls never fail; backend errors surface from [`Surface::end_frame`].
pub trait Surface {
    /// Logical canvas this surface represents.
    fn canvas(&self) -> Canvas;

    /// Start a new frame. Previous frame content is discarded.
    fn begin_frame(&mut self);

    /// Finish the current frame, making it available to readers.
    fn end_frame(&mut self) -> ReelResult<()>;

    /// Fill `path` (non-zero winding) with a solid color.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);

    /// Stroke `path` with a solid color and line width in logical units.
    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64);

    /// Fill `rect` with a top-to-bottom linear gradient.
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8);

    /// Draw a single line of text at `anchor`.
    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle);

    /// Multiply the alpha of everything drawn until the matching [`Surface::pop_opacity`].
    fn push_opacity(&mut self, alpha: f32);

    /// Close the innermost opacity group.
    fn pop_opacity(&mut self);
}

/// Run `f` with all its drawing multiplied by `alpha`.
pub fn with_opacity(surface: &mut dyn Surface, alpha: f64, f: impl FnOnce(&mut dyn Surface)) {
    let alpha = alpha.clamp(0.0, 1.0) as f32;
    if alpha >= 1.0 {
        f(surface);
        return;
    }
    surface.push_opacity(alpha);
    f(surface);
    surface.pop_opacity();
}
