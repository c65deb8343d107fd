//! Layers painted on every frame regardless of the active scene.

use kurbo::{Circle, Shape as _};

use crate::draw::palette;
use crate::draw::surface::{Surface, TextStyle};
use crate::foundation::core::{Point, Rect};
use crate::scene::SceneFrame;

const AMBIENT_CIRCLES: u32 = 10;

/// Center, radius and alpha of ambient circle `i` at global progress `t`.
pub(crate) fn ambient_circle(frame: &SceneFrame<'_>, i: u32, t: f64) -> (Point, f64, f64) {
    let fi = f64::from(i);
    let p = (t * 2.0 + fi * 0.1) % 1.0;
    let column = if i % 2 == 1 { 0.3 } else { 0.7 };
    let center = Point::new(
        column * frame.width + (p * 6.0 + fi).sin() * 40.0,
        p * frame.height,
    );
    let radius = 80.0 + f64::from(i % 3) * 20.0;
    let alpha = 0.08 + 0.05 * (fi + p * 6.0).sin();
    (center, radius, alpha)
}

/// Warm vertical wash with slowly rising translucent circles.
pub fn paint_background(surface: &mut dyn Surface, frame: &SceneFrame<'_>, t: f64) {
    surface.fill_vertical_gradient(
        Rect::new(0.0, 0.0, frame.width, frame.height),
        palette::BG_TOP,
        palette::BG_BOTTOM,
    );
    for i in 0..AMBIENT_CIRCLES {
        let (center, radius, alpha) = ambient_circle(frame, i, t);
        surface.fill_path(
            &Circle::new(center, radius).to_path(0.1),
            palette::ACCENT.with_alpha(alpha),
        );
    }
}

/// Footer watermark along the bottom edge.
pub fn paint_footer(surface: &mut dyn Surface, frame: &SceneFrame<'_>) {
    surface.fill_text(
        &frame.copy.footer,
        Point::new(frame.width / 2.0, frame.height - 36.0),
        &TextStyle::centered(400, 26.0, palette::FOOTER_INK),
    );
}
