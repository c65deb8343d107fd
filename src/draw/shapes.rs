//! Compound vector shapes drawn at an origin and uniform scale.
//!
//! Every primitive builds its geometry in local units around `(0, 0)` and maps it through
//! `translate(origin) * scale(scale)`. A scale of exactly zero draws nothing.

use kurbo::{Circle, RoundedRect, Shape as _};

use crate::draw::palette;
use crate::draw::surface::Surface;
use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8};

const CURVE_TOLERANCE: f64 = 0.1;

/// Closed rounded-rectangle outline.
pub fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    RoundedRect::from_rect(rect, radius).to_path(CURVE_TOLERANCE)
}

/// Fill a rounded rectangle given in surface coordinates.
pub fn fill_rounded_rect(surface: &mut dyn Surface, rect: Rect, radius: f64, color: Rgba8) {
    surface.fill_path(&rounded_rect_path(rect, radius), color);
}

fn local_xf(origin: Point, scale: f64) -> Option<Affine> {
    if scale == 0.0 {
        return None;
    }
    Some(Affine::translate(origin.to_vec2()) * Affine::scale(scale))
}

fn fill_local(surface: &mut dyn Surface, xf: Affine, mut path: BezPath, color: Rgba8) {
    path.apply_affine(xf);
    surface.fill_path(&path, color);
}

fn circle(center: (f64, f64), r: f64) -> BezPath {
    Circle::new(center, r).to_path(CURVE_TOLERANCE)
}

fn rrect(x: f64, y: f64, w: f64, h: f64, r: f64) -> BezPath {
    rounded_rect_path(Rect::new(x, y, x + w, y + h), r)
}

/// House silhouette centered on `center`: body, triangular roof, door and window.
pub fn draw_house(surface: &mut dyn Surface, center: Point, scale: f64) {
    let Some(xf) = local_xf(center, scale) else {
        return;
    };
    let (w, h, roof_h) = (280.0, 180.0, 80.0);

    fill_local(
        surface,
        xf,
        rrect(-w / 2.0, -h / 2.0, w, h, 16.0),
        palette::HOUSE_BODY,
    );

    let mut roof = BezPath::new();
    roof.move_to((-w / 2.0 - 10.0, -h / 2.0));
    roof.line_to((0.0, -h / 2.0 - roof_h));
    roof.line_to((w / 2.0 + 10.0, -h / 2.0));
    roof.close_path();
    fill_local(surface, xf, roof, palette::HOUSE_ROOF);

    fill_local(
        surface,
        xf,
        rrect(-22.0, h / 2.0 - 70.0, 44.0, 70.0, 8.0),
        palette::HOUSE_DOOR,
    );
    fill_local(
        surface,
        xf,
        rrect(w / 4.0 - 30.0, -20.0, 60.0, 50.0, 8.0),
        palette::WHITE,
    );
}

/// Stove centered on `origin`: body, control panel, four burner knobs and a teardrop flame.
pub fn draw_stove(surface: &mut dyn Surface, origin: Point, scale: f64) {
    let Some(xf) = local_xf(origin, scale) else {
        return;
    };

    fill_local(
        surface,
        xf,
        Rect::new(-60.0, -40.0, 60.0, 40.0).to_path(CURVE_TOLERANCE),
        palette::STOVE_BODY,
    );
    fill_local(
        surface,
        xf,
        Rect::new(-60.0, 5.0, 60.0, 40.0).to_path(CURVE_TOLERANCE),
        palette::STOVE_PANEL,
    );
    for i in 0..4 {
        let cx = -40.0 + f64::from(i) * 27.0;
        fill_local(surface, xf, circle((cx, -15.0), 9.0), palette::STOVE_KNOB);
    }

    let mut tear = BezPath::new();
    tear.move_to((0.0, -18.0));
    tear.quad_to((8.0, -36.0), (0.0, -44.0));
    tear.quad_to((-8.0, -36.0), (0.0, -18.0));
    tear.close_path();
    fill_local(surface, xf, tear, palette::FLAME);
}

/// Safety device centered on `origin`. The status dot is green while `pulse` is set, amber
/// otherwise.
pub fn draw_device(surface: &mut dyn Surface, origin: Point, scale: f64, pulse: bool) {
    let Some(xf) = local_xf(origin, scale) else {
        return;
    };

    fill_local(
        surface,
        xf,
        rrect(-35.0, -50.0, 70.0, 100.0, 14.0),
        palette::ACCENT,
    );
    fill_local(
        surface,
        xf,
        Rect::new(-18.0, -10.0, 18.0, 10.0).to_path(CURVE_TOLERANCE),
        palette::WHITE,
    );
    let dot = if pulse {
        palette::STATUS_OK
    } else {
        palette::STATUS_IDLE
    };
    fill_local(surface, xf, circle((0.0, 15.0), 6.0), dot);
}

/// Circular brand glyph (messaging-app style badge) centered on `origin`.
pub fn draw_brand_glyph(surface: &mut dyn Surface, origin: Point, scale: f64) {
    let Some(xf) = local_xf(origin, scale) else {
        return;
    };

    fill_local(surface, xf, circle((0.0, 0.0), 22.0), palette::BRAND_GREEN);

    let mut mark = BezPath::new();
    mark.move_to((-5.0, -4.0));
    mark.quad_to((-2.0, -6.0), (1.0, -3.0));
    mark.quad_to((3.0, -1.0), (0.0, 1.0));
    mark.quad_to((-3.0, 4.0), (-5.0, 2.0));
    mark.line_to((-8.0, 6.0));
    mark.quad_to((-7.0, 2.0), (-5.0, -4.0));
    mark.close_path();
    fill_local(surface, xf, mark, palette::WHITE);
}

#[cfg(test)]
#[path = "../../tests/unit/draw/shapes.rs"]
mod tests;
