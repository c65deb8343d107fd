use crate::animation::ease::{ease_in_out, fade_in};
use crate::draw::palette;
use crate::draw::shapes::{
    draw_brand_glyph, draw_device, draw_house, draw_stove, rounded_rect_path,
};
use crate::draw::surface::{Surface, TextStyle, with_opacity};
use crate::foundation::core::{BezPath, Point, Rect};
use crate::foundation::math::lerp;
use crate::scene::SceneFrame;

/// Intro fade runs 1.3x faster than the window so the title is fully opaque before the cut.
pub(crate) const INTRO_FADE_RATE: f64 = 1.3;
/// Call-to-action text fade rate; same overshoot idea as the intro.
pub(crate) const CTA_FADE_RATE: f64 = 1.2;
/// Angular rate of the device status blink in radians per unit of local progress.
pub(crate) const PULSE_RATE: f64 = 10.0;

const DEMO_CENTER_Y: f64 = 980.0;
const CARD_X: f64 = 80.0;
const CARD_Y: f64 = 740.0;
const CARD_H: f64 = 300.0;

/// Title and subtitle fading in.
pub fn render_intro(surface: &mut dyn Surface, frame: &SceneFrame<'_>, local: f64) {
    let cx = frame.width / 2.0;
    with_opacity(surface, fade_in(local, INTRO_FADE_RATE), |s| {
        s.fill_text(
            &frame.copy.title,
            Point::new(cx, 360.0),
            &TextStyle::centered(700, 72.0, palette::INK),
        );
        s.fill_text(
            &frame.copy.subtitle,
            Point::new(cx, 430.0),
            &TextStyle::centered(500, 40.0, palette::INK),
        );
    });
}

/// Position of the device for the demonstration at eased progress `a`.
pub(crate) fn device_position(frame: &SceneFrame<'_>, a: f64) -> Point {
    let cx = frame.width / 2.0;
    Point::new(
        lerp(cx, cx + 130.0, a),
        lerp(DEMO_CENTER_Y + 20.0, DEMO_CENTER_Y + 60.0, a),
    )
}

/// Whether the device status indicator is lit at `local` progress.
pub(crate) fn pulse_on(local: f64) -> bool {
    (local * PULSE_RATE).sin() > 0.0
}

/// House, stove and the safety device sliding onto its mount with a cable to the stove.
pub fn render_demonstration(surface: &mut dyn Surface, frame: &SceneFrame<'_>, local: f64) {
    let a = ease_in_out(local);
    let cx = frame.width / 2.0;
    let cy = DEMO_CENTER_Y;

    draw_house(surface, Point::new(cx, cy), 1.0);
    draw_stove(surface, Point::new(cx - 120.0, cy + 120.0), 1.2);

    let device = device_position(frame, a);
    draw_device(surface, device, 1.0, pulse_on(local));

    let mut cable = BezPath::new();
    cable.move_to((cx - 60.0, cy + 130.0));
    cable.curve_to(
        (cx, cy + 100.0),
        (device.x - 40.0, device.y + 40.0),
        (device.x, device.y),
    );
    surface.stroke_path(&cable, palette::ACCENT, 4.0);

    with_opacity(surface, 0.9, |s| {
        s.fill_text(
            &frame.copy.caption,
            Point::new(cx, 220.0),
            &TextStyle::centered(700, 56.0, palette::INK),
        );
    });
}

/// Headline and tagline fading in.
pub fn render_value_proposition(surface: &mut dyn Surface, frame: &SceneFrame<'_>, local: f64) {
    let cx = frame.width / 2.0;
    with_opacity(surface, ease_in_out(local), |s| {
        s.fill_text(
            &frame.copy.value_headline,
            Point::new(cx, 520.0),
            &TextStyle::centered(800, 68.0, palette::INK),
        );
        s.fill_text(
            &frame.copy.value_tagline,
            Point::new(cx, 590.0),
            &TextStyle::centered(500, 40.0, palette::INK),
        );
    });
}

/// Card with the offer, the call to action and the brand glyph.
///
/// The card itself is drawn at a fixed alpha; only its contents fade.
pub fn render_call_to_action(surface: &mut dyn Surface, frame: &SceneFrame<'_>, local: f64) {
    let cx = frame.width / 2.0;
    let card = Rect::new(CARD_X, CARD_Y, frame.width - CARD_X, CARD_Y + CARD_H);

    with_opacity(surface, 0.95, |s| {
        let outline = rounded_rect_path(card, 24.0);
        s.fill_path(&outline, palette::WHITE);
        s.stroke_path(&outline, palette::CARD_OUTLINE, 2.0);
    });

    with_opacity(surface, fade_in(local, CTA_FADE_RATE), |s| {
        s.fill_text(
            &frame.copy.cta_offer,
            Point::new(cx, CARD_Y + 120.0),
            &TextStyle::centered(700, 60.0, palette::INK),
        );
        s.fill_text(
            &frame.copy.cta_action,
            Point::new(cx, CARD_Y + 190.0),
            &TextStyle::centered(700, 48.0, palette::INK),
        );
        draw_brand_glyph(s, Point::new(cx - 210.0, CARD_Y + 185.0), 1.4);
    });
}

#[cfg(test)]
#[path = "../../tests/unit/scene/renderers.rs"]
mod tests;
