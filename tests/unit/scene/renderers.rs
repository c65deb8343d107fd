use super::*;
use crate::config::PromoCopy;
use crate::draw::record::{DrawCommand, RecordingSurface};
use crate::foundation::core::{Canvas, Rgba8};

fn record(render: fn(&mut dyn Surface, &SceneFrame<'_>, f64), local: f64) -> RecordingSurface {
    let copy = PromoCopy::default();
    let frame = SceneFrame::new(1080.0, 1920.0, &copy);
    let mut s = RecordingSurface::new(Canvas::PROMO);
    render(&mut s, &frame, local);
    s
}

fn text_alpha(s: &RecordingSurface, text: &str) -> f32 {
    s.find_text(text)
        .unwrap_or_else(|| panic!("missing text {text:?}"))
        .alpha()
}

#[test]
fn intro_starts_transparent_and_is_opaque_before_the_window_ends() {
    let copy = PromoCopy::default();
    assert_eq!(text_alpha(&record(render_intro, 0.0), &copy.title), 0.0);
    assert_eq!(text_alpha(&record(render_intro, 0.8), &copy.title), 1.0);
    assert_eq!(text_alpha(&record(render_intro, 0.8), &copy.subtitle), 1.0);

    let mid = text_alpha(&record(render_intro, 0.3), &copy.title);
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn intro_text_is_centered_at_fixed_baselines() {
    let copy = PromoCopy::default();
    let s = record(render_intro, 0.5);
    let Some(DrawCommand::Text { anchor, style, .. }) = s.find_text(&copy.title) else {
        panic!("title missing");
    };
    assert_eq!(anchor.x, 540.0);
    assert_eq!(anchor.y, 360.0);
    assert_eq!(style.size_px, 72.0);
    assert_eq!(style.weight, 700);
}

#[test]
fn demonstration_moves_device_from_offset_to_mount() {
    let copy = PromoCopy::default();
    let frame = SceneFrame::new(1080.0, 1920.0, &copy);
    assert_eq!(device_position(&frame, 0.0), Point::new(540.0, 1000.0));
    assert_eq!(device_position(&frame, 1.0), Point::new(670.0, 1040.0));
}

#[test]
fn demonstration_pulse_blinks_on_sine_sign() {
    assert!(pulse_on(0.1));
    assert!(!pulse_on(0.4));
    assert!(pulse_on(0.7));

    let transitions = (1..1000)
        .map(|i| pulse_on(f64::from(i) / 1000.0))
        .collect::<Vec<_>>()
        .windows(2)
        .filter(|w| w[0] != w[1])
        .count();
    // sin(10 p) over [0, 1) changes sign at p = k·π/10.
    assert_eq!(transitions, 3);
}

#[test]
fn demonstration_draws_scene_then_cable_then_caption() {
    let copy = PromoCopy::default();
    let s = record(render_demonstration, 0.5);
    let cmds = s.commands();

    let stroke_idx = cmds
        .iter()
        .position(|c| matches!(c, DrawCommand::Stroke { .. }))
        .expect("cable stroke");
    let caption_idx = cmds
        .iter()
        .position(|c| c.text() == Some(copy.caption.as_str()))
        .expect("caption");
    assert!(stroke_idx > 0);
    assert!(caption_idx > stroke_idx);
    assert!((text_alpha(&s, &copy.caption) - 0.9).abs() < 1e-6);

    let DrawCommand::Stroke { width, color, .. } = &cmds[stroke_idx] else {
        unreachable!()
    };
    assert_eq!(*width, 4.0);
    assert_eq!(*color, Rgba8::hex(0xff8a5b));
}

#[test]
fn value_proposition_fades_with_plain_ease() {
    let copy = PromoCopy::default();
    let a = text_alpha(&record(render_value_proposition, 0.25), &copy.value_headline);
    assert!((a - 0.125).abs() < 1e-6);
    assert_eq!(
        text_alpha(&record(render_value_proposition, 1.0), &copy.value_tagline),
        1.0
    );
}

#[test]
fn call_to_action_card_has_fixed_alpha_while_text_fades() {
    let copy = PromoCopy::default();
    let s = record(render_call_to_action, 0.0);
    let card = &s.commands()[0];
    assert!(matches!(card, DrawCommand::Fill { .. }));
    assert!((card.alpha() - 0.95).abs() < 1e-6);
    assert_eq!(text_alpha(&s, &copy.cta_offer), 0.0);

    let s = record(render_call_to_action, 0.9);
    assert_eq!(text_alpha(&s, &copy.cta_offer), 1.0);
    assert_eq!(text_alpha(&s, &copy.cta_action), 1.0);
    // Brand glyph fades with the text.
    let glyph = s
        .commands()
        .iter()
        .find(|c| matches!(c, DrawCommand::Fill { color, .. } if *color == Rgba8::hex(0x25d366)))
        .expect("brand glyph");
    assert_eq!(glyph.alpha(), 1.0);
}

#[test]
fn demonstration_flame_is_static() {
    let flame = |local: f64| {
        record(render_demonstration, local)
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Fill { bounds, color, .. } if *color == palette::FLAME => Some(*bounds),
                _ => None,
            })
            .expect("flame")
    };
    assert_eq!(flame(0.1), flame(0.6));
}
