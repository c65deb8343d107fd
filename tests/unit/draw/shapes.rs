use super::*;
use kurbo::Shape as _;
use crate::draw::record::{DrawCommand, RecordingSurface};
use crate::foundation::core::Canvas;

fn fills(s: &RecordingSurface) -> Vec<(Rect, Rgba8)> {
    s.commands()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Fill { bounds, color, .. } => Some((*bounds, *color)),
            _ => None,
        })
        .collect()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn zero_scale_is_a_no_op_for_every_primitive() {
    let mut s = RecordingSurface::new(Canvas::PROMO);
    let o = Point::new(100.0, 100.0);
    draw_house(&mut s, o, 0.0);
    draw_stove(&mut s, o, 0.0);
    draw_device(&mut s, o, 0.0, true);
    draw_brand_glyph(&mut s, o, 0.0);
    assert!(s.commands().is_empty());
}

#[test]
fn house_paints_body_roof_door_window_in_order() {
    let mut s = RecordingSurface::new(Canvas::PROMO);
    draw_house(&mut s, Point::new(540.0, 980.0), 1.0);
    let f = fills(&s);
    assert_eq!(f.len(), 4);
    assert_eq!(f[0].1, palette::HOUSE_BODY);
    assert_eq!(f[1].1, palette::HOUSE_ROOF);
    assert_eq!(f[2].1, palette::HOUSE_DOOR);
    assert_eq!(f[3].1, palette::WHITE);

    let body = f[0].0;
    assert!(approx(body.x0, 400.0) && approx(body.x1, 680.0));
    assert!(approx(body.y0, 890.0) && approx(body.y1, 1070.0));

    // Roof apex sits roof height above the body top; eaves overhang by 10.
    let roof = f[1].0;
    assert!(approx(roof.y0, 810.0));
    assert!(approx(roof.x0, 390.0) && approx(roof.x1, 690.0));
}

#[test]
fn house_geometry_scales_about_center() {
    let mut s = RecordingSurface::new(Canvas::PROMO);
    draw_house(&mut s, Point::new(0.0, 0.0), 0.5);
    let body = fills(&s)[0].0;
    assert!(approx(body.width(), 140.0));
    assert!(approx(body.height(), 90.0));
    assert!(approx(body.center().x, 0.0) && approx(body.center().y, 0.0));
}

#[test]
fn stove_has_four_knobs_and_translucent_flame() {
    let mut s = RecordingSurface::new(Canvas::PROMO);
    draw_stove(&mut s, Point::new(0.0, 0.0), 1.0);
    let f = fills(&s);
    let knobs = f.iter().filter(|(_, c)| *c == palette::STOVE_KNOB).count();
    assert_eq!(knobs, 4);

    let (flame, color) = *f.last().unwrap();
    assert_eq!(color, palette::FLAME);
    assert!(color.a < 255);
    assert!(approx(flame.y1, -18.0));
    assert!(flame.y0 <= -43.0);
}

#[test]
fn device_status_dot_follows_pulse() {
    let mut on = RecordingSurface::new(Canvas::PROMO);
    draw_device(&mut on, Point::new(10.0, 10.0), 1.0, true);
    assert_eq!(fills(&on).last().unwrap().1, palette::STATUS_OK);

    let mut off = RecordingSurface::new(Canvas::PROMO);
    draw_device(&mut off, Point::new(10.0, 10.0), 1.0, false);
    assert_eq!(fills(&off).last().unwrap().1, palette::STATUS_IDLE);

    let body = fills(&on)[0].0;
    assert!(approx(body.x0, -25.0) && approx(body.y0, -40.0));
}

#[test]
fn brand_glyph_is_a_scaled_badge() {
    let mut s = RecordingSurface::new(Canvas::PROMO);
    draw_brand_glyph(&mut s, Point::new(100.0, 200.0), 1.4);
    let f = fills(&s);
    assert_eq!(f.len(), 2);
    assert_eq!(f[0].1, palette::BRAND_GREEN);
    assert!((f[0].0.width() - 2.0 * 22.0 * 1.4).abs() < 0.5);
    assert!((f[0].0.center().x - 100.0).abs() < 1e-3);
}

#[test]
fn rounded_rect_path_bounds_match_rect() {
    let r = Rect::new(80.0, 740.0, 1000.0, 1040.0);
    let p = rounded_rect_path(r, 24.0);
    let b = p.bounding_box();
    assert!(approx(b.x0, r.x0) && approx(b.y1, r.y1));
}
