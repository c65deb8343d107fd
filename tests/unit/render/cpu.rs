use super::*;
use crate::draw::surface::with_opacity;
use kurbo::Shape as _;

fn small_canvas() -> Canvas {
    Canvas {
        width: 20,
        height: 20,
    }
}

#[test]
fn rejects_non_positive_pixel_ratio() {
    assert!(CpuSurface::new(small_canvas(), 0.0).is_err());
    assert!(CpuSurface::new(small_canvas(), f64::NAN).is_err());
}

#[test]
fn device_size_follows_pixel_ratio() {
    let s = CpuSurface::new(small_canvas(), 2.0).unwrap();
    assert_eq!(s.device_size(), (40, 40));
    let frame = s.read_frame().unwrap();
    assert_eq!(frame.data.len(), 40 * 40 * 4);
    assert!(frame.premultiplied);
}

#[test]
fn solid_fill_covers_pixels() {
    let mut s = CpuSurface::new(small_canvas(), 1.0).unwrap();
    s.begin_frame();
    s.fill_path(
        &Rect::new(0.0, 0.0, 10.0, 20.0).to_path(0.1),
        Rgba8::hex(0xff0000),
    );
    s.end_frame().unwrap();
    let f = s.read_frame().unwrap();
    assert_eq!(f.pixel(5, 10), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(15, 10), Some([0, 0, 0, 0]));
}

#[test]
fn opacity_group_halves_alpha() {
    let mut s = CpuSurface::new(small_canvas(), 1.0).unwrap();
    s.begin_frame();
    with_opacity(&mut s, 0.5, |s| {
        s.fill_path(
            &Rect::new(0.0, 0.0, 20.0, 20.0).to_path(0.1),
            Rgba8::hex(0xffffff),
        );
    });
    s.end_frame().unwrap();
    let a = s.read_frame().unwrap().pixel(10, 10).unwrap()[3];
    assert!((120..=136).contains(&a), "alpha was {a}");
}

#[test]
fn vertical_gradient_runs_top_to_bottom() {
    let mut s = CpuSurface::new(small_canvas(), 1.0).unwrap();
    s.begin_frame();
    s.fill_vertical_gradient(
        Rect::new(0.0, 0.0, 20.0, 20.0),
        Rgba8::hex(0x000000),
        Rgba8::hex(0xffffff),
    );
    s.end_frame().unwrap();
    let f = s.read_frame().unwrap();
    let top = f.pixel(10, 0).unwrap();
    let bottom = f.pixel(10, 19).unwrap();
    assert_eq!(top[3], 255);
    assert!(top[0] < 20);
    assert!(bottom[0] > 235);
}

#[test]
fn redraw_replaces_previous_frame() {
    let mut s = CpuSurface::new(small_canvas(), 1.0).unwrap();
    s.begin_frame();
    s.fill_path(
        &Rect::new(0.0, 0.0, 20.0, 20.0).to_path(0.1),
        Rgba8::hex(0x00ff00),
    );
    s.end_frame().unwrap();
    s.begin_frame();
    s.end_frame().unwrap();
    assert_eq!(s.read_frame().unwrap().pixel(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn text_without_font_is_skipped() {
    let mut s = CpuSurface::new(small_canvas(), 1.0).unwrap();
    s.begin_frame();
    s.fill_text(
        "hello",
        Point::new(10.0, 10.0),
        &TextStyle::centered(700, 12.0, Rgba8::hex(0x000000)),
    );
    s.end_frame().unwrap();
    assert!(s.read_frame().unwrap().data.iter().all(|&b| b == 0));
}

#[test]
fn invalid_font_bytes_are_rejected() {
    let s = CpuSurface::new(small_canvas(), 1.0).unwrap();
    assert!(s.with_font_bytes(vec![1, 2, 3, 4]).is_err());
}
