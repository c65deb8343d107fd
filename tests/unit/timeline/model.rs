use super::*;
use crate::config::PromoCopy;
use crate::draw::record::RecordingSurface;
use crate::foundation::core::Canvas;

fn promo() -> Timeline {
    Timeline::promo(15_000.0, Fps::new(30, 1).unwrap()).unwrap()
}

fn ids(t: &Timeline, p: f64) -> Vec<SceneId> {
    t.active_scenes(p).map(|a| a.window.id).collect()
}

fn noop(_: &mut dyn Surface, _: &SceneFrame<'_>, _: f64) {}

#[test]
fn global_progress_clamps_and_sanitizes() {
    let t = promo();
    assert_eq!(t.global_progress(0.0), 0.0);
    assert_eq!(t.global_progress(7_500.0), 0.5);
    assert_eq!(t.global_progress(20_000.0), 1.0);
    assert_eq!(t.global_progress(-5.0), 0.0);
    assert_eq!(t.global_progress(f64::NAN), 0.0);
    assert_eq!(t.global_progress(f64::INFINITY), 0.0);
}

#[test]
fn window_starts_are_inclusive_and_ends_exclusive() {
    let t = promo();
    assert_eq!(ids(&t, 0.0), vec![SceneId::Intro]);
    assert_eq!(ids(&t, 0.2), vec![SceneId::Demonstration]);
    assert_eq!(ids(&t, 0.6), vec![SceneId::ValueProposition]);
    assert_eq!(ids(&t, 0.8), vec![SceneId::CallToAction]);
}

#[test]
fn final_window_includes_progress_one() {
    let t = promo();
    let active: Vec<_> = t.active_scenes(1.0).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].window.id, SceneId::CallToAction);
    assert_eq!(active[0].local, 1.0);
}

#[test]
fn local_progress_is_normalized_within_window() {
    let t = promo();
    let active: Vec<_> = t.active_scenes(0.4).collect();
    assert_eq!(active.len(), 1);
    assert!((active[0].local - 0.5).abs() < 1e-12);
}

#[test]
fn overlapping_windows_are_both_active_in_list_order() {
    let t = Timeline::new(
        1_000.0,
        Fps::new(30, 1).unwrap(),
        vec![
            SceneWindow::new(SceneId::Intro, 0.0, 0.6, noop),
            SceneWindow::new(SceneId::Demonstration, 0.4, 1.0, noop),
        ],
    )
    .unwrap();
    assert_eq!(ids(&t, 0.5), vec![SceneId::Intro, SceneId::Demonstration]);
}

#[test]
fn invalid_windows_are_rejected() {
    let fps = Fps::new(30, 1).unwrap();
    for (start, end) in [(0.5, 0.5), (0.6, 0.2), (-0.1, 0.2), (0.2, 1.5), (f64::NAN, 0.3)] {
        let err = Timeline::new(
            1_000.0,
            fps,
            vec![SceneWindow::new(SceneId::Intro, start, end, noop)],
        )
        .unwrap_err();
        assert!(
            matches!(err, ReelError::InvalidWindow { ref scene, .. } if scene == "intro"),
            "{start}..{end}: {err}"
        );
    }
}

#[test]
fn non_positive_duration_is_rejected() {
    let fps = Fps::new(30, 1).unwrap();
    assert!(matches!(
        Timeline::new(0.0, fps, Vec::new()),
        Err(ReelError::Validation(_))
    ));
    assert!(Timeline::new(f64::NAN, fps, Vec::new()).is_err());
}

#[test]
fn promo_frame_count_is_450() {
    assert_eq!(promo().frame_count(), 450);
}

#[test]
fn paint_scenes_draws_only_active_scene_text() {
    let t = promo();
    let copy = PromoCopy::default();
    let frame = SceneFrame::new(1080.0, 1920.0, &copy);
    let mut rec = RecordingSurface::new(Canvas::PROMO);
    rec.begin_frame();
    t.paint_scenes(&mut rec, &frame, 0.1);
    assert!(rec.find_text(&copy.title).is_some());
    assert!(rec.find_text(&copy.caption).is_none());
    assert!(rec.find_text(&copy.cta_offer).is_none());
}
