use super::*;
use crate::foundation::core::Fps;

fn promo() -> Timeline {
    Timeline::promo(15_000.0, Fps::new(30, 1).unwrap()).unwrap()
}

#[test]
fn first_advance_sets_origin_and_zero_progress() {
    let t = promo();
    let s = PlaybackState::default().advance(Timestamp(1_234.0), &t);
    assert_eq!(s.origin, Some(Timestamp(1_234.0)));
    assert_eq!(s.elapsed_ms, 0.0);
    assert_eq!(s.global_progress, 0.0);
    assert!(s.is_primed());
}

#[test]
fn origin_is_never_reassigned() {
    let t = promo();
    let s = PlaybackState::default()
        .advance(Timestamp(100.0), &t)
        .advance(Timestamp(7_600.0), &t);
    assert_eq!(s.origin, Some(Timestamp(100.0)));
    assert_eq!(s.elapsed_ms, 7_500.0);
    assert_eq!(s.global_progress, 0.5);
}

#[test]
fn progress_holds_at_one_past_duration() {
    let t = promo();
    let s = PlaybackState::default()
        .advance(Timestamp(0.0), &t)
        .advance(Timestamp(60_000.0), &t);
    assert_eq!(s.global_progress, 1.0);
}

#[test]
fn readout_clones_share_published_snapshot() {
    let t = promo();
    let readout = ProgressReadout::new();
    let reader = readout.clone();
    assert_eq!(reader.snapshot(), ProgressSnapshot::default());
    let s = PlaybackState::default()
        .advance(Timestamp(0.0), &t)
        .advance(Timestamp(3_000.0), &t);
    readout.publish(&s);
    let snap = reader.snapshot();
    assert!((snap.global_progress - 0.2).abs() < 1e-12);
    assert!((snap.elapsed_secs - 3.0).abs() < 1e-12);
}

#[test]
fn concurrent_reader_never_sees_a_torn_snapshot() {
    let t = promo();
    let readout = ProgressReadout::new();
    let reader = readout.clone();
    std::thread::scope(|scope| {
        scope.spawn(|| {
            let mut s = PlaybackState::default().advance(Timestamp(0.0), &t);
            for k in 0..=15_000 {
                s = s.advance(Timestamp(f64::from(k)), &t);
                readout.publish(&s);
            }
        });
        for _ in 0..20_000 {
            let snap = reader.snapshot();
            let expected = (snap.elapsed_secs * 1000.0 / 15_000.0).min(1.0);
            assert!(
                (snap.global_progress - expected).abs() < 1e-9,
                "torn snapshot {snap:?}"
            );
        }
    });
}
