use super::*;

#[test]
fn idle_loop_yields_nothing() {
    let mut ev = EventLoop::new(60.0).unwrap();
    assert!(ev.is_idle());
    assert_eq!(ev.next_event(), None);
}

#[test]
fn rejects_non_positive_refresh_rate() {
    assert!(EventLoop::new(0.0).is_err());
    assert!(EventLoop::new(f64::NAN).is_err());
}

#[test]
fn frames_land_on_refresh_boundaries() {
    let mut ev = EventLoop::new(50.0).unwrap();
    let mut stamps = Vec::new();
    for _ in 0..3 {
        ev.request_frame();
        match ev.next_event() {
            Some(HostEvent::Frame(ts)) => stamps.push(ts.ms()),
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(stamps, vec![20.0, 40.0, 60.0]);
}

#[test]
fn several_requests_share_one_refresh() {
    let mut ev = EventLoop::new(50.0).unwrap();
    ev.request_frame();
    ev.request_frame();
    assert_eq!(ev.next_event(), Some(HostEvent::Frame(Timestamp(20.0))));
    assert_eq!(ev.next_event(), None);
}

#[test]
fn cancelled_frame_request_never_fires() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let id = ev.request_frame();
    ev.cancel_frame(id);
    ev.cancel_frame(id);
    assert_eq!(ev.next_event(), None);
}

#[test]
fn timers_win_ties_and_keep_registration_order() {
    let mut ev = EventLoop::new(50.0).unwrap();
    let a = ev.set_timeout(20.0);
    let b = ev.set_timeout(20.0);
    ev.request_frame();
    assert_eq!(ev.next_event(), Some(HostEvent::Timer(a)));
    assert_eq!(ev.next_event(), Some(HostEvent::Timer(b)));
    assert_eq!(ev.next_event(), Some(HostEvent::Frame(Timestamp(20.0))));
}

#[test]
fn timer_on_a_refresh_boundary_keeps_that_refresh() {
    let mut ev = EventLoop::new(50.0).unwrap();
    ev.request_frame();
    assert_eq!(ev.next_event(), Some(HostEvent::Frame(Timestamp(20.0))));

    let t = ev.set_timeout(20.0);
    assert_eq!(ev.next_event(), Some(HostEvent::Timer(t)));
    assert_eq!(ev.now(), Timestamp(40.0));
    ev.request_frame();
    assert_eq!(ev.next_event(), Some(HostEvent::Frame(Timestamp(40.0))));
    ev.request_frame();
    assert_eq!(ev.next_event(), Some(HostEvent::Frame(Timestamp(60.0))));
}

#[test]
fn cleared_timer_does_not_fire() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let t = ev.set_timeout(5.0);
    assert_eq!(ev.pending_timers(), 1);
    ev.clear_timeout(t);
    assert_eq!(ev.next_event(), None);
}

#[test]
fn refresh_after_idle_gap_is_not_in_the_past() {
    let mut ev = EventLoop::new(50.0).unwrap();
    let t = ev.set_timeout(95.0);
    assert_eq!(ev.next_event(), Some(HostEvent::Timer(t)));
    assert_eq!(ev.now(), Timestamp(95.0));
    ev.request_frame();
    assert_eq!(ev.next_event(), Some(HostEvent::Frame(Timestamp(100.0))));
}

#[test]
fn jitter_is_seeded_bounded_and_monotonic() {
    let run = |seed| {
        let mut ev = EventLoop::new(60.0).unwrap().with_jitter(4.0, seed);
        let mut out = Vec::new();
        for _ in 0..100 {
            ev.request_frame();
            if let Some(HostEvent::Frame(ts)) = ev.next_event() {
                out.push(ts.ms());
            }
        }
        out
    };
    let a = run(7);
    assert_eq!(a, run(7));
    assert_ne!(a, run(8));
    let interval = 1000.0 / 60.0;
    for (k, ts) in a.iter().enumerate() {
        let base = (k as f64 + 1.0) * interval;
        assert!(*ts >= base && *ts < base + 4.0, "frame {k} at {ts}");
    }
    assert!(a.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn peek_matches_next_event_time() {
    let mut ev = EventLoop::new(60.0).unwrap().with_jitter(3.0, 11);
    assert_eq!(ev.peek_time(), None);
    ev.set_timeout(100.0);
    ev.request_frame();
    let peeked = ev.peek_time().unwrap();
    assert!(matches!(ev.next_event(), Some(HostEvent::Frame(ts)) if ts == peeked));
    assert_eq!(ev.peek_time(), Some(Timestamp(100.0)));
}
