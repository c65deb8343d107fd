use super::*;
use crate::draw::record::RecordingSurface;
use crate::foundation::core::{Canvas, Fps};
use crate::host::event_loop::{EventLoop, HostEvent};

fn promo_loop() -> AnimationLoop {
    let timeline = Timeline::promo(15_000.0, Fps::new(30, 1).unwrap()).unwrap();
    AnimationLoop::new(timeline, PromoCopy::default())
}

fn next_frame(ev: &mut EventLoop) -> Timestamp {
    match ev.next_event() {
        Some(HostEvent::Frame(ts)) => ts,
        other => panic!("expected frame, got {other:?}"),
    }
}

#[test]
fn first_callback_primes_without_painting() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let mut surface = RecordingSurface::new(Canvas::PROMO);
    let mut lp = promo_loop();
    lp.start(&mut ev);
    assert_eq!(lp.state(), LoopState::Running);

    let ts = next_frame(&mut ev);
    let out = lp.on_frame(ts, &mut surface, &mut ev).unwrap();
    assert_eq!(out, TickOutcome::Primed);
    assert_eq!(surface.frames_completed(), 0);
    assert_eq!(lp.playback().origin, Some(ts));
    assert!(ev.has_pending_frame());

    let ts = next_frame(&mut ev);
    let out = lp.on_frame(ts, &mut surface, &mut ev).unwrap();
    assert!(matches!(out, TickOutcome::Painted { progress } if progress > 0.0));
    assert_eq!(surface.frames_completed(), 1);
    assert_eq!(lp.ticks(), 1);
}

#[test]
fn start_twice_requests_one_frame() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let mut lp = promo_loop();
    lp.start(&mut ev);
    lp.start(&mut ev);
    assert!(ev.has_pending_frame());
    next_frame(&mut ev);
    assert_eq!(ev.next_event(), None);
}

#[test]
fn progress_holds_at_one_and_loop_keeps_running() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let mut surface = RecordingSurface::new(Canvas::PROMO);
    let mut lp = promo_loop();
    let readout = lp.readout();
    lp.start(&mut ev);
    while ev.now().ms() < 16_000.0 {
        let ts = next_frame(&mut ev);
        lp.on_frame(ts, &mut surface, &mut ev).unwrap();
    }
    assert_eq!(lp.state(), LoopState::Running);
    assert_eq!(readout.snapshot().global_progress, 1.0);
    assert!(surface.find_text(&PromoCopy::default().cta_action).is_some());
}

#[test]
fn cancel_is_idempotent_and_withdraws_pending_request() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let mut lp = promo_loop();
    lp.start(&mut ev);
    lp.cancel(&mut ev);
    lp.cancel(&mut ev);
    assert_eq!(lp.state(), LoopState::Stopped);
    assert_eq!(ev.next_event(), None);
}

#[test]
fn cancel_token_stops_at_next_tick_without_painting() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let mut surface = RecordingSurface::new(Canvas::PROMO);
    let mut lp = promo_loop();
    let token = lp.cancel_token();
    lp.start(&mut ev);
    let ts = next_frame(&mut ev);
    lp.on_frame(ts, &mut surface, &mut ev).unwrap();

    token.cancel();
    let ts = next_frame(&mut ev);
    assert_eq!(
        lp.on_frame(ts, &mut surface, &mut ev).unwrap(),
        TickOutcome::Stopped
    );
    assert_eq!(surface.frames_completed(), 0);
    assert_eq!(lp.state(), LoopState::Stopped);
    assert!(!ev.has_pending_frame());
}

#[test]
fn callbacks_before_start_do_nothing() {
    let mut ev = EventLoop::new(60.0).unwrap();
    let mut surface = RecordingSurface::new(Canvas::PROMO);
    let mut lp = promo_loop();
    assert_eq!(
        lp.on_frame(Timestamp(5.0), &mut surface, &mut ev).unwrap(),
        TickOutcome::Stopped
    );
    assert_eq!(lp.state(), LoopState::NotStarted);
    assert!(!ev.has_pending_frame());
}
