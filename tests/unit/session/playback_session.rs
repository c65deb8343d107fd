use super::*;
use crate::capture::recorder::{ContainerFormat, InMemoryRecorder};
use crate::foundation::core::Canvas;
use crate::render::cpu::CpuSurface;

fn short_config() -> ReelConfig {
    ReelConfig {
        pixel_ratio: 0.05,
        duration_ms: 1_000.0,
        ..ReelConfig::default()
    }
}

fn session(config: &ReelConfig) -> PlaybackSession<CpuSurface, InMemoryRecorder> {
    let surface = CpuSurface::new(Canvas::PROMO, config.pixel_ratio).unwrap();
    PlaybackSession::new(config, surface, InMemoryRecorder::new()).unwrap()
}

#[test]
fn record_captures_the_bounded_frame_count() {
    let config = short_config();
    let mut s = session(&config);
    let artifact = s.record().unwrap();
    assert_eq!(artifact.frame_count, 30);
    assert_eq!(artifact.format, ContainerFormat::WebmVp9);
    assert_eq!(artifact.file_name(), "gas-safety-15s.webm");
    assert_eq!(artifact.bytes, 30 * 54 * 96 * 4);
    assert_eq!(s.capture_state(), CaptureState::Complete);
    assert_eq!(s.playback_state(), LoopState::Running);
}

#[test]
fn progress_is_published_while_running() {
    let config = short_config();
    let mut s = session(&config);
    s.start_playback();
    s.run_until(Timestamp(517.0)).unwrap();
    let p = s.progress();
    assert!(p.global_progress > 0.4 && p.global_progress < 0.55, "{p:?}");
    s.run_until(Timestamp(5_000.0)).unwrap();
    assert_eq!(s.progress().global_progress, 1.0);
}

#[test]
fn manual_capture_rejects_second_start() {
    let config = short_config();
    let mut s = session(&config);
    s.start_playback();
    s.run_until(Timestamp(100.0)).unwrap();
    s.start_capture().unwrap();
    assert!(matches!(s.start_capture(), Err(ReelError::AlreadyRecording)));
    s.run_until(Timestamp(400.0)).unwrap();
    s.stop_capture().unwrap();
    let artifact = s.artifact().unwrap();
    assert!(artifact.frame_count > 0 && artifact.frame_count < 30);
}

#[test]
fn cancelling_playback_does_not_cancel_capture() {
    let config = short_config();
    let mut s = session(&config);
    s.start_playback();
    s.run_until(Timestamp(50.0)).unwrap();
    s.start_capture().unwrap();
    s.cancel_playback();
    assert_eq!(s.playback_state(), LoopState::Stopped);
    assert_eq!(s.capture_state(), CaptureState::Recording);
    s.run_until(Timestamp(5_000.0)).unwrap();
    assert_eq!(s.capture_state(), CaptureState::Complete);
}

#[test]
fn cancelling_capture_does_not_stop_playback() {
    let config = short_config();
    let mut s = session(&config);
    s.start_playback();
    s.run_until(Timestamp(50.0)).unwrap();
    s.start_capture().unwrap();
    s.cancel_capture();
    assert_eq!(s.capture_state(), CaptureState::Failed);
    s.run_until(Timestamp(200.0)).unwrap();
    assert_eq!(s.playback_state(), LoopState::Running);
    assert!(s.progress().global_progress > 0.1);
}

#[test]
fn recording_again_releases_previous_artifact() {
    let config = short_config();
    let mut s = session(&config);
    let first = s.record().unwrap();
    let second = s.record().unwrap();
    assert_ne!(first.handle, second.handle);
    assert!(s.capture().blobs().get(&first.handle).is_none());
    assert_eq!(s.capture().blobs().live_count(), 1);
}

#[test]
fn record_without_encoder_fails() {
    let config = short_config();
    let surface = CpuSurface::new(Canvas::PROMO, config.pixel_ratio).unwrap();
    let mut s =
        PlaybackSession::new(&config, surface, InMemoryRecorder::with_supported(Vec::new()))
            .unwrap();
    assert!(matches!(s.record(), Err(ReelError::NoEncoderAvailable)));
    assert_eq!(s.capture_state(), CaptureState::Failed);
}
