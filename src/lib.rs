//! promoreel is a deterministic scene-timeline compositor for a fixed 15 second vertical promo.
//!
//! A [`Timeline`] maps normalized playback progress onto four timed scenes. An
//! [`AnimationLoop`] driven by display-synchronized callbacks from an [`EventLoop`] composes
//! every frame onto a [`Surface`]: background wash, active scenes, footer watermark. A
//! [`CapturePipeline`] samples painted frames on a fixed-rate schedule and hands them to a
//! [`Recorder`] that produces a WebM or MP4 artifact.
//!
//! - Build a [`ReelConfig`] (defaults match the 1080×1920, 15 s, 30 fps promo)
//! - Create a [`PlaybackSession`] over a [`CpuSurface`] and a recorder
//! - Call [`PlaybackSession::record`] or step the session manually
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod capture;
pub(crate) mod config;
pub(crate) mod draw;
pub(crate) mod driver;
pub(crate) mod host;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;
pub(crate) mod timeline;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, Point, Rect, Rgba8, Timestamp, Vec2,
};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::animation::ease::{ease_in_out, fade_in};
pub use crate::capture::blob::{BlobHandle, BlobRegistry};
pub use crate::capture::ffmpeg::{FfmpegRecorder, is_ffmpeg_on_path};
pub use crate::capture::pipeline::{
    CaptureArtifact, CapturePipeline, CaptureSession, CaptureState,
};
pub use crate::capture::recorder::{ContainerFormat, InMemoryRecorder, Recorder, RecorderConfig};
pub use crate::config::{MAX_PIXEL_RATIO, PromoCopy, ReelConfig};
pub use crate::draw::record::{DrawCommand, RecordingSurface};
pub use crate::draw::shapes::{
    draw_brand_glyph, draw_device, draw_house, draw_stove, fill_rounded_rect, rounded_rect_path,
};
pub use crate::draw::surface::{Surface, TextAlign, TextStyle, with_opacity};
pub use crate::driver::frame_loop::{AnimationLoop, LoopCancel, LoopState, TickOutcome};
pub use crate::host::event_loop::{
    EventLoop, FrameRequestId, FrameScheduler, HostEvent, TimerId, TimerScheduler,
};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::frame::{FrameRGBA, FrameSource};
pub use crate::scene::compose::compose_frame;
pub use crate::scene::layers::{paint_background, paint_footer};
pub use crate::scene::renderers::{
    render_call_to_action, render_demonstration, render_intro, render_value_proposition,
};
pub use crate::scene::{SceneFrame, SceneRenderer};
pub use crate::session::playback_session::PlaybackSession;
pub use crate::timeline::model::{ActiveScene, SceneId, SceneWindow, Timeline};
pub use crate::timeline::playback::{PlaybackState, ProgressReadout, ProgressSnapshot};
