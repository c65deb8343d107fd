use crate::draw::surface::Surface;
use crate::foundation::error::ReelResult;
use crate::scene::SceneFrame;
use crate::scene::layers::{paint_background, paint_footer};
use crate::timeline::model::Timeline;

/// Paint one complete frame at `progress`: background wash, active scenes in list order, footer.
///
/// Idempotent for a given `progress`; every call starts from a cleared surface.
pub fn compose_frame(
    surface: &mut dyn Surface,
    timeline: &Timeline,
    frame: &SceneFrame<'_>,
    progress: f64,
) -> ReelResult<()> {
    surface.begin_frame();
    paint_background(surface, frame, progress);
    timeline.paint_scenes(surface, frame, progress);
    paint_footer(surface, frame);
    surface.end_frame()
}
