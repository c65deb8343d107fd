//! Frame capture: container negotiation, recorder backends, the capture session state machine and
//! the registry holding finished recordings.

pub(crate) mod blob;
pub(crate) mod ffmpeg;
pub(crate) mod pipeline;
pub(crate) mod recorder;
