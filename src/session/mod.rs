//! Orchestration of the host event loop, animation loop and capture pipeline.

pub(crate) mod playback_session;
