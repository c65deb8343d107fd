//! Scene windows over normalized time and the playback state derived from host timestamps.

pub(crate) mod model;
pub(crate) mod playback;
