//! The self-rescheduling animation loop that turns frame callbacks into painted frames.

pub(crate) mod frame_loop;
