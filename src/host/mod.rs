//! Host facilities: display-synchronized frame callbacks and one-shot timers on a virtual clock.

pub(crate) mod event_loop;
