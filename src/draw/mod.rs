pub(crate) mod palette;
pub(crate) mod record;
pub(crate) mod shapes;
pub(crate) mod surface;
