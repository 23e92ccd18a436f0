//! Drawing surfaces, frame scheduling, and the star-field draw loop.

pub(crate) mod cpu;
pub(crate) mod renderer;
pub(crate) mod surface;
