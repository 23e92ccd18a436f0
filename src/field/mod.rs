//! Procedural star and planet population.

pub(crate) mod generator;
pub(crate) mod model;
