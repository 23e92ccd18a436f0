//! Easing, keyframe curves, and the star twinkle animator.

pub(crate) mod curve;
pub(crate) mod ease;
pub(crate) mod twinkle;
