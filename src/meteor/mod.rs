//! Meteor trajectories, motion-curve synthesis, and spawn scheduling.

pub(crate) mod host;
pub(crate) mod keyframes;
pub(crate) mod scheduler;
pub(crate) mod timers;
pub(crate) mod trajectory;
