pub(crate) mod planner;
pub(crate) mod strategy;

pub use planner::{
    CROSSFADE_SECS, DOWNBEAT_PULSE_SECS, SPARKLE_SECS, SUBMODEL_ROTATION, plan, target_models,
};
pub use strategy::Strategy;
