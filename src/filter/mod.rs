//! Noise, skip-list and restricted-name filtering

mod noise;
mod restricted;
mod skip;

pub use noise::{NoiseConfig, NoiseLoadError};
pub use restricted::RestrictedList;
pub use skip::SkipList;
