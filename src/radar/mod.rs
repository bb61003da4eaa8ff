// src/radar/mod.rs

// Radar geometry: turns observer/candidate coordinates into marker positions

mod config;
mod core;
mod remap;
mod utils;

pub use self::config::{FULL_OPACITY, HIDDEN_OPACITY, OPACITY_TIERS};
pub use self::core::{
    Exclusion, RadarEngine, RadarProjection, RankedCandidate, Viewport, ZoomScale, opacity_for,
    project,
};
pub use self::remap::{LinearRemap, PowerRemap, RadiusRemap, SquareRootRemap};
pub use self::utils::{flat_earth_deltas_km, flat_earth_distance_km, haversine_distance_km};
