// src/radar/config.rs
//
// Contains configuration constants for the radar projection

/// Opacity bands for radar markers, checked in order
/// Format: (fraction_of_max_distance, opacity). A candidate further than the
/// fraction gets that opacity; anything closer than every fraction is opaque.
pub const OPACITY_TIERS: [(f64, f64); 2] = [
    (0.85, 0.35), // Far edge of the radar: faint
    (0.6, 0.7),   // Outer ring: dimmed
];

pub const FULL_OPACITY: f64 = 1.0;

// Reported for candidates that are not rendered
pub const HIDDEN_OPACITY: f64 = 0.0;
