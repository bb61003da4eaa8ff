// src/radar/remap.rs
//
// Strategies mapping real distance onto the radar radius

/// Maps a distance ratio in [0, 1] (distance / max distance) to a radius
/// ratio in [0, 1]. Implementations must be monotonically non-decreasing.
pub trait RadiusRemap {
    fn normalize(&self, ratio: f64) -> f64;
}

/// Square-root remap: spreads out nearby clusters and compresses the far
/// end. Candidates under 20 km would otherwise sit within a few pixels of
/// the center on a 200 km radar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SquareRootRemap;

impl RadiusRemap for SquareRootRemap {
    fn normalize(&self, ratio: f64) -> f64 {
        ratio.clamp(0.0, 1.0).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearRemap;

impl RadiusRemap for LinearRemap {
    fn normalize(&self, ratio: f64) -> f64 {
        ratio.clamp(0.0, 1.0)
    }
}

/// `ratio^exponent`. Exponents below 1 expand the near range,
/// above 1 expand the far range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerRemap {
    pub exponent: f64,
}

impl RadiusRemap for PowerRemap {
    fn normalize(&self, ratio: f64) -> f64 {
        if self.exponent <= 0.0 || !self.exponent.is_finite() {
            return LinearRemap.normalize(ratio);
        }
        ratio.clamp(0.0, 1.0).powf(self.exponent)
    }
}
