// src/radar/core.rs

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_ZOOM_SCALE, MAX_ZOOM_SCALE, MIN_ZOOM_SCALE, RadarConfig};
use crate::models::{Candidate, CandidateId, GeoPoint};

use super::config::{FULL_OPACITY, HIDDEN_OPACITY, OPACITY_TIERS};
use super::remap::{RadiusRemap, SquareRootRemap};
use super::utils::flat_earth_deltas_km;

/// Screen geometry of the radar widget, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub max_radius_px: f64,
}

/// Pinch zoom multiplier, always within [MIN_ZOOM_SCALE, MAX_ZOOM_SCALE]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct ZoomScale(f64);

impl ZoomScale {
    /// Clamps into range. Non-finite or non-positive input falls back to the default.
    pub fn new(scale: f64) -> Self {
        if !scale.is_finite() || scale <= 0.0 {
            return ZoomScale::default();
        }
        ZoomScale(scale.clamp(MIN_ZOOM_SCALE, MAX_ZOOM_SCALE))
    }

    /// Applies a pinch gesture factor on top of the current scale
    pub fn pinch(self, factor: f64) -> Self {
        if !factor.is_finite() || factor <= 0.0 {
            return self;
        }
        ZoomScale::new(self.0 * factor)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

// Persisted scales are clamped on the way back in
impl From<f64> for ZoomScale {
    fn from(scale: f64) -> Self {
        ZoomScale::new(scale)
    }
}

impl Default for ZoomScale {
    fn default() -> Self {
        ZoomScale(DEFAULT_ZOOM_SCALE)
    }
}

/// Why a candidate is left off the radar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Beyond the configured maximum distance
    OutOfRange,
    /// Practically on top of the observer
    TooClose,
}

/// Per-render marker placement for one candidate. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarProjection {
    pub x: f64,
    pub y: f64,
    pub radius_px: f64,
    pub opacity: f64,
    pub distance_km: f64,
    /// `distance_km <= max_distance_km`
    pub is_within_range: bool,
    pub exclusion: Option<Exclusion>,
}

impl RadarProjection {
    pub fn is_rendered(&self) -> bool {
        self.exclusion.is_none()
    }

    fn hidden(
        viewport: &Viewport,
        distance_km: f64,
        is_within_range: bool,
        reason: Exclusion,
    ) -> Self {
        Self {
            x: viewport.center_x,
            y: viewport.center_y,
            radius_px: 0.0,
            opacity: HIDDEN_OPACITY,
            distance_km,
            is_within_range,
            exclusion: Some(reason),
        }
    }
}

/// A rendered candidate paired with its projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: CandidateId,
    pub projection: RadarProjection,
}

/// Projects candidates onto the radar with a configurable distance remap
#[derive(Debug, Clone, Default)]
pub struct RadarEngine<R = SquareRootRemap> {
    config: RadarConfig,
    remap: R,
}

impl RadarEngine<SquareRootRemap> {
    pub fn new(config: RadarConfig) -> Self {
        Self {
            config,
            remap: SquareRootRemap,
        }
    }
}

impl<R: RadiusRemap> RadarEngine<R> {
    pub fn with_remap(config: RadarConfig, remap: R) -> Self {
        Self { config, remap }
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn project(
        &self,
        observer: GeoPoint,
        candidate: GeoPoint,
        viewport: &Viewport,
        scale: ZoomScale,
    ) -> RadarProjection {
        let max_km = self.config.max_distance_km;
        let (delta_lat_km, delta_lng_km) = flat_earth_deltas_km(observer, candidate);
        let distance_km = delta_lat_km.hypot(delta_lng_km);

        if distance_km > max_km {
            return RadarProjection::hidden(viewport, distance_km, false, Exclusion::OutOfRange);
        }
        if distance_km < self.config.min_real_distance_km {
            return RadarProjection::hidden(viewport, distance_km, true, Exclusion::TooClose);
        }

        let min_px = self.config.min_radar_radius_px;
        // A viewport smaller than the minimum ring pins every marker to it
        let max_px = viewport.max_radius_px.max(min_px);
        let normalized = self.remap.normalize(distance_km / max_km).clamp(0.0, 1.0);
        let radius_px = min_px + normalized * (max_px - min_px);

        let angle = delta_lat_km.atan2(delta_lng_km);
        let x = viewport.center_x + radius_px * angle.cos() * scale.value();
        let y = viewport.center_y + radius_px * angle.sin() * scale.value();

        RadarProjection {
            x,
            y,
            radius_px,
            opacity: opacity_for(distance_km, max_km),
            distance_km,
            is_within_range: true,
            exclusion: None,
        }
    }

    /// Projects every candidate, drops the ones that are not rendered and
    /// ranks the rest nearest first.
    pub fn project_all(
        &self,
        observer: GeoPoint,
        candidates: &[Candidate],
        viewport: &Viewport,
        scale: ZoomScale,
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = Vec::with_capacity(candidates.len());
        let mut excluded = 0usize;

        for candidate in candidates {
            let projection = self.project(observer, candidate.location, viewport, scale);
            if let Some(reason) = projection.exclusion {
                trace!(
                    "Radar - skipping candidate {} at {:.3} km: {:?}",
                    candidate.id, projection.distance_km, reason
                );
                excluded += 1;
                continue;
            }
            ranked.push(RankedCandidate {
                id: candidate.id.clone(),
                projection,
            });
        }

        ranked.sort_by(|a, b| {
            a.projection
                .distance_km
                .total_cmp(&b.projection.distance_km)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        debug!(
            "Radar - projected {} candidates, {} rendered, {} excluded",
            candidates.len(),
            ranked.len(),
            excluded
        );
        ranked
    }
}

/// Discrete opacity band for an in-range distance
pub fn opacity_for(distance_km: f64, max_distance_km: f64) -> f64 {
    OPACITY_TIERS
        .iter()
        .find(|(fraction, _)| distance_km > fraction * max_distance_km)
        .map(|(_, opacity)| *opacity)
        .unwrap_or(FULL_OPACITY)
}

/// Projects with the default square-root remap
pub fn project(
    observer: GeoPoint,
    candidate: GeoPoint,
    viewport: &Viewport,
    scale: ZoomScale,
    config: &RadarConfig,
) -> RadarProjection {
    RadarEngine::new(config.clone()).project(observer, candidate, viewport, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::remap::LinearRemap;

    const VIEWPORT: Viewport = Viewport {
        center_x: 150.0,
        center_y: 150.0,
        max_radius_px: 300.0,
    };

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    fn engine() -> RadarEngine {
        RadarEngine::new(RadarConfig::default())
    }

    #[test]
    fn test_ten_km_north_example() {
        let p = engine().project(
            point(10.0, -66.0),
            point(10.09, -66.0),
            &VIEWPORT,
            ZoomScale::default(),
        );
        assert!(p.is_within_range);
        assert!(p.is_rendered());
        assert!((p.distance_km - 9.99).abs() < 1e-6);
        let expected_radius = 60.0 + (9.99f64 / 200.0).sqrt() * 240.0;
        assert!((p.radius_px - expected_radius).abs() < 1e-6);
        assert!((p.radius_px - 113.6).abs() < 0.1);
        assert_eq!(p.opacity, 1.0);
        // Pure latitude offset lands on the vertical axis
        assert!((p.x - 150.0).abs() < 1e-9);
        assert!((p.y - (150.0 + expected_radius)).abs() < 1e-6);
    }

    #[test]
    fn test_beyond_max_distance_is_out_of_range() {
        // ~222 km north
        let p = engine().project(
            point(10.0, -66.0),
            point(12.0, -66.0),
            &VIEWPORT,
            ZoomScale::default(),
        );
        assert!(!p.is_within_range);
        assert_eq!(p.exclusion, Some(Exclusion::OutOfRange));
        assert!(!p.is_rendered());
    }

    #[test]
    fn test_coincident_candidate_is_excluded() {
        let observer = point(10.0, -66.0);
        let p = engine().project(observer, observer, &VIEWPORT, ZoomScale::default());
        assert_eq!(p.exclusion, Some(Exclusion::TooClose));
        assert!(p.is_within_range);
        assert!(!p.is_rendered());

        // ~5.5 m east
        let near =
            engine().project(observer, point(10.0, -65.99995), &VIEWPORT, ZoomScale::default());
        assert_eq!(near.exclusion, Some(Exclusion::TooClose));
    }

    #[test]
    fn test_radius_monotonic_and_bounded() {
        let engine = engine();
        let observer = point(0.0, 0.0);
        let mut last_radius = 0.0;
        let mut lat_offset = 0.0001;
        while lat_offset * 111.0 <= 200.0 {
            let p =
                engine.project(observer, point(lat_offset, 0.0), &VIEWPORT, ZoomScale::default());
            if p.is_rendered() {
                assert!(p.radius_px >= last_radius);
                assert!(p.radius_px >= 60.0 && p.radius_px <= 300.0);
                last_radius = p.radius_px;
            }
            lat_offset *= 1.3;
        }
        assert!(last_radius > 250.0);
    }

    #[test]
    fn test_opacity_tiers() {
        assert_eq!(opacity_for(10.0, 200.0), 1.0);
        assert_eq!(opacity_for(119.9, 200.0), 1.0);
        // Tier edges belong to the nearer tier
        assert_eq!(opacity_for(120.0, 200.0), 1.0);
        assert_eq!(opacity_for(170.0, 200.0), 0.7);
        assert_eq!(opacity_for(120.5, 200.0), 0.7);
        assert_eq!(opacity_for(169.9, 200.0), 0.7);
        assert_eq!(opacity_for(170.5, 200.0), 0.35);
        assert_eq!(opacity_for(200.0, 200.0), 0.35);

        let engine = engine();
        let observer = point(0.0, 0.0);
        for lat in [0.01, 0.5, 1.1, 1.5, 1.7] {
            let p = engine.project(observer, point(lat, 0.0), &VIEWPORT, ZoomScale::default());
            assert!([0.35, 0.7, 1.0].contains(&p.opacity), "opacity {}", p.opacity);
        }
    }

    #[test]
    fn test_scale_moves_marker_not_radius() {
        let engine = engine();
        let observer = point(0.0, 0.0);
        let candidate = point(0.0, 0.5);
        let base = engine.project(observer, candidate, &VIEWPORT, ZoomScale::default());
        let zoomed = engine.project(observer, candidate, &VIEWPORT, ZoomScale::new(2.0));
        assert_eq!(base.radius_px, zoomed.radius_px);
        assert!(((zoomed.x - 150.0) - 2.0 * (base.x - 150.0)).abs() < 1e-9);
        // East of the observer sits on the positive x axis
        assert!(base.x > 150.0);
        assert!((base.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_scale_clamps() {
        assert_eq!(ZoomScale::new(5.0).value(), 2.0);
        assert_eq!(ZoomScale::new(0.1).value(), 0.5);
        assert_eq!(ZoomScale::new(-1.0).value(), 1.0);
        assert_eq!(ZoomScale::new(f64::NAN).value(), 1.0);
        assert_eq!(ZoomScale::new(1.5).pinch(2.0).value(), 2.0);
        assert_eq!(ZoomScale::new(1.0).pinch(0.75).value(), 0.75);
        assert_eq!(ZoomScale::new(1.0).pinch(0.0).value(), 1.0);
    }

    #[test]
    fn test_zoom_scale_deserialize_clamps() {
        let zoomed_in: ZoomScale = serde_json::from_str("10.0").unwrap();
        assert_eq!(zoomed_in.value(), 2.0);
        let zoomed_out: ZoomScale = serde_json::from_str("0.1").unwrap();
        assert_eq!(zoomed_out.value(), 0.5);
        let negative: ZoomScale = serde_json::from_str("-3").unwrap();
        assert_eq!(negative.value(), 1.0);
        assert_eq!(serde_json::to_string(&ZoomScale::new(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_linear_remap_places_markers_further_in() {
        let sqrt_engine = engine();
        let linear_engine = RadarEngine::with_remap(RadarConfig::default(), LinearRemap);
        let observer = point(0.0, 0.0);
        let candidate = point(0.18, 0.0);
        let a = sqrt_engine.project(observer, candidate, &VIEWPORT, ZoomScale::default());
        let b = linear_engine.project(observer, candidate, &VIEWPORT, ZoomScale::default());
        assert!(b.radius_px < a.radius_px);
        assert_eq!(a.distance_km, b.distance_km);
    }

    #[test]
    fn test_project_all_ranks_and_filters() {
        let observer = point(10.0, -66.0);
        let candidates = vec![
            Candidate::new("far", "Far", point(10.5, -66.0)),
            Candidate::new("gone", "Gone", point(13.0, -66.0)),
            Candidate::new("near", "Near", point(10.01, -66.0)),
            Candidate::new("self", "Same spot", observer),
            Candidate::new("mid", "Mid", point(10.0, -65.8)),
        ];
        let ranked = engine().project_all(observer, &candidates, &VIEWPORT, ZoomScale::default());
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["near", "mid", "far"]);
        assert!(ranked.iter().all(|r| r.projection.is_within_range));
    }

    #[test]
    fn test_free_project_uses_config() {
        let config = RadarConfig {
            max_distance_km: 5.0,
            ..RadarConfig::default()
        };
        let p = project(
            point(10.0, -66.0),
            point(10.09, -66.0),
            &VIEWPORT,
            ZoomScale::default(),
            &config,
        );
        assert!(!p.is_within_range);
    }
}
