// src/config.rs

use log::{debug, info};
use std::path::Path;
use std::str::FromStr;

use crate::errors::{MatchError, MatchResult};

//------------------------------------------------------------------------------
// RADAR DEFAULTS
//------------------------------------------------------------------------------

// Candidates further than this are not drawn on the radar
pub const MAX_DISTANCE_KM: f64 = 200.0;

// Roughly 10 m; closer candidates would collide with the observer marker
pub const MIN_REAL_DISTANCE_KM: f64 = 0.01;

// Closest any marker may render to the radar center
pub const MIN_RADAR_RADIUS_PX: f64 = 60.0;

// Flat-earth approximation, no geodesic correction
pub const KM_PER_DEGREE: f64 = 111.0;

// Pinch zoom bounds
pub const MIN_ZOOM_SCALE: f64 = 0.5;
pub const MAX_ZOOM_SCALE: f64 = 2.0;
pub const DEFAULT_ZOOM_SCALE: f64 = 1.0;

//------------------------------------------------------------------------------
// SWIPE DEFAULTS
//------------------------------------------------------------------------------

pub const MAX_SWIPES_PER_DAY: u32 = 50;
pub const SWIPE_WINDOW_HOURS: i64 = 24;
pub const BATCH_MAX_SIZE: usize = 10;

// Files checked in order for environment overrides
pub const ENV_PATHS: [&str; 3] = [".env", ".env.local", "../.env"];

/// Tuning values for the radar projection
#[derive(Debug, Clone, PartialEq)]
pub struct RadarConfig {
    pub max_distance_km: f64,
    pub min_real_distance_km: f64,
    pub min_radar_radius_px: f64,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            max_distance_km: MAX_DISTANCE_KM,
            min_real_distance_km: MIN_REAL_DISTANCE_KM,
            min_radar_radius_px: MIN_RADAR_RADIUS_PX,
        }
    }
}

impl RadarConfig {
    fn validate(self) -> MatchResult<Self> {
        if !(self.max_distance_km.is_finite() && self.max_distance_km > 0.0) {
            return Err(MatchError::Config(format!(
                "max_distance_km must be positive, got {}",
                self.max_distance_km
            )));
        }
        if !(self.min_real_distance_km >= 0.0 && self.min_real_distance_km < self.max_distance_km)
        {
            return Err(MatchError::Config(format!(
                "min_real_distance_km must be in [0, {}), got {}",
                self.max_distance_km, self.min_real_distance_km
            )));
        }
        if !(self.min_radar_radius_px.is_finite() && self.min_radar_radius_px >= 0.0) {
            return Err(MatchError::Config(format!(
                "min_radar_radius_px must be non-negative, got {}",
                self.min_radar_radius_px
            )));
        }
        Ok(self)
    }
}

/// Limits for the swipe window and batch
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeConfig {
    pub max_swipes_per_day: u32,
    pub window: chrono::Duration,
    pub batch_max_size: usize,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            max_swipes_per_day: MAX_SWIPES_PER_DAY,
            window: chrono::Duration::hours(SWIPE_WINDOW_HOURS),
            batch_max_size: BATCH_MAX_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub radar: RadarConfig,
    pub swipe: SwipeConfig,
}

impl AppConfig {
    /// Loads the first `.env` file found, then reads `NEARBY_*` overrides
    /// from the process environment.
    pub fn from_env() -> MatchResult<Self> {
        load_env_files();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing keys keep
    /// their defaults; present but unparsable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> MatchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let radar = RadarConfig {
            max_distance_km: parse_or(
                &lookup,
                "NEARBY_MAX_DISTANCE_KM",
                defaults.radar.max_distance_km,
            )?,
            min_real_distance_km: parse_or(
                &lookup,
                "NEARBY_MIN_REAL_DISTANCE_KM",
                defaults.radar.min_real_distance_km,
            )?,
            min_radar_radius_px: parse_or(
                &lookup,
                "NEARBY_MIN_RADAR_RADIUS_PX",
                defaults.radar.min_radar_radius_px,
            )?,
        }
        .validate()?;

        let window_hours: i64 =
            parse_or(&lookup, "NEARBY_SWIPE_WINDOW_HOURS", SWIPE_WINDOW_HOURS)?;
        if window_hours <= 0 {
            return Err(MatchError::Config(format!(
                "NEARBY_SWIPE_WINDOW_HOURS must be positive, got {}",
                window_hours
            )));
        }
        let batch_max_size: usize =
            parse_or(&lookup, "NEARBY_BATCH_MAX_SIZE", defaults.swipe.batch_max_size)?;
        if batch_max_size == 0 {
            return Err(MatchError::Config(
                "NEARBY_BATCH_MAX_SIZE must be at least 1".to_string(),
            ));
        }

        let swipe = SwipeConfig {
            max_swipes_per_day: parse_or(
                &lookup,
                "NEARBY_MAX_SWIPES_PER_DAY",
                defaults.swipe.max_swipes_per_day,
            )?,
            window: chrono::Duration::hours(window_hours),
            batch_max_size,
        };

        info!(
            "Radar config: max_distance={}km, min_distance={}km, min_radius={}px",
            radar.max_distance_km,
            radar.min_real_distance_km,
            radar.min_radar_radius_px
        );
        info!(
            "Swipe config: swipes/window={}, window={}h, batch={}",
            swipe.max_swipes_per_day,
            window_hours,
            swipe.batch_max_size
        );

        Ok(AppConfig { radar, swipe })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> MatchResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| MatchError::Config(format!("{} = {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

/// Loads the first env file that exists. Values already set in the
/// process environment win.
pub fn load_env_files() -> bool {
    for path in ENV_PATHS.iter() {
        if Path::new(path).exists() {
            match dotenv::from_filename(path) {
                Ok(_) => {
                    info!("Loaded environment variables from {}", path);
                    return true;
                }
                Err(e) => debug!("Failed to load environment from {}: {}", path, e),
            }
        }
    }
    debug!("No .env file found, using environment variables from system");
    false
}
