// src/models.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::errors::{MatchError, MatchResult};

//------------------------------------------------------------------------------
// IDENTIFIER TYPES
//------------------------------------------------------------------------------
// Newtypes keep observer and candidate ids from being mixed up

/// Strongly typed identifier for a candidate profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Strongly typed identifier for the logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

//------------------------------------------------------------------------------
// GEOGRAPHY
//------------------------------------------------------------------------------

/// A latitude/longitude pair in degrees. No datum correction is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

// Deserialized coordinates go through the same validation as `GeoPoint::new`
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = MatchError;

    fn try_from(raw: RawGeoPoint) -> MatchResult<Self> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> MatchResult<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(MatchError::InvalidCoordinate(format!(
                "non-numeric coordinate ({}, {})",
                lat, lng
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(MatchError::InvalidCoordinate(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(MatchError::InvalidCoordinate(format!(
                "longitude {} outside [-180, 180]",
                lng
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Upstream rows may have either half of the coordinate missing
    pub fn from_optional(lat: Option<f64>, lng: Option<f64>) -> MatchResult<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Self::new(lat, lng),
            _ => Err(MatchError::InvalidCoordinate(format!(
                "missing coordinate component (lat: {:?}, lng: {:?})",
                lat, lng
            ))),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

//------------------------------------------------------------------------------
// CANDIDATES
//------------------------------------------------------------------------------

/// Where a candidate's avatar lives: a public URL or a storage handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AvatarRef {
    Url(Url),
    Handle(String),
}

impl AvatarRef {
    /// Absolute http(s) URLs become `Url`, everything else is an opaque handle
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => AvatarRef::Url(url),
            _ => AvatarRef::Handle(raw.to_string()),
        }
    }
}

/// A nearby user eligible for the radar or the swipe deck.
///
/// Replaced wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub display_name: String,
    #[serde(default)]
    pub avatar: Option<AvatarRef>,
    pub location: GeoPoint,
    /// Distance reported by the upstream query, if any
    #[serde(default)]
    pub distance_km: Option<f64>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, location: GeoPoint) -> Self {
        Self {
            id: CandidateId(id.into()),
            display_name: display_name.into(),
            avatar: None,
            location,
            distance_km: None,
        }
    }

    pub fn with_avatar(mut self, avatar: AvatarRef) -> Self {
        self.avatar = Some(avatar);
        self
    }

    pub fn with_distance_km(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }
}

//------------------------------------------------------------------------------
// SWIPES
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDecision {
    Like,
    Pass,
}

impl SwipeDecision {
    pub fn from_liked(liked: bool) -> Self {
        if liked {
            SwipeDecision::Like
        } else {
            SwipeDecision::Pass
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, SwipeDecision::Like)
    }
}

/// What the store reports back once a decision is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeOutcome {
    Passed,
    Liked,
    /// The target had already liked the observer
    Matched,
}
