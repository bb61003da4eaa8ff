// src/lib.rs
pub mod config;
pub mod errors;
pub mod models;
pub mod radar;
pub mod swipe;

// Re-export common types for easier access
pub use errors::{MatchError, MatchResult};
pub use models::{
    AvatarRef, Candidate, CandidateId, GeoPoint, ObserverId, SwipeDecision, SwipeOutcome,
};

// Re-export important functionality
pub use radar::{RadarEngine, RadarProjection, Viewport, ZoomScale};
pub use swipe::{SwipeSession, SwipeWindow, SwipeableBatch};
