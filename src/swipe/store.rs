// src/swipe/store.rs
//
// Collaborators the swipe session talks to: candidate lookup, swipe
// persistence and the clock. The in-memory versions back the demo binary
// and the tests.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{MatchError, MatchResult};
use crate::models::{Candidate, CandidateId, GeoPoint, ObserverId, SwipeDecision, SwipeOutcome};
use crate::radar::flat_earth_distance_km;

/// Geospatial query for users near the observer
#[allow(async_fn_in_trait)]
pub trait CandidateSource {
    async fn fetch_nearby_candidates(
        &self,
        observer_id: &ObserverId,
        max_distance_km: f64,
    ) -> MatchResult<Vec<Candidate>>;
}

/// Remote write of a like/pass decision
#[allow(async_fn_in_trait)]
pub trait SwipeStore {
    async fn persist_swipe(
        &self,
        observer_id: &ObserverId,
        target_id: &CandidateId,
        decision: SwipeDecision,
    ) -> MatchResult<SwipeOutcome>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.millis.store(at.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

//------------------------------------------------------------------------------
// IN-MEMORY COLLABORATORS
//------------------------------------------------------------------------------

/// Fixed pool of users filtered by flat-earth distance from the observer
#[derive(Debug)]
pub struct InMemoryCandidateSource {
    observer_location: GeoPoint,
    candidates: Vec<Candidate>,
    failing: AtomicBool,
}

impl InMemoryCandidateSource {
    pub fn new(observer_location: GeoPoint, candidates: Vec<Candidate>) -> Self {
        Self {
            observer_location,
            candidates,
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every following fetch fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl CandidateSource for InMemoryCandidateSource {
    async fn fetch_nearby_candidates(
        &self,
        observer_id: &ObserverId,
        max_distance_km: f64,
    ) -> MatchResult<Vec<Candidate>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MatchError::Persistence(format!(
                "candidate fetch for {} failed",
                observer_id
            )));
        }

        let mut nearby: Vec<Candidate> = self
            .candidates
            .iter()
            .filter(|c| c.id.0 != observer_id.0)
            .filter_map(|c| {
                let distance_km = flat_earth_distance_km(self.observer_location, c.location);
                (distance_km <= max_distance_km).then(|| c.clone().with_distance_km(distance_km))
            })
            .collect();
        nearby.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(f64::MAX)
                .total_cmp(&b.distance_km.unwrap_or(f64::MAX))
        });

        debug!(
            "Fetched {} of {} candidates within {} km for {}",
            nearby.len(),
            self.candidates.len(),
            max_distance_km,
            observer_id
        );
        Ok(nearby)
    }
}

/// One persisted decision
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeRecord {
    pub id: Uuid,
    pub observer_id: ObserverId,
    pub target_id: CandidateId,
    pub decision: SwipeDecision,
    pub created_at: DateTime<Utc>,
}

/// Records decisions in memory and reports mutual likes as matches
#[derive(Debug, Default)]
pub struct InMemorySwipeStore {
    records: Mutex<Vec<SwipeRecord>>,
    failing: AtomicBool,
}

impl InMemorySwipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Records a like from another user toward `target`, so a later like
    /// back from `target` becomes a match
    pub async fn seed_like(&self, from: &str, target: &str) {
        self.records.lock().await.push(SwipeRecord {
            id: Uuid::new_v4(),
            observer_id: ObserverId(from.to_string()),
            target_id: CandidateId(target.to_string()),
            decision: SwipeDecision::Like,
            created_at: Utc::now(),
        });
    }

    pub async fn records(&self) -> Vec<SwipeRecord> {
        self.records.lock().await.clone()
    }
}

impl SwipeStore for InMemorySwipeStore {
    async fn persist_swipe(
        &self,
        observer_id: &ObserverId,
        target_id: &CandidateId,
        decision: SwipeDecision,
    ) -> MatchResult<SwipeOutcome> {
        if self.failing.load(Ordering::SeqCst) {
            warn!(
                "Rejecting swipe {} -> {}: store unavailable",
                observer_id, target_id
            );
            return Err(MatchError::Persistence(format!(
                "could not record swipe {} -> {}",
                observer_id, target_id
            )));
        }

        let mut records = self.records.lock().await;
        let liked_back = records.iter().any(|r| {
            r.observer_id.0 == target_id.0
                && r.target_id.0 == observer_id.0
                && r.decision.is_like()
        });
        records.push(SwipeRecord {
            id: Uuid::new_v4(),
            observer_id: observer_id.clone(),
            target_id: target_id.clone(),
            decision,
            created_at: Utc::now(),
        });

        let outcome = match decision {
            SwipeDecision::Pass => SwipeOutcome::Passed,
            SwipeDecision::Like if liked_back => SwipeOutcome::Matched,
            SwipeDecision::Like => SwipeOutcome::Liked,
        };
        Ok(outcome)
    }
}
