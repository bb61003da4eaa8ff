// src/swipe/session.rs

use log::{debug, info, warn};
use std::collections::{HashSet, VecDeque};

use crate::config::{AppConfig, SwipeConfig};
use crate::errors::{MatchError, MatchResult};
use crate::models::{Candidate, CandidateId, ObserverId, SwipeDecision, SwipeOutcome};

use super::batch::SwipeableBatch;
use super::store::{CandidateSource, Clock, SwipeStore, SystemClock};
use super::window::SwipeWindow;

/// Per-user swipe state: the rolling window, the batch being decided on and
/// the pre-fetched pool that refills it.
///
/// Local state changes only after the store confirms a decision. A failed
/// write leaves the window, batch and pool exactly as they were.
pub struct SwipeSession<S, C, K = SystemClock> {
    observer_id: ObserverId,
    config: SwipeConfig,
    max_distance_km: f64,
    window: SwipeWindow,
    batch: SwipeableBatch,
    pool: VecDeque<Candidate>,
    decided: HashSet<CandidateId>,
    store: S,
    source: C,
    clock: K,
}

impl<S, C> SwipeSession<S, C, SystemClock>
where
    S: SwipeStore,
    C: CandidateSource,
{
    pub fn new(observer_id: ObserverId, config: &AppConfig, store: S, source: C) -> Self {
        Self::with_clock(observer_id, config, store, source, SystemClock)
    }
}

impl<S, C, K> SwipeSession<S, C, K>
where
    S: SwipeStore,
    C: CandidateSource,
    K: Clock,
{
    pub fn with_clock(
        observer_id: ObserverId,
        config: &AppConfig,
        store: S,
        source: C,
        clock: K,
    ) -> Self {
        Self {
            observer_id,
            config: config.swipe.clone(),
            max_distance_km: config.radar.max_distance_km,
            window: SwipeWindow::empty(),
            batch: SwipeableBatch::new(config.swipe.batch_max_size),
            pool: VecDeque::new(),
            decided: HashSet::new(),
            store,
            source,
            clock,
        }
    }

    /// Restores a window persisted by the host app between launches
    pub fn restore_window(&mut self, window: SwipeWindow) {
        self.window = window;
    }

    pub fn can_swipe(&self) -> bool {
        self.window.can_swipe(self.clock.now(), &self.config)
    }

    pub fn register_swipe(&mut self) {
        self.window = self.window.register_swipe(self.clock.now(), &self.config);
    }

    pub fn remaining_swipes(&self) -> u32 {
        self.window.remaining(self.clock.now(), &self.config)
    }

    /// Fills the batch from `candidates`; anything past the batch size is
    /// kept as the replacement pool.
    pub fn load_initial_batch(&mut self, candidates: Vec<Candidate>) {
        let total = candidates.len();
        let overflow = self.batch.load_initial_batch(candidates);
        self.pool = overflow.into();
        debug!(
            "Loaded batch of {} ({} pooled) from {} candidates for {}",
            self.batch.len(),
            self.pool.len(),
            total,
            self.observer_id
        );
    }

    /// Re-queries nearby candidates and reloads the batch, skipping profiles
    /// already decided in this session. Returns the batch length.
    pub async fn refresh(&mut self) -> MatchResult<usize> {
        let fetched = self
            .source
            .fetch_nearby_candidates(&self.observer_id, self.max_distance_km)
            .await?;
        let fetched_count = fetched.len();
        let fresh: Vec<Candidate> = fetched
            .into_iter()
            .filter(|c| !self.decided.contains(&c.id))
            .collect();

        info!(
            "Refreshed candidates for {}: {} fetched, {} not yet decided",
            self.observer_id,
            fetched_count,
            fresh.len()
        );
        self.load_initial_batch(fresh);
        Ok(self.batch.len())
    }

    /// Likes or passes on `target_id`.
    ///
    /// Fails with `LimitReached` without touching any state when the window
    /// is full. On success the swipe is counted, the profile leaves the
    /// batch and one pooled candidate takes its place.
    pub async fn swipe_decision(
        &mut self,
        target_id: &CandidateId,
        liked: bool,
    ) -> MatchResult<SwipeOutcome> {
        let now = self.clock.now();
        if !self.window.can_swipe(now, &self.config) {
            let resets_at = self.window.resets_at(&self.config);
            info!(
                "Swipe limit of {} reached for {}, resets at {:?}",
                self.config.max_swipes_per_day, self.observer_id, resets_at
            );
            return Err(MatchError::LimitReached { resets_at });
        }

        let decision = SwipeDecision::from_liked(liked);
        let outcome = match self
            .store
            .persist_swipe(&self.observer_id, target_id, decision)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    "Swipe {:?} on {} by {} not recorded: {}",
                    decision, target_id, self.observer_id, e
                );
                return Err(e);
            }
        };

        self.window = self.window.register_swipe(now, &self.config);
        self.decided.insert(target_id.clone());
        self.batch.remove(target_id);
        // Only draw from the pool when the batch can take the candidate
        if self.batch.has_room() {
            if let Some(replacement) = self.next_replacement(target_id) {
                self.batch.push_replacement(replacement);
            }
        }

        debug!(
            "Swipe {:?} on {} by {} -> {:?} ({} left in window, batch {})",
            decision,
            target_id,
            self.observer_id,
            outcome,
            self.window.remaining(now, &self.config),
            self.batch.len()
        );
        Ok(outcome)
    }

    // Next pooled candidate that is neither decided nor already queued
    fn next_replacement(&mut self, just_decided: &CandidateId) -> Option<Candidate> {
        while let Some(candidate) = self.pool.pop_front() {
            if &candidate.id == just_decided
                || self.decided.contains(&candidate.id)
                || self.batch.contains(&candidate.id)
            {
                continue;
            }
            return Some(candidate);
        }
        None
    }

    pub fn observer_id(&self) -> &ObserverId {
        &self.observer_id
    }

    pub fn window(&self) -> &SwipeWindow {
        &self.window
    }

    pub fn batch(&self) -> &SwipeableBatch {
        &self.batch
    }

    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    pub fn has_decided(&self, id: &CandidateId) -> bool {
        self.decided.contains(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }
}
