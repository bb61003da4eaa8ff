// src/swipe/window.rs
//
// Rolling swipe counter. Expiry is lazy: readers compare elapsed time
// against the window length, and the stored count is only reset by the
// next registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SwipeConfig;

/// Logical state of the window at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// No swipe has ever been registered
    Empty,
    Active,
    /// Started, but older than the window length. Reads as empty.
    Expired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeWindow {
    count: u32,
    window_started_at: Option<DateTime<Utc>>,
}

impl SwipeWindow {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Raw stored count. May be stale once the window has expired.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn window_started_at(&self) -> Option<DateTime<Utc>> {
        self.window_started_at
    }

    pub fn state(&self, now: DateTime<Utc>, config: &SwipeConfig) -> WindowState {
        match self.window_started_at {
            None => WindowState::Empty,
            Some(started) if now - started > config.window => WindowState::Expired,
            Some(_) => WindowState::Active,
        }
    }

    /// Swipes counted against the limit at `now`
    pub fn effective_count(&self, now: DateTime<Utc>, config: &SwipeConfig) -> u32 {
        match self.state(now, config) {
            WindowState::Active => self.count,
            WindowState::Empty | WindowState::Expired => 0,
        }
    }

    pub fn can_swipe(&self, now: DateTime<Utc>, config: &SwipeConfig) -> bool {
        match self.state(now, config) {
            WindowState::Empty | WindowState::Expired => true,
            WindowState::Active => self.count < config.max_swipes_per_day,
        }
    }

    /// Returns the window after one more swipe. Does not check the limit;
    /// callers gate on `can_swipe` first.
    pub fn register_swipe(&self, now: DateTime<Utc>, config: &SwipeConfig) -> SwipeWindow {
        match self.state(now, config) {
            WindowState::Empty | WindowState::Expired => SwipeWindow {
                count: 1,
                window_started_at: Some(now),
            },
            WindowState::Active => SwipeWindow {
                count: self.count.saturating_add(1),
                window_started_at: self.window_started_at,
            },
        }
    }

    pub fn remaining(&self, now: DateTime<Utc>, config: &SwipeConfig) -> u32 {
        config
            .max_swipes_per_day
            .saturating_sub(self.effective_count(now, config))
    }

    /// When the current window stops counting, if one was ever opened
    pub fn resets_at(&self, config: &SwipeConfig) -> Option<DateTime<Utc>> {
        self.window_started_at.map(|started| started + config.window)
    }
}
