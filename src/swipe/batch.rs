// src/swipe/batch.rs

use log::trace;
use std::collections::VecDeque;

use crate::models::{Candidate, CandidateId};

/// Bounded queue of profiles waiting for a decision, head first
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeableBatch {
    queue: VecDeque<Candidate>,
    max_size: usize,
    has_more: bool,
}

impl SwipeableBatch {
    pub fn new(max_size: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(max_size),
            max_size,
            has_more: false,
        }
    }

    /// Replaces the queue with the first `max_size` candidates and returns
    /// the ones that did not fit. `has_more` reports whether the source had
    /// more than fit.
    pub fn load_initial_batch(&mut self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        self.has_more = candidates.len() > self.max_size;
        let overflow = if self.has_more {
            candidates.split_off(self.max_size)
        } else {
            Vec::new()
        };
        self.queue = candidates.into();
        overflow
    }

    pub fn peek(&self) -> Option<&Candidate> {
        self.queue.front()
    }

    pub fn pop_head(&mut self) -> Option<Candidate> {
        let head = self.queue.pop_front();
        self.recompute_has_more();
        head
    }

    /// Appends at the tail. Returns false when the batch is already full.
    pub fn push_replacement(&mut self, candidate: Candidate) -> bool {
        if self.queue.len() >= self.max_size {
            return false;
        }
        self.queue.push_back(candidate);
        self.recompute_has_more();
        true
    }

    /// Drops a decided profile from wherever it sits in the queue, normally
    /// the head. An id that is not queued leaves the queue as is.
    pub fn remove(&mut self, decided: &CandidateId) -> Option<Candidate> {
        let removed = match self.queue.iter().position(|c| &c.id == decided) {
            Some(index) => self.queue.remove(index),
            None => {
                trace!("Batch - decided profile {} not queued", decided);
                None
            }
        };
        self.recompute_has_more();
        removed
    }

    pub fn has_room(&self) -> bool {
        self.queue.len() < self.max_size
    }

    pub fn contains(&self, id: &CandidateId) -> bool {
        self.queue.iter().any(|c| &c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn recompute_has_more(&mut self) {
        self.has_more = self.queue.len() >= self.max_size;
    }
}
