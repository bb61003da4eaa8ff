// src/swipe/mod.rs

// Swipe rate limiting and the batch of profiles being decided on

mod batch;
mod session;
mod store;
mod window;

pub use batch::SwipeableBatch;
pub use session::SwipeSession;
pub use store::{
    CandidateSource, Clock, InMemoryCandidateSource, InMemorySwipeStore, ManualClock,
    SwipeRecord, SwipeStore, SystemClock,
};
pub use window::{SwipeWindow, WindowState};
