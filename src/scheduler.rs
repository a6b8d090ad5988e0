//! "Run on the next display refresh" with cancellation.
//!
//! The event loop asks [`FrameScheduler::is_pending`] before requesting a
//! redraw and calls [`FrameScheduler::take`] when the refresh arrives. Not
//! requesting again is the whole of cancellation.

/// Single pending frame request
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
    ticks: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for one callback on the next refresh (repeat requests coalesce)
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Drop any pending request
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request; `false` means this refresh has no callback
    pub fn take(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            self.ticks += 1;
            true
        } else {
            false
        }
    }

    /// Callbacks delivered so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
