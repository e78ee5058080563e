//! Once-per-frame overlay recomputation.
//!
//! Change notifications can arrive many times between two rendered frames
//! (a wheel zoom fires position, scale and viewport changes at once). They
//! only mark a pass as pending; the host runs it from its animation-frame
//! callback.

/// Coalesces sync requests into at most one pass per frame.
#[derive(Debug, Clone, Default)]
pub struct SyncScheduler {
    pending: bool,
    requests: u64,
    passes: u64,
}

impl SyncScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for a pass. Returns `true` when this request scheduled one, i.e.
    /// the host should arrange an animation-frame callback.
    pub fn request(&mut self) -> bool {
        self.requests += 1;
        !std::mem::replace(&mut self.pending, true)
    }

    /// Consume the pending pass, if any.
    pub fn take(&mut self) -> bool {
        if std::mem::replace(&mut self.pending, false) {
            self.passes += 1;
            true
        } else {
            false
        }
    }

    /// Drop a pending pass without running it.
    pub fn cancel(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Requests received so far.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Passes actually run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
