//! Frame scheduling primitives the engine asks the host for
//!
//! A host loop calls [`Engine::pump`](crate::Engine::pump) as often as it
//! likes; the scheduler decides whether the requested frame is due yet.

use std::time::{Duration, Instant};

/// Ticket for one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

pub trait FrameScheduler: Send {
    /// Ask for one frame callback
    fn request_frame(&mut self, now: Instant) -> FrameHandle;

    /// Forget a pending request; cancelling twice is harmless
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Whether the request behind `handle` should run at `now`
    fn is_due(&self, handle: FrameHandle, now: Instant) -> bool;

    fn name(&self) -> &'static str;
}

/// The single open request of a scheduler; each scheduler serves one engine
#[derive(Debug, Default)]
struct Pending {
    next: u64,
    request: Option<(FrameHandle, Instant)>,
}

impl Pending {
    fn push(&mut self, now: Instant) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.request = Some((handle, now));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        if self.requested_at(handle).is_some() {
            self.request = None;
        }
    }

    fn requested_at(&self, handle: FrameHandle) -> Option<Instant> {
        self.request
            .filter(|(h, _)| *h == handle)
            .map(|(_, at)| at)
    }
}

/// Refresh-aligned scheduler: the host only pumps on display refresh, so
/// every pending request is due on the next pump.
#[derive(Debug, Default)]
pub struct RefreshScheduler {
    pending: Pending,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for RefreshScheduler {
    fn request_frame(&mut self, now: Instant) -> FrameHandle {
        self.pending.push(now)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.cancel(handle);
    }

    fn is_due(&self, handle: FrameHandle, _now: Instant) -> bool {
        self.pending.requested_at(handle).is_some()
    }

    fn name(&self) -> &'static str {
        "refresh"
    }
}

/// Fixed-interval timer, the fallback when no refresh signal exists
#[derive(Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    pending: Pending,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Pending::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_frame(&mut self, now: Instant) -> FrameHandle {
        self.pending.push(now)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.cancel(handle);
    }

    fn is_due(&self, handle: FrameHandle, now: Instant) -> bool {
        self.pending
            .requested_at(handle)
            .is_some_and(|at| now.saturating_duration_since(at) >= self.interval)
    }

    fn name(&self) -> &'static str {
        "interval"
    }
}
