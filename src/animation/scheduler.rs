//! Frame scheduling and time sources
//!
//! The host platform owns the real "run once before next repaint" primitive.
//! The engine only asks for a frame and cancels it by handle; the host calls
//! back into the engine when the frame fires.

use instant::Instant;
use std::cell::Cell;
use std::collections::VecDeque;

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Platform primitive that runs a callback once before the next repaint
pub trait FrameScheduler {
    /// Ask for the next frame and return its handle
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a previously requested frame; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by `instant::Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced explicitly, for headless runs and tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Scheduler that queues frame requests until the host fires them
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<FrameHandle>,
    next_id: u64,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest pending frame, if any
    pub fn fire_next(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total number of frames ever requested
    pub fn requested_count(&self) -> u64 {
        self.requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|pending| *pending != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_fifo_and_cancel() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        scheduler.cancel_frame(a);
        scheduler.cancel_frame(FrameHandle(99));

        assert_eq!(scheduler.cancelled_count(), 1);
        assert_eq!(scheduler.fire_next(), Some(b));
        assert_eq!(scheduler.fire_next(), None);
        assert_eq!(scheduler.requested_count(), 2);
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(10.0);
        clock.advance(16.0);
        assert_eq!(clock.now_ms(), 26.0);
        clock.set(0.0);
        assert_eq!(clock.now_ms(), 0.0);
    }
}
