use std::time::{Duration, Instant};

/// Period of the composition timer: 33 ms, roughly 30 frames per second.
pub const FRAME_PERIOD: Duration = Duration::from_millis(33);

/// Minimum interval between background-video resamples. Reading a decoded
/// video frame is expensive, so the resample path must not run on every
/// clock tick.
pub const VIDEO_RESAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Cooperative fixed-period timer driving frame composition.
///
/// The owner polls it from the single event loop; at most one tick is
/// pending at a time and the next deadline is armed only when the current
/// tick is taken, so composition for tick N is always issued before tick
/// N+1 exists. Cancelling is idempotent: a ticker that never started, or was
/// already cancelled, tears down as a no-op.
#[derive(Debug)]
pub struct FrameTicker {
    period: Duration,
    deadline: Option<Instant>,
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::with_period(FRAME_PERIOD)
    }
}

impl FrameTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Arms the first deadline. Starting an already-running ticker restarts
    /// its schedule from `now`.
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Returns true when a tick is due, arming the next deadline relative to
    /// `now`. A stopped ticker never fires.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.period);
                true
            }
            _ => false,
        }
    }

    /// Stops the ticker. Safe to call any number of times, started or not.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

/// Minimum-interval gate for expensive callbacks: the first call passes
/// immediately, then further calls are suppressed until the floor elapses.
///
/// This is deliberately not trailing-edge debouncing; the semantics are
/// "call now, then hold off".
#[derive(Debug)]
pub struct ThrottleGate {
    min_interval: Duration,
    last_pass: Option<Instant>,
}

impl ThrottleGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_pass: None,
        }
    }

    /// Returns true when the caller may proceed, recording `now` as the new
    /// reference point.
    pub fn try_pass(&mut self, now: Instant) -> bool {
        match self.last_pass {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_pass = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_fires_after_each_period() {
        let start = Instant::now();
        let mut ticker = FrameTicker::new();
        ticker.start(start);

        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(32)));
        assert!(ticker.poll(start + Duration::from_millis(33)));

        // The next deadline was armed from the poll that fired.
        assert!(!ticker.poll(start + Duration::from_millis(40)));
        assert!(ticker.poll(start + Duration::from_millis(66)));
    }

    #[test]
    fn late_polls_do_not_queue_extra_ticks() {
        let start = Instant::now();
        let mut ticker = FrameTicker::new();
        ticker.start(start);

        // A long stall produces exactly one tick, not a burst of catch-ups.
        let late = start + Duration::from_millis(500);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert!(!ticker.poll(late + Duration::from_millis(32)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut ticker = FrameTicker::new();
        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.is_running());

        let start = Instant::now();
        ticker.start(start);
        ticker.cancel();
        ticker.cancel();
        assert!(!ticker.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn gate_passes_immediately_then_suppresses() {
        let start = Instant::now();
        let mut gate = ThrottleGate::new(VIDEO_RESAMPLE_INTERVAL);

        assert!(gate.try_pass(start));
        assert!(!gate.try_pass(start + Duration::from_millis(50)));
        assert!(!gate.try_pass(start + Duration::from_millis(99)));
        assert!(gate.try_pass(start + Duration::from_millis(100)));
        assert!(!gate.try_pass(start + Duration::from_millis(150)));
    }
}
