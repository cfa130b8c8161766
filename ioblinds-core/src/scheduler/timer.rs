//! Timeout and interval primitives
//!
//! Timers hold absolute deadlines in milliseconds. Nothing fires on its own:
//! the owner checks them from its poll loop. Cancelling is clearing the
//! deadline.

/// One-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeout {
    deadline_ms: Option<u64>,
}

impl Timeout {
    /// Create a disarmed timeout
    pub const fn new() -> Self {
        Self { deadline_ms: None }
    }

    /// Arm the timeout to fire `duration_ms` after `now_ms`
    ///
    /// Re-arming replaces any pending deadline.
    pub fn arm(&mut self, now_ms: u64, duration_ms: u32) {
        self.deadline_ms = Some(now_ms.saturating_add(duration_ms as u64));
    }

    /// Disarm without firing
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    /// Check if the timeout is pending
    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Pending deadline, if armed
    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Fire if the deadline has passed
    ///
    /// Returns true exactly once per arming.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-period repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval {
    period_ms: u32,
    next_ms: Option<u64>,
}

impl Interval {
    /// Create a stopped interval
    pub const fn new() -> Self {
        Self {
            period_ms: 0,
            next_ms: None,
        }
    }

    /// Start ticking every `period_ms` (at least 1 ms), first tick one period
    /// after `now_ms`
    pub fn start(&mut self, now_ms: u64, period_ms: u32) {
        self.period_ms = period_ms.max(1);
        self.next_ms = Some(now_ms.saturating_add(self.period_ms as u64));
    }

    /// Stop ticking
    pub fn cancel(&mut self) {
        self.next_ms = None;
    }

    /// Check if the interval is running
    pub fn is_running(&self) -> bool {
        self.next_ms.is_some()
    }

    /// Next tick deadline, if running
    pub fn deadline_ms(&self) -> Option<u64> {
        self.next_ms
    }

    /// Tick period (ms)
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Count the ticks elapsed up to `now_ms` and schedule the next one
    ///
    /// Late polls return every missed tick so callers can catch up.
    pub fn poll(&mut self, now_ms: u64) -> u32 {
        let Some(next) = self.next_ms else {
            return 0;
        };
        if now_ms < next {
            return 0;
        }
        let period = self.period_ms as u64;
        let elapsed = (now_ms - next) / period + 1;
        self.next_ms = Some(next + elapsed * period);
        elapsed.min(u32::MAX as u64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_fires_once() {
        let mut t = Timeout::new();
        assert!(!t.fire(1_000));

        t.arm(1_000, 500);
        assert!(t.is_armed());
        assert_eq!(t.deadline_ms(), Some(1_500));
        assert!(!t.fire(1_499));
        assert!(t.fire(1_500));
        assert!(!t.is_armed());
        assert!(!t.fire(2_000));
    }

    #[test]
    fn test_timeout_cancel_and_rearm() {
        let mut t = Timeout::new();
        t.arm(0, 100);
        t.cancel();
        assert!(!t.fire(200));

        t.arm(0, 100);
        t.arm(50, 100);
        assert!(!t.fire(120));
        assert!(t.fire(150));
    }

    #[test]
    fn test_zero_timeout_fires_immediately() {
        let mut t = Timeout::new();
        t.arm(42, 0);
        assert!(t.fire(42));
    }

    #[test]
    fn test_interval_ticks() {
        let mut i = Interval::new();
        assert_eq!(i.poll(100), 0);

        i.start(0, 100);
        assert_eq!(i.poll(99), 0);
        assert_eq!(i.poll(100), 1);
        assert_eq!(i.poll(150), 0);
        assert_eq!(i.deadline_ms(), Some(200));
        assert_eq!(i.poll(200), 1);
    }

    #[test]
    fn test_interval_catch_up() {
        let mut i = Interval::new();
        i.start(0, 100);
        // Poll late by three and a half periods
        assert_eq!(i.poll(350), 3);
        assert_eq!(i.deadline_ms(), Some(400));
        assert_eq!(i.poll(400), 1);
    }

    #[test]
    fn test_interval_zero_period_clamped() {
        let mut i = Interval::new();
        i.start(10, 0);
        assert_eq!(i.period_ms(), 1);
        assert_eq!(i.poll(13), 3);
    }

    #[test]
    fn test_interval_cancel() {
        let mut i = Interval::new();
        i.start(0, 10);
        i.cancel();
        assert!(!i.is_running());
        assert_eq!(i.poll(1_000), 0);
    }
}
