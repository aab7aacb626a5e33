use std::time::Duration;

use super::SpeedConfig;

/// Minimum polling cadence, so a zero drop interval does not busy-loop.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Gravity timer.
///
/// The scheduler holds the instant of the last drop (the baseline) and fires
/// once strictly more than the level's drop interval has elapsed since it.
/// Firing moves the baseline to the firing instant; late polls are not
/// compensated, so at most one drop happens per poll.
///
/// Time is passed in as a [`Duration`] since an arbitrary origin, normally a
/// [`Clock`](super::Clock) reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduler {
    speed: SpeedConfig,
    baseline: Option<Duration>,
}

impl Scheduler {
    #[must_use]
    pub fn new(speed: SpeedConfig) -> Self {
        Self {
            speed,
            baseline: None,
        }
    }

    /// Time between gravity drops at `level`:
    /// `initial - (level - 1) * step`, saturating at zero.
    #[must_use]
    pub fn drop_interval(&self, level: usize) -> Duration {
        let steps = u32::try_from(level.saturating_sub(1)).unwrap_or(u32::MAX);
        self.speed
            .initial_drop_interval()
            .saturating_sub(self.speed.speed_step().saturating_mul(steps))
    }

    /// How often the driver should call [`Self::poll`] at `level`.
    #[must_use]
    pub fn poll_interval(&self, level: usize) -> Duration {
        let divisor = self.speed.poll_divisor.max(1);
        (self.drop_interval(level) / divisor).max(MIN_POLL_INTERVAL)
    }

    /// Starts (or restarts) timing from `now`.
    pub fn arm(&mut self, now: Duration) {
        self.baseline = Some(now);
    }

    /// Stops timing; polls never fire until the next [`Self::arm`].
    pub fn suspend(&mut self) {
        self.baseline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.baseline.is_some()
    }

    /// Returns `true` if a gravity drop is due, rebaselining to `now` when it
    /// is.
    pub fn poll(&mut self, now: Duration, level: usize) -> bool {
        let Some(baseline) = self.baseline else {
            return false;
        };
        if now.saturating_sub(baseline) > self.drop_interval(level) {
            self.baseline = Some(now);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_drop_interval_by_level() {
        let scheduler = Scheduler::new(SpeedConfig::default());
        assert_eq!(scheduler.drop_interval(1), ms(500));
        assert_eq!(scheduler.drop_interval(2), ms(470));
        assert_eq!(scheduler.drop_interval(17), ms(20));
        assert_eq!(scheduler.drop_interval(18), Duration::ZERO);
        assert_eq!(scheduler.drop_interval(20), Duration::ZERO);
    }

    #[test]
    fn test_poll_interval() {
        let scheduler = Scheduler::new(SpeedConfig::default());
        assert_eq!(scheduler.poll_interval(1), ms(25));
        assert_eq!(scheduler.poll_interval(2), Duration::from_micros(23_500));
        assert_eq!(scheduler.poll_interval(18), MIN_POLL_INTERVAL);
    }

    #[test]
    fn test_fires_strictly_after_interval() {
        let mut scheduler = Scheduler::new(SpeedConfig::default());
        scheduler.arm(ms(1000));
        assert!(!scheduler.poll(ms(1250), 1));
        assert!(!scheduler.poll(ms(1500), 1));
        assert!(scheduler.poll(ms(1501), 1));
        // Rebaselined at 1501.
        assert!(!scheduler.poll(ms(1900), 1));
        assert!(scheduler.poll(ms(2002), 1));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let mut scheduler = Scheduler::new(SpeedConfig::default());
        scheduler.arm(Duration::ZERO);
        assert!(scheduler.poll(ms(5000), 1));
        assert!(!scheduler.poll(ms(5001), 1));
    }

    #[test]
    fn test_suspended_never_fires() {
        let mut scheduler = Scheduler::new(SpeedConfig::default());
        assert!(!scheduler.is_armed());
        assert!(!scheduler.poll(ms(10_000), 1));
        scheduler.arm(Duration::ZERO);
        scheduler.suspend();
        assert!(!scheduler.poll(ms(10_000), 1));
    }

    #[test]
    fn test_zero_interval_fires_on_any_progress() {
        let mut scheduler = Scheduler::new(SpeedConfig::default());
        scheduler.arm(ms(100));
        assert!(!scheduler.poll(ms(100), 18));
        assert!(scheduler.poll(ms(101), 18));
    }
}
