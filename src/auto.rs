//! Caller-driven automatic advancement.

use std::time::Duration;

/// Elapsed-time accumulator that decides when the next automatic
/// transition is due.
///
/// This does not own a timer. The caller reports elapsed time through
/// [`update`](Self::update) from whatever clock it has (a frame loop, a
/// test). Changing the period or enablement rebuilds the schedule, so a
/// partially elapsed period never carries over into a new configuration.
///
/// ## Example
///
/// ```rust
/// use std::time::Duration;
/// use rotating_text_core::AutoAdvance;
///
/// let mut auto = AutoAdvance::new(Duration::from_millis(2000), true);
/// assert_eq!(auto.update(Duration::from_millis(1500)), 0);
/// assert_eq!(auto.update(Duration::from_millis(500)), 1);
/// assert_eq!(auto.update(Duration::from_millis(4000)), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutoAdvance {
    period: Duration,
    enabled: bool,
    /// Time accumulated toward the next period
    elapsed: Duration,
}

impl AutoAdvance {
    /// A zero period is treated as disabled.
    pub fn new(period: Duration, enabled: bool) -> Self {
        Self {
            period,
            enabled,
            elapsed: Duration::ZERO,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether updates can ever produce a transition.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.enabled && !self.period.is_zero()
    }

    /// Change the period. Restarts the schedule if it differs.
    pub fn set_period(&mut self, period: Duration) {
        if period != self.period {
            self.period = period;
            self.restart();
        }
    }

    /// Enable or disable advancement. Restarts the schedule if it differs.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            self.enabled = enabled;
            self.restart();
        }
    }

    /// Discard any partially elapsed period.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Time left until the next transition, if active.
    pub fn remaining(&self) -> Option<Duration> {
        self.is_active().then(|| self.period - self.elapsed)
    }

    /// Accumulate `dt` and return how many periods completed.
    pub fn update(&mut self, dt: Duration) -> u32 {
        if !self.is_active() {
            return 0;
        }
        self.elapsed += dt;
        let mut due = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            due += 1;
        }
        due
    }
}
