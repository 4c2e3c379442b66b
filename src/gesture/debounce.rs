use crate::clock::{Duration, Instant};

/// Time-based filter turning one chattering raw switch line into a stable
/// logical level.
///
/// The stable output keeps its previous value until the raw read has held a
/// new value for at least the configured interval. Callers must sample at a
/// period finer than that interval, otherwise short raw pulses can be missed
/// entirely; that is a precondition on the polling cadence, not a detected
/// fault.
#[derive(Clone, Copy, Debug)]
pub struct DebouncedLevel {
    interval: Duration,
    last_raw: bool,
    last_change: Instant,
    stable: bool,
}

impl DebouncedLevel {
    /// Starts at rest: raw and stable both inactive.
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_raw: false,
            last_change: Instant::from_millis(0),
            stable: false,
        }
    }

    /// Feed one raw read, returning the stable level as of `now`.
    pub fn sample(&mut self, raw: bool, now: Instant) -> bool {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change = now;
        }

        if raw != self.stable && now.duration_since(self.last_change) >= self.interval {
            self.stable = raw;
        }

        self.stable
    }

    pub const fn stable(&self) -> bool {
        self.stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u32) -> Instant {
        Instant::from_millis(ms)
    }

    #[test]
    fn adopts_a_level_only_after_the_interval() {
        let mut level = DebouncedLevel::new(Duration::from_millis(30));

        assert!(!level.sample(true, at(0)));
        assert!(!level.sample(true, at(10)));
        assert!(!level.sample(true, at(20)));
        assert!(level.sample(true, at(30)));
        assert!(level.stable());
    }

    #[test]
    fn chatter_restarts_the_clock() {
        let mut level = DebouncedLevel::new(Duration::from_millis(30));

        assert!(!level.sample(true, at(0)));
        assert!(!level.sample(false, at(10)));
        assert!(!level.sample(true, at(20)));
        // Interval counts from the last change at t=20.
        assert!(!level.sample(true, at(40)));
        assert!(level.sample(true, at(50)));
    }

    #[test]
    fn release_is_debounced_too() {
        let mut level = DebouncedLevel::new(Duration::from_millis(30));

        let _ = level.sample(true, at(0));
        assert!(level.sample(true, at(30)));

        assert!(level.sample(false, at(40)));
        assert!(level.sample(false, at(60)));
        assert!(!level.sample(false, at(70)));
    }

    #[test]
    fn stays_quiet_while_already_stable() {
        let mut level = DebouncedLevel::new(Duration::from_millis(30));

        assert!(!level.sample(false, at(0)));
        assert!(!level.sample(false, at(1000)));
        assert!(!level.stable());
    }
}
