use std::time::Instant;

/// Wall-clock stopwatch that reports the time between successive reads.
///
/// The clock starts on its first read, which therefore returns zero.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    start: Option<Instant>,
    last: Option<Instant>,
    elapsed: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.start.is_some()
    }

    /// Seconds since the previous call.
    pub fn delta(&mut self) -> f64 {
        self.delta_at(Instant::now())
    }

    /// Same as [`Clock::delta`] with an explicit timestamp.
    ///
    /// Timestamps earlier than the previous one yield zero.
    pub fn delta_at(&mut self, now: Instant) -> f64 {
        let Some(last) = self.last else {
            self.start = Some(now);
            self.last = Some(now);
            return 0.0;
        };
        let dt = now.saturating_duration_since(last).as_secs_f64();
        self.last = Some(now.max(last));
        self.elapsed += dt;
        dt
    }

    /// Sum of every delta reported so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_delta_is_zero() {
        let mut clock = Clock::new();
        assert!(!clock.is_running());
        assert_eq!(clock.delta_at(Instant::now()), 0.0);
        assert!(clock.is_running());
    }

    #[test]
    fn deltas_measure_gaps() {
        let t0 = Instant::now();
        let mut clock = Clock::new();
        clock.delta_at(t0);
        let d1 = clock.delta_at(t0 + Duration::from_millis(16));
        let d2 = clock.delta_at(t0 + Duration::from_millis(50));
        assert!((d1 - 0.016).abs() < 1e-9);
        assert!((d2 - 0.034).abs() < 1e-9);
        assert!((clock.elapsed() - 0.050).abs() < 1e-9);
    }

    #[test]
    fn backwards_timestamps_do_not_go_negative() {
        let t0 = Instant::now() + Duration::from_secs(1);
        let mut clock = Clock::new();
        clock.delta_at(t0);
        assert_eq!(clock.delta_at(t0 - Duration::from_millis(500)), 0.0);
        assert!((clock.delta_at(t0 + Duration::from_millis(10)) - 0.010).abs() < 1e-9);
    }
}
