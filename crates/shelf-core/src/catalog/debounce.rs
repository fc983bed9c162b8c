use std::time::{Duration, Instant};

/// Trailing-edge debounce driven by the caller's clock.
///
/// Each `schedule` replaces the pending value and restarts the quiet window;
/// `fire` yields the value once the window has elapsed with no new schedule.
/// Time is passed in rather than read so the owner's tick loop decides when
/// to poll.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Takes the pending value if its quiet window has elapsed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if now >= *at => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_window() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        debounce.schedule("p", start);

        assert_eq!(debounce.fire(start + Duration::from_millis(299)), None);
        assert_eq!(debounce.fire(start + Duration::from_millis(300)), Some("p"));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_new_schedule_restarts_window_and_keeps_last() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        for (i, text) in ["p", "ph", "pho", "phon", "phone"].into_iter().enumerate() {
            debounce.schedule(text, start + Duration::from_millis(100 * i as u64));
        }

        assert_eq!(debounce.fire(start + Duration::from_millis(650)), None);
        assert_eq!(debounce.fire(start + Duration::from_millis(700)), Some("phone"));
        assert_eq!(debounce.fire(start + Duration::from_millis(2000)), None);
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        let start = Instant::now();
        let mut debounce = Debouncer::new(Duration::from_millis(10));
        debounce.schedule(1, start);
        debounce.cancel();
        assert_eq!(debounce.fire(start + Duration::from_secs(1)), None);
        assert_eq!(debounce.deadline(), None);
    }
}
