//! Request identifiers for latest-only async results.

/// Opaque request id for matching async results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

/// Tracks the latest active request and ignores stale results.
#[derive(Debug, Default)]
pub struct LatestOnly {
    next: u64,
    active: Option<RequestId>,
}

impl LatestOnly {
    /// Start a new request and mark it as active.
    pub fn begin(&mut self) -> RequestId {
        let id = RequestId(self.next);
        self.next += 1;
        self.active = Some(id);
        id
    }

    /// Cancel any active request.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    /// Finish the request if it's still active.
    pub fn finish_if_active(&mut self, id: RequestId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_request_finishes() {
        let mut latest = LatestOnly::default();
        let old = latest.begin();
        let new = latest.begin();

        assert!(!latest.finish_if_active(old));
        assert!(latest.finish_if_active(new));
        assert!(!latest.has_active());
    }

    #[test]
    fn test_cancel_drops_pending_result() {
        let mut latest = LatestOnly::default();
        let id = latest.begin();
        latest.cancel();
        assert!(!latest.finish_if_active(id));
    }
}
