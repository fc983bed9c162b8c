//! Transient notifications shown in the bottom-right corner.

mod render;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub use render::render_toasts;

/// How long a toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Oldest toasts are dropped beyond this.
const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        self.items.push_back(Toast {
            level,
            message: message.into(),
            expires_at: now + TOAST_TTL,
        });
        while self.items.len() > MAX_TOASTS {
            self.items.pop_front();
        }
    }

    /// Drops expired toasts. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|toast| toast.expires_at > now);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.items.back()
    }
}
