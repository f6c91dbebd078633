use std::sync::Mutex;
use tracing::warn;

/// Blocking acknowledgment surface for user-facing notices.
pub trait NoticeSurface: Send + Sync {
    fn show(&self, message: &str);

    fn dismiss(&self) {}
}

/// Writes notices to the log only. Used where nobody is watching a screen.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotice;

impl NoticeSurface for LogNotice {
    fn show(&self, message: &str) {
        warn!(notice = message, "user notice raised");
    }
}

/// Keeps every notice so callers can hand them back in a response body.
#[derive(Debug, Default)]
pub struct CollectedNotices {
    messages: Mutex<Vec<String>>,
    dismissed: Mutex<usize>,
}

impl CollectedNotices {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notices shown but not yet acknowledged.
    pub fn pending(&self) -> usize {
        let dismissed = self.dismissed.lock().map(|guard| *guard).unwrap_or(0);
        self.len().saturating_sub(dismissed)
    }
}

impl NoticeSurface for CollectedNotices {
    fn show(&self, message: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push(message.to_string());
        }
    }

    fn dismiss(&self) {
        let shown = self.len();
        if let Ok(mut guard) = self.dismissed.lock() {
            *guard = shown;
        }
    }
}
