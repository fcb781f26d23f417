use std::sync::Mutex;

/// Full-page navigation, as opposed to an in-app route change.
pub trait Navigator: Send + Sync {
    /// Replaces the current location with `href`.
    fn replace_location(&self, href: &str);
}

/// Navigator that records every requested location.
///
/// Hosts without a real page poll [`RecordingNavigator::take`] to act on
/// redirects; tests use it to count them.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// All locations requested so far, oldest first.
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }

    /// Drains the recorded locations.
    pub fn take(&self) -> Vec<String> {
        self.visits
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn replace_location(&self, href: &str) {
        tracing::debug!("Navigating to {}", href);
        if let Ok(mut visits) = self.visits.lock() {
            visits.push(href.to_string());
        }
    }
}
