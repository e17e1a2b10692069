//! Navigation adapter.

use std::sync::Mutex;

use application::ports::outbound::Navigator;

/// [`Navigator`] for hosts without a real router: logs each redirect and
/// records the most recent destination so the embedding view layer (or a
/// test) can follow it.
#[derive(Default)]
pub struct RecordingNavigator {
    last: Mutex<Option<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The destination of the most recent redirect, if any.
    pub fn last_destination(&self) -> Option<String> {
        self.last.lock().expect("navigator lock poisoned").clone()
    }

    fn record(&self, destination: String) {
        tracing::info!(destination = %destination, "redirecting active view");
        *self.last.lock().expect("navigator lock poisoned") =
            Some(destination);
    }
}

impl Navigator for RecordingNavigator {
    fn to_login(&self, error: Option<&str>) {
        match error {
            Some(indicator) => {
                self.record(format!("/login?error={indicator}"));
            },
            None => self.record("/login".to_string()),
        }
    }

    fn to_search(&self) {
        self.record("/".to_string());
    }
}
