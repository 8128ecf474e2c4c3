//! Records store refreshes and mutations so view-model behaviour can be inspected in tests and logs.

#[cfg(feature = "telemetry")]
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RefreshRequested(String),
    RefreshCompleted { scope: String, count: usize },
    RefreshFailed { scope: String, error: String },
    RefreshDiscarded { scope: String, generation: u64 },
    MutationApplied(String),
    MutationFailed { action: String, error: String },
}

#[derive(Debug, Default)]
pub struct Handle {
    #[cfg(feature = "telemetry")]
    events: Mutex<Vec<Event>>,
}

impl Handle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: Event) {
        match &event {
            Event::RefreshRequested(scope) => {
                tracing::debug!(scope = scope.as_str(), "task refresh requested")
            }
            Event::RefreshCompleted { scope, count } => {
                tracing::debug!(scope = scope.as_str(), count, "task refresh completed");
            }
            Event::RefreshFailed { scope, error } => {
                tracing::debug!(scope = scope.as_str(), error = %error, "task refresh failed");
            }
            Event::RefreshDiscarded { scope, generation } => tracing::debug!(
                scope = scope.as_str(),
                generation,
                "stale task refresh discarded"
            ),
            Event::MutationApplied(action) => {
                tracing::debug!(action = action.as_str(), "task mutation applied")
            }
            Event::MutationFailed { action, error } => tracing::debug!(
                action = action.as_str(),
                error = %error,
                "task mutation failed"
            ),
        }

        #[cfg(feature = "telemetry")]
        self.events.lock().push(event);
    }

    pub fn is_enabled(&self) -> bool {
        cfg!(feature = "telemetry")
    }

    /// Events recorded so far; always empty without the `telemetry` feature.
    pub fn events(&self) -> Vec<Event> {
        #[cfg(feature = "telemetry")]
        {
            self.events.lock().clone()
        }
        #[cfg(not(feature = "telemetry"))]
        {
            Vec::new()
        }
    }
}
