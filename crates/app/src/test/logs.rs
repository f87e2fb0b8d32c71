//! Captured tracing events.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{Event, Level, Subscriber, subscriber::DefaultGuard};
use tracing_subscriber::{
    Layer, Registry,
    layer::{Context, SubscriberExt},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CapturedEvent {
    pub target: String,
    pub level: Level,
}

/// Records the target and level of every event on the current thread.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventLog {
    /// Capture events until the returned guard is dropped.
    pub(crate) fn install() -> (Self, DefaultGuard) {
        let log = Self::default();
        let guard = tracing::subscriber::set_default(Registry::default().with(log.clone()));

        (log, guard)
    }

    /// Number of events seen on `target` at `level`.
    pub(crate) fn count(&self, target: &str, level: Level) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| event.target == target && event.level == level)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                target: metadata.target().to_string(),
                level: *metadata.level(),
            });
    }
}
