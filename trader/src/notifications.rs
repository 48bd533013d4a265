//! User facing notification lifecycle. Every user initiated workflow emits
//! exactly one pending notification and resolves it exactly once; steps in
//! between may add informational messages but never their own terminal
//! state.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NotificationId(pub u64);

pub trait Notifying: Send + Sync {
    fn pending(&self, message: &str) -> NotificationId;
    fn info(&self, message: &str);
    fn resolve_success(&self, id: NotificationId, message: &str);
    fn resolve_error(&self, id: NotificationId, message: &str);
}

/// Notification sink backed by `tracing`. The id ties the resolution back
/// to its pending line in the log.
#[derive(Debug, Default)]
pub struct LogNotifier {
    counter: AtomicU64,
}

impl Notifying for LogNotifier {
    fn pending(&self, message: &str) -> NotificationId {
        let id = NotificationId(self.counter.fetch_add(1, Ordering::Relaxed));
        tracing::info!(id = id.0, "pending: {}", message);
        id
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn resolve_success(&self, id: NotificationId, message: &str) {
        tracing::info!(id = id.0, "done: {}", message);
    }

    fn resolve_error(&self, id: NotificationId, message: &str) {
        tracing::error!(id = id.0, "failed: {}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_per_pending() {
        let notifier = LogNotifier::default();
        let first = notifier.pending("a");
        let second = notifier.pending("b");
        assert_ne!(first, second);
    }
}
