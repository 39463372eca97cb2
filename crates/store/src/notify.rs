//! User-facing outcome messages for store operations

use std::sync::Arc;

/// Receives one message per finished store request
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        tracing::info!(target: "doc_annotator::notify", "{message}");
    }

    fn failure(&self, message: &str) {
        tracing::error!(target: "doc_annotator::notify", "{message}");
    }
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn success(&self, message: &str) {
        (**self).success(message)
    }

    fn failure(&self, message: &str) {
        (**self).failure(message)
    }
}
