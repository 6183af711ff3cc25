//! Shutdown coordination for the HTTP server.

use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// Backed by a watch channel, so a receiver subscribed after the trigger still
/// observes it. Clones share the same channel.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal. Sticky: later subscribers see it too.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Number of tasks still waiting for the signal.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` observes a trigger, or its coordinator is gone.
pub async fn triggered(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stopped| *stopped).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_clones() {
        let shutdown = Shutdown::new();
        let rx = shutdown.clone().subscribe();
        assert_eq!(shutdown.receiver_count(), 1);

        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), triggered(rx))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_trigger_before_subscribe_is_kept() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.receiver_count(), 0);
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        let rx = shutdown.subscribe();
        tokio::time::timeout(Duration::from_secs(1), triggered(rx))
            .await
            .unwrap();
    }
}
