//! Periodic registry sweep.
//!
//! The reactive expiry checks (`find` treating expired as absent, the
//! per-request `sweep_if_expired`) are the correctness mechanism; this task
//! only bounds storage growth for abandoned uploads. Absence of the task
//! never affects correctness.

use crate::registry::TemporaryVideoRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct RegistrySweeper {
    registry: Arc<dyn TemporaryVideoRegistry>,
    interval: Duration,
}

/// Handle to a running sweeper. `shutdown` signals the loop to stop; it does
/// not wait for an in-flight sweep.
pub struct SweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.handle.await;
    }
}

impl RegistrySweeper {
    pub fn new(registry: Arc<dyn TemporaryVideoRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    /// Spawn the sweep loop on the current runtime.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let handle = tokio::spawn(async move {
            tracing::info!(interval_secs = self.interval.as_secs(), "Registry sweeper started");
            loop {
                tokio::select! {
                    _ = sleep(self.interval) => {
                        match self.registry.sweep_expired().await {
                            Ok(0) => {}
                            Ok(reclaimed) => {
                                tracing::info!(reclaimed, "Registry sweep reclaimed expired records");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Registry sweep failed");
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Registry sweeper stopping");
                        break;
                    }
                }
            }
        });

        SweeperHandle {
            shutdown_tx,
            handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryRegistry;

    #[tokio::test]
    async fn test_sweeper_reclaims_expired_records() {
        let registry = Arc::new(InMemoryRegistry::new(0));
        registry.create("u1", "stale", "url").await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;

        let handle =
            RegistrySweeper::new(registry.clone(), Duration::from_millis(10)).spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown().await;

        assert_eq!(registry.record_count(), 0);
    }

    #[tokio::test]
    async fn test_sweeper_leaves_live_records() {
        let registry = Arc::new(InMemoryRegistry::new(3600));
        registry.create("u1", "live", "url").await.unwrap();

        let handle =
            RegistrySweeper::new(registry.clone(), Duration::from_millis(10)).spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown().await;

        assert_eq!(registry.record_count(), 1);
    }
}
