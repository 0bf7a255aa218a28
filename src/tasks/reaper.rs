//! Reaper Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::QueryCache;
use crate::config::DEFAULT_REAPER_INTERVAL_MS;

/// Handle to a running reaper.
///
/// Call [`stop`](Self::stop) for a deterministic shutdown. Dropping the handle
/// also ends the task at its next wake-up, so no sweep outlives its owner.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// Signals the reaper to stop and waits for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);

        if let Err(e) = self.task.await {
            if e.is_panic() {
                warn!("Reaper task panicked: {}", e);
            }
        }
        info!("Reaper stopped");
    }

    /// Returns true while the task has not exited.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

/// Spawns a background task that sweeps expired entries from `cache`.
///
/// The first sweep happens one `interval` after spawning. A zero interval is
/// replaced by the default of five minutes.
///
/// # Example
/// ```ignore
/// let cache = QueryCache::from_config(&config);
/// let reaper = spawn_reaper(cache.clone(), config.reaper_interval);
/// // Later, during shutdown:
/// reaper.stop().await;
/// ```
pub fn spawn_reaper<T>(cache: QueryCache<T>, interval: Duration) -> ReaperHandle
where
    T: Clone + Send + Sync + 'static,
{
    let interval = if interval.is_zero() {
        warn!("Reaper interval of 0 is not usable, using the default");
        Duration::from_millis(DEFAULT_REAPER_INTERVAL_MS)
    } else {
        interval
    };

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!("Starting reaper with interval of {:?}", interval);

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = shutdown_rx.changed() => {
                    // Either stop() was called or the handle was dropped
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!("Reaper received shutdown signal");
                        break;
                    }
                    continue;
                }
            }

            let removed = cache.clean_expired().await;

            if removed > 0 {
                info!("Reaper: removed {} expired entries", removed);
            } else {
                debug!("Reaper: no expired entries found");
            }
        }
    });

    ReaperHandle { shutdown_tx, task }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> QueryCache<String> {
        QueryCache::new(100, Duration::from_secs(300))
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_removes_expired_entries() {
        let cache = cache();
        cache
            .set("expire_soon", "value".to_string(), Some(Duration::from_millis(500)))
            .await;

        let reaper = spawn_reaper(cache.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Removed by the sweep, not by a read
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.stats().await.expirations, 1);

        reaper.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_preserves_valid_entries() {
        let cache = cache();
        cache
            .set("long_lived", "value".to_string(), Some(Duration::from_secs(3600)))
            .await;

        let reaper = spawn_reaper(cache.clone(), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(cache.get("long_lived").await, Some("value".to_string()));

        reaper.stop().await;
    }

    #[tokio::test]
    async fn test_reaper_stop() {
        let reaper = spawn_reaper(cache(), Duration::from_secs(3600));
        assert!(reaper.is_running());

        // Returns promptly even though the next sweep is an hour away
        tokio::time::timeout(Duration::from_secs(5), reaper.stop())
            .await
            .expect("reaper did not stop");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_uses_default() {
        let cache = cache();
        cache
            .set("key", "value".to_string(), Some(Duration::from_secs(1)))
            .await;

        let reaper = spawn_reaper(cache.clone(), Duration::ZERO);

        // No busy loop: nothing is swept before the default interval
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(cache.len().await, 1);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(cache.len().await, 0);

        reaper.stop().await;
    }
}
