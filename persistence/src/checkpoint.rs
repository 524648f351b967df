//! Periodic dirty-state flushing
//!
//! The ledger and scheduler only flip a dirty flag when they mutate;
//! actual file writes happen here, on a fixed period, outside every
//! lock. Shutdown performs one final flush so nothing dirty is lost.

use crate::error::Result;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// Background task flushing dirty state on a fixed period
#[derive(Debug)]
pub struct Checkpointer {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Checkpointer {
    /// Spawn the flush loop
    ///
    /// `flush` should persist dirty state and report whether anything
    /// was written; it is called once per period and one final time on
    /// shutdown. Errors are logged and the loop keeps running.
    pub fn spawn<F>(period: Duration, flush: F) -> Self
    where
        F: Fn() -> Result<bool> + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_flush(&flush);
                    }
                    _ = stopped.changed() => {
                        run_flush(&flush);
                        break;
                    }
                }
            }

            tracing::info!("Checkpointer stopped");
        });

        Self { stop, handle }
    }

    /// Stop the loop after one final flush
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.handle.await;
    }
}

fn run_flush<F>(flush: &F)
where
    F: Fn() -> Result<bool>,
{
    match flush() {
        Ok(true) => tracing::debug!("Checkpoint flushed"),
        Ok(false) => {}
        Err(error) => tracing::error!(%error, "Checkpoint flush failed"),
    }
}
