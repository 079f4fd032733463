//! Periodic results polling.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::reader::ResultsReader;
use crate::session::Session;

/// Owns the polling task. Dropping the handle cancels it.
pub struct SchedulerHandle {
    cancel: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the task to stop after the current refresh, if any.
    pub fn cancel(&self) {
        let _ = self.cancel.send(());
    }

    /// Cancel and wait for the task to exit.
    pub async fn stop(self) {
        self.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "results polling task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Refresh results immediately, then every `period`, until cancelled.
///
/// Refreshes run inline on the polling task, so they never overlap one
/// another; a tick that lands while a vote-triggered refresh is running is
/// skipped. Each refresh reads through the connected account when there is
/// one.
pub fn spawn_polling(
    reader: Arc<ResultsReader>,
    session: Arc<Session>,
    period: Duration,
) -> SchedulerHandle {
    let (cancel, mut cancel_rx) = broadcast::channel(1);

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(period_ms = period.as_millis() as u64, "results polling started");

        loop {
            tokio::select! {
                biased;
                _ = cancel_rx.recv() => {
                    tracing::info!("results polling stopped");
                    break;
                }
                _ = interval.tick() => {
                    let observer = session.address().await;
                    reader.try_refresh(observer.as_ref()).await;
                }
            }
        }
    });

    SchedulerHandle { cancel, task }
}
