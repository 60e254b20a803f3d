//! Starts the watches, runs the retry sweep and shuts everything down.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kc_store::{StoreResult, WatchHandle, WatchSet};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::reconciler::{Controller, Reconciler};

/// A controller of any kind, as seen by the supervisor.
#[async_trait]
pub trait ManagedController: Send + Sync {
    /// Kind label.
    fn kind(&self) -> &'static str;

    /// Opens the watch and spawns the task consuming it.
    async fn start(self: Arc<Self>) -> StoreResult<(WatchHandle, JoinHandle<()>)>;

    /// Runs the retry sweep. Returns how many resources were applied.
    async fn retry(&self) -> usize;
}

#[async_trait]
impl<R: Reconciler> ManagedController for Controller<R> {
    fn kind(&self) -> &'static str {
        Controller::kind(self)
    }

    async fn start(self: Arc<Self>) -> StoreResult<(WatchHandle, JoinHandle<()>)> {
        let watch = self.store().watch().await?;
        let handle = watch.handle();
        let task = tokio::spawn(async move { self.run(watch).await });
        Ok((handle, task))
    }

    async fn retry(&self) -> usize {
        Controller::retry(self).await
    }
}

/// Owns the running watches and the retry timer.
pub struct Supervisor {
    watches: WatchSet,
    consumers: Vec<JoinHandle<()>>,
    stop: watch::Sender<bool>,
    sweeper: JoinHandle<()>,
}

impl Supervisor {
    /// Opens one watch per controller and starts the retry sweep.
    ///
    /// ## Errors
    ///
    /// Returns the store error if a watch cannot be opened. Watches opened
    /// before the failure are closed again.
    pub async fn start(
        controllers: Vec<Arc<dyn ManagedController>>,
        retry_rate: Duration,
    ) -> StoreResult<Self> {
        let mut watches = WatchSet::new();
        let mut consumers = Vec::with_capacity(controllers.len());

        for controller in &controllers {
            let (handle, task) = Arc::clone(controller).start().await?;
            watches.register(handle);
            consumers.push(task);
        }

        let (stop, stopped) = watch::channel(false);
        let sweeper = tokio::spawn(sweep(controllers, retry_rate, stopped));
        info!(watches = watches.len(), retry_rate = ?retry_rate, "controllers started");

        Ok(Self {
            watches,
            consumers,
            stop,
            sweeper,
        })
    }

    /// Closes every watch, stops the retry timer and waits for the work in
    /// flight to finish.
    pub async fn shutdown(mut self) {
        self.stop.send_replace(true);
        self.watches.close_all();

        if let Err(e) = (&mut self.sweeper).await {
            warn!(error = %e, "retry sweep ended abnormally");
        }
        for consumer in self.consumers.drain(..) {
            if let Err(e) = consumer.await {
                warn!(error = %e, "watch consumer ended abnormally");
            }
        }
        info!("controllers stopped");
    }
}

/// Runs every controller's retry once per tick, one after the other. The
/// first tick is skipped since the watches deliver everything on start.
async fn sweep(
    controllers: Vec<Arc<dyn ManagedController>>,
    rate: Duration,
    mut stopped: watch::Receiver<bool>,
) {
    let mut ticker = interval(rate);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            changed = stopped.changed() => {
                if changed.is_err() || *stopped.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                for controller in &controllers {
                    let applied = controller.retry().await;
                    if applied > 0 {
                        debug!(kind = controller.kind(), applied, "retry sweep");
                    }
                }
            }
        }
    }
}
