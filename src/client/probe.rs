//! Background health probing.
//!
//! A [`ConnectivityMonitor`] owns the current [`Connectivity`] and knows how to
//! re-check it. [`ProbeHandle::spawn`] runs the initial check and then keeps
//! re-checking on an interval for as long as the API stays unreachable. The
//! task ends when the handle is shut down or dropped.

use crate::client::{api::StudentApi, controller::Connectivity};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at},
};

pub struct ConnectivityMonitor<A> {
    api: Arc<A>,
    status: Arc<watch::Sender<Connectivity>>,
}

impl<A> Clone for ConnectivityMonitor<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            status: Arc::clone(&self.status),
        }
    }
}

impl<A: StudentApi> ConnectivityMonitor<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            status: Arc::new(watch::Sender::new(Connectivity::Checking)),
        }
    }

    /// Calls the health endpoint once and records the result. The previous
    /// status stands while the call is in flight.
    pub async fn probe(&self) -> Connectivity {
        let next = match self.api.health().await {
            Ok(health) if health.is_ok() => Connectivity::Connected,
            Ok(health) => {
                warn!(status = %health.status, "API reported itself unhealthy");
                Connectivity::Disconnected
            }
            Err(e) => {
                debug!(?e, "API not available, running in local mode");
                Connectivity::Disconnected
            }
        };

        self.set(next);
        next
    }

    /// Subscribers are only woken when the status actually changes.
    fn set(&self, next: Connectivity) {
        self.status.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    #[must_use]
    pub fn current(&self) -> Connectivity {
        *self.status.borrow()
    }

    pub fn mark_disconnected(&self) {
        self.set(Connectivity::Disconnected);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Connectivity> {
        self.status.subscribe()
    }

    async fn watch(self, every: Duration) {
        self.probe().await;

        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if self.current() == Connectivity::Disconnected {
                trace!("re-probing API");
                self.probe().await;
            }
        }
    }
}

/// The running probe task. Dropping this stops the task at its next wake-up.
pub struct ProbeHandle {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ProbeHandle {
    pub fn spawn<A: StudentApi + 'static>(
        monitor: ConnectivityMonitor<A>,
        every: Duration,
    ) -> Self {
        let (cancel, cancelled) = oneshot::channel();

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = cancelled => debug!("connectivity probe stopped"),
                () = monitor.watch(every) => {}
            }
        });

        Self { cancel, task }
    }

    pub async fn shutdown(self) {
        let Self { cancel, task } = self;
        let _ = cancel.send(());

        match task.await {
            Err(e) if e.is_panic() => error!(?e, "connectivity probe panicked"),
            _ => {}
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
