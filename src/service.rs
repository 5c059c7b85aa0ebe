//! Runs a [`Notifier`] on a tokio task.
//!
//! The task owns the notifier, keeps its virtual clock in step with
//! [`tokio::time::Instant`] and serialises commands received over a bounded
//! channel.

use async_channel::{Receiver, Sender, TrySendError, bounded};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, warn};

use crate::Result;
use crate::dom::{Document, ElementId};
use crate::error::Error;
use crate::notifier::{Event, Notifier};
use crate::options::ToastOptions;

pub enum Command {
    Notify {
        message: String,
        options: ToastOptions,
        reply: Option<oneshot::Sender<ElementId>>,
    },
    Dispatch {
        target: ElementId,
        event: Event,
    },
}

/// Cloneable sender side of a running service.
#[derive(Clone, Debug)]
pub struct ServiceHandle {
    tx: Sender<Command>,
}

impl ServiceHandle {
    /// Shows a toast and waits for its element id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceClosed`] if the service stopped, or if it
    /// failed to build the toast.
    pub async fn notify(
        &self,
        message: impl Into<String>,
        options: ToastOptions,
    ) -> Result<ElementId> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Notify {
                message: message.into(),
                options,
                reply: Some(reply),
            })
            .await
            .map_err(|_| Error::ServiceClosed)?;
        rx.await.map_err(|_| Error::ServiceClosed)
    }

    /// Queues a toast without waiting. Returns `false` when the queue is full
    /// or the service stopped; the toast is dropped in both cases.
    pub fn try_notify(&self, message: impl Into<String>, options: ToastOptions) -> bool {
        let command = Command::Notify {
            message: message.into(),
            options,
            reply: None,
        };
        match self.tx.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("toast queue full; dropping toast");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }

    /// Forwards a host event to the notifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceClosed`] if the service stopped.
    pub async fn dispatch(&self, target: ElementId, event: Event) -> Result<()> {
        self.tx
            .send(Command::Dispatch { target, event })
            .await
            .map_err(|_| Error::ServiceClosed)
    }

    /// Stops the service once queued commands are handled.
    pub fn close(&self) {
        self.tx.close();
    }
}

/// Spawns the service loop. The join handle yields the notifier back once
/// every handle is dropped or closed.
pub fn spawn<D>(
    notifier: Notifier<D>,
    capacity: usize,
) -> (ServiceHandle, JoinHandle<Notifier<D>>)
where
    D: Document + Send + 'static,
{
    let (tx, rx) = bounded(capacity.max(1));
    let task = tokio::spawn(run(notifier, rx));
    (ServiceHandle { tx }, task)
}

pub async fn run<D: Document>(mut notifier: Notifier<D>, rx: Receiver<Command>) -> Notifier<D> {
    let mut last_tick = Instant::now();
    loop {
        let received = match notifier.next_deadline() {
            Some(delay) => tokio::select! {
                biased;
                command = rx.recv() => Some(command),
                () = sleep(delay) => None,
            },
            None => Some(rx.recv().await),
        };

        // Catch the virtual clock up before handling, so new timers start now.
        let now = Instant::now();
        if let Err(err) = notifier.advance(now.saturating_duration_since(last_tick)) {
            error!(error = %err, "failed to run toast timers");
        }
        last_tick = now;

        match received {
            None => {}
            Some(Ok(command)) => handle(&mut notifier, command),
            Some(Err(_)) => {
                debug!("toast service channel closed, stopping");
                break;
            }
        }
    }
    notifier
}

fn handle<D: Document>(notifier: &mut Notifier<D>, command: Command) {
    match command {
        Command::Notify {
            message,
            options,
            reply,
        } => match notifier.notify(&message, &options) {
            Ok(toast) => {
                if let Some(reply) = reply {
                    let _ = reply.send(toast);
                }
            }
            Err(err) => error!(error = %err, "failed to show toast"),
        },
        Command::Dispatch { target, event } => {
            if let Err(err) = notifier.dispatch(target, event) {
                error!(error = %err, target = %target, ?event, "failed to dispatch event");
            }
        }
    }
}
