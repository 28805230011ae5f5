//! Lifecycle subscribers: handlers and channels notified on terminal transitions.

use super::messages::{DeploymentFailure, LifecycleEvent};
use crossbeam_channel::{unbounded, Receiver, Sender};

type ErrorHandler = Box<dyn FnMut(DeploymentFailure)>;
type CloseHandler = Box<dyn FnMut()>;

/// Registry of everyone interested in a logger's `error` and `close` events.
#[derive(Default)]
pub struct Lifecycle {
    error_handlers: Vec<ErrorHandler>,
    close_handlers: Vec<CloseHandler>,
    subscribers: Vec<Sender<LifecycleEvent>>,
}

impl Lifecycle {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `error` events.
    pub fn on_error(&mut self, handler: impl FnMut(DeploymentFailure) + 'static) {
        self.error_handlers.push(Box::new(handler));
    }

    /// Register a handler for `close` events.
    pub fn on_close(&mut self, handler: impl FnMut() + 'static) {
        self.close_handlers.push(Box::new(handler));
    }

    /// Subscribe to every lifecycle event through a channel.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<LifecycleEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to all handlers and subscribers.
    pub fn emit(&mut self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Error(failure) => {
                for handler in &mut self.error_handlers {
                    handler(failure);
                }
            }
            LifecycleEvent::Close => {
                for handler in &mut self.close_handlers {
                    handler();
                }
            }
        }

        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("error_handlers", &self.error_handlers.len())
            .field("close_handlers", &self.close_handlers.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
