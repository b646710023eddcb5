//! Callback registration and dispatch for push-based notifications.
//!
//! A transport that supports server push (new heads, logs) registers one
//! callback per subscription and feeds inbound messages through
//! [`SubscriptionHub::dispatch`]. Messages for one subscription id are
//! delivered in arrival order; cancellation unregisters the id, and any
//! later dispatch to it fails explicitly instead of dropping silently.

use crate::{Error, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

type Callback = Box<dyn Fn(&Value) + Send + Sync>;

/// Registry of active subscriptions and their callbacks.
#[derive(Default)]
pub struct SubscriptionHub {
    next_id: AtomicU64,
    subscriptions: RwLock<HashMap<u64, Callback>>,
}

impl SubscriptionHub {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback, returning the subscription id used to
    /// dispatch and cancel it.
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscriptions.write().insert(id, Box::new(callback));
        debug!(id, "subscription registered");
        id
    }

    /// Delivers a message to the subscription's callback.
    ///
    /// Fails with [`Error::UnknownSubscription`] if the id was never
    /// registered or has been cancelled.
    pub fn dispatch(&self, id: u64, message: &Value) -> Result<()> {
        let subscriptions = self.subscriptions.read();
        let callback = subscriptions
            .get(&id)
            .ok_or(Error::UnknownSubscription(id))?;
        callback(message);
        Ok(())
    }

    /// Cancels a subscription.
    ///
    /// Fails with [`Error::UnknownSubscription`] if the id is not
    /// registered, so double-cancellation is visible to the caller.
    pub fn unsubscribe(&self, id: u64) -> Result<()> {
        match self.subscriptions.write().remove(&id) {
            Some(_) => {
                debug!(id, "subscription cancelled");
                Ok(())
            }
            None => Err(Error::UnknownSubscription(id)),
        }
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Checks if no subscriptions are active.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.read().is_empty()
    }
}

impl std::fmt::Debug for SubscriptionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHub")
            .field("active", &self.len())
            .finish()
    }
}
