// Copyright (c) 2026 riverguard
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/riverguard/riverguard-rs

//! Event bus for inter-component communication
//!
//! An explicitly constructed, passed-by-reference bus. Delivery is
//! synchronous and in registration order; there is no buffering and no
//! replay, so a subscriber registered after a publish never sees that
//! earlier event. Each publish walks a snapshot of the registrations taken
//! when it starts, so callbacks may subscribe or unsubscribe on the same
//! bus: a subscriber added during delivery first sees the next publish,
//! and one removed during delivery may still receive the in-flight event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::detection::{ChatMessage, Incident};

/// User-facing transient notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Notification level ("info", "success", "error")
    pub level: String,
    /// Notification text
    pub message: String,
    /// When the alert was raised
    pub timestamp: DateTime<Utc>,
}

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Entries<T> = Arc<Mutex<Vec<(u64, Callback<T>)>>>;

/// Unsubscribe capability returned at registration time.
///
/// Invoking [`Subscription::unsubscribe`] removes exactly that registration;
/// dropping the guard does the same, so a subscription held for a component's
/// lifetime cannot leak past it.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Remove this registration from the bus
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

struct Registry<T> {
    entries: Entries<T>,
}

impl<T: 'static> Registry<T> {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn subscribe<F>(&self, id: u64, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.entries.lock().push((id, Arc::new(callback)));

        let entries = Arc::clone(&self.entries);
        Subscription {
            cancel: Some(Box::new(move || {
                entries.lock().retain(|(entry_id, _)| *entry_id != id);
            })),
        }
    }

    fn publish(&self, payload: &T) {
        // Snapshot outside the lock so callbacks can touch the bus
        let snapshot: Vec<Callback<T>> = self
            .entries
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(payload);
        }
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Central event bus for pub/sub communication
pub struct EventBus {
    incidents: Registry<Incident>,
    chat: Registry<ChatMessage>,
    alerts: Registry<Alert>,
    subscription_counter: AtomicU64,
    published_counter: AtomicU64,
}

impl EventBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self {
            incidents: Registry::new(),
            chat: Registry::new(),
            alerts: Registry::new(),
            subscription_counter: AtomicU64::new(0),
            published_counter: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> u64 {
        self.subscription_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Deliver an incident to every current incident subscriber
    pub fn publish_incident(&self, incident: &Incident) {
        self.published_counter.fetch_add(1, Ordering::Relaxed);
        self.incidents.publish(incident);
    }

    /// Deliver a chat message to every current chat subscriber
    pub fn publish_chat(&self, message: &ChatMessage) {
        self.published_counter.fetch_add(1, Ordering::Relaxed);
        self.chat.publish(message);
    }

    /// Raise a user-facing notification
    pub fn publish_alert(&self, level: &str, message: &str) {
        self.published_counter.fetch_add(1, Ordering::Relaxed);
        self.alerts.publish(&Alert {
            level: level.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        });
    }

    /// Register an incident subscriber
    pub fn subscribe_incidents<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Incident) + Send + Sync + 'static,
    {
        self.incidents.subscribe(self.next_id(), callback)
    }

    /// Register a chat subscriber
    pub fn subscribe_chat<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChatMessage) + Send + Sync + 'static,
    {
        self.chat.subscribe(self.next_id(), callback)
    }

    /// Register an alert subscriber
    pub fn subscribe_alerts<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Alert) + Send + Sync + 'static,
    {
        self.alerts.subscribe(self.next_id(), callback)
    }

    /// Total events published since construction
    pub fn published(&self) -> u64 {
        self.published_counter.load(Ordering::Relaxed)
    }

    /// Current incident subscriber count
    pub fn incident_subscribers(&self) -> usize {
        self.incidents.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
