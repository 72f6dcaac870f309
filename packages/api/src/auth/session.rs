//! # Observable session state
//!
//! [`SessionHub`] holds the single current `Option<UserSession>` for the process and
//! tells interested parties when it changes. Two ways to observe it:
//!
//! - [`SessionHub::watch`] hands out a [`tokio::sync::watch::Receiver`]. The shell
//!   takes one receiver when it is constructed and awaits changes on it.
//! - [`SessionHub::subscribe`] registers a callback that is invoked immediately with
//!   the current value and then synchronously on every change, `None` included.
//!   The returned [`Subscription`] unregisters on [`Subscription::unsubscribe`] or
//!   when dropped.
//!
//! Publishing replaces the value wholesale; there is no merging of sessions.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::watch;

use crate::models::UserSession;

type Callback = Arc<dyn Fn(Option<&UserSession>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: BTreeMap<u64, Callback>,
}

/// Process-wide observable session value.
#[derive(Clone)]
pub struct SessionHub {
    tx: Arc<watch::Sender<Option<UserSession>>>,
    listeners: Arc<Mutex<Listeners>>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHub")
            .field("current", &*self.tx.borrow())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: Arc::new(tx),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// The current session, if anyone is signed in.
    pub fn current(&self) -> Option<UserSession> {
        self.tx.borrow().clone()
    }

    /// A receiver that observes every future change.
    pub fn watch(&self) -> watch::Receiver<Option<UserSession>> {
        self.tx.subscribe()
    }

    /// Register a callback. It runs once right away with the current value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&UserSession>) + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        let id = {
            let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.callbacks.insert(id, callback.clone());
            id
        };

        let current = self.current();
        callback(current.as_ref());

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .lock()
            .map(|l| l.callbacks.len())
            .unwrap_or_default()
    }

    /// Replace the current session and notify every observer.
    pub fn publish(&self, session: Option<UserSession>) {
        self.tx.send_replace(session.clone());

        // Callbacks run without the lock held so they may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .values()
            .cloned()
            .collect();
        for callback in callbacks {
            callback(session.as_ref());
        }
    }
}

/// Handle for a registered session callback.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut listeners) = listeners.lock() {
                listeners.callbacks.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> UserSession {
        UserSession {
            uid: format!("uid-{email}"),
            email: email.to_string(),
            provider: "password".to_string(),
        }
    }

    #[test]
    fn test_subscribe_fires_immediately_and_on_change() {
        let hub = SessionHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        let sub = hub.subscribe(move |s| {
            sink.lock().unwrap().push(s.map(|s| s.email.clone()));
        });

        hub.publish(Some(user("a@example.com")));
        hub.publish(None);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("a@example.com".to_string()), None]
        );
        assert_eq!(hub.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(hub.subscriber_count(), 0);

        hub.publish(Some(user("b@example.com")));
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_watch_sees_latest_value() {
        let hub = SessionHub::new();
        let mut rx = hub.watch();
        assert!(!rx.has_changed().unwrap());

        hub.publish(Some(user("a@example.com")));
        hub.publish(Some(user("b@example.com")));

        assert!(rx.has_changed().unwrap());
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.unwrap().email, "b@example.com");
        assert_eq!(hub.current().unwrap().email, "b@example.com");
    }

    #[test]
    fn test_clones_share_state() {
        let hub = SessionHub::new();
        let other = hub.clone();
        let _sub = other.subscribe(|_| {});
        hub.publish(Some(user("c@example.com")));
        assert_eq!(other.current().unwrap().email, "c@example.com");
        assert_eq!(hub.subscriber_count(), 1);
    }
}
