//! One-to-many notification primitive backing the live collection views.

use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Observer callback registered on a [`Subject`].
pub type Observer = Arc<dyn Fn(&Value) + Send + Sync>;

/// An ordered list of callbacks invoked synchronously with each
/// published payload.
///
/// One subject serves one logical stream: create a fresh instance per
/// collection being observed instead of sharing a subject across
/// unrelated streams. The subject owns no data; it is a pure conduit.
#[derive(Default)]
pub struct Subject {
    observers: Vec<Observer>,
}

impl Subject {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Append an observer to the list.
    ///
    /// Duplicate registrations are kept; each one fires once per
    /// `notify`.
    pub fn subscribe(&mut self, observer: impl Fn(&Value) + Send + Sync + 'static) {
        self.observers.push(Arc::new(observer));
    }

    /// Reset the subject by removing every observer.
    ///
    /// This is a full reset, not targeted removal: after this call a
    /// `notify` reaches nobody, including observers registered by other
    /// callers.
    pub fn unsubscribe(&mut self) {
        self.observers.clear();
    }

    /// Deliver `payload` to every observer, in subscription order.
    ///
    /// A panicking observer is logged and skipped; delivery continues
    /// to the remaining observers.
    pub fn notify(&self, payload: &Value) {
        Self::deliver(&self.observers, payload);
    }

    /// Clone handles to the current observer list.
    ///
    /// Lets a caller that guards the subject with a lock take the list
    /// under the lock and deliver outside it, so observers may call
    /// back into the guarded subject.
    pub fn snapshot(&self) -> Vec<Observer> {
        self.observers.clone()
    }

    /// Deliver `payload` to a snapshot of observers, in order, with the
    /// same panic policy as [`notify`](Self::notify). Observers added
    /// or removed after the snapshot do not affect this delivery.
    pub fn deliver(observers: &[Observer], payload: &Value) {
        for (index, observer) in observers.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| observer(payload))).is_err() {
                warn!(index, "observer panicked during notify, continuing delivery");
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |payload: &Value| {
            sink.lock().unwrap().push(payload.clone())
        })
    }

    #[test]
    fn test_notify_delivers_payload_to_all_observers() {
        let mut subject = Subject::new();
        let (seen_a, observer_a) = recorder();
        let (seen_b, observer_b) = recorder();
        subject.subscribe(observer_a);
        subject.subscribe(observer_b);

        subject.notify(&json!({"fr": {"greeting": "bonjour"}}));

        assert_eq!(seen_a.lock().unwrap().len(), 1);
        assert_eq!(seen_b.lock().unwrap().len(), 1);
        assert_eq!(seen_a.lock().unwrap()[0]["fr"]["greeting"], "bonjour");
    }

    #[test]
    fn test_notify_preserves_subscription_order() {
        let mut subject = Subject::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            subject.subscribe(move |_| order.lock().unwrap().push(tag));
        }

        subject.notify(&Value::Null);

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_observer_fires_once_per_registration() {
        let mut subject = Subject::new();
        let (seen, observer) = recorder();
        let observer = Arc::new(observer);
        let first = Arc::clone(&observer);
        let second = Arc::clone(&observer);
        subject.subscribe(move |v| first(v));
        subject.subscribe(move |v| second(v));

        subject.notify(&json!(1));

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unsubscribe_clears_every_observer() {
        let mut subject = Subject::new();
        let (seen, observer) = recorder();
        subject.subscribe(observer);
        let (also_seen, another) = recorder();
        subject.subscribe(another);
        assert_eq!(subject.observer_count(), 2);

        subject.unsubscribe();
        subject.notify(&json!("after reset"));

        assert_eq!(subject.observer_count(), 0);
        assert!(seen.lock().unwrap().is_empty());
        assert!(also_seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_panicking_observer_does_not_stop_delivery() {
        let mut subject = Subject::new();
        subject.subscribe(|_| panic!("observer failure"));
        let (seen, observer) = recorder();
        subject.subscribe(observer);

        subject.notify(&json!("still delivered"));

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_notify_with_no_observers_is_a_no_op() {
        let subject = Subject::new();
        subject.notify(&json!({}));
    }

    #[test]
    fn test_snapshot_delivery_unaffected_by_later_reset() {
        let mut subject = Subject::new();
        let (seen, observer) = recorder();
        subject.subscribe(observer);

        let observers = subject.snapshot();
        subject.unsubscribe();
        Subject::deliver(&observers, &json!("in flight"));

        assert_eq!(subject.observer_count(), 0);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
