//! Remote key-value store capability consumed by the language service.

use crate::error::StoreError;
use serde_json::Value;
use std::future::Future;

/// Well-known paths in the remote store.
pub mod paths {
    /// Per-location records; the stored default locale lives at
    /// `locations/{locationId}/defaultLang`.
    pub const LOCATIONS: &str = "locations";

    /// Translation bundles consumed by the mobile app.
    pub const APP_LANGUAGES: &str = "languages";

    /// Translation bundles consumed by the web dashboard.
    pub const WEB_LANGUAGES: &str = "webLanguages";

    /// The language support record backing `LanguageSettings`.
    pub const LANGUAGE_SUPPORT: &str = "languageSupport";
}

/// Callback invoked with the current value whenever a watched path
/// changes.
pub type ChangeFn = Box<dyn Fn(Value) + Send + Sync>;

/// Callback invoked when the watch channel reports an error.
pub type ErrorFn = Box<dyn Fn(StoreError) + Send + Sync>;

/// A live watch registration.
///
/// Dropping the subscription detaches the listener from the store; no
/// further change callbacks are delivered after that point.
pub struct StoreSubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl StoreSubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach the listener now instead of waiting for drop.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// A hierarchical key-value store addressed by `/`-separated paths
/// (e.g. `locations/loc-1/defaultLang`).
///
/// `get` returns the subtree rooted at the path, or `None` when nothing
/// is stored at or below it. `watch` registers a long-lived listener
/// fired with the current subtree on every change at, above, or below
/// the watched path; errors on the watch channel go to `on_error` and
/// are never raised out of band.
pub trait RemoteStore: Send + Sync {
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Value>, StoreError>> + Send;

    fn set(
        &self,
        path: &str,
        value: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn remove(&self, path: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn watch(&self, path: &str, on_change: ChangeFn, on_error: ErrorFn) -> StoreSubscription;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_subscription_cancels_on_drop() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let subscription = StoreSubscription::new(move || flag.store(true, Ordering::SeqCst));

        drop(subscription);

        assert!(cancelled.load(Ordering::SeqCst));
    }

    #[test]
    fn test_explicit_cancel_runs_once() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let subscription = StoreSubscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.cancel();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
