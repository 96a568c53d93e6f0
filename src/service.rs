//! Locale resolution and translation delivery.
//!
//! `LanguageService` resolves the effective locale for a location,
//! loads translation bundles from the remote store into the rendering
//! catalog, writes locale preferences back, and republishes remote
//! collection changes to observers through [`Subject`]s.

use crate::ambient::AmbientLocale;
use crate::catalog::{Messages, TranslationCatalog};
use crate::config::{LanguageSettings, LocalePair};
use crate::error::{LanguageError, StoreError};
use crate::store::{paths, RemoteStore, StoreSubscription};
use crate::subject::Subject;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Which translation collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleKind {
    /// Bundles consumed by the mobile app (`languages`)
    App,
    /// Bundles consumed by the web dashboard (`webLanguages`)
    Web,
}

impl BundleKind {
    pub fn collection(self) -> &'static str {
        match self {
            BundleKind::App => paths::APP_LANGUAGES,
            BundleKind::Web => paths::WEB_LANGUAGES,
        }
    }
}

/// A live view over a watched remote collection.
///
/// Dropping the guard (or calling [`WatchGuard::unsubscribe`]) detaches
/// the store listener and resets the underlying subject, so the stream
/// cannot outlive its caller.
pub struct WatchGuard {
    subject: Arc<Mutex<Subject>>,
    subscription: Option<StoreSubscription>,
}

impl WatchGuard {
    /// Attach another observer to the same stream.
    pub fn subscribe(&self, callback: impl Fn(&Value) + Send + Sync + 'static) {
        self.subject.lock().unwrap().subscribe(callback);
    }

    /// Tear the stream down now instead of waiting for drop.
    pub fn unsubscribe(mut self) {
        self.teardown();
    }

    pub fn observer_count(&self) -> usize {
        self.subject.lock().unwrap().observer_count()
    }

    fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.subject.lock().unwrap().unsubscribe();
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Hook invoked with the new locale tag after a default-language write,
/// for hosts that mirror the locale into a document attribute.
pub type DocumentLangHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Resolves effective locales and delivers translation bundles.
pub struct LanguageService<S: RemoteStore> {
    settings: LanguageSettings,
    store: Arc<S>,
    catalog: Arc<TranslationCatalog>,
    ambient: Arc<dyn AmbientLocale>,
    document_lang_hook: Option<DocumentLangHook>,
    remote_timeout: Option<Duration>,
}

fn default_lang_path(location_id: &str) -> String {
    format!("{}/{}/defaultLang", paths::LOCATIONS, location_id)
}

fn messages_to_value(messages: &Messages) -> Value {
    Value::Object(
        messages
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

impl<S: RemoteStore> LanguageService<S> {
    pub fn new(
        settings: LanguageSettings,
        store: Arc<S>,
        catalog: Arc<TranslationCatalog>,
        ambient: Arc<dyn AmbientLocale>,
    ) -> Self {
        Self {
            settings,
            store,
            catalog,
            ambient,
            document_lang_hook: None,
            remote_timeout: None,
        }
    }

    /// Mirror locale changes into a host-owned document attribute.
    pub fn with_document_lang_hook(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.document_lang_hook = Some(Arc::new(hook));
        self
    }

    /// Bound every remote call instead of waiting forever. An elapsed
    /// timer surfaces as a fetch/write error with code `timeout`.
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = Some(timeout);
        self
    }

    pub fn settings(&self) -> &LanguageSettings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<TranslationCatalog> {
        &self.catalog
    }

    async fn guarded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match self.remote_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(StoreError::new(
                    "timeout",
                    format!("no response within {}ms", limit.as_millis()),
                ))
            }),
            None => call.await,
        }
    }

    async fn fetch(&self, path: &str) -> Result<Option<Value>, LanguageError> {
        self.guarded(self.store.get(path))
            .await
            .map_err(|source| LanguageError::RemoteFetch {
                path: path.to_string(),
                source,
            })
    }

    async fn write(&self, path: &str, value: Value) -> Result<(), LanguageError> {
        self.guarded(self.store.set(path, value))
            .await
            .map_err(|source| LanguageError::RemoteWrite {
                path: path.to_string(),
                source,
            })
    }

    /// The ambient environment's preferred language, or the configured
    /// default when the environment advertises none.
    pub fn browser_lang(&self) -> LocalePair {
        let tag = self
            .ambient
            .preferred()
            .unwrap_or_else(|| self.settings.default_language.clone());
        LocalePair::from_tag(&tag)
    }

    /// Membership test against the supported-locale set.
    pub fn is_lang_supported(&self, lang: &str) -> bool {
        self.settings.is_supported(lang)
    }

    /// Fetch the stored default locale for a location.
    ///
    /// Distinguishes an unprovisioned location
    /// ([`LanguageError::LocationNotFound`]) from a record that exists
    /// but carries no default ([`LanguageError::NoDefaultLanguage`]).
    pub async fn get_default_language(
        &self,
        location_id: &str,
    ) -> Result<LocalePair, LanguageError> {
        let path = default_lang_path(location_id);
        match self.fetch(&path).await? {
            Some(Value::String(tag)) => Ok(LocalePair::from_tag(&tag)),
            // A non-string default is treated as unset.
            Some(_) | None => {
                let location_path = format!("{}/{}", paths::LOCATIONS, location_id);
                if self.fetch(&location_path).await?.is_some() {
                    Err(LanguageError::NoDefaultLanguage(location_id.to_string()))
                } else {
                    Err(LanguageError::LocationNotFound(location_id.to_string()))
                }
            }
        }
    }

    /// Resolve the effective locale for a location: the stored default
    /// if supported, else its base tag if supported, else the
    /// configured default language.
    pub async fn get_user_supported_lang(
        &self,
        location_id: &str,
    ) -> Result<String, LanguageError> {
        let preferred = self.get_default_language(location_id).await?;
        Ok(self.settings.resolve(&preferred))
    }

    /// Align the active locale with the location's stored preference.
    ///
    /// When the resolved locale differs from the active one, the switch
    /// goes through [`set_i18n_locale`](Self::set_i18n_locale) so the
    /// bundle is loaded before the locale becomes active.
    pub async fn check_location_lang(&self, location_id: &str) -> Result<(), LanguageError> {
        let resolved = self.get_user_supported_lang(location_id).await?;
        if self.catalog.active_locale() != resolved {
            self.set_i18n_locale(&resolved).await?;
        }
        Ok(())
    }

    /// Activate `lang` if it is supported; unsupported tags are ignored
    /// without error.
    pub async fn set_i18n_locale(&self, lang: &str) -> Result<(), LanguageError> {
        if !self.is_lang_supported(lang) {
            debug!(lang, "ignoring unsupported locale");
            return Ok(());
        }
        self.load_language(lang).await
    }

    /// Store `lang` as the location's default, activate it, and notify
    /// the document-language hook when one is installed.
    pub async fn set_default_language(
        &self,
        location_id: &str,
        lang: &str,
    ) -> Result<String, LanguageError> {
        let path = default_lang_path(location_id);
        self.write(&path, Value::String(lang.to_string())).await?;
        self.set_i18n_locale(lang).await?;
        if let Some(hook) = &self.document_lang_hook {
            hook(lang);
        }
        info!(location_id, lang, "location default language updated");
        Ok("The Default Language Setting has been successfully updated".to_string())
    }

    /// Fetch the web bundle for `lang`, merge it into the catalog under
    /// that locale, and make `lang` the active locale.
    ///
    /// Every call re-fetches; the catalog is the only cache. A missing
    /// bundle merges an empty map so the switch still happens.
    pub async fn load_language(&self, lang: &str) -> Result<(), LanguageError> {
        let path = format!("{}/{}", paths::WEB_LANGUAGES, lang);
        let messages: Messages = match self.fetch(&path).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| LanguageError::MalformedBundle {
                    locale: lang.to_string(),
                    reason: e.to_string(),
                })?
            }
            None => {
                warn!(lang, "no translation bundle stored, activating with empty messages");
                Messages::new()
            }
        };
        self.catalog.set_locale_message(lang, messages);
        self.catalog.set_active_locale(lang);
        info!(lang, "translation bundle loaded");
        Ok(())
    }

    /// Overwrite the stored bundle for `lang_code` in the given
    /// collection.
    pub async fn update_translation(
        &self,
        kind: BundleKind,
        lang_code: &str,
        messages: &Messages,
    ) -> Result<(), LanguageError> {
        let path = format!("{}/{}", kind.collection(), lang_code);
        self.write(&path, messages_to_value(messages)).await
    }

    /// Remove the stored bundle for `lang_code` from the given
    /// collection.
    pub async fn delete_translation(
        &self,
        kind: BundleKind,
        lang_code: &str,
    ) -> Result<(), LanguageError> {
        let path = format!("{}/{}", kind.collection(), lang_code);
        self.guarded(self.store.remove(&path))
            .await
            .map_err(|source| LanguageError::RemoteWrite { path, source })
    }

    /// Replace the entire stored `languageSupport` record. Full
    /// overwrite, no partial merge.
    pub async fn update_constants(
        &self,
        constants: &LanguageSettings,
    ) -> Result<(), LanguageError> {
        let value = serde_json::to_value(constants).map_err(|e| LanguageError::RemoteWrite {
            path: paths::LANGUAGE_SUPPORT.to_string(),
            source: StoreError::new("serialization", e.to_string()),
        })?;
        self.write(paths::LANGUAGE_SUPPORT, value).await
    }

    /// Observe every bundle in a translation collection.
    ///
    /// The callback fires with the collection's current value and again
    /// on each remote change, until the returned guard is dropped.
    /// Watch-channel errors are logged and never reach the observers.
    pub fn get_all(
        &self,
        kind: BundleKind,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> WatchGuard {
        self.watch_collection(kind.collection(), callback)
    }

    /// Observe the `languageSupport` record.
    pub fn get_all_supported(
        &self,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> WatchGuard {
        self.watch_collection(paths::LANGUAGE_SUPPORT, callback)
    }

    fn watch_collection(
        &self,
        path: &str,
        callback: impl Fn(&Value) + Send + Sync + 'static,
    ) -> WatchGuard {
        // One fresh subject per logical stream.
        let subject = Arc::new(Mutex::new(Subject::new()));
        subject.lock().unwrap().subscribe(callback);

        let notifier = Arc::clone(&subject);
        let watched = path.to_string();
        let subscription = self.store.watch(
            path,
            Box::new(move |value| {
                // Snapshot under the lock, deliver outside it, so an
                // observer may call back into the guard.
                let observers = notifier.lock().unwrap().snapshot();
                Subject::deliver(&observers, &value);
            }),
            Box::new(move |err| {
                // Best-effort live feed: log and keep the stream alive.
                error!(path = %watched, code = %err.code, "watch error: {}", err.message);
            }),
        );

        WatchGuard {
            subject,
            subscription: Some(subscription),
        }
    }
}
