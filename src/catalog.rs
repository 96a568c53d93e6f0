//! Rendering-surface capability: the live translation message store.
//!
//! The catalog holds the per-locale message maps and the locale that is
//! currently active for rendering. It is an explicit, injectable
//! instance so tests and embedders can run isolated copies instead of
//! sharing process-global state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// Flat message-key to translated-string map for one locale.
///
/// Nested message identifiers use dotted keys (`menu.settings.title`).
pub type Messages = BTreeMap<String, String>;

/// A translation bundle for a single locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationBundle {
    pub locale: String,
    pub messages: Messages,
}

struct CatalogState {
    messages: HashMap<String, Messages>,
    active: String,
    fallback: String,
}

/// The translation registry backing the rendering surface.
///
/// Exactly one locale is active at a time. Loading a bundle merges it
/// in under its own locale key and never touches bundles already loaded
/// for other locales.
pub struct TranslationCatalog {
    state: RwLock<CatalogState>,
}

impl TranslationCatalog {
    pub fn new(initial_locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                messages: HashMap::new(),
                active: initial_locale.into(),
                fallback: fallback_locale.into(),
            }),
        }
    }

    /// Replace the message map stored under `locale`, leaving every
    /// other locale's bundle untouched.
    pub fn set_locale_message(&self, locale: &str, messages: Messages) {
        let mut state = self.state.write().unwrap();
        state.messages.insert(locale.to_string(), messages);
    }

    /// Make `locale` the active rendering locale.
    pub fn set_active_locale(&self, locale: &str) {
        let mut state = self.state.write().unwrap();
        state.active = locale.to_string();
    }

    pub fn active_locale(&self) -> String {
        self.state.read().unwrap().active.clone()
    }

    pub fn fallback_locale(&self) -> String {
        self.state.read().unwrap().fallback.clone()
    }

    /// True when a bundle has been loaded for `locale`.
    pub fn has_locale(&self, locale: &str) -> bool {
        self.state.read().unwrap().messages.contains_key(locale)
    }

    /// Look up `key` in the active locale, falling back to the
    /// fallback locale when the active bundle lacks it.
    pub fn message(&self, key: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        let from_active = state
            .messages
            .get(&state.active)
            .and_then(|bundle| bundle.get(key));
        match from_active {
            Some(text) => Some(text.clone()),
            None => state
                .messages
                .get(&state.fallback)
                .and_then(|bundle| bundle.get(key))
                .cloned(),
        }
    }
}
