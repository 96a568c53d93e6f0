//! Process-wide language configuration.
//!
//! `LanguageSettings` is loaded once at startup and treated as read-only
//! for the process lifetime. It can come from environment variables or
//! from a static JSON document using the `defaultLang`/`fallbackLang`/
//! `supportedLang` field names of the persisted `languageSupport` record.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A locale tag split into its full and base forms.
///
/// The base form is the substring before the first `-`, so `fr-CA`
/// yields `fr`. Derived on demand, never stored independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalePair {
    /// Full locale tag, e.g. `en-US`
    pub lang: String,

    /// Language-only prefix, e.g. `en`
    pub base: String,
}

impl LocalePair {
    pub fn from_tag(tag: &str) -> Self {
        let base = tag.split('-').next().unwrap_or(tag);
        Self {
            lang: tag.to_string(),
            base: base.to_string(),
        }
    }
}

/// Static language configuration: the default and fallback locales and
/// the set of locales the rendering surface supports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSettings {
    /// Locale used when no stored or ambient preference applies
    #[serde(rename = "defaultLang")]
    pub default_language: String,

    /// Locale the rendering surface falls back to for missing keys
    #[serde(rename = "fallbackLang")]
    pub fallback_language: String,

    /// Locales with translation bundles available
    #[serde(rename = "supportedLang")]
    pub supported_languages: Vec<String>,
}

impl LanguageSettings {
    pub fn new(
        default_language: impl Into<String>,
        fallback_language: impl Into<String>,
        supported_languages: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            default_language: default_language.into(),
            fallback_language: fallback_language.into(),
            supported_languages: supported_languages.into_iter().map(Into::into).collect(),
        }
    }

    /// Load settings from environment variables.
    ///
    /// `LOCALE_SUPPORTED_LANGS` is a comma-separated list; blank entries
    /// are skipped. `LOCALE_FALLBACK_LANG` defaults to the default
    /// language when unset.
    pub fn from_env() -> Result<Self> {
        let default_language =
            std::env::var("LOCALE_DEFAULT_LANG").context("LOCALE_DEFAULT_LANG not set")?;

        let fallback_language =
            std::env::var("LOCALE_FALLBACK_LANG").unwrap_or_else(|_| default_language.clone());

        let supported_languages = std::env::var("LOCALE_SUPPORTED_LANGS")
            .context("LOCALE_SUPPORTED_LANGS not set")?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            default_language,
            fallback_language,
            supported_languages,
        })
    }

    /// Load settings from a JSON document shaped like the stored
    /// `languageSupport` record.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse language settings JSON")
    }

    /// Load settings from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read language settings from {}", path.display()))?;
        Self::from_json_str(&contents)
    }

    /// Membership test against the supported-locale set.
    pub fn is_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    /// Pick the effective locale for a stored or ambient preference.
    ///
    /// Strict three-tier fallback: the exact tag if supported, else the
    /// base tag if supported, else the configured default. No fuzzy
    /// matching beyond these three.
    pub fn resolve(&self, preferred: &LocalePair) -> String {
        if self.is_supported(&preferred.lang) {
            return preferred.lang.clone();
        }
        if self.is_supported(&preferred.base) {
            return preferred.base.clone();
        }
        self.default_language.clone()
    }
}
