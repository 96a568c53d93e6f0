//! Locale resolution and translation delivery over a remote key-value
//! store.
//!
//! Given a location context, the service resolves which locale to
//! display (stored preference, its base tag, or the configured
//! default), lazily fetches the matching translation bundle from the
//! store into an injectable [`catalog::TranslationCatalog`], and
//! republishes bundle and constant changes to observers through
//! [`subject::Subject`] streams.
//!
//! # Architecture
//!
//! - `config`: process-wide language settings and the three-tier
//!   resolution rule
//! - `error`: store and resolution error types
//! - `store`: the remote key-value capability the service consumes
//! - `memory`: in-process store backend for tests and embedders
//! - `subject`: one-to-many notification primitive
//! - `catalog`: the rendering surface's live message registry
//! - `ambient`: host environment language preference
//! - `service`: the language service itself
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_relay::{
//!     ambient::SystemLocale, catalog::TranslationCatalog,
//!     config::LanguageSettings, memory::MemoryStore,
//!     service::LanguageService,
//! };
//! use std::sync::Arc;
//!
//! let settings = LanguageSettings::from_env()?;
//! let catalog = Arc::new(TranslationCatalog::new(
//!     settings.default_language.clone(),
//!     settings.fallback_language.clone(),
//! ));
//! let service = LanguageService::new(
//!     settings,
//!     Arc::new(MemoryStore::new()),
//!     catalog,
//!     Arc::new(SystemLocale),
//! );
//! service.check_location_lang("loc-1").await?;
//! ```

pub mod ambient;
pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod subject;

pub use ambient::{AmbientLocale, FixedLocale, SystemLocale};
pub use catalog::{Messages, TranslationBundle, TranslationCatalog};
pub use config::{LanguageSettings, LocalePair};
pub use error::{LanguageError, StoreError};
pub use memory::MemoryStore;
pub use service::{BundleKind, LanguageService, WatchGuard};
pub use store::{RemoteStore, StoreSubscription};
pub use subject::Subject;
