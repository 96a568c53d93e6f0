//! Ambient language preference of the host environment.

/// Read-only access to the caller's preferred language tag.
pub trait AmbientLocale: Send + Sync {
    /// The environment's preferred locale tag, if one is advertised.
    fn preferred(&self) -> Option<String>;
}

/// Preference read from the operating system's locale settings.
pub struct SystemLocale;

impl AmbientLocale for SystemLocale {
    fn preferred(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// Fixed preference, for tests and hosts that manage their own.
pub struct FixedLocale(Option<String>);

impl FixedLocale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Some(tag.into()))
    }

    /// An environment that advertises no preference at all.
    pub fn none() -> Self {
        Self(None)
    }
}

impl AmbientLocale for FixedLocale {
    fn preferred(&self) -> Option<String> {
        self.0.clone()
    }
}
