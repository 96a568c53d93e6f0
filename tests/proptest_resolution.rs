//! Property tests for the three-tier locale resolution rule.

use locale_relay::{LanguageSettings, LocalePair};
use proptest::prelude::*;

fn locale_tag() -> impl Strategy<Value = String> {
    // Tags like "fr", "en-GB", "zh-Hant-TW"
    proptest::collection::vec("[a-z]{2,4}", 1..=3).prop_map(|parts| parts.join("-"))
}

fn settings_and_preference() -> impl Strategy<Value = (LanguageSettings, String)> {
    (
        locale_tag(),
        proptest::collection::vec(locale_tag(), 0..6),
        locale_tag(),
    )
        .prop_map(|(default, supported, preferred)| {
            let settings = LanguageSettings::new(default.clone(), default, supported);
            (settings, preferred)
        })
}

proptest! {
    /// The resolved locale is always a supported tag or the configured
    /// default, never anything else.
    #[test]
    fn resolution_never_escapes_supported_or_default(
        (settings, preferred) in settings_and_preference()
    ) {
        let resolved = settings.resolve(&LocalePair::from_tag(&preferred));
        prop_assert!(
            settings.is_supported(&resolved) || resolved == settings.default_language
        );
    }

    /// A supported exact tag is always returned as-is.
    #[test]
    fn resolution_honors_supported_exact_tag(
        (settings, preferred) in settings_and_preference()
    ) {
        let mut settings = settings;
        settings.supported_languages.push(preferred.clone());
        let resolved = settings.resolve(&LocalePair::from_tag(&preferred));
        prop_assert_eq!(resolved, preferred);
    }

    /// When only the base tag is supported, the base tag wins over the
    /// configured default.
    #[test]
    fn resolution_prefers_base_tag_over_default(
        (settings, preferred) in settings_and_preference()
    ) {
        let pair = LocalePair::from_tag(&preferred);
        prop_assume!(!settings.is_supported(&pair.lang));

        let mut settings = settings;
        settings.supported_languages.push(pair.base.clone());
        let resolved = settings.resolve(&pair);
        prop_assert_eq!(resolved, pair.base);
    }

    /// Resolution is deterministic for a fixed configuration.
    #[test]
    fn resolution_is_deterministic(
        (settings, preferred) in settings_and_preference()
    ) {
        let pair = LocalePair::from_tag(&preferred);
        prop_assert_eq!(settings.resolve(&pair), settings.resolve(&pair));
    }
}
