//! Locale identifier fallback chains.
//!
//! Locale identifiers are `_`-separated strings ordered general to specific
//! (`"en"`, `"en_US"`, `"en_US_POSIX"`). The fallback chain walks toward the
//! root by dropping the last segment: `"en_US_POSIX"` → `"en_US"` → `"en"` →
//! `""`. The empty identifier is the root and has no ancestor.
//!
//! No normalization or case folding happens here; callers supply identifiers
//! in canonical form.

use unic_langid::LanguageIdentifier;

/// Returns the immediate ancestor of a locale identifier, or `None` for the
/// root (empty) identifier.
///
/// A single-segment identifier falls back to the root.
///
/// # Example
/// ```rust
/// use resbundle::chain::parent_identifier;
/// assert_eq!(parent_identifier("en_US_POSIX"), Some("en_US"));
/// assert_eq!(parent_identifier("en"), Some(""));
/// assert_eq!(parent_identifier(""), None);
/// ```
pub fn parent_identifier(locale_id: &str) -> Option<&str> {
    if locale_id.is_empty() {
        return None;
    }
    match locale_id.rfind('_') {
        Some(i) => Some(&locale_id[..i]),
        None => Some(""),
    }
}

/// Builds the fully qualified bundle name: the base name alone for the root
/// locale, otherwise `base_locale`.
///
/// The qualified name is the lookup key for both loading strategies, so its
/// shape must stay stable for interoperability with existing resource
/// layouts.
pub fn qualified_name(base_name: &str, locale_id: &str) -> String {
    if locale_id.is_empty() {
        base_name.to_string()
    } else {
        format!("{}_{}", base_name, locale_id)
    }
}

/// Converts a parsed [`LanguageIdentifier`] into the underscore-separated
/// form used throughout this crate (`en-US` → `en_US`).
///
/// Script, region, and variants are appended in that order when present.
pub fn locale_id_from_langid(langid: &LanguageIdentifier) -> String {
    let mut id = langid.language.to_string();
    if let Some(script) = langid.script {
        id.push('_');
        id.push_str(script.as_str());
    }
    if let Some(region) = langid.region {
        id.push('_');
        id.push_str(region.as_str());
    }
    for variant in langid.variants() {
        id.push('_');
        id.push_str(variant.as_str());
    }
    id
}

/// Iterator over the ancestors of a locale identifier, most specific first,
/// ending with the root `""`. The starting identifier itself is not yielded.
#[derive(Debug, Clone)]
pub struct FallbackChain<'a> {
    current: &'a str,
}

impl<'a> FallbackChain<'a> {
    /// Creates a chain starting from (but not including) `locale_id`.
    pub fn new(locale_id: &'a str) -> Self {
        FallbackChain { current: locale_id }
    }
}

impl<'a> Iterator for FallbackChain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let parent = parent_identifier(self.current)?;
        self.current = parent;
        Some(parent)
    }
}
