//! Recursive bundle resolution.
//!
//! Resolution builds the parent-linked fallback chain bottom-up: ancestors
//! are resolved (cache-first) before the requested level, each level is
//! loaded by probing the typed strategy then the flat-file strategy, and
//! the outcome is published to the cache under the (loader, qualified name,
//! default locale) key. The entire operation runs under one resolver-wide
//! lock, so at most one resolution is in flight per resolver and a level is
//! loaded at most once per key.

use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use tracing::{debug, trace};
use unic_langid::LanguageIdentifier;

use crate::cache::{BundleCache, CacheKey};
use crate::chain::{self, parent_identifier, qualified_name};
use crate::error::Error;
use crate::handle::Bundle;
use crate::loader::{InstantiateError, LoaderContext};
use crate::properties;
use crate::types::LevelData;

/// Source of the process default locale, consulted once per top-level
/// resolution. The value in effect becomes part of every cache key that
/// resolution touches.
pub trait DefaultLocale: Send + Sync {
    fn current(&self) -> String;
}

/// Reads the default locale from `LC_ALL`, `LC_MESSAGES`, then `LANG`
/// (`en_US.UTF-8` → `en_US`), falling back to `en_US`.
pub struct SystemDefaultLocale;

impl DefaultLocale for SystemDefaultLocale {
    fn current(&self) -> String {
        for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
            if let Ok(value) = std::env::var(var) {
                let id = value.split('.').next().unwrap_or_default().trim();
                if !id.is_empty() && id != "C" && id != "POSIX" {
                    return id.to_string();
                }
            }
        }
        "en_US".to_string()
    }
}

/// A fixed default locale, mainly for tests and embedders that manage
/// locale state themselves.
pub struct FixedDefaultLocale(pub String);

impl DefaultLocale for FixedDefaultLocale {
    fn current(&self) -> String {
        self.0.clone()
    }
}

lazy_static! {
    static ref GLOBAL: Resolver = Resolver::new();
}

/// Resolves bundle handles and owns their cache.
///
/// Each resolver has its own cache, so tests and embedders can isolate
/// resolution state; [`Resolver::global`] offers the conventional shared
/// instance.
pub struct Resolver {
    cache: Mutex<BundleCache>,
    default_locale: Box<dyn DefaultLocale>,
}

impl Resolver {
    /// Creates a resolver using the system default locale.
    pub fn new() -> Self {
        Self::with_default_locale(SystemDefaultLocale)
    }

    /// Creates a resolver with an explicit default-locale provider.
    pub fn with_default_locale(provider: impl DefaultLocale + 'static) -> Self {
        Resolver {
            cache: Mutex::new(BundleCache::new()),
            default_locale: Box::new(provider),
        }
    }

    /// The process-wide shared resolver.
    pub fn global() -> &'static Resolver {
        &GLOBAL
    }

    /// Resolves a handle for `(base_name, locale_id)`.
    ///
    /// `loader` defaults to the process-wide context rooted at the current
    /// directory. With `disable_fallback` the returned handle carries no
    /// parent link, so lookups see only its own level; the cache always
    /// keeps the fully linked chain, so later fallback-enabled resolutions
    /// are unaffected.
    ///
    /// # Errors
    ///
    /// [`Error::BundleNotFound`] when no level in the chain (nor the
    /// default-locale remap) produces any data.
    pub fn resolve(
        &self,
        base_name: &str,
        locale_id: &str,
        loader: Option<&LoaderContext>,
        disable_fallback: bool,
    ) -> Result<Arc<Bundle>, Error> {
        let loader = loader.unwrap_or_else(|| LoaderContext::default_context());
        let default_locale = self.default_locale.current();

        // Whole-resolution critical section: cache probes, recursive parent
        // resolution, loading, and publication all happen under this lock.
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        match resolve_level(&mut cache, base_name, locale_id, loader, &default_locale) {
            Some(handle) if disable_fallback => Ok(Bundle::without_fallback(&handle)),
            Some(handle) => Ok(handle),
            None => Err(Error::bundle_not_found(base_name, locale_id)),
        }
    }

    /// Resolves from a parsed [`LanguageIdentifier`] (`en-US` resolves as
    /// `en_US`).
    pub fn resolve_langid(
        &self,
        base_name: &str,
        langid: &LanguageIdentifier,
        loader: Option<&LoaderContext>,
        disable_fallback: bool,
    ) -> Result<Arc<Bundle>, Error> {
        self.resolve(
            base_name,
            &chain::locale_id_from_langid(langid),
            loader,
            disable_fallback,
        )
    }

    /// Number of published cache entries, absent outcomes included.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves one level, recursing on ancestors. Returns the published
/// outcome: `None` means "nothing resolves here" and is itself cached.
///
/// Must run under the resolver lock.
fn resolve_level(
    cache: &mut BundleCache,
    base_name: &str,
    locale_id: &str,
    loader: &LoaderContext,
    default_locale: &str,
) -> Option<Arc<Bundle>> {
    let name = qualified_name(base_name, locale_id);
    let key = CacheKey::new(loader.id(), name.as_str(), default_locale);
    if let Some(outcome) = cache.get(&key) {
        trace!(qualified_name = %name, "bundle cache hit");
        return outcome;
    }

    // Ancestors first, so the whole parent chain is published before this
    // level links to it.
    let parent = parent_identifier(locale_id).and_then(|parent_locale| {
        resolve_level(cache, base_name, parent_locale, loader, default_locale)
    });

    // Strategy 1: typed instantiation. All failure reasons mean "try the
    // next strategy"; only a constructor failure is worth a debug event.
    let mut data = match loader.instantiate(&name) {
        Ok(data) => Some(data),
        Err(InstantiateError::MissingType | InstantiateError::MissingDefinition) => None,
        Err(InstantiateError::Failed(reason)) => {
            debug!(qualified_name = %name, %reason, "bundle constructor failed");
            None
        }
    };

    // Strategy 2: flat `.properties` file.
    if data.is_none() {
        data = load_properties(loader, &name);
    }

    let mut handle =
        data.map(|data| Arc::new(Bundle::new(base_name, locale_id, data, parent.clone())));

    // An unrecognized single-segment locale falls back to the process
    // default locale rather than straight to root.
    if handle.is_none()
        && !locale_id.is_empty()
        && !locale_id.contains('_')
        && !default_locale.contains(locale_id)
    {
        handle = resolve_level(cache, base_name, default_locale, loader, default_locale);
    }

    // Still nothing at this level: the already-resolved parent stands in.
    if handle.is_none() {
        handle = parent;
    }

    let published = cache.publish(key, handle);
    if let Some(bundle) = &published {
        // Prime the merged key set before the handle leaves the lock.
        bundle.keys();
    }
    published
}

/// Probes the flat-file strategy. Open, parse, and close failures are all
/// swallowed: an unreadable or corrupt file is indistinguishable from a
/// missing one.
fn load_properties(loader: &LoaderContext, qualified_name: &str) -> Option<LevelData> {
    let path = loader.resource_path(qualified_name);
    let stream = loader.open(&path)?;
    match properties::Format::from_encoded_reader(stream) {
        Ok(format) => Some(format.into()),
        Err(_) => None,
    }
}
