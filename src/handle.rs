//! Resolved bundle handles.
//!
//! A [`Bundle`] is one level of localized data plus a link to its fallback
//! parent. Handles are shared as `Arc<Bundle>`: the cache keeps every level
//! alive for the process lifetime, and a child's parent link is just another
//! shared reference into that store. The chain is acyclic by construction
//! since each parent's locale identifier is strictly shorter.

use std::sync::{Arc, OnceLock};

use crate::error::Error;
use crate::types::LevelData;

/// One resolved level of localized data, linked to its fallback parent.
///
/// Immutable once published: the parent link, the level data, and (once
/// computed) the merged key set never change.
pub struct Bundle {
    base_name: String,
    locale_id: String,
    parent: Option<Arc<Bundle>>,
    data: LevelData,
    merged_keys: OnceLock<Vec<String>>,
    unlinked: OnceLock<Arc<Bundle>>,
}

impl Bundle {
    pub(crate) fn new(
        base_name: impl Into<String>,
        locale_id: impl Into<String>,
        data: LevelData,
        parent: Option<Arc<Bundle>>,
    ) -> Self {
        Bundle {
            base_name: base_name.into(),
            locale_id: locale_id.into(),
            parent,
            data,
            merged_keys: OnceLock::new(),
            unlinked: OnceLock::new(),
        }
    }

    /// A parent-less view of this level for fallback-disabled callers.
    ///
    /// The linked handle stays the cached entry; the view is computed once
    /// and shared, so repeated fallback-disabled resolutions of the same
    /// identity return the same handle.
    pub(crate) fn without_fallback(this: &Arc<Bundle>) -> Arc<Bundle> {
        if this.parent.is_none() {
            return Arc::clone(this);
        }
        Arc::clone(this.unlinked.get_or_init(|| {
            let view = Arc::new(Bundle::new(
                this.base_name.clone(),
                this.locale_id.clone(),
                this.data.clone(),
                None,
            ));
            view.keys();
            view
        }))
    }

    /// The logical bundle identifier, identical across the whole chain.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// The locale suffix this level represents; empty for the root.
    pub fn locale_id(&self) -> &str {
        &self.locale_id
    }

    /// The fallback parent, if this handle has one.
    pub fn parent(&self) -> Option<&Arc<Bundle>> {
        self.parent.as_ref()
    }

    /// This level's own data, without fallback.
    pub fn level_data(&self) -> &LevelData {
        &self.data
    }

    /// Looks up `key`, walking from this level through the parent chain and
    /// returning the first value found.
    pub fn get(&self, key: &str) -> Result<&str, Error> {
        let mut current = Some(self);
        while let Some(bundle) = current {
            if let Some(value) = bundle.data.get(key) {
                return Ok(value);
            }
            current = bundle.parent.as_deref();
        }
        Err(Error::key_not_found(&self.base_name, key))
    }

    /// Whether `key` is defined at any level of the chain.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_ok()
    }

    /// The union of keys across the whole chain, leaf to root, first
    /// occurrence wins, duplicates suppressed. Computed once and cached on
    /// the handle; resolution primes it before handing the bundle out.
    pub fn keys(&self) -> &[String] {
        self.merged_keys.get_or_init(|| {
            let mut seen = std::collections::HashSet::new();
            let mut merged = Vec::new();
            let mut current = Some(self);
            while let Some(bundle) = current {
                for key in bundle.data.keys() {
                    if seen.insert(key.to_string()) {
                        merged.push(key.to_string());
                    }
                }
                current = bundle.parent.as_deref();
            }
            merged
        })
    }
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("base_name", &self.base_name)
            .field("locale_id", &self.locale_id)
            .field("level_len", &self.data.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
