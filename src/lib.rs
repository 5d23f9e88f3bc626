#![forbid(unsafe_code)]
//! Locale-aware resource bundle resolution for Rust.
//!
//! Given a base name and a locale identifier, resolution produces a handle
//! to localized data built from a chain of parent bundles ordered from most
//! specific to the root locale. Each level is loaded on demand (a registered
//! typed constructor first, then a flat `.properties` file) and cached for
//! the process lifetime, so repeated lookups for the same identity are O(1)
//! after the first resolution.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use resbundle::{LoaderContext, Resolver};
//!
//! let loader = LoaderContext::filesystem("resources");
//! let resolver = Resolver::new();
//!
//! // Builds the chain msgs_en_US -> msgs_en -> msgs, loading each level
//! // from resources/msgs*.properties.
//! let bundle = resolver.resolve("msgs", "en_US", Some(&loader), false)?;
//! println!("{}", bundle.get("greeting")?);
//! for key in bundle.keys() {
//!     println!("{key}");
//! }
//! # Ok::<(), resbundle::Error>(())
//! ```
//!
//! # Resolution behavior
//!
//! - Missing levels are skipped: a chain links each handle to the nearest
//!   ancestor that has data.
//! - An unrecognized single-segment locale (say `"xx"`) falls back to the
//!   process default locale instead of straight to the root.
//! - Outcomes, including "nothing found", are cached permanently per
//!   (loader, qualified name, default locale); there is no eviction.
//! - Flat-file open and parse failures are silently treated as absence.

pub mod cache;
pub mod chain;
pub mod error;
pub mod handle;
pub mod loader;
pub mod properties;
pub mod resolver;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    handle::Bundle,
    loader::{
        BundleRegistry, FsResourceLoader, Instantiate, InstantiateError, LoaderContext,
        OpenResource,
    },
    resolver::{DefaultLocale, FixedDefaultLocale, Resolver, SystemDefaultLocale},
    types::LevelData,
};
