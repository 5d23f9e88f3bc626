//! Loader contexts: the environment a resolver loads bundle levels from.
//!
//! A [`LoaderContext`] pairs the two collaborator facilities resolution
//! probes in order: a typed instantiator (a registry of named constructors,
//! the analog of loading a bundle class by qualified name) and a byte-stream
//! opener for flat `.properties` files. Each context carries a process-unique
//! identity; the cache keys resolved bundles by it, so two contexts over the
//! same directory still cache independently while clones of one context
//! share entries.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lazy_static::lazy_static;

use crate::types::LevelData;

/// Why the typed-instantiation strategy produced nothing.
///
/// All three reasons are downgraded to absence by resolution; `Failed` is
/// additionally recorded on the debug diagnostic channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstantiateError {
    /// No constructor is registered under the qualified name.
    MissingType,
    /// A constructor exists but its definition is unavailable.
    MissingDefinition,
    /// The constructor ran and failed.
    Failed(String),
}

/// The typed-object loading strategy: build a bundle level from a qualified
/// name without touching the filesystem.
pub trait Instantiate: Send + Sync {
    fn instantiate(&self, qualified_name: &str) -> Result<LevelData, InstantiateError>;
}

/// The flat-file loading strategy's collaborator: open a byte stream for a
/// resource path, or report it absent. Close happens on drop; close failures
/// are unobservable by design.
pub trait OpenResource: Send + Sync {
    fn open(&self, path: &str) -> Option<Box<dyn Read + Send>>;

    /// Separator substituted for `.` when mapping a qualified name to a
    /// resource path.
    fn path_separator(&self) -> char {
        '/'
    }
}

/// A name→constructor registry implementing [`Instantiate`].
///
/// Registered constructors may themselves fail, which surfaces as
/// [`InstantiateError::Failed`]; unregistered names are [`MissingType`].
///
/// [`MissingType`]: InstantiateError::MissingType
#[derive(Default)]
pub struct BundleRegistry {
    constructors: std::collections::HashMap<
        String,
        Arc<dyn Fn() -> Result<LevelData, InstantiateError> + Send + Sync>,
    >,
}

impl BundleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor under a fully qualified bundle name.
    pub fn register<F>(&mut self, qualified_name: impl Into<String>, constructor: F)
    where
        F: Fn() -> Result<LevelData, InstantiateError> + Send + Sync + 'static,
    {
        self.constructors
            .insert(qualified_name.into(), Arc::new(constructor));
    }

    /// Registers fixed data under a fully qualified bundle name.
    pub fn register_data(&mut self, qualified_name: impl Into<String>, data: LevelData) {
        self.register(qualified_name, move || Ok(data.clone()));
    }
}

impl Instantiate for BundleRegistry {
    fn instantiate(&self, qualified_name: &str) -> Result<LevelData, InstantiateError> {
        match self.constructors.get(qualified_name) {
            Some(constructor) => constructor(),
            None => Err(InstantiateError::MissingType),
        }
    }
}

/// Opens resources as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsResourceLoader {
    root: PathBuf,
}

impl FsResourceLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsResourceLoader { root: root.into() }
    }
}

impl OpenResource for FsResourceLoader {
    fn open(&self, path: &str) -> Option<Box<dyn Read + Send>> {
        let mut full = self.root.clone();
        for segment in path.split('/') {
            full.push(segment);
        }
        File::open(full)
            .ok()
            .map(|f| Box::new(f) as Box<dyn Read + Send>)
    }
}

lazy_static! {
    static ref DEFAULT_CONTEXT: LoaderContext =
        LoaderContext::filesystem(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
}

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// The loading environment for one family of bundles.
///
/// Cloning preserves identity: a clone is the same loader as far as the
/// bundle cache is concerned.
#[derive(Clone)]
pub struct LoaderContext {
    id: u64,
    instantiator: Option<Arc<dyn Instantiate>>,
    opener: Arc<dyn OpenResource>,
}

impl LoaderContext {
    /// Creates a context with the given opener and no typed instantiator.
    pub fn new(opener: impl OpenResource + 'static) -> Self {
        LoaderContext {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            instantiator: None,
            opener: Arc::new(opener),
        }
    }

    /// Creates a filesystem-backed context rooted at `root`.
    pub fn filesystem(root: impl Into<PathBuf>) -> Self {
        Self::new(FsResourceLoader::new(root))
    }

    /// Attaches a typed instantiator, probed before the flat-file strategy.
    pub fn with_instantiator(mut self, instantiator: impl Instantiate + 'static) -> Self {
        self.instantiator = Some(Arc::new(instantiator));
        self
    }

    /// The process-wide default context, rooted at the current directory.
    /// Used when a caller passes no explicit loader.
    pub fn default_context() -> &'static LoaderContext {
        &DEFAULT_CONTEXT
    }

    /// Identity component of cache keys.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn instantiate(&self, qualified_name: &str) -> Result<LevelData, InstantiateError> {
        match &self.instantiator {
            Some(instantiator) => instantiator.instantiate(qualified_name),
            None => Err(InstantiateError::MissingType),
        }
    }

    pub(crate) fn open(&self, path: &str) -> Option<Box<dyn Read + Send>> {
        self.opener.open(path)
    }

    /// Maps a qualified bundle name to the resource path probed by the
    /// flat-file strategy: `.` becomes the opener's separator, then the
    /// `.properties` extension is appended.
    pub(crate) fn resource_path(&self, qualified_name: &str) -> String {
        let mut path = qualified_name.replace('.', &self.opener.path_separator().to_string());
        path.push_str(crate::properties::FILE_EXTENSION);
        path
    }
}

impl std::fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderContext")
            .field("id", &self.id)
            .field("has_instantiator", &self.instantiator.is_some())
            .finish()
    }
}
