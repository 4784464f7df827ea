//! Runtime support for generated accessors.
//!
//! [`LocaleResolver`] turns a requested locale into one merged catalog: the
//! default catalog overlaid with every available variant along the locale's
//! fallback chain, most specific last. Merged catalogs are cached per
//! `(bundle, locale)` and shared as [`Arc`]s. Lookups never fail; a key that
//! no catalog defines renders as `[key]`.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use kotoba::catalog::{Catalog, CatalogSet};
//! use kotoba::locale::LocaleTag;
//! use kotoba::runtime::{BundleHandle, LocaleResolver};
//!
//! let set = CatalogSet::new(
//!     Catalog::from_pairs("app", None, [("hello", "Hello"), ("bye", "Bye")]),
//!     vec![Catalog::from_pairs("app", LocaleTag::parse("fr"), [("hello", "Bonjour")])],
//! );
//! let handle = BundleHandle::new(Arc::new(LocaleResolver::new(set)), "app");
//! assert_eq!(handle.get_string("fr_CA", "hello"), "Bonjour");
//! assert_eq!(handle.get_string("fr_CA", "bye"), "Bye");
//! assert_eq!(handle.get_string("fr_CA", "nope"), "[nope]");
//! ```

mod format;
mod source;
pub mod template;

pub use format::{format_named, format_positional};
pub use source::{CatalogSource, DirectorySource, EmbeddedCatalog, EmbeddedSource};

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, warn};

use crate::catalog::Catalog;
use crate::locale::LocaleTag;

type CacheKey = (String, String);

/// Resolves and caches merged catalogs per `(bundle, locale)`.
#[derive(Debug)]
pub struct LocaleResolver {
    source: Box<dyn CatalogSource>,
    cache: RwLock<HashMap<CacheKey, Arc<Catalog>>>,
}

impl LocaleResolver {
    /// Resolve catalogs provided by `source`.
    #[must_use]
    pub fn new(source: impl CatalogSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The merged catalog of `bundle` for `locale`.
    ///
    /// Unknown or unparsable locales resolve to the default catalog. Two
    /// threads missing the cache at once may both load the catalog, but only
    /// the first insert is kept and both callers receive that value.
    #[must_use]
    pub fn resolve(&self, bundle: &str, locale: &str) -> Arc<Catalog> {
        let key = (bundle.to_owned(), locale.to_owned());
        if let Some(hit) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(hit);
        }
        let merged = Arc::new(self.load_merged(bundle, locale));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(key).or_insert(merged))
    }

    /// Number of cached `(bundle, locale)` entries.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn load_merged(&self, bundle: &str, requested: &str) -> Catalog {
        let mut merged = match self.source.load(bundle, None) {
            Ok(Some(catalog)) => catalog,
            Ok(None) => {
                error!(bundle, "no default catalog; lookups fall back to their keys");
                Catalog::new(bundle, None)
            }
            Err(err) => {
                error!(bundle, error = %err, "failed to load default catalog");
                Catalog::new(bundle, None)
            }
        };
        let Some(tag) = LocaleTag::parse(requested) else {
            debug!(bundle, requested, "unrecognised locale; using default catalog");
            return merged;
        };
        for candidate in tag.fallback_chain().iter().rev() {
            match self.source.load(bundle, Some(candidate)) {
                Ok(Some(layer)) => merged.overlay(&layer),
                Ok(None) => {}
                Err(err) => {
                    warn!(bundle, locale = %candidate, error = %err, "ignoring unreadable variant catalog");
                }
            }
        }
        debug!(bundle, locale = %tag, keys = merged.len(), "resolved catalog");
        merged.with_locale(Some(tag))
    }
}

/// Text rendered for a key no catalog defines.
///
/// ```rust
/// assert_eq!(kotoba::runtime::missing_key_text("a.b"), "[a.b]");
/// ```
#[must_use]
pub fn missing_key_text(key: &str) -> String {
    format!("[{key}]")
}

/// A resolver bound to one bundle; the state behind a generated accessor.
#[derive(Debug, Clone)]
pub struct BundleHandle {
    resolver: Arc<LocaleResolver>,
    bundle: String,
}

impl BundleHandle {
    /// Bind `resolver` to `bundle`.
    #[must_use]
    pub fn new(resolver: Arc<LocaleResolver>, bundle: impl Into<String>) -> Self {
        Self {
            resolver,
            bundle: bundle.into(),
        }
    }

    /// Bundle name.
    #[must_use]
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// The shared resolver.
    #[must_use]
    pub const fn resolver(&self) -> &Arc<LocaleResolver> {
        &self.resolver
    }

    /// The merged catalog for `locale`.
    #[must_use]
    pub fn catalog(&self, locale: &str) -> Arc<Catalog> {
        self.resolver.resolve(&self.bundle, locale)
    }

    /// Raw template of `key` for `locale`, or `[key]` when it is undefined.
    #[must_use]
    pub fn get_string(&self, locale: &str, key: &str) -> String {
        self.catalog(locale).get(key).map_or_else(
            || {
                debug!(bundle = %self.bundle, locale, key, "missing message key");
                missing_key_text(key)
            },
            str::to_owned,
        )
    }
}
