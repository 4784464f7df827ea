//! Message catalogs and the loader that reads them from disk.
//!
//! A bundle named `greetings` lives in one directory as a default catalog
//! `greetings.properties` plus zero or more locale variants such as
//! `greetings_fr.properties` or `greetings_fr_CA.properties`. The default
//! catalog is mandatory; variants are discovered by listing the directory and
//! are ordered by canonical locale tag so repeated runs see the same set in
//! the same order.
//!
//! Keys keep their source order. Empty and repeated keys are rejected while
//! parsing, so every [`Catalog`] upholds the "non-empty, unique keys"
//! invariant.

mod error;
pub mod properties;

pub use error::CatalogError;

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::locale::LocaleTag;

/// File extension shared by all catalogs.
pub const CATALOG_EXTENSION: &str = "properties";

/// Key to template mapping for one locale of one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    bundle: String,
    locale: Option<LocaleTag>,
    entries: IndexMap<String, String>,
}

impl Catalog {
    /// Create an empty catalog. `locale` is `None` for the default catalog.
    #[must_use]
    pub fn new(bundle: impl Into<String>, locale: Option<LocaleTag>) -> Self {
        Self {
            bundle: bundle.into(),
            locale,
            entries: IndexMap::new(),
        }
    }

    /// Parse properties `text` into a catalog.
    ///
    /// `origin` labels the text in diagnostics, usually its file path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for syntax errors,
    /// [`CatalogError::EmptyKey`] for entries without a key, and
    /// [`CatalogError::DuplicateKey`] when a key is defined twice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kotoba::catalog::Catalog;
    ///
    /// let catalog = Catalog::parse("greetings", None, "b = 2\na = 1\n", "inline")
    ///     .expect("valid catalog");
    /// assert_eq!(catalog.keys().collect::<Vec<_>>(), ["b", "a"]);
    /// assert_eq!(catalog.get("a"), Some("1"));
    /// ```
    pub fn parse(
        bundle: impl Into<String>,
        locale: Option<LocaleTag>,
        text: &str,
        origin: &str,
    ) -> Result<Self, CatalogError> {
        let entries = properties::parse(text).map_err(|err| CatalogError::Parse {
            origin: origin.to_owned(),
            line: err.line,
            message: err.message,
        })?;
        let mut catalog = Self::new(bundle, locale);
        let mut first_lines: HashMap<String, usize> = HashMap::new();
        for entry in entries {
            if entry.key.is_empty() {
                return Err(CatalogError::EmptyKey {
                    origin: origin.to_owned(),
                    line: entry.line,
                });
            }
            if let Some(&first_line) = first_lines.get(&entry.key) {
                return Err(CatalogError::DuplicateKey {
                    origin: origin.to_owned(),
                    key: entry.key,
                    line: entry.line,
                    first_line,
                });
            }
            first_lines.insert(entry.key.clone(), entry.line);
            catalog.entries.insert(entry.key, entry.value);
        }
        Ok(catalog)
    }

    /// Build a catalog from already validated pairs. Later pairs replace
    /// earlier ones with the same key.
    #[must_use]
    pub fn from_pairs<K, V>(
        bundle: impl Into<String>,
        locale: Option<LocaleTag>,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut catalog = Self::new(bundle, locale);
        catalog.entries.extend(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        catalog
    }

    /// Bundle this catalog belongs to.
    #[must_use]
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Locale of this catalog, `None` for the default catalog.
    #[must_use]
    pub const fn locale(&self) -> Option<&LocaleTag> {
        self.locale.as_ref()
    }

    /// Human-readable locale label used in diagnostics.
    #[must_use]
    pub fn locale_label(&self) -> &str {
        self.locale.as_ref().map_or("default", LocaleTag::as_str)
    }

    /// Template for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(key, template)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `layer` over this catalog; keys already present
    /// keep their position.
    pub(crate) fn overlay(&mut self, layer: &Self) {
        for (key, value) in &layer.entries {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Relabel the catalog with a different locale.
    pub(crate) fn with_locale(mut self, locale: Option<LocaleTag>) -> Self {
        self.locale = locale;
        self
    }
}

/// The default catalog of a bundle plus its locale variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSet {
    default: Catalog,
    variants: Vec<Catalog>,
}

impl CatalogSet {
    /// Combine a default catalog with its variants, ordering variants by
    /// locale tag.
    #[must_use]
    pub fn new(default: Catalog, mut variants: Vec<Catalog>) -> Self {
        variants.sort_by(|a, b| a.locale().cmp(&b.locale()));
        Self { default, variants }
    }

    /// Bundle name.
    #[must_use]
    pub fn bundle(&self) -> &str {
        self.default.bundle()
    }

    /// The authoritative default-locale catalog.
    #[must_use]
    pub const fn default_catalog(&self) -> &Catalog {
        &self.default
    }

    /// Locale variants in locale-tag order.
    #[must_use]
    pub fn variants(&self) -> &[Catalog] {
        &self.variants
    }

    /// The variant catalog for exactly `locale`.
    #[must_use]
    pub fn variant(&self, locale: &LocaleTag) -> Option<&Catalog> {
        self.variants
            .iter()
            .find(|catalog| catalog.locale() == Some(locale))
    }
}

/// File name of a catalog: `<bundle>.properties` or
/// `<bundle>_<locale>.properties`.
///
/// ```rust
/// use kotoba::catalog::catalog_file_name;
/// use kotoba::locale::LocaleTag;
///
/// let fr_ca = LocaleTag::parse("fr-CA").expect("valid tag");
/// assert_eq!(catalog_file_name("greetings", None), "greetings.properties");
/// assert_eq!(
///     catalog_file_name("greetings", Some(&fr_ca)),
///     "greetings_fr_CA.properties"
/// );
/// ```
#[must_use]
pub fn catalog_file_name(bundle: &str, locale: Option<&LocaleTag>) -> String {
    match locale {
        Some(tag) => format!("{bundle}_{}.{CATALOG_EXTENSION}", tag.file_suffix()),
        None => format!("{bundle}.{CATALOG_EXTENSION}"),
    }
}

/// A discovered locale variant file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VariantFile {
    pub(crate) locale: LocaleTag,
    pub(crate) file_name: String,
}

/// Load the default catalog and every locale variant of `bundle` from `dir`.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] when the directory or the default
/// catalog is missing, and propagates read and parse failures of any catalog.
pub fn load_bundle(dir: &Utf8Path, bundle: &str) -> Result<CatalogSet, CatalogError> {
    load_bundle_among(dir, bundle, &[])
}

/// Like [`load_bundle`], for a directory shared with other bundles.
///
/// Files belonging to any of `siblings` are never taken for variants of
/// `bundle`, so `greetings_app.properties` stays the default catalog of a
/// `greetings_app` bundle instead of becoming locale `app` of `greetings`.
///
/// # Errors
///
/// As for [`load_bundle`].
pub fn load_bundle_among(
    dir: &Utf8Path,
    bundle: &str,
    siblings: &[&str],
) -> Result<CatalogSet, CatalogError> {
    let handle = open_catalog_dir(dir, bundle)?;
    let default_file = catalog_file_name(bundle, None);
    if !handle.exists(&default_file) {
        return Err(not_found(dir, bundle));
    }
    let default = read_catalog(&handle, dir, bundle, None, &default_file)?;
    debug!(
        bundle,
        keys = default.len(),
        "loaded default catalog {default_file}"
    );

    let mut variants = Vec::new();
    for variant in discover_variants(&handle, dir, bundle, siblings)? {
        let catalog = read_catalog(
            &handle,
            dir,
            bundle,
            Some(variant.locale),
            &variant.file_name,
        )?;
        debug!(
            bundle,
            locale = catalog.locale_label(),
            keys = catalog.len(),
            "loaded variant catalog {}",
            variant.file_name
        );
        variants.push(catalog);
    }
    Ok(CatalogSet::new(default, variants))
}

pub(crate) fn open_catalog_dir(dir: &Utf8Path, bundle: &str) -> Result<Dir, CatalogError> {
    Dir::open_ambient_dir(dir, ambient_authority()).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            not_found(dir, bundle)
        } else {
            CatalogError::Io {
                origin: dir.to_string(),
                source,
            }
        }
    })
}

fn not_found(dir: &Utf8Path, bundle: &str) -> CatalogError {
    CatalogError::NotFound {
        bundle: bundle.to_owned(),
        dir: dir.to_owned(),
        file: catalog_file_name(bundle, None),
    }
}

pub(crate) fn read_catalog(
    handle: &Dir,
    dir: &Utf8Path,
    bundle: &str,
    locale: Option<LocaleTag>,
    file_name: &str,
) -> Result<Catalog, CatalogError> {
    let origin: Utf8PathBuf = dir.join(file_name);
    let text = handle
        .read_to_string(file_name)
        .map_err(|source| CatalogError::Io {
            origin: origin.to_string(),
            source,
        })?;
    Catalog::parse(bundle, locale, &text, origin.as_str())
}

/// List the variant catalogs of `bundle`, sorted by locale tag.
///
/// Files of `siblings` are skipped. Files whose suffix is not a locale tag
/// are skipped with a warning.
pub(crate) fn discover_variants<S: AsRef<str>>(
    handle: &Dir,
    dir: &Utf8Path,
    bundle: &str,
    siblings: &[S],
) -> Result<Vec<VariantFile>, CatalogError> {
    let io_error = |source| CatalogError::Io {
        origin: dir.to_string(),
        source,
    };
    let mut found: Vec<VariantFile> = Vec::new();
    for entry in handle.entries().map_err(io_error)? {
        let file_name = entry.map_err(io_error)?.file_name().map_err(io_error)?;
        let Some(suffix) = variant_suffix(&file_name, bundle) else {
            continue;
        };
        if let Some(owner) = sibling_owning(&file_name, bundle, siblings) {
            debug!(bundle, "skipping {file_name}: it belongs to bundle `{owner}`");
            continue;
        }
        let Some(locale) = LocaleTag::parse(suffix) else {
            warn!(bundle, "skipping {file_name}: `{suffix}` is not a locale tag");
            continue;
        };
        if let Some(existing) = found.iter().find(|variant| variant.locale == locale) {
            return Err(CatalogError::DuplicateLocale {
                bundle: bundle.to_owned(),
                locale: locale.to_string(),
                first: existing.file_name.clone(),
                second: file_name,
            });
        }
        found.push(VariantFile { locale, file_name });
    }
    found.sort_by(|a, b| a.locale.cmp(&b.locale));
    Ok(found)
}

/// The sibling bundle `file_name` belongs to, if any.
fn sibling_owning<'a, S: AsRef<str>>(
    file_name: &str,
    bundle: &str,
    siblings: &'a [S],
) -> Option<&'a str> {
    siblings.iter().map(AsRef::<str>::as_ref).find(|&sibling| {
        sibling != bundle
            && (file_name == catalog_file_name(sibling, None)
                || variant_suffix(file_name, sibling).is_some())
    })
}

fn variant_suffix<'a>(file_name: &'a str, bundle: &str) -> Option<&'a str> {
    file_name
        .strip_prefix(bundle)?
        .strip_prefix('_')?
        .strip_suffix(CATALOG_EXTENSION)?
        .strip_suffix('.')
        .filter(|suffix| !suffix.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("greetings_fr.properties", Some("fr"))]
    #[case("greetings_fr_CA.properties", Some("fr_CA"))]
    #[case("greetings.properties", None)]
    #[case("greetings_.properties", None)]
    #[case("greetings_fr.txt", None)]
    #[case("other_fr.properties", None)]
    fn extracts_variant_suffix(#[case] file_name: &str, #[case] expected: Option<&str>) {
        assert_eq!(variant_suffix(file_name, "greetings"), expected);
    }

    #[rstest]
    #[case("greetings_app.properties", Some("greetings_app"))]
    #[case("greetings_app_fr.properties", Some("greetings_app"))]
    #[case("greetings_fr.properties", None)]
    #[case("greetings_application.properties", None)]
    fn sibling_files_are_attributed_to_their_bundle(
        #[case] file_name: &str,
        #[case] owner: Option<&str>,
    ) {
        let siblings = ["greetings", "greetings_app"];
        assert_eq!(sibling_owning(file_name, "greetings", &siblings), owner);
    }

    #[rstest]
    fn shared_directory_keeps_bundles_apart() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let dir = Utf8Path::from_path(temp.path())
            .ok_or_else(|| anyhow::anyhow!("non UTF-8 temp dir"))?;
        std::fs::write(dir.join("greetings.properties"), "a = Hi {0}\n")?;
        std::fs::write(dir.join("greetings_fr.properties"), "a = Salut {0}\n")?;
        std::fs::write(dir.join("greetings_app.properties"), "a = {0} {1}\n")?;
        std::fs::write(dir.join("greetings_app_de.properties"), "a = {1} {0}\n")?;

        let alone = load_bundle(dir, "greetings")?;
        anyhow::ensure!(alone.variants().len() == 3);

        let shared = load_bundle_among(dir, "greetings", &["greetings", "greetings_app"])?;
        let labels: Vec<_> = shared.variants().iter().map(Catalog::locale_label).collect();
        anyhow::ensure!(labels == ["fr"], "{labels:?}");

        let app = load_bundle_among(dir, "greetings_app", &["greetings", "greetings_app"])?;
        let labels: Vec<_> = app.variants().iter().map(Catalog::locale_label).collect();
        anyhow::ensure!(labels == ["de"], "{labels:?}");
        Ok(())
    }

    #[rstest]
    fn rejects_duplicate_keys_with_both_lines() {
        let err = Catalog::parse("b", None, "a = 1\n\na = 2\n", "b.properties")
            .expect_err("duplicate key");
        assert!(
            matches!(
                err,
                CatalogError::DuplicateKey { ref key, line: 3, first_line: 1, .. } if key == "a"
            ),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    fn rejects_empty_keys() {
        let err = Catalog::parse("b", None, "= value\n", "b.properties").expect_err("empty key");
        assert!(matches!(err, CatalogError::EmptyKey { line: 1, .. }));
    }

    #[rstest]
    fn overlay_replaces_and_appends() {
        let mut base = Catalog::from_pairs("b", None, [("a", "1"), ("b", "2")]);
        let layer = Catalog::from_pairs("b", None, [("b", "two"), ("c", "3")]);
        base.overlay(&layer);
        let pairs: Vec<_> = base.iter().collect();
        assert_eq!(pairs, [("a", "1"), ("b", "two"), ("c", "3")]);
    }

    #[rstest]
    fn catalog_set_orders_variants_by_locale() {
        let tag = |raw: &str| LocaleTag::parse(raw);
        let set = CatalogSet::new(
            Catalog::new("b", None),
            vec![
                Catalog::new("b", tag("fr")),
                Catalog::new("b", tag("de")),
                Catalog::new("b", tag("fr-CA")),
            ],
        );
        let labels: Vec<_> = set.variants().iter().map(Catalog::locale_label).collect();
        assert_eq!(labels, ["de", "fr", "fr-CA"]);
    }
}
