//! Where the runtime resolver gets its catalogs from.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::catalog::{
    Catalog, CatalogError, CatalogSet, catalog_file_name, discover_variants, open_catalog_dir,
    read_catalog,
};
use crate::locale::LocaleTag;

/// A provider of parsed catalogs.
///
/// `load` returns `Ok(None)` when the requested catalog simply does not exist;
/// errors are reserved for catalogs that exist but cannot be read or parsed.
pub trait CatalogSource: Send + Sync + fmt::Debug {
    /// Load the catalog of `bundle` for `locale`, or the default catalog when
    /// `locale` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the catalog exists but cannot be read.
    fn load(
        &self,
        bundle: &str,
        locale: Option<&LocaleTag>,
    ) -> Result<Option<Catalog>, CatalogError>;
}

/// Reads properties catalogs from a directory on every load.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: Utf8PathBuf,
    siblings: Vec<String>,
}

impl DirectorySource {
    /// Serve catalogs stored in `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            siblings: Vec::new(),
        }
    }

    /// Declare the other bundles sharing `root`, so their files are never
    /// read as locale variants.
    #[must_use]
    pub fn with_siblings<I, S>(mut self, siblings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.siblings = siblings.into_iter().map(Into::into).collect();
        self
    }

    /// Directory the catalogs are read from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

impl CatalogSource for DirectorySource {
    fn load(
        &self,
        bundle: &str,
        locale: Option<&LocaleTag>,
    ) -> Result<Option<Catalog>, CatalogError> {
        let handle = match open_catalog_dir(&self.root, bundle) {
            Ok(handle) => handle,
            Err(CatalogError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        let Some(tag) = locale else {
            let file_name = catalog_file_name(bundle, None);
            if !handle.exists(&file_name) {
                return Ok(None);
            }
            return read_catalog(&handle, &self.root, bundle, None, &file_name).map(Some);
        };
        // Variant files may spell the tag differently (`fr_ca`), so match on
        // the normalised locale rather than the canonical file name.
        let found = discover_variants(&handle, &self.root, bundle, &self.siblings)?
            .into_iter()
            .find(|variant| &variant.locale == tag);
        found
            .map(|variant| {
                read_catalog(
                    &handle,
                    &self.root,
                    bundle,
                    Some(variant.locale),
                    &variant.file_name,
                )
            })
            .transpose()
    }
}

/// One catalog compiled into a binary by generated code.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedCatalog {
    /// Canonical locale tag, `None` for the default catalog.
    pub locale: Option<&'static str>,
    /// `(key, template)` pairs in source order.
    pub entries: &'static [(&'static str, &'static str)],
}

/// Serves the catalogs of one bundle from static data.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSource {
    bundle: &'static str,
    catalogs: &'static [EmbeddedCatalog],
}

impl EmbeddedSource {
    /// Serve `catalogs` as the catalogs of `bundle`.
    #[must_use]
    pub const fn new(bundle: &'static str, catalogs: &'static [EmbeddedCatalog]) -> Self {
        Self { bundle, catalogs }
    }
}

impl CatalogSource for EmbeddedSource {
    fn load(
        &self,
        bundle: &str,
        locale: Option<&LocaleTag>,
    ) -> Result<Option<Catalog>, CatalogError> {
        if bundle != self.bundle {
            return Ok(None);
        }
        let found = self.catalogs.iter().find(|catalog| match (catalog.locale, locale) {
            (None, None) => true,
            (Some(raw), Some(tag)) => LocaleTag::parse(raw).is_some_and(|parsed| &parsed == tag),
            _ => false,
        });
        Ok(found.map(|catalog| {
            Catalog::from_pairs(bundle, locale.cloned(), catalog.entries.iter().copied())
        }))
    }
}

impl CatalogSource for CatalogSet {
    fn load(
        &self,
        bundle: &str,
        locale: Option<&LocaleTag>,
    ) -> Result<Option<Catalog>, CatalogError> {
        if bundle != self.bundle() {
            return Ok(None);
        }
        Ok(match locale {
            None => Some(self.default_catalog().clone()),
            Some(tag) => self.variant(tag).cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    static CATALOGS: &[EmbeddedCatalog] = &[
        EmbeddedCatalog {
            locale: None,
            entries: &[("a", "A"), ("b", "B")],
        },
        EmbeddedCatalog {
            locale: Some("fr-CA"),
            entries: &[("a", "A-ca")],
        },
    ];

    #[rstest]
    #[case(None, Some(2))]
    #[case(Some("fr_CA"), Some(1))]
    #[case(Some("fr"), None)]
    fn embedded_source_matches_normalised_locales(
        #[case] locale: Option<&str>,
        #[case] expected_len: Option<usize>,
    ) {
        let source = EmbeddedSource::new("b", CATALOGS);
        let tag = locale.and_then(LocaleTag::parse);
        let loaded = source.load("b", tag.as_ref()).expect("embedded load");
        assert_eq!(loaded.as_ref().map(Catalog::len), expected_len);
    }

    #[rstest]
    fn embedded_source_ignores_other_bundles() {
        let source = EmbeddedSource::new("b", CATALOGS);
        assert!(source.load("other", None).expect("embedded load").is_none());
    }

    #[rstest]
    fn directory_source_skips_sibling_bundles() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let root = Utf8Path::from_path(temp.path())
            .ok_or_else(|| anyhow::anyhow!("non UTF-8 temp dir"))?;
        std::fs::write(root.join("greetings.properties"), "a = Hi\n")?;
        std::fs::write(root.join("greetings_app.properties"), "a = App\n")?;
        let app = LocaleTag::parse("app").ok_or_else(|| anyhow::anyhow!("locale tag"))?;

        let naive = DirectorySource::new(root);
        anyhow::ensure!(naive.load("greetings", Some(&app))?.is_some());

        let shared = DirectorySource::new(root).with_siblings(["greetings_app"]);
        anyhow::ensure!(shared.load("greetings", Some(&app))?.is_none());
        anyhow::ensure!(shared.load("greetings_app", None)?.is_some());
        Ok(())
    }

    #[rstest]
    fn directory_source_treats_missing_directory_as_absent() {
        let source = DirectorySource::new("/nonexistent/kotoba/catalogs");
        assert!(source.load("b", None).expect("absent").is_none());
    }
}
