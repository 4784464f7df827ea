//! Temporary directories populated with catalogs and declarations.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

use crate::{GREETINGS_DEFAULT, GREETINGS_FR, GREETINGS_FR_CA};

/// A temporary directory with capability-scoped write helpers.
#[derive(Debug)]
pub struct CatalogWorkspace {
    // Held so the directory outlives the workspace.
    _temp: TempDir,
    root: Utf8PathBuf,
    dir: Dir,
}

impl CatalogWorkspace {
    /// Create an empty workspace.
    ///
    /// # Errors
    ///
    /// Returns an error when the temporary directory cannot be created or its
    /// path is not UTF-8.
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|path| anyhow!("temp dir {} is not UTF-8", path.display()))?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).context("open temp dir")?;
        Ok(Self {
            _temp: temp,
            root,
            dir,
        })
    }

    /// Absolute path of the workspace.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn write(&self, relative: &str, content: &str) -> Result<Utf8PathBuf> {
        let path = Utf8Path::new(relative);
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            self.dir
                .create_dir_all(parent)
                .with_context(|| format!("create {parent}"))?;
        }
        self.dir
            .write(path, content)
            .with_context(|| format!("write {relative}"))?;
        Ok(self.root.join(path))
    }

    /// Write the catalog of `bundle` for `locale` (`None` for the default)
    /// into the `dir` subdirectory.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn catalog(
        &self,
        dir: &str,
        bundle: &str,
        locale: Option<&str>,
        body: &str,
    ) -> Result<Utf8PathBuf> {
        let file = locale.map_or_else(
            || format!("{bundle}.properties"),
            |tag| format!("{bundle}_{tag}.properties"),
        );
        self.write(&format!("{dir}/{file}"), body)
    }

    /// Read `relative` back as text.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read.
    pub fn read(&self, relative: &str) -> Result<String> {
        self.dir
            .read_to_string(relative)
            .with_context(|| format!("read {relative}"))
    }

    /// Whether `relative` exists.
    #[must_use]
    pub fn exists(&self, relative: &str) -> bool {
        self.dir.exists(relative)
    }

    /// Populate the `greetings` bundle under `locales/` with its default,
    /// `fr` and `fr_CA` catalogs, plus a `kotoba.yml` generating
    /// `src/greetings.rs`.
    ///
    /// # Errors
    ///
    /// Returns an error when any file cannot be written.
    pub fn with_greetings(self) -> Result<Self> {
        self.catalog("locales", "greetings", None, GREETINGS_DEFAULT)?;
        self.catalog("locales", "greetings", Some("fr"), GREETINGS_FR)?;
        self.catalog("locales", "greetings", Some("fr_CA"), GREETINGS_FR_CA)?;
        self.declare(&[("greetings", "locales", "src/greetings.rs")])?;
        Ok(self)
    }
}
