//! Errors raised while loading message catalogs.
//
// Module-level suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Failure to load the catalogs of a bundle.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    /// The bundle has no default-locale catalog.
    #[error("no default catalog `{file}` for bundle `{bundle}` in {dir}")]
    #[diagnostic(
        code(kotoba::catalog::not_found),
        help("every bundle needs a `<bundle>.properties` default catalog")
    )]
    NotFound {
        /// Bundle name.
        bundle: String,
        /// Directory that was searched.
        dir: Utf8PathBuf,
        /// Expected default catalog file name.
        file: String,
    },
    /// Reading a catalog or its directory failed.
    #[error("failed to read {origin}")]
    #[diagnostic(code(kotoba::catalog::io))]
    Io {
        /// File or directory being read.
        origin: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog text is not valid properties syntax.
    #[error("{origin}:{line}: {message}")]
    #[diagnostic(code(kotoba::catalog::parse))]
    Parse {
        /// Catalog being parsed.
        origin: String,
        /// One-based line of the problem.
        line: usize,
        /// Description of the problem.
        message: String,
    },
    /// An entry has an empty key.
    #[error("{origin}:{line}: empty message key")]
    #[diagnostic(code(kotoba::catalog::empty_key))]
    EmptyKey {
        /// Catalog being parsed.
        origin: String,
        /// One-based line of the entry.
        line: usize,
    },
    /// A key is defined twice in one catalog.
    #[error("{origin}:{line}: key `{key}` already defined on line {first_line}")]
    #[diagnostic(
        code(kotoba::catalog::duplicate_key),
        help("remove one of the definitions; keys must be unique within a catalog")
    )]
    DuplicateKey {
        /// Catalog being parsed.
        origin: String,
        /// Repeated key.
        key: String,
        /// One-based line of the repeated definition.
        line: usize,
        /// One-based line of the first definition.
        first_line: usize,
    },
    /// Two variant files normalise to the same locale.
    #[error("bundle `{bundle}` has two catalogs for locale {locale}: {first} and {second}")]
    #[diagnostic(code(kotoba::catalog::duplicate_locale))]
    DuplicateLocale {
        /// Bundle name.
        bundle: String,
        /// Canonical locale tag.
        locale: String,
        /// First file found.
        first: String,
        /// Second file found.
        second: String,
    },
}
