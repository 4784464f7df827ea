//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly. The `unused_assignments` lint fires in some Rust versions due to
//! thiserror/miette derive macro expansion.

// Scoped suppression for version-dependent lint false positives from
// miette/thiserror derive macros. Since `#[expect]` fails when the lint doesn't
// fire, `#[allow]` is used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The declaration file does not exist at the expected path.
    #[error("declaration file {path} not found")]
    #[diagnostic(
        code(kotoba::runner::declaration_not_found),
        help("create a kotoba.yml listing your bundles, or pass its location with -f")
    )]
    DeclarationNotFound {
        /// The path that was attempted.
        path: Utf8PathBuf,
    },
    /// `--bundle` named a bundle the declaration does not list.
    #[error("bundle `{name}` is not declared; declared bundles: {available}")]
    #[diagnostic(code(kotoba::runner::unknown_bundle))]
    UnknownBundle {
        /// Requested bundle.
        name: String,
        /// Comma-separated declared bundle names.
        available: String,
    },
    /// `check` found outputs that differ from freshly generated code.
    #[error("{count} generated file(s) out of date: {paths}")]
    #[diagnostic(
        code(kotoba::runner::stale_output),
        help("run `kotoba generate` and commit the result")
    )]
    StaleOutputs {
        /// Number of stale files.
        count: usize,
        /// Comma-separated stale paths.
        paths: String,
    },
}
