//! Kotoba core library.
//!
//! Kotoba reads properties message catalogs (a default catalog plus locale
//! variants), checks that every variant's placeholders are compatible with
//! the default, and generates a Rust accessor type with one strongly typed
//! method per message key. The [`runtime`] module serves those accessors:
//! it resolves a requested locale to a merged, cached catalog and substitutes
//! arguments into templates.
//!
//! The pipeline is [`catalog::load_bundle`] then [`model::build`] then
//! [`codegen::generate`]; [`codegen::generate_bundle`] runs all three.

pub mod catalog;
pub mod cli;
pub mod codegen;
pub mod declaration;
pub mod locale;
pub mod model;
pub mod placeholder;
pub mod runner;
pub mod runtime;
