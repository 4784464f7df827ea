//! Rust source generator for typed message accessors.
//!
//! The emitted file holds one `pub struct` per bundle with a method per
//! message key. It contains no inner attributes and names every runtime item
//! by absolute path, so it works both as a checked-in module and through
//! `include!`. Output depends only on its inputs: the same catalogs always
//! produce byte-identical text.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use std::fmt::{self, Display, Formatter};

use camino::Utf8Path;
use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{self, Catalog, CatalogError, CatalogSet};
use crate::model::naming::{self, LOCALE_PARAM};
use crate::model::{
    self, AccessorSpec, MessageDescriptor, MethodCase, ModelOptions, ValidationReport,
};
use crate::placeholder::PlaceholderSet;

const RUNTIME: &str = "::kotoba::runtime";
const DISPLAY: &str = "::std::fmt::Display";
const STRING: &str = "::std::string::String";
const INDENT: &str = "    ";

/// Generator settings for one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Name of the generated struct.
    pub type_name: String,
    /// Whether to emit an `embedded()` constructor carrying the catalogs.
    pub embed: bool,
}

impl CodegenOptions {
    /// Default settings: `PascalCase(bundle)` and embedded catalogs.
    #[must_use]
    pub fn for_bundle(bundle: &str) -> Self {
        Self {
            type_name: naming::type_name(bundle),
            embed: true,
        }
    }
}

/// Failure to generate the accessor of one bundle.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    /// The catalogs could not be loaded.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),
    /// The catalogs loaded but failed validation.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationReport),
}

/// A generated accessor and the model it was generated from.
#[derive(Debug, Clone)]
pub struct Generated {
    /// The validated key model.
    pub spec: AccessorSpec,
    /// Rust source text.
    pub source: String,
}

/// Load, validate and generate the accessor for `bundle` stored in `dir`.
///
/// # Errors
///
/// Returns [`GenerateError::Catalog`] when loading fails and
/// [`GenerateError::Validation`] with every problem found when validation
/// fails. Nothing is generated in either case.
pub fn generate_bundle(
    dir: &Utf8Path,
    bundle: &str,
    model_options: &ModelOptions,
    options: &CodegenOptions,
) -> Result<Generated, GenerateError> {
    generate_bundle_among(dir, bundle, &[], model_options, options)
}

/// Like [`generate_bundle`] when `dir` also holds the catalogs of `siblings`.
///
/// # Errors
///
/// As for [`generate_bundle`].
pub fn generate_bundle_among(
    dir: &Utf8Path,
    bundle: &str,
    siblings: &[&str],
    model_options: &ModelOptions,
    options: &CodegenOptions,
) -> Result<Generated, GenerateError> {
    let catalogs = catalog::load_bundle_among(dir, bundle, siblings)?;
    let spec = model::build(&catalogs, model_options)?;
    let source = generate(&spec, &catalogs, options);
    debug!(
        bundle,
        type_name = %options.type_name,
        bytes = source.len(),
        "generated accessor"
    );
    Ok(Generated { spec, source })
}

/// Render the accessor source for a validated model.
///
/// `catalogs` supplies the embedded data and must be the set `spec` was
/// built from.
///
/// # Examples
///
/// ```rust
/// use kotoba::catalog::{Catalog, CatalogSet};
/// use kotoba::codegen::{CodegenOptions, generate};
/// use kotoba::model::{self, ModelOptions};
///
/// let set = CatalogSet::new(
///     Catalog::from_pairs("greetings", None, [("welcome.message", "Hello {0}")]),
///     Vec::new(),
/// );
/// let spec = model::build(&set, &ModelOptions::default()).expect("valid");
/// let source = generate(&spec, &set, &CodegenOptions::for_bundle("greetings"));
/// assert!(source.contains("pub struct Greetings"));
/// assert!(source.contains("pub fn welcome_message(&self, locale: &str, arg0: impl ::std::fmt::Display) -> ::std::string::String"));
/// ```
#[must_use]
pub fn generate(spec: &AccessorSpec, catalogs: &CatalogSet, options: &CodegenOptions) -> String {
    AccessorFile {
        spec,
        catalogs,
        options,
    }
    .to_string()
}

/// Rust string literal for `text`.
fn literal(text: &str) -> String {
    format!("{text:?}")
}

struct AccessorFile<'a> {
    spec: &'a AccessorSpec,
    catalogs: &'a CatalogSet,
    options: &'a CodegenOptions,
}

impl Display for AccessorFile<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let spec = self.spec;
        let name = &self.options.type_name;
        writeln!(
            f,
            "// @generated by kotoba from the `{}` bundle. Do not edit by hand.",
            spec.bundle
        )?;
        writeln!(
            f,
            "// Locales: {}",
            std::iter::once("default")
                .chain(spec.locales.iter().map(String::as_str))
                .join(", ")
        )?;
        writeln!(f)?;
        writeln!(f, "/// Typed messages of the `{}` bundle.", spec.bundle)?;
        writeln!(f, "#[derive(Debug, Clone)]")?;
        writeln!(f, "pub struct {name} {{")?;
        writeln!(f, "{INDENT}bundle: {RUNTIME}::BundleHandle,")?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        writeln!(f, "impl {name} {{")?;
        writeln!(f, "{INDENT}/// Bundle the accessors read from.")?;
        writeln!(
            f,
            "{INDENT}pub const BUNDLE: &'static str = {};",
            literal(&spec.bundle)
        )?;
        writeln!(f)?;
        write_constructors(f, self.options.embed, self.catalogs)?;
        write_keys(f, &spec.descriptors)?;
        for descriptor in &spec.descriptors {
            writeln!(f)?;
            write!(
                f,
                "{}",
                MessageMethod {
                    descriptor,
                    case: spec.method_case,
                }
            )?;
        }
        writeln!(f, "}}")
    }
}

fn write_constructors(f: &mut Formatter<'_>, embed: bool, catalogs: &CatalogSet) -> fmt::Result {
    writeln!(f, "{INDENT}/// Accessors backed by `resolver`.")?;
    writeln!(f, "{INDENT}#[must_use]")?;
    writeln!(
        f,
        "{INDENT}pub fn new(resolver: ::std::sync::Arc<{RUNTIME}::LocaleResolver>) -> Self {{"
    )?;
    writeln!(f, "{INDENT}{INDENT}Self {{")?;
    writeln!(
        f,
        "{INDENT}{INDENT}{INDENT}bundle: {RUNTIME}::BundleHandle::new(resolver, Self::BUNDLE),"
    )?;
    writeln!(f, "{INDENT}{INDENT}}}")?;
    writeln!(f, "{INDENT}}}")?;
    writeln!(f)?;
    if embed {
        write!(f, "{}", EmbeddedConstructor { catalogs })?;
        writeln!(f)?;
    }
    writeln!(f, "{INDENT}/// The underlying bundle handle.")?;
    writeln!(f, "{INDENT}#[must_use]")?;
    writeln!(
        f,
        "{INDENT}pub const fn handle(&self) -> &{RUNTIME}::BundleHandle {{"
    )?;
    writeln!(f, "{INDENT}{INDENT}&self.bundle")?;
    writeln!(f, "{INDENT}}}")?;
    writeln!(f)
}

fn write_keys(f: &mut Formatter<'_>, descriptors: &[MessageDescriptor]) -> fmt::Result {
    writeln!(f, "{INDENT}/// Every message key, in default-catalog order.")?;
    writeln!(f, "{INDENT}#[must_use]")?;
    writeln!(f, "{INDENT}pub const fn keys() -> &'static [&'static str] {{")?;
    writeln!(f, "{INDENT}{INDENT}&[")?;
    for descriptor in descriptors {
        writeln!(f, "{INDENT}{INDENT}{INDENT}{},", literal(&descriptor.key))?;
    }
    writeln!(f, "{INDENT}{INDENT}]")?;
    writeln!(f, "{INDENT}}}")
}

/// The `embedded()` constructor and the static catalogs behind it.
struct EmbeddedConstructor<'a> {
    catalogs: &'a CatalogSet,
}

impl Display for EmbeddedConstructor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let i2 = INDENT.repeat(2);
        let i3 = INDENT.repeat(3);
        let i4 = INDENT.repeat(4);
        let i5 = INDENT.repeat(5);
        writeln!(
            f,
            "{INDENT}/// Accessors backed by the catalogs captured when this file was generated."
        )?;
        writeln!(f, "{INDENT}#[must_use]")?;
        writeln!(f, "{INDENT}pub fn embedded() -> Self {{")?;
        writeln!(
            f,
            "{i2}static CATALOGS: &[{RUNTIME}::EmbeddedCatalog] = &["
        )?;
        let all = std::iter::once(self.catalogs.default_catalog()).chain(self.catalogs.variants());
        for catalog in all {
            writeln!(f, "{i3}{RUNTIME}::EmbeddedCatalog {{")?;
            writeln!(f, "{i4}locale: {},", embedded_locale(catalog))?;
            writeln!(f, "{i4}entries: &[")?;
            for (key, template) in catalog.iter() {
                writeln!(f, "{i5}({}, {}),", literal(key), literal(template))?;
            }
            writeln!(f, "{i4}],")?;
            writeln!(f, "{i3}}},")?;
        }
        writeln!(f, "{i2}];")?;
        writeln!(
            f,
            "{i2}static RESOLVER: ::std::sync::OnceLock<::std::sync::Arc<{RUNTIME}::LocaleResolver>> ="
        )?;
        writeln!(f, "{i3}::std::sync::OnceLock::new();")?;
        writeln!(f, "{i2}let resolver = RESOLVER.get_or_init(|| {{")?;
        writeln!(f, "{i3}::std::sync::Arc::new({RUNTIME}::LocaleResolver::new(")?;
        writeln!(
            f,
            "{i4}{RUNTIME}::EmbeddedSource::new(Self::BUNDLE, CATALOGS),"
        )?;
        writeln!(f, "{i3}))")?;
        writeln!(f, "{i2}}});")?;
        writeln!(f, "{i2}Self::new(::std::sync::Arc::clone(resolver))")?;
        writeln!(f, "{INDENT}}}")
    }
}

fn embedded_locale(catalog: &Catalog) -> String {
    catalog.locale().map_or_else(
        || "::std::option::Option::None".to_owned(),
        |tag| format!("::std::option::Option::Some({})", literal(tag.as_str())),
    )
}

/// One accessor method.
struct MessageMethod<'a> {
    descriptor: &'a MessageDescriptor,
    case: MethodCase,
}

impl Display for MessageMethod<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let d = self.descriptor;
        let i2 = INDENT.repeat(2);
        let i3 = INDENT.repeat(3);
        writeln!(
            f,
            "{INDENT}/// `{}`: {}",
            d.key.escape_debug(),
            literal(&d.template)
        )?;
        writeln!(f, "{INDENT}#[must_use]")?;
        if self.case == MethodCase::Camel {
            writeln!(f, "{INDENT}#[allow(non_snake_case)]")?;
        }
        let params = std::iter::once(format!("{LOCALE_PARAM}: &str"))
            .chain(
                d.parameters
                    .iter()
                    .map(|param| format!("{}: impl {DISPLAY}", param.ident)),
            )
            .join(", ");
        writeln!(
            f,
            "{INDENT}pub fn {}(&self, {params}) -> {STRING} {{",
            d.method
        )?;
        let (function, args) = match &d.placeholders {
            PlaceholderSet::Named { .. } => (
                "format_named",
                d.parameters
                    .iter()
                    .map(|param| {
                        format!(
                            "({}, &{} as &dyn {DISPLAY})",
                            literal(&param.placeholder),
                            param.ident
                        )
                    })
                    .join(", "),
            ),
            PlaceholderSet::Positional { .. } | PlaceholderSet::NoArgs => (
                "format_positional",
                d.parameters
                    .iter()
                    .map(|param| format!("&{} as &dyn {DISPLAY}", param.ident))
                    .join(", "),
            ),
        };
        // No locals: every parameter name comes from a placeholder.
        writeln!(f, "{i2}{RUNTIME}::{function}(")?;
        writeln!(
            f,
            "{i3}&self.bundle.get_string({LOCALE_PARAM}, {}),",
            literal(&d.key)
        )?;
        writeln!(f, "{i3}&[{args}],")?;
        writeln!(f, "{i2})")?;
        writeln!(f, "{INDENT}}}")
    }
}
