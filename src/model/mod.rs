//! Key model builder.
//!
//! Turns a bundle's [`CatalogSet`] into an [`AccessorSpec`]: one
//! [`MessageDescriptor`] per default-catalog key, with the method name and
//! ordered parameters its generated accessor will have. The builder runs
//! every check over every catalog before failing, so a single run reports the
//! complete list of problems instead of the first one.

mod error;
pub mod naming;
mod validate;

pub use error::{Mismatch, ValidationError, ValidationReport};
pub use naming::MethodCase;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogSet;
use crate::placeholder::{self, PlaceholderError, PlaceholderMode, PlaceholderSet};

/// Substitution mode a bundle declares for all of its templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclaredMode {
    /// Only `{0}`-style placeholders are allowed.
    Positional,
    /// Only `{name}`-style placeholders are allowed.
    Named,
}

impl DeclaredMode {
    const fn as_mode(self) -> PlaceholderMode {
        match self {
            Self::Positional => PlaceholderMode::Positional,
            Self::Named => PlaceholderMode::Named,
        }
    }
}

/// Knobs for [`build`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelOptions {
    /// Mode every template must use, when declared.
    pub mode: Option<DeclaredMode>,
    /// Case of generated method and parameter names.
    pub method_case: MethodCase,
}

/// One parameter of a generated method, after the locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    /// Rust identifier of the parameter.
    pub ident: String,
    /// Placeholder the parameter fills: an index such as `0` or a name.
    pub placeholder: String,
}

/// Shape of the generated method for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    /// Message key.
    pub key: String,
    /// Generated method identifier.
    pub method: String,
    /// Placeholders of the default-locale template.
    pub placeholders: PlaceholderSet,
    /// Parameters in signature order.
    pub parameters: Vec<Parameter>,
    /// The default-locale template.
    pub template: String,
}

impl MessageDescriptor {
    /// Placeholder mode of the key.
    #[must_use]
    pub const fn mode(&self) -> PlaceholderMode {
        self.placeholders.mode()
    }
}

/// A key defined by a variant but not by the default catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanKey {
    /// Variant locale.
    pub locale: String,
    /// Orphaned key.
    pub key: String,
}

/// Everything the code generator needs to know about a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorSpec {
    /// Bundle name.
    pub bundle: String,
    /// Case used for derived identifiers.
    pub method_case: MethodCase,
    /// Variant locales, in catalog order.
    pub locales: Vec<String>,
    /// One descriptor per default-catalog key, in source order.
    pub descriptors: Vec<MessageDescriptor>,
    /// Variant keys with no default counterpart.
    pub orphans: Vec<OrphanKey>,
}

/// Build the accessor model for `catalogs`.
///
/// # Errors
///
/// Returns a [`ValidationReport`] listing every malformed or mixed-mode
/// template, every declared-mode violation, every variant incompatible with
/// its default template, and every method or parameter name collision.
///
/// # Examples
///
/// ```rust
/// use kotoba::catalog::{Catalog, CatalogSet};
/// use kotoba::model::{self, MethodCase, ModelOptions};
///
/// let default = Catalog::from_pairs(
///     "greetings",
///     None,
///     [("welcome.message", "Hello {0} {1}"), ("goodbye.message", "Bye {0}")],
/// );
/// let options = ModelOptions { method_case: MethodCase::Camel, ..ModelOptions::default() };
/// let spec = model::build(&CatalogSet::new(default, Vec::new()), &options).expect("valid");
/// let methods: Vec<_> = spec.descriptors.iter().map(|d| d.method.as_str()).collect();
/// assert_eq!(methods, ["welcomeMessage", "goodbyeMessage"]);
/// assert_eq!(spec.descriptors[0].parameters.len(), 2);
/// ```
pub fn build(catalogs: &CatalogSet, options: &ModelOptions) -> Result<AccessorSpec, ValidationReport> {
    let bundle = catalogs.bundle();
    let default_catalog = catalogs.default_catalog();
    let mut errors = Vec::new();
    let mut descriptors = Vec::with_capacity(default_catalog.len());
    let mut defaults: HashMap<&str, PlaceholderSet> = HashMap::new();

    for (key, template) in default_catalog.iter() {
        match describe(bundle, key, template, options) {
            Ok(descriptor) => {
                defaults.insert(key, descriptor.placeholders.clone());
                descriptors.push(descriptor);
            }
            Err(err) => errors.push(err),
        }
    }
    errors.extend(method_collisions(bundle, &descriptors));

    let mut orphans = Vec::new();
    for variant in catalogs.variants() {
        let report = validate::check_variant(bundle, variant, default_catalog, &defaults);
        errors.extend(report.errors);
        orphans.extend(report.orphans);
    }

    if !errors.is_empty() {
        return Err(ValidationReport {
            bundle: bundle.to_owned(),
            errors,
        });
    }
    debug!(
        bundle,
        methods = descriptors.len(),
        variants = catalogs.variants().len(),
        "built accessor model"
    );
    Ok(AccessorSpec {
        bundle: bundle.to_owned(),
        method_case: options.method_case,
        locales: catalogs
            .variants()
            .iter()
            .map(|variant| variant.locale_label().to_owned())
            .collect(),
        descriptors,
        orphans,
    })
}

fn describe(
    bundle: &str,
    key: &str,
    template: &str,
    options: &ModelOptions,
) -> Result<MessageDescriptor, ValidationError> {
    let placeholders = placeholder::extract(template)
        .map_err(|err| placeholder_error(bundle, "default", key, err))?;
    if let Some(declared) = options.mode {
        let mode = placeholders.mode();
        if mode != PlaceholderMode::NoArgs && mode != declared.as_mode() {
            return Err(ValidationError::InconsistentPlaceholderMode {
                bundle: bundle.to_owned(),
                locale: "default".to_owned(),
                key: key.to_owned(),
                detail: format!(
                    "uses {mode} placeholders but the bundle declares {} mode",
                    declared.as_mode()
                ),
            });
        }
    }
    let parameters = parameters(bundle, key, &placeholders, options.method_case)?;
    Ok(MessageDescriptor {
        key: key.to_owned(),
        method: naming::method_name(key, options.method_case),
        placeholders,
        parameters,
        template: template.to_owned(),
    })
}

fn parameters(
    bundle: &str,
    key: &str,
    placeholders: &PlaceholderSet,
    case: MethodCase,
) -> Result<Vec<Parameter>, ValidationError> {
    match placeholders {
        PlaceholderSet::NoArgs => Ok(Vec::new()),
        PlaceholderSet::Positional { arity, .. } => Ok((0..*arity)
            .map(|index| Parameter {
                ident: naming::positional_parameter(index),
                placeholder: index.to_string(),
            })
            .collect()),
        PlaceholderSet::Named { names } => {
            let mut params: Vec<Parameter> = Vec::with_capacity(names.len());
            for name in names {
                let ident = naming::parameter_name(name, case);
                if let Some(existing) = params.iter().find(|param| param.ident == ident) {
                    return Err(ValidationError::ParameterNameCollision {
                        bundle: bundle.to_owned(),
                        key: key.to_owned(),
                        parameter: ident,
                        first: existing.placeholder.clone(),
                        second: name.clone(),
                    });
                }
                params.push(Parameter {
                    ident,
                    placeholder: name.clone(),
                });
            }
            Ok(params)
        }
    }
}

fn method_collisions(bundle: &str, descriptors: &[MessageDescriptor]) -> Vec<ValidationError> {
    let mut claimed: HashMap<String, &MessageDescriptor> = HashMap::new();
    let mut errors = Vec::new();
    for descriptor in descriptors {
        let folded = descriptor.method.trim_start_matches("r#").to_lowercase();
        if let Some(first) = claimed.get(&folded) {
            errors.push(ValidationError::MethodNameCollision {
                bundle: bundle.to_owned(),
                method: descriptor.method.clone(),
                first_key: first.key.clone(),
                second_key: descriptor.key.clone(),
            });
        } else {
            claimed.insert(folded, descriptor);
        }
    }
    errors
}

pub(crate) fn placeholder_error(
    bundle: &str,
    locale: &str,
    key: &str,
    err: PlaceholderError,
) -> ValidationError {
    match err {
        PlaceholderError::Malformed { fragment } => ValidationError::MalformedPlaceholder {
            bundle: bundle.to_owned(),
            locale: locale.to_owned(),
            key: key.to_owned(),
            fragment,
        },
        err @ PlaceholderError::InconsistentMode { .. } => {
            ValidationError::InconsistentPlaceholderMode {
                bundle: bundle.to_owned(),
                locale: locale.to_owned(),
                key: key.to_owned(),
                detail: err.to_string(),
            }
        }
    }
}
