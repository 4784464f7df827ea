//! Validation failures reported by the key model builder.
//
// Module-level suppression for version-dependent lint false positives from
// miette/thiserror derive macros. The unused_assignments lint fires in some
// Rust versions but not others, so `#[expect]` cannot be used here.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use std::fmt;

use itertools::Itertools;
use miette::Diagnostic;
use thiserror::Error;

use crate::placeholder::PlaceholderMode;

/// How a variant template disagrees with the default template of its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The variant uses a different placeholder mode.
    Mode {
        /// Mode of the default template.
        expected: PlaceholderMode,
        /// Mode of the variant template.
        found: PlaceholderMode,
    },
    /// The variant references indices at or beyond the default arity.
    IndexOutOfRange {
        /// Every offending index, in order of first use.
        indices: Vec<usize>,
        /// Arity of the default template.
        arity: usize,
    },
    /// The variant references names the default template does not declare.
    UnknownName {
        /// Every offending name, in order of first use.
        names: Vec<String>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mode { expected, found } => write!(
                f,
                "uses {found} placeholders but the default template uses {expected}"
            ),
            Self::IndexOutOfRange { indices, arity } => write!(
                f,
                "references {} but the default template only takes {arity} argument(s)",
                braced(indices)
            ),
            Self::UnknownName { names } => write!(
                f,
                "references {} which the default template does not declare",
                braced(names)
            ),
        }
    }
}

fn braced<T: fmt::Display>(tokens: &[T]) -> String {
    tokens.iter().map(|token| format!("{{{token}}}")).join(", ")
}

/// One problem found while building the accessor model.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    /// A template contains placeholder syntax that cannot be classified.
    #[error("{bundle}[{locale}] `{key}`: malformed placeholder `{fragment}`")]
    #[diagnostic(
        code(kotoba::model::malformed_placeholder),
        help("placeholders hold a numeric index or an identifier; double a brace to write it literally")
    )]
    MalformedPlaceholder {
        /// Bundle name.
        bundle: String,
        /// Locale label (`default` for the default catalog).
        locale: String,
        /// Message key.
        key: String,
        /// Offending text.
        fragment: String,
    },
    /// A template mixes modes, or disagrees with the declared bundle mode.
    #[error("{bundle}[{locale}] `{key}`: {detail}")]
    #[diagnostic(code(kotoba::model::inconsistent_placeholder_mode))]
    InconsistentPlaceholderMode {
        /// Bundle name.
        bundle: String,
        /// Locale label.
        locale: String,
        /// Message key.
        key: String,
        /// What is inconsistent.
        detail: String,
    },
    /// A variant template is incompatible with the default template.
    #[error("{bundle}[{locale}] `{key}`: {mismatch}")]
    #[diagnostic(
        code(kotoba::model::locale_inconsistency),
        help("the default catalog defines each message's arguments; variants may only use a subset of them")
    )]
    LocaleInconsistency {
        /// Bundle name.
        bundle: String,
        /// Variant locale.
        locale: String,
        /// Message key.
        key: String,
        /// The specific incompatibility.
        mismatch: Mismatch,
    },
    /// Two keys derive the same method name, ignoring case.
    #[error("{bundle}: keys `{first_key}` and `{second_key}` both generate method `{method}`")]
    #[diagnostic(
        code(kotoba::model::method_name_collision),
        help("rename one of the keys")
    )]
    MethodNameCollision {
        /// Bundle name.
        bundle: String,
        /// Colliding method name.
        method: String,
        /// Key that claimed the name first.
        first_key: String,
        /// Key that collided with it.
        second_key: String,
    },
    /// Two placeholders of one key derive the same parameter name.
    #[error(
        "{bundle}[default] `{key}`: placeholders `{first}` and `{second}` both become parameter `{parameter}`"
    )]
    #[diagnostic(code(kotoba::model::parameter_name_collision))]
    ParameterNameCollision {
        /// Bundle name.
        bundle: String,
        /// Message key.
        key: String,
        /// Colliding parameter identifier.
        parameter: String,
        /// First placeholder name.
        first: String,
        /// Second placeholder name.
        second: String,
    },
}

/// Every validation problem found in one bundle.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{}", render_report(.bundle, .errors))]
#[diagnostic(code(kotoba::model::validation_failed))]
pub struct ValidationReport {
    /// Bundle name.
    pub bundle: String,
    /// Problems in catalog order.
    #[related]
    pub errors: Vec<ValidationError>,
}

fn render_report(bundle: &str, errors: &[ValidationError]) -> String {
    let mut message = format!(
        "bundle `{bundle}` failed validation with {} error(s):",
        errors.len()
    );
    for err in errors {
        message.push_str("\n- ");
        message.push_str(&err.to_string());
    }
    message
}
