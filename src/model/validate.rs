//! Cross-locale compatibility checks.
//!
//! The default catalog is authoritative: a variant may drop placeholders but
//! must never introduce one the generated method has no argument for.

use std::collections::HashMap;

use tracing::warn;

use super::{OrphanKey, ValidationError, error::Mismatch, placeholder_error};
use crate::catalog::Catalog;
use crate::placeholder::{self, PlaceholderSet};

/// Problems and orphan keys found in one variant catalog.
#[derive(Debug, Default)]
pub(super) struct VariantReport {
    pub(super) errors: Vec<ValidationError>,
    pub(super) orphans: Vec<OrphanKey>,
}

/// Check every key of `variant` against the default placeholder sets.
///
/// `defaults` holds only keys whose default template extracted cleanly, so a
/// broken default is reported once rather than once per locale.
pub(super) fn check_variant(
    bundle: &str,
    variant: &Catalog,
    default_catalog: &Catalog,
    defaults: &HashMap<&str, PlaceholderSet>,
) -> VariantReport {
    let locale = variant.locale_label();
    let mut report = VariantReport::default();
    for (key, template) in variant.iter() {
        if !default_catalog.contains_key(key) {
            warn!(bundle, locale, key, "key is missing from the default catalog");
            report.orphans.push(OrphanKey {
                locale: locale.to_owned(),
                key: key.to_owned(),
            });
            continue;
        }
        let found = match placeholder::extract(template) {
            Ok(found) => found,
            Err(err) => {
                report
                    .errors
                    .push(placeholder_error(bundle, locale, key, err));
                continue;
            }
        };
        let Some(expected) = defaults.get(key) else {
            continue;
        };
        if let Some(mismatch) = compatibility(expected, &found) {
            report.errors.push(ValidationError::LocaleInconsistency {
                bundle: bundle.to_owned(),
                locale: locale.to_owned(),
                key: key.to_owned(),
                mismatch,
            });
        }
    }
    report
}

/// Why `found` cannot be rendered with the arguments of `expected`, if it
/// cannot.
pub(super) fn compatibility(expected: &PlaceholderSet, found: &PlaceholderSet) -> Option<Mismatch> {
    match (expected, found) {
        (_, PlaceholderSet::NoArgs) => None,
        (PlaceholderSet::Positional { arity, .. }, PlaceholderSet::Positional { indices, .. }) => {
            let beyond: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|&index| index >= *arity)
                .collect();
            (!beyond.is_empty()).then(|| Mismatch::IndexOutOfRange {
                indices: beyond,
                arity: *arity,
            })
        }
        (PlaceholderSet::Named { names }, PlaceholderSet::Named { names: found_names }) => {
            let unknown: Vec<String> = found_names
                .iter()
                .filter(|name| !names.contains(name))
                .cloned()
                .collect();
            (!unknown.is_empty()).then_some(Mismatch::UnknownName { names: unknown })
        }
        _ => Some(Mismatch::Mode {
            expected: expected.mode(),
            found: found.mode(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{PlaceholderMode, extract};
    use rstest::rstest;

    fn set(template: &str) -> PlaceholderSet {
        extract(template).expect("valid template")
    }

    #[rstest]
    #[case("Hi {0} {1}", "Salut {1} {0}")]
    #[case("Hi {0} {1}", "Salut {0}")]
    #[case("Hi {0} {2}", "Salut {1}")]
    #[case("Hi {0}", "Salut")]
    #[case("Hi", "Salut")]
    #[case("Hi {a} {b}", "Salut {b} {a}")]
    #[case("Hi {a} {b}", "Salut {b}")]
    fn compatible_variants(#[case] default: &str, #[case] variant: &str) {
        assert_eq!(compatibility(&set(default), &set(variant)), None);
    }

    #[rstest]
    fn higher_index_than_default_arity_is_rejected() {
        assert_eq!(
            compatibility(&set("Hi {0}"), &set("Hi {0} {1}")),
            Some(Mismatch::IndexOutOfRange {
                indices: vec![1],
                arity: 1
            })
        );
    }

    #[rstest]
    fn every_offending_placeholder_is_listed() {
        let indices = compatibility(&set("Hi {0} {1}"), &set("{3} {0} {2} {3}"));
        assert_eq!(
            indices,
            Some(Mismatch::IndexOutOfRange {
                indices: vec![3, 2],
                arity: 2
            })
        );
        assert_eq!(
            indices.map(|m| m.to_string()).as_deref(),
            Some("references {3}, {2} but the default template only takes 2 argument(s)")
        );
        assert_eq!(
            compatibility(&set("Hi {first}"), &set("{nom} {first} {prenom}")),
            Some(Mismatch::UnknownName {
                names: vec!["nom".into(), "prenom".into()]
            })
        );
    }

    #[rstest]
    fn unknown_name_is_rejected() {
        assert_eq!(
            compatibility(&set("Hi {first}"), &set("Hi {first} {last}")),
            Some(Mismatch::UnknownName {
                names: vec!["last".into()]
            })
        );
    }

    #[rstest]
    #[case("Hi {0}", "Hi {name}", PlaceholderMode::Positional, PlaceholderMode::Named)]
    #[case("Hi {name}", "Hi {0}", PlaceholderMode::Named, PlaceholderMode::Positional)]
    #[case("Hi", "Hi {0}", PlaceholderMode::NoArgs, PlaceholderMode::Positional)]
    fn mode_changes_are_rejected(
        #[case] default: &str,
        #[case] variant: &str,
        #[case] expected: PlaceholderMode,
        #[case] found: PlaceholderMode,
    ) {
        assert_eq!(
            compatibility(&set(default), &set(variant)),
            Some(Mismatch::Mode { expected, found })
        );
    }
}
