//! Placeholder extraction for message templates.
//!
//! A template's placeholders decide the shape of its generated method. Every
//! placeholder of one template must be of the same kind:
//!
//! - positional (`{0}`, `{1}`): the method takes `max(index) + 1` arguments.
//!   Gaps are allowed and still widen the arity, matching how positional
//!   substitution indexes its argument list;
//! - named (`{firstName}`): the method takes one argument per distinct name in
//!   first-occurrence order within the template. Alphabetical order is never
//!   used, so reordering arguments is always a visible change to the
//!   default-locale template;
//! - none: the method takes only the locale.

use serde::Serialize;
use thiserror::Error;

use crate::runtime::template::{Segment, TemplateSyntaxError, tokenize};

/// Highest positional index accepted in a template.
pub const MAX_POSITIONAL_INDEX: usize = 254;

/// One placeholder token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Placeholder {
    /// `{N}`.
    Positional(usize),
    /// `{identifier}`.
    Named(String),
}

impl Placeholder {
    /// Classify the trimmed content of a `{...}` placeholder.
    ///
    /// Returns `None` when the content is neither a non-negative integer no
    /// larger than [`MAX_POSITIONAL_INDEX`] nor an identifier.
    ///
    /// ```rust
    /// use kotoba::placeholder::Placeholder;
    ///
    /// assert_eq!(Placeholder::classify("2"), Some(Placeholder::Positional(2)));
    /// assert_eq!(
    ///     Placeholder::classify("first_name"),
    ///     Some(Placeholder::Named("first_name".into()))
    /// );
    /// assert_eq!(Placeholder::classify("1st"), None);
    /// assert_eq!(Placeholder::classify("a-b"), None);
    /// ```
    #[must_use]
    pub fn classify(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let first = chars.next()?;
        if first.is_ascii_digit() {
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            return token
                .parse::<usize>()
                .ok()
                .filter(|&index| index <= MAX_POSITIONAL_INDEX)
                .map(Self::Positional);
        }
        let is_ident_char = |c: char| c.is_ascii_alphanumeric() || c == '_';
        if (first.is_ascii_alphabetic() || first == '_') && chars.all(is_ident_char) {
            Some(Self::Named(token.to_owned()))
        } else {
            None
        }
    }
}

/// Placeholder mode of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderMode {
    /// No placeholders.
    NoArgs,
    /// Integer placeholders.
    Positional,
    /// Identifier placeholders.
    Named,
}

impl std::fmt::Display for PlaceholderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::NoArgs => "no placeholders",
            Self::Positional => "positional",
            Self::Named => "named",
        })
    }
}

/// The ordered, deduplicated placeholders of one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlaceholderSet {
    /// No placeholders.
    NoArgs,
    /// Positional placeholders.
    Positional {
        /// Number of arguments, `max(index) + 1`.
        arity: usize,
        /// Distinct indices in first-occurrence order.
        indices: Vec<usize>,
    },
    /// Named placeholders in first-occurrence order.
    Named {
        /// Distinct names in first-occurrence order.
        names: Vec<String>,
    },
}

impl PlaceholderSet {
    /// The set's mode.
    #[must_use]
    pub const fn mode(&self) -> PlaceholderMode {
        match self {
            Self::NoArgs => PlaceholderMode::NoArgs,
            Self::Positional { .. } => PlaceholderMode::Positional,
            Self::Named { .. } => PlaceholderMode::Named,
        }
    }

    /// Number of parameters a method for this set takes besides the locale.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::NoArgs => 0,
            Self::Positional { arity, .. } => *arity,
            Self::Named { names } => names.len(),
        }
    }
}

/// A template whose placeholders cannot be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    /// Placeholder syntax that is neither positional nor named.
    #[error("malformed placeholder `{fragment}`")]
    Malformed {
        /// The offending text.
        fragment: String,
    },
    /// Positional and named placeholders in one template.
    #[error("mixes positional placeholder `{positional}` with named placeholder `{named}`")]
    InconsistentMode {
        /// First positional placeholder seen.
        positional: String,
        /// First named placeholder seen.
        named: String,
    },
}

impl From<TemplateSyntaxError> for PlaceholderError {
    fn from(err: TemplateSyntaxError) -> Self {
        let fragment = match err {
            TemplateSyntaxError::Unterminated { fragment }
            | TemplateSyntaxError::Nested { fragment } => fragment,
        };
        Self::Malformed { fragment }
    }
}

/// Extract the placeholder set of `template`.
///
/// # Errors
///
/// Returns [`PlaceholderError::Malformed`] for unterminated, nested or
/// unclassifiable placeholders, and [`PlaceholderError::InconsistentMode`]
/// when positional and named placeholders are mixed.
///
/// # Examples
///
/// ```rust
/// use kotoba::placeholder::{PlaceholderSet, extract};
///
/// assert_eq!(
///     extract("Hello {0} and {2}").expect("valid"),
///     PlaceholderSet::Positional { arity: 3, indices: vec![0, 2] }
/// );
/// assert_eq!(
///     extract("{lastName}, {firstName} {lastName}").expect("valid"),
///     PlaceholderSet::Named { names: vec!["lastName".into(), "firstName".into()] }
/// );
/// assert_eq!(extract("Goodbye").expect("valid"), PlaceholderSet::NoArgs);
/// ```
pub fn extract(template: &str) -> Result<PlaceholderSet, PlaceholderError> {
    let mut indices: Vec<usize> = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut first_positional: Option<&str> = None;
    let mut first_named: Option<&str> = None;
    for segment in tokenize(template)? {
        let Segment::Placeholder { token, raw } = segment else {
            continue;
        };
        match Placeholder::classify(token) {
            Some(Placeholder::Positional(index)) => {
                if first_positional.is_none() {
                    first_positional = Some(raw);
                }
                if !indices.contains(&index) {
                    indices.push(index);
                }
            }
            Some(Placeholder::Named(name)) => {
                if first_named.is_none() {
                    first_named = Some(raw);
                }
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            None => {
                return Err(PlaceholderError::Malformed {
                    fragment: raw.to_owned(),
                });
            }
        }
    }
    match (first_positional, first_named) {
        (Some(positional), Some(named)) => Err(PlaceholderError::InconsistentMode {
            positional: positional.to_owned(),
            named: named.to_owned(),
        }),
        (Some(_), None) => {
            let arity = indices.iter().max().map_or(0, |max| max + 1);
            Ok(PlaceholderSet::Positional { arity, indices })
        }
        (None, Some(_)) => Ok(PlaceholderSet::Named { names }),
        (None, None) => Ok(PlaceholderSet::NoArgs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello {0} {1}", 2)]
    #[case("{1} before {0}", 2)]
    #[case("{0}{0}{0}", 1)]
    #[case("only {3}", 4)]
    #[case("{007}", 8)]
    fn positional_arity(#[case] template: &str, #[case] arity: usize) {
        let set = extract(template).expect("valid template");
        assert_eq!(set.mode(), PlaceholderMode::Positional);
        assert_eq!(set.arity(), arity);
    }

    #[rstest]
    fn named_order_is_first_occurrence_not_alphabetical() {
        let set = extract("{zeta} {alpha} {zeta} {mid}").expect("valid template");
        assert_eq!(
            set,
            PlaceholderSet::Named {
                names: vec!["zeta".into(), "alpha".into(), "mid".into()]
            }
        );
    }

    #[rstest]
    fn escaped_braces_are_not_placeholders() {
        assert_eq!(extract("{{0}} literal").expect("valid"), PlaceholderSet::NoArgs);
    }

    #[rstest]
    #[case("Hi {}", "{}")]
    #[case("Hi {first name}", "{first name}")]
    #[case("Hi {-1}", "{-1}")]
    #[case("Hi {0,number}", "{0,number}")]
    #[case("Hi {255}", "{255}")]
    #[case("Hi {0", "{0")]
    fn malformed_placeholders(#[case] template: &str, #[case] fragment: &str) {
        assert_eq!(
            extract(template),
            Err(PlaceholderError::Malformed {
                fragment: fragment.to_owned()
            })
        );
    }

    #[rstest]
    fn mixing_modes_is_rejected() {
        assert_eq!(
            extract("{0} and {name}"),
            Err(PlaceholderError::InconsistentMode {
                positional: "{0}".into(),
                named: "{name}".into()
            })
        );
    }
}
