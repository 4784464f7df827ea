//! Positional and named substitution into message templates.
//!
//! Substitution never fails: placeholders without a matching argument keep
//! their literal `{...}` text and templates that do not tokenize are returned
//! verbatim. Rendering user-facing text must not crash on a bad catalog entry.

use std::fmt::{Display, Write};

use super::template::{Segment, tokenize};

/// Substitute `{0}`, `{1}`, ... with `args` by index.
///
/// # Examples
///
/// ```rust
/// use kotoba::runtime::format_positional;
/// use std::fmt::Display;
///
/// let text = format_positional("Hello {1}, {0}", &[&"Doe" as &dyn Display, &"John"]);
/// assert_eq!(text, "Hello John, Doe");
/// ```
#[must_use]
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    render(template, |token| {
        if !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        token.parse::<usize>().ok().and_then(|idx| args.get(idx).copied())
    })
}

/// Substitute `{name}` placeholders with the matching entry of `args`.
///
/// # Examples
///
/// ```rust
/// use kotoba::runtime::format_named;
/// use std::fmt::Display;
///
/// let text = format_named(
///     "Bonjour {lastName} {firstName}",
///     &[
///         ("firstName", &"John" as &dyn Display),
///         ("lastName", &"Doe" as &dyn Display),
///     ],
/// );
/// assert_eq!(text, "Bonjour Doe John");
/// ```
#[must_use]
pub fn format_named(template: &str, args: &[(&str, &dyn Display)]) -> String {
    render(template, |token| {
        args.iter()
            .find(|(name, _)| *name == token)
            .map(|(_, value)| *value)
    })
}

fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a dyn Display>) -> String {
    let Ok(segments) = tokenize(template) else {
        return template.to_owned();
    };
    let mut out = String::with_capacity(template.len());
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Placeholder { token, raw } => match lookup(token) {
                Some(value) => {
                    if write!(out, "{value}").is_err() {
                        out.push_str(raw);
                    }
                }
                None => out.push_str(raw),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn positional_leaves_gap_indices_untouched() {
        let text = format_positional("{0} and {2}", &[&"a" as &dyn Display, &"b", &"c"]);
        assert_eq!(text, "a and c");
    }

    #[rstest]
    fn positional_repeats_an_index() {
        assert_eq!(format_positional("{0}{0}", &[&7 as &dyn Display]), "77");
    }

    #[rstest]
    fn missing_argument_keeps_placeholder_text() {
        assert_eq!(format_positional("Hi {0} {1}", &[&"Ann" as &dyn Display]), "Hi Ann {1}");
    }

    #[rstest]
    fn escaped_braces_render_single() {
        assert_eq!(format_positional("{{0}} is {0}", &[&"zero" as &dyn Display]), "{0} is zero");
    }

    #[rstest]
    fn malformed_template_renders_verbatim() {
        assert_eq!(format_positional("oops {0", &[&"x" as &dyn Display]), "oops {0");
    }

    #[rstest]
    fn named_ignores_positional_tokens() {
        assert_eq!(format_named("{0} {who}", &[("who", &"me" as &dyn Display)]), "{0} me");
    }

    #[rstest]
    fn positional_ignores_named_tokens() {
        assert_eq!(format_positional("{who} {0}", &[&"x" as &dyn Display]), "{who} x");
    }
}
