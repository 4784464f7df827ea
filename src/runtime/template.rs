//! Tokenizer for `{placeholder}` message templates.
//!
//! Generation-time extraction and runtime substitution both walk templates
//! through [`tokenize`], so the placeholder set a method was generated for is
//! exactly the set the runtime will substitute.
//!
//! Syntax: `{token}` is a placeholder, `{{` and `}}` are literal braces, and a
//! lone `}` is literal text. An unterminated `{` or a `{` nested inside a
//! placeholder is a syntax error.

use thiserror::Error;

/// A lexical piece of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text to copy verbatim.
    Text(&'a str),
    /// A `{...}` placeholder.
    Placeholder {
        /// Content between the braces with surrounding whitespace trimmed.
        token: &'a str,
        /// The placeholder exactly as written, braces included.
        raw: &'a str,
    },
}

/// Template text that cannot be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateSyntaxError {
    /// A `{` with no closing `}`.
    #[error("unterminated placeholder `{fragment}`")]
    Unterminated {
        /// Text from the opening brace to the end of the template.
        fragment: String,
    },
    /// A `{` opened inside another placeholder.
    #[error("nested `{{` inside placeholder `{fragment}`")]
    Nested {
        /// Text from the outer opening brace through the nested one.
        fragment: String,
    },
}

/// Split `template` into literal text and placeholders.
///
/// # Errors
///
/// Returns [`TemplateSyntaxError`] when a placeholder is unterminated or
/// contains a nested `{`.
///
/// # Examples
///
/// ```rust
/// use kotoba::runtime::template::{Segment, tokenize};
///
/// let segments = tokenize("Hi {name}, {{literal}}").expect("valid template");
/// assert_eq!(
///     segments,
///     [
///         Segment::Text("Hi "),
///         Segment::Placeholder { token: "name", raw: "{name}" },
///         Segment::Text(", "),
///         Segment::Text("{"),
///         Segment::Text("literal"),
///         Segment::Text("}"),
///     ]
/// );
/// ```
pub fn tokenize(template: &str) -> Result<Vec<Segment<'_>>, TemplateSyntaxError> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut chars = template.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        let doubled = chars.peek().is_some_and(|&(_, next)| next == ch);
        match ch {
            '{' | '}' if doubled => {
                push_text(&mut segments, template, literal_start, idx);
                push_text(&mut segments, template, idx, idx + 1);
                chars.next();
                literal_start = idx + 2;
            }
            '{' => {
                push_text(&mut segments, template, literal_start, idx);
                let close = find_close(template, idx)?;
                let raw = template.get(idx..=close).unwrap_or_default();
                let token = template
                    .get(idx + 1..close)
                    .unwrap_or_default()
                    .trim_matches(|c: char| c.is_ascii_whitespace());
                segments.push(Segment::Placeholder { token, raw });
                while chars.next_if(|&(next_idx, _)| next_idx <= close).is_some() {}
                literal_start = close + 1;
            }
            _ => {}
        }
    }
    push_text(&mut segments, template, literal_start, template.len());
    Ok(segments)
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, template: &'a str, start: usize, end: usize) {
    if start < end
        && let Some(text) = template.get(start..end)
    {
        segments.push(Segment::Text(text));
    }
}

/// Byte offset of the `}` closing the placeholder opened at `open`.
fn find_close(template: &str, open: usize) -> Result<usize, TemplateSyntaxError> {
    let body = template.get(open + 1..).unwrap_or_default();
    match body.find(['{', '}']) {
        Some(offset) if body.get(offset..).is_some_and(|rest| rest.starts_with('}')) => {
            Ok(open + 1 + offset)
        }
        Some(offset) => Err(TemplateSyntaxError::Nested {
            fragment: template
                .get(open..=open + 1 + offset)
                .unwrap_or_default()
                .to_owned(),
        }),
        None => Err(TemplateSyntaxError::Unterminated {
            fragment: template.get(open..).unwrap_or_default().to_owned(),
        }),
    }
}
