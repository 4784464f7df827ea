//! Reader for `key = value` properties files.
//!
//! Supports the classic properties grammar: `=`, `:` or whitespace
//! separators, `#` and `!` comment lines, trailing-backslash line
//! continuations, and the `\t \n \r \f \uXXXX` escapes. Entries are returned
//! in source order with the line on which each logical line started.

use thiserror::Error;

/// One `key = value` pair read from a properties file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unescaped key.
    pub key: String,
    /// Unescaped value.
    pub value: String,
    /// One-based line where the entry starts.
    pub line: usize,
}

/// Syntax error in a properties file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct PropertiesError {
    /// One-based line of the offending entry.
    pub line: usize,
    /// Description of the problem.
    pub message: String,
}

/// Parse properties `text` into entries, preserving source order.
///
/// Duplicate and empty keys are returned as-is; the catalog layer decides
/// whether they are acceptable.
///
/// # Errors
///
/// Returns [`PropertiesError`] for malformed `\u` escapes.
///
/// # Examples
///
/// ```rust
/// use kotoba::catalog::properties::parse;
///
/// let entries = parse("# greeting\nwelcome.message = Hello {0}\n").expect("valid");
/// assert_eq!(entries[0].key, "welcome.message");
/// assert_eq!(entries[0].value, "Hello {0}");
/// assert_eq!(entries[0].line, 2);
/// ```
pub fn parse(text: &str) -> Result<Vec<Entry>, PropertiesError> {
    let mut entries = Vec::new();
    let mut lines = text.lines().enumerate();
    while let Some((idx, raw)) = lines.next() {
        let line = raw.trim_start_matches(is_blank);
        if line.is_empty() || line.starts_with(['#', '!']) {
            continue;
        }
        let start = idx + 1;
        let mut logical = String::new();
        let mut current = line;
        loop {
            if let Some(stripped) = strip_continuation(current) {
                logical.push_str(stripped);
                match lines.next() {
                    Some((_, next)) => current = next.trim_start_matches(is_blank),
                    None => break,
                }
            } else {
                logical.push_str(current);
                break;
            }
        }
        entries.push(parse_logical(&logical, start)?);
    }
    Ok(entries)
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{c}')
}

/// Returns the line without its continuation backslash when it ends in an
/// odd number of backslashes.
fn strip_continuation(line: &str) -> Option<&str> {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        line.strip_suffix('\\')
    } else {
        None
    }
}

fn parse_logical(logical: &str, line: usize) -> Result<Entry, PropertiesError> {
    let mut key = String::new();
    let mut chars = logical.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escape(&mut key, &mut chars, line)?,
            '=' | ':' => break,
            c if is_blank(c) => {
                while chars.next_if(|&next| is_blank(next)).is_some() {}
                chars.next_if(|&next| next == '=' || next == ':');
                break;
            }
            c => key.push(c),
        }
    }
    while chars.next_if(|&next| is_blank(next)).is_some() {}
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            push_escape(&mut value, &mut chars, line)?;
        } else {
            value.push(c);
        }
    }
    Ok(Entry { key, value, line })
}

fn push_escape(
    out: &mut String,
    chars: &mut impl Iterator<Item = char>,
    line: usize,
) -> Result<(), PropertiesError> {
    let Some(escaped) = chars.next() else {
        return Ok(());
    };
    match escaped {
        't' => out.push('\t'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        'f' => out.push('\u{c}'),
        'u' => out.push(read_unicode_escape(chars, line)?),
        other => out.push(other),
    }
    Ok(())
}

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Decode the text after `\u`. A high surrogate must be followed by a
/// `\uXXXX` low surrogate; the pair decodes to one supplementary character.
fn read_unicode_escape(
    chars: &mut impl Iterator<Item = char>,
    line: usize,
) -> Result<char, PropertiesError> {
    let high = read_code_unit(chars, line)?;
    let unpaired = |code: u32| PropertiesError {
        line,
        message: format!("unpaired surrogate `\\u{code:04x}`"),
    };
    if !HIGH_SURROGATES.contains(&high) {
        return char::from_u32(high).ok_or_else(|| unpaired(high));
    }
    let low = match (chars.next(), chars.next()) {
        (Some('\\'), Some('u')) => read_code_unit(chars, line)?,
        _ => return Err(unpaired(high)),
    };
    if !LOW_SURROGATES.contains(&low) {
        return Err(unpaired(high));
    }
    let code = 0x1_0000 + ((high - 0xD800) << 10) + (low - 0xDC00);
    char::from_u32(code).ok_or_else(|| unpaired(high))
}

fn read_code_unit(
    chars: &mut impl Iterator<Item = char>,
    line: usize,
) -> Result<u32, PropertiesError> {
    let digits: String = chars.take(4).collect();
    let invalid = || PropertiesError {
        line,
        message: format!("malformed \\u escape `\\u{digits}`"),
    };
    if digits.chars().count() != 4 {
        return Err(invalid());
    }
    u32::from_str_radix(&digits, 16).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn single(text: &str) -> (String, String) {
        let entries = parse(text).expect("valid properties");
        assert_eq!(entries.len(), 1, "expected one entry in {text:?}");
        let entry = entries.into_iter().next().expect("one entry");
        (entry.key, entry.value)
    }

    #[rstest]
    #[case("a=b", "a", "b")]
    #[case("a = b", "a", "b")]
    #[case("a:b", "a", "b")]
    #[case("a b", "a", "b")]
    #[case("  a   =   b c  ", "a", "b c  ")]
    #[case("a", "a", "")]
    #[case("a=", "a", "")]
    #[case("a\\ b = c", "a b", "c")]
    #[case("a\\=b = c", "a=b", "c")]
    #[case("k = tab\\tnew\\nline", "k", "tab\tnew\nline")]
    #[case("k = caf\\u00e9", "k", "café")]
    #[case("k = \\ud83d\\ude00!", "k", "\u{1F600}!")]
    #[case("k = \\uD83D\\uDE00", "k", "😀")]
    #[case("k = a = b", "k", "a = b")]
    fn parses_single_entries(#[case] text: &str, #[case] key: &str, #[case] value: &str) {
        assert_eq!(single(text), (key.to_owned(), value.to_owned()));
    }

    #[rstest]
    fn skips_comments_and_blank_lines() {
        let entries = parse("# one\n! two\n\n   \na=1\n").expect("valid properties");
        assert_eq!(
            entries,
            [Entry {
                key: "a".into(),
                value: "1".into(),
                line: 5
            }]
        );
    }

    #[rstest]
    fn joins_continuation_lines() {
        let entries = parse("msg = Hello \\\n    {0} \\\n    world\nnext = x").expect("valid");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "Hello {0} world");
        assert_eq!(entries[0].line, 1);
        assert_eq!(entries[1].line, 4);
    }

    #[rstest]
    fn escaped_trailing_backslash_is_not_a_continuation() {
        let entries = parse("path = C:\\\\\nnext = y").expect("valid");
        assert_eq!(entries[0].value, "C:\\");
        assert_eq!(entries[1].key, "next");
    }

    #[rstest]
    fn preserves_source_order_and_duplicates() {
        let keys: Vec<_> = parse("b=1\na=2\nb=3")
            .expect("valid")
            .into_iter()
            .map(|entry| entry.key)
            .collect();
        assert_eq!(keys, ["b", "a", "b"]);
    }

    #[rstest]
    #[case("k = \\u12")]
    #[case("k = \\uzzzz")]
    #[case("k = \\ud800")]
    #[case("k = \\ud800x")]
    #[case("k = \\ud83d\\u0041")]
    #[case("k = \\ude00")]
    fn rejects_bad_unicode_escapes(#[case] text: &str) {
        let err = parse(text).expect_err("malformed escape");
        assert_eq!(err.line, 1);
    }
}
