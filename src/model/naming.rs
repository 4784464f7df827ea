//! Identifier derivation for generated methods, parameters and types.
//!
//! Keys are split on `.` and every segment is further split into words at
//! non-alphanumeric characters and case boundaries, so `user.firstName`,
//! `user.first_name` and `user.first-name` all yield the words
//! `user first name`. Words are then joined in the requested case.

use serde::{Deserialize, Serialize};

/// Case used for generated method and parameter names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodCase {
    /// `welcome_message`.
    #[default]
    Snake,
    /// `welcomeMessage`.
    Camel,
}

/// Rust keywords usable as raw identifiers.
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Primitive types the generated source names unqualified.
const PRIMITIVE_TYPES: &[&str] = &[
    "bool", "char", "str", "f32", "f64", "i8", "i16", "i32", "i64", "i128", "isize", "u8",
    "u16", "u32", "u64", "u128", "usize",
];

/// Associated items every generated accessor defines itself.
pub const RESERVED_METHODS: &[&str] = &["new", "embedded", "keys", "handle"];

/// Name of the locale parameter every generated method takes first.
pub const LOCALE_PARAM: &str = "locale";

/// Split `text` into lowercase words.
///
/// ```rust
/// use kotoba::model::naming::split_words;
///
/// assert_eq!(split_words("welcome.message"), ["welcome", "message"]);
/// assert_eq!(split_words("HTTPError-page2"), ["http", "error", "page2"]);
/// ```
#[must_use]
pub fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (idx, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            flush(&mut words, &mut current);
            continue;
        }
        let prev = idx.checked_sub(1).and_then(|p| chars.get(p)).copied();
        let next = chars.get(idx + 1).copied();
        let boundary = c.is_ascii_uppercase()
            && prev.is_some_and(|p| {
                p.is_ascii_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase()))
            });
        if boundary {
            flush(&mut words, &mut current);
        }
        current.push(c.to_ascii_lowercase());
    }
    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

fn join_words(words: &[String], case: MethodCase) -> String {
    match case {
        MethodCase::Snake => words.join("_"),
        MethodCase::Camel => words
            .iter()
            .enumerate()
            .map(|(idx, word)| if idx == 0 { word.clone() } else { capitalize(word) })
            .collect(),
    }
}

/// Turn a word sequence into an identifier, guarding leading digits and
/// empty input.
fn identifier(words: &[String], case: MethodCase, empty: &str) -> String {
    let joined = join_words(words, case);
    if joined.is_empty() {
        empty.to_owned()
    } else if joined.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{joined}")
    } else {
        joined
    }
}

/// Make `name` usable as an identifier in generated code.
///
/// Keywords become raw identifiers where Rust permits it; otherwise, and for
/// names in `reserved`, a trailing underscore is appended.
#[must_use]
pub fn escape_identifier(name: &str, reserved: &[&str]) -> String {
    if NON_RAW_KEYWORDS.contains(&name) || reserved.contains(&name) {
        format!("{name}_")
    } else if RAW_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_owned()
    }
}

/// Derive the generated method name for a message key.
///
/// ```rust
/// use kotoba::model::naming::{MethodCase, method_name};
///
/// assert_eq!(method_name("welcome.message", MethodCase::Camel), "welcomeMessage");
/// assert_eq!(method_name("welcome.message", MethodCase::Snake), "welcome_message");
/// assert_eq!(method_name("type", MethodCase::Snake), "r#type");
/// assert_eq!(method_name("new", MethodCase::Snake), "new_");
/// assert_eq!(method_name("404.title", MethodCase::Snake), "_404_title");
/// ```
#[must_use]
pub fn method_name(key: &str, case: MethodCase) -> String {
    let words: Vec<String> = key.split('.').flat_map(split_words).collect();
    escape_identifier(&identifier(&words, case, "message"), RESERVED_METHODS)
}

/// Derive the parameter name for a named placeholder.
///
/// ```rust
/// use kotoba::model::naming::{MethodCase, parameter_name};
///
/// assert_eq!(parameter_name("firstName", MethodCase::Snake), "first_name");
/// assert_eq!(parameter_name("first_name", MethodCase::Camel), "firstName");
/// assert_eq!(parameter_name("locale", MethodCase::Snake), "locale_");
/// ```
#[must_use]
pub fn parameter_name(placeholder: &str, case: MethodCase) -> String {
    let words = split_words(placeholder);
    escape_identifier(&identifier(&words, case, "value"), &[LOCALE_PARAM])
}

/// Parameter name for positional index `index`.
#[must_use]
pub fn positional_parameter(index: usize) -> String {
    format!("arg{index}")
}

/// Default accessor type name for a bundle: `PascalCase(bundle)`.
///
/// ```rust
/// use kotoba::model::naming::type_name;
///
/// assert_eq!(type_name("greetings"), "Greetings");
/// assert_eq!(type_name("error-messages"), "ErrorMessages");
/// assert_eq!(type_name("2fa"), "Messages2fa");
/// ```
#[must_use]
pub fn type_name(bundle: &str) -> String {
    let pascal: String = split_words(bundle).iter().map(|word| capitalize(word)).collect();
    if pascal.is_empty() {
        "Messages".to_owned()
    } else if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Messages{pascal}")
    } else {
        pascal
    }
}

/// Whether `name` is a plain Rust identifier suitable for a type name.
#[must_use]
pub fn is_type_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RAW_KEYWORDS.contains(&name)
        && !NON_RAW_KEYWORDS.contains(&name)
        && !PRIMITIVE_TYPES.contains(&name)
}
