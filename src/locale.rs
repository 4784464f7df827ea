//! Locale tag normalization shared by catalog discovery and runtime lookup.
//!
//! Catalog file names, declaration files and callers all spell locales in
//! slightly different ways (`fr_CA`, `fr-ca`, `fr_CA.UTF-8`). Everything is
//! funnelled through [`LocaleTag::parse`] so that discovery at generation time
//! and resolution at runtime agree on which catalog a tag refers to.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

/// Longest language subtag accepted in a catalog locale.
///
/// BCP 47 permits five to eight letter language subtags, but those collide
/// with bundle names such as `messages_extra_fr.properties`; only ISO 639
/// codes are accepted.
const MAX_LANGUAGE_LEN: usize = 3;

/// A validated, canonical BCP 47 locale tag such as `fr-CA`.
///
/// # Examples
///
/// ```rust
/// use kotoba::locale::LocaleTag;
///
/// let tag = LocaleTag::parse("fr_ca.UTF-8").expect("valid tag");
/// assert_eq!(tag.as_str(), "fr-CA");
/// assert_eq!(tag.file_suffix(), "fr_CA");
/// assert!(LocaleTag::parse("").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LocaleTag {
    id: LanguageIdentifier,
    tag: String,
}

impl LocaleTag {
    /// Normalize a raw locale string into a canonical tag.
    ///
    /// Encoding suffixes (`.UTF-8`) and `@variant` sections are stripped and
    /// underscores become hyphens. Returns `None` for empty input, the root
    /// locale `und`, or anything that is not a valid language identifier.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let stripped = raw.trim().split(['.', '@']).next().unwrap_or_default().trim();
        if stripped.is_empty() {
            return None;
        }
        let candidate = stripped.replace('_', "-");
        let id = LanguageIdentifier::from_str(&candidate).ok()?;
        let language = id.language.as_str();
        if language == "und" || language.len() > MAX_LANGUAGE_LEN {
            return None;
        }
        Some(Self::from_id(id))
    }

    fn from_id(id: LanguageIdentifier) -> Self {
        let tag = id.to_string();
        Self { id, tag }
    }

    /// Canonical hyphenated form, e.g. `zh-Hant-TW`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.tag
    }

    /// Form used in catalog file names, e.g. `zh_Hant_TW`.
    #[must_use]
    pub fn file_suffix(&self) -> String {
        self.tag.replace('-', "_")
    }

    /// Tags to try when resolving this locale, most specific first.
    ///
    /// ```rust
    /// use kotoba::locale::LocaleTag;
    ///
    /// let tag = LocaleTag::parse("zh-Hant-TW").expect("valid tag");
    /// let chain: Vec<String> = tag
    ///     .fallback_chain()
    ///     .iter()
    ///     .map(|t| t.as_str().to_owned())
    ///     .collect();
    /// assert_eq!(chain, ["zh-Hant-TW", "zh-Hant", "zh"]);
    /// ```
    #[must_use]
    pub fn fallback_chain(&self) -> Vec<Self> {
        let mut chain = vec![self.clone()];
        let mut current = self.id.clone();
        if current.variants().next().is_some() {
            current.clear_variants();
            push_distinct(&mut chain, current.clone());
        }
        if current.region.is_some() {
            current.region = None;
            push_distinct(&mut chain, current.clone());
        }
        if current.script.is_some() {
            current.script = None;
            push_distinct(&mut chain, current);
        }
        chain
    }
}

fn push_distinct(chain: &mut Vec<LocaleTag>, id: LanguageIdentifier) {
    let tag = LocaleTag::from_id(id);
    if !chain.contains(&tag) {
        chain.push(tag);
    }
}

impl PartialEq for LocaleTag {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for LocaleTag {}

impl Hash for LocaleTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
    }
}

impl PartialOrd for LocaleTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocaleTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag.cmp(&other.tag)
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}
