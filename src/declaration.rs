//! The `kotoba.yml` declaration listing the bundles to generate.
//!
//! ```yaml
//! kotoba_version: "1.0.0"
//! bundles:
//!   - name: greetings
//!     dir: locales
//!     output: src/greetings.rs
//!     method_case: camel
//! ```
//!
//! Relative `dir` and `output` paths are interpreted against the directory
//! holding the declaration file.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use std::collections::HashSet;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use miette::{Diagnostic, NamedSource, SourceSpan};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

use crate::codegen::CodegenOptions;
use crate::model::naming::{self, MethodCase};
use crate::model::{DeclaredMode, ModelOptions};

/// File name looked up when no declaration path is given.
pub const DEFAULT_DECLARATION: &str = "kotoba.yml";

/// Highest declaration format major version this build understands.
pub const SUPPORTED_MAJOR: u64 = 1;

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    /// Declaration format version.
    pub kotoba_version: Version,
    /// Bundles to generate, in declaration order.
    pub bundles: Vec<BundleDeclaration>,
}

/// One bundle entry of a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleDeclaration {
    /// Bundle base name; catalogs are `<name>.properties` and
    /// `<name>_<locale>.properties`.
    pub name: String,
    /// Directory holding the catalogs.
    pub dir: Utf8PathBuf,
    /// Generated Rust file.
    pub output: Utf8PathBuf,
    /// Generated struct name; defaults to the bundle name in `PascalCase`.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Placeholder mode every template must use.
    #[serde(default)]
    pub mode: Option<DeclaredMode>,
    /// Case of generated method and parameter names.
    #[serde(default)]
    pub method_case: MethodCase,
    /// Whether the accessor embeds its catalogs.
    #[serde(default = "default_embed")]
    pub embed: bool,
}

const fn default_embed() -> bool {
    true
}

impl BundleDeclaration {
    /// Options for the key model builder.
    #[must_use]
    pub const fn model_options(&self) -> ModelOptions {
        ModelOptions {
            mode: self.mode,
            method_case: self.method_case,
        }
    }

    /// Options for the code generator.
    #[must_use]
    pub fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            type_name: self
                .type_name
                .clone()
                .unwrap_or_else(|| naming::type_name(&self.name)),
            embed: self.embed,
        }
    }
}

/// Failure to read or validate a declaration.
#[derive(Debug, Error, Diagnostic)]
pub enum DeclarationError {
    /// The declaration file could not be read.
    #[error("failed to read declaration {path}")]
    #[diagnostic(code(kotoba::declaration::io))]
    Io {
        /// Declaration path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The declaration is not valid YAML for the expected schema.
    #[error("failed to parse declaration {name}")]
    #[diagnostic(code(kotoba::declaration::parse))]
    Parse {
        /// Label of the declaration source.
        name: String,
        /// Located YAML diagnostic.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
    /// The declaration requires a newer format than this build supports.
    #[error("declaration version {found} is not supported; this kotoba reads version {supported}.x")]
    #[diagnostic(code(kotoba::declaration::version))]
    UnsupportedVersion {
        /// Version found in the declaration.
        found: Version,
        /// Supported major version.
        supported: u64,
    },
    /// The declaration lists no bundles.
    #[error("declaration lists no bundles")]
    #[diagnostic(code(kotoba::declaration::empty))]
    NoBundles,
    /// A bundle name cannot be used in catalog file names.
    #[error("invalid bundle name `{name}`")]
    #[diagnostic(
        code(kotoba::declaration::bundle_name),
        help("bundle names use ASCII letters, digits, `_` and `-`")
    )]
    InvalidBundleName {
        /// Offending name.
        name: String,
    },
    /// A type name is not a Rust identifier.
    #[error("bundle `{bundle}`: `{type_name}` is not a valid Rust type name")]
    #[diagnostic(code(kotoba::declaration::type_name))]
    InvalidTypeName {
        /// Bundle name.
        bundle: String,
        /// Offending type name.
        type_name: String,
    },
    /// Two entries declare the same bundle.
    #[error("bundle `{name}` is declared more than once")]
    #[diagnostic(code(kotoba::declaration::duplicate_bundle))]
    DuplicateBundle {
        /// Repeated bundle name.
        name: String,
    },
    /// Two bundles write the same output file.
    #[error("bundles `{first}` and `{second}` both write {output}")]
    #[diagnostic(code(kotoba::declaration::duplicate_output))]
    DuplicateOutput {
        /// Shared output path.
        output: Utf8PathBuf,
        /// First bundle.
        first: String,
        /// Second bundle.
        second: String,
    },
}

impl Declaration {
    /// Parse and validate declaration `yaml`; `name` labels it in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::Parse`] for malformed YAML or unknown
    /// fields, and the validation variants of [`DeclarationError`] for
    /// unsupported versions, invalid names and duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kotoba::declaration::Declaration;
    ///
    /// let yaml = "kotoba_version: 1.0.0\nbundles:\n  - name: app\n    dir: i18n\n    output: src/app.rs\n";
    /// let decl = Declaration::from_str_named(yaml, "kotoba.yml").expect("valid declaration");
    /// assert_eq!(decl.bundles[0].codegen_options().type_name, "App");
    /// assert!(decl.bundles[0].embed);
    /// ```
    pub fn from_str_named(yaml: &str, name: &str) -> Result<Self, DeclarationError> {
        let decl: Self = serde_saphyr::from_str(yaml).map_err(|err| DeclarationError::Parse {
            name: name.to_owned(),
            source: map_yaml_error(err, yaml, name),
        })?;
        decl.validate()?;
        Ok(decl)
    }

    /// Read, parse and validate the declaration at `path`, resolving bundle
    /// paths against its directory.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::Io`] when the file cannot be read, and any
    /// error of [`Declaration::from_str_named`].
    pub fn load(path: &Utf8Path) -> Result<Self, DeclarationError> {
        let io_error = |source| DeclarationError::Io {
            path: path.to_owned(),
            source,
        };
        let base = path.parent().unwrap_or_else(|| Utf8Path::new(""));
        let dir_path = if base.as_str().is_empty() {
            Utf8Path::new(".")
        } else {
            base
        };
        let file_name = path.file_name().unwrap_or(DEFAULT_DECLARATION);
        let dir = Dir::open_ambient_dir(dir_path, ambient_authority()).map_err(io_error)?;
        let yaml = dir.read_to_string(file_name).map_err(io_error)?;
        Ok(Self::from_str_named(&yaml, path.as_str())?.resolve_paths(base))
    }

    /// Rebase relative bundle paths onto `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Utf8Path) -> Self {
        for bundle in &mut self.bundles {
            bundle.dir = base.join(&bundle.dir);
            bundle.output = base.join(&bundle.output);
        }
        self
    }

    /// The bundle declared as `name`.
    #[must_use]
    pub fn bundle(&self, name: &str) -> Option<&BundleDeclaration> {
        self.bundles.iter().find(|bundle| bundle.name == name)
    }

    fn validate(&self) -> Result<(), DeclarationError> {
        if self.kotoba_version.major > SUPPORTED_MAJOR {
            return Err(DeclarationError::UnsupportedVersion {
                found: self.kotoba_version.clone(),
                supported: SUPPORTED_MAJOR,
            });
        }
        if self.bundles.is_empty() {
            return Err(DeclarationError::NoBundles);
        }
        let mut names = HashSet::new();
        for (idx, bundle) in self.bundles.iter().enumerate() {
            if !is_bundle_name(&bundle.name) {
                return Err(DeclarationError::InvalidBundleName {
                    name: bundle.name.clone(),
                });
            }
            if let Some(type_name) = &bundle.type_name
                && !naming::is_type_identifier(type_name)
            {
                return Err(DeclarationError::InvalidTypeName {
                    bundle: bundle.name.clone(),
                    type_name: type_name.clone(),
                });
            }
            if !names.insert(bundle.name.as_str()) {
                return Err(DeclarationError::DuplicateBundle {
                    name: bundle.name.clone(),
                });
            }
            if let Some(first) = self
                .bundles
                .iter()
                .take(idx)
                .find(|earlier| earlier.output == bundle.output)
            {
                return Err(DeclarationError::DuplicateOutput {
                    output: bundle.output.clone(),
                    first: first.name.clone(),
                    second: bundle.name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_bundle_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(kotoba::yaml::parse))]
struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

/// Byte offset of a one-based `serde_saphyr` line and column within `src`.
fn byte_index(src: &str, line: u64, column: u64) -> usize {
    let target_line = usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX);
    let target_column = usize::try_from(column.saturating_sub(1)).unwrap_or(usize::MAX);
    let mut offset = 0usize;
    for (idx, segment) in src.split_inclusive('\n').enumerate() {
        if idx == target_line {
            let line = segment.trim_end_matches(['\n', '\r']);
            let column_offset = line
                .char_indices()
                .nth(target_column)
                .map_or(line.len(), |(byte_idx, _)| byte_idx);
            return offset + column_offset;
        }
        offset += segment.len();
    }
    src.len()
}

fn tab_indented(src: &str, loc: Location) -> bool {
    let line_idx = usize::try_from(loc.line().saturating_sub(1)).unwrap_or(usize::MAX);
    src.lines().nth(line_idx).is_some_and(|line| {
        line.chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\t')
    })
}

fn map_yaml_error(
    err: YamlError,
    src: &str,
    name: &str,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let (line, column) = loc.map_or((1, 1), |l| (l.line(), l.column()));
    let span = loc.map(|l| {
        let at = byte_index(src, l.line(), l.column());
        let len = usize::from(at < src.len());
        SourceSpan::from((at, len))
    });
    let help = loc
        .filter(|l| tab_indented(src, *l))
        .map(|_| "use spaces for indentation; tabs are invalid in YAML".to_owned());
    Box::new(YamlDiagnostic {
        src: NamedSource::new(name, src.to_owned()),
        span,
        help,
        message: format!("YAML parse error at line {line}, column {column}: {err}"),
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VALID: &str = "\
kotoba_version: 1.2.0
bundles:
  - name: greetings
    dir: locales
    output: src/greetings.rs
    type_name: Hello
    mode: named
    method_case: camel
    embed: false
  - name: errors
    dir: locales
    output: src/errors.rs
";

    #[rstest]
    fn parses_every_field_and_defaults() {
        let decl = Declaration::from_str_named(VALID, "kotoba.yml").expect("valid");
        let greetings = decl.bundle("greetings").expect("declared");
        assert_eq!(greetings.codegen_options().type_name, "Hello");
        assert!(!greetings.embed);
        assert_eq!(
            greetings.model_options(),
            ModelOptions {
                mode: Some(DeclaredMode::Named),
                method_case: MethodCase::Camel,
            }
        );
        let errors = decl.bundle("errors").expect("declared");
        assert_eq!(errors.model_options(), ModelOptions::default());
        assert_eq!(errors.codegen_options().type_name, "Errors");
        assert!(errors.embed);
    }

    #[rstest]
    fn resolves_paths_against_declaration_directory() {
        let decl = Declaration::from_str_named(VALID, "kotoba.yml")
            .expect("valid")
            .resolve_paths(Utf8Path::new("/work/app"));
        let greetings = decl.bundle("greetings").expect("declared");
        assert_eq!(greetings.dir, "/work/app/locales");
        assert_eq!(greetings.output, "/work/app/src/greetings.rs");
    }

    #[rstest]
    #[case("kotoba_version: 2.0.0\nbundles: []\n", "version 2.0.0 is not supported")]
    #[case("kotoba_version: 1.0.0\nbundles: []\n", "no bundles")]
    #[case(
        "kotoba_version: 1.0.0\nbundles:\n  - {name: a/b, dir: x, output: y}\n",
        "invalid bundle name"
    )]
    #[case(
        "kotoba_version: 1.0.0\nbundles:\n  - {name: a, dir: x, output: y, type_name: \"9x\"}\n",
        "not a valid Rust type name"
    )]
    #[case(
        "kotoba_version: 1.0.0\nbundles:\n  - {name: a, dir: x, output: y}\n  - {name: a, dir: x, output: z}\n",
        "declared more than once"
    )]
    #[case(
        "kotoba_version: 1.0.0\nbundles:\n  - {name: a, dir: x, output: y}\n  - {name: b, dir: x, output: y}\n",
        "both write y"
    )]
    fn rejects_invalid_declarations(#[case] yaml: &str, #[case] expected: &str) {
        let err = Declaration::from_str_named(yaml, "kotoba.yml").expect_err("invalid");
        assert!(err.to_string().contains(expected), "unexpected error: {err}");
    }

    #[rstest]
    fn unknown_fields_are_parse_errors() {
        let yaml = "kotoba_version: 1.0.0\nbundles: []\nextra: true\n";
        let err = Declaration::from_str_named(yaml, "kotoba.yml").expect_err("unknown field");
        assert!(matches!(err, DeclarationError::Parse { .. }));
    }

    #[rstest]
    fn byte_index_handles_crlf_and_multibyte() {
        let src = "a: 1\r\nbé: 2\n";
        assert_eq!(byte_index(src, 2, 3), "a: 1\r\n".len() + "bé".len());
        assert_eq!(byte_index(src, 9, 1), src.len());
    }
}
