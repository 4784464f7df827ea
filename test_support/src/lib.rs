//! Test utilities for catalog fixtures and CLI runs.
//!
//! [`CatalogWorkspace`] lays out catalogs and declarations in a temporary
//! directory; [`CatalogWorkspace::kotoba`] runs the built binary in it and
//! returns a [`KotobaRun`].

pub mod cli;
pub mod workspace;

pub use cli::KotobaRun;
pub use workspace::CatalogWorkspace;

/// Default catalog of the `greetings` bundle used across the test suites.
pub const GREETINGS_DEFAULT: &str = "\
# Default (English) messages
welcome.message = Hello {0} {1}
goodbye.message = Goodbye {0}
user.greeting = Dear {firstName} {lastName}
app.title = Kotoba
";

/// French variant of `greetings`: reorders arguments and omits a key.
pub const GREETINGS_FR: &str = "\
welcome.message = Bonjour {1} {0}
goodbye.message = Au revoir {0}
user.greeting = Cher {lastName} {firstName}
";

/// Canadian French variant of `greetings` overriding a single key.
pub const GREETINGS_FR_CA: &str = "\
goodbye.message = Bye-bye {0}
";

/// Prefix `body` with the declaration version header.
///
/// ```rust
/// assert!(test_support::declaration_yaml("bundles: []\n").starts_with("kotoba_version"));
/// ```
#[must_use]
pub fn declaration_yaml(body: &str) -> String {
    format!("kotoba_version: 1.0.0\n{body}")
}
