// @generated by kotoba from the `greetings` bundle. Do not edit by hand.
// Locales: default, fr, fr-CA

/// Typed messages of the `greetings` bundle.
#[derive(Debug, Clone)]
pub struct Greetings {
    bundle: ::kotoba::runtime::BundleHandle,
}

impl Greetings {
    /// Bundle the accessors read from.
    pub const BUNDLE: &'static str = "greetings";

    /// Accessors backed by `resolver`.
    #[must_use]
    pub fn new(resolver: ::std::sync::Arc<::kotoba::runtime::LocaleResolver>) -> Self {
        Self {
            bundle: ::kotoba::runtime::BundleHandle::new(resolver, Self::BUNDLE),
        }
    }

    /// Accessors backed by the catalogs captured when this file was generated.
    #[must_use]
    pub fn embedded() -> Self {
        static CATALOGS: &[::kotoba::runtime::EmbeddedCatalog] = &[
            ::kotoba::runtime::EmbeddedCatalog {
                locale: ::std::option::Option::None,
                entries: &[
                    ("welcome.message", "Hello {0} {1}"),
                    ("goodbye.message", "Goodbye {0}"),
                    ("user.greeting", "Dear {firstName} {lastName}"),
                    ("app.title", "Kotoba"),
                ],
            },
            ::kotoba::runtime::EmbeddedCatalog {
                locale: ::std::option::Option::Some("fr"),
                entries: &[
                    ("welcome.message", "Bonjour {1} {0}"),
                    ("goodbye.message", "Au revoir {0}"),
                    ("user.greeting", "Cher {lastName} {firstName}"),
                ],
            },
            ::kotoba::runtime::EmbeddedCatalog {
                locale: ::std::option::Option::Some("fr-CA"),
                entries: &[
                    ("goodbye.message", "Bye-bye {0}"),
                ],
            },
        ];
        static RESOLVER: ::std::sync::OnceLock<::std::sync::Arc<::kotoba::runtime::LocaleResolver>> =
            ::std::sync::OnceLock::new();
        let resolver = RESOLVER.get_or_init(|| {
            ::std::sync::Arc::new(::kotoba::runtime::LocaleResolver::new(
                ::kotoba::runtime::EmbeddedSource::new(Self::BUNDLE, CATALOGS),
            ))
        });
        Self::new(::std::sync::Arc::clone(resolver))
    }

    /// The underlying bundle handle.
    #[must_use]
    pub const fn handle(&self) -> &::kotoba::runtime::BundleHandle {
        &self.bundle
    }

    /// Every message key, in default-catalog order.
    #[must_use]
    pub const fn keys() -> &'static [&'static str] {
        &[
            "welcome.message",
            "goodbye.message",
            "user.greeting",
            "app.title",
        ]
    }

    /// `welcome.message`: "Hello {0} {1}"
    #[must_use]
    pub fn welcome_message(&self, locale: &str, arg0: impl ::std::fmt::Display, arg1: impl ::std::fmt::Display) -> ::std::string::String {
        ::kotoba::runtime::format_positional(
            &self.bundle.get_string(locale, "welcome.message"),
            &[&arg0 as &dyn ::std::fmt::Display, &arg1 as &dyn ::std::fmt::Display],
        )
    }

    /// `goodbye.message`: "Goodbye {0}"
    #[must_use]
    pub fn goodbye_message(&self, locale: &str, arg0: impl ::std::fmt::Display) -> ::std::string::String {
        ::kotoba::runtime::format_positional(
            &self.bundle.get_string(locale, "goodbye.message"),
            &[&arg0 as &dyn ::std::fmt::Display],
        )
    }

    /// `user.greeting`: "Dear {firstName} {lastName}"
    #[must_use]
    pub fn user_greeting(&self, locale: &str, first_name: impl ::std::fmt::Display, last_name: impl ::std::fmt::Display) -> ::std::string::String {
        ::kotoba::runtime::format_named(
            &self.bundle.get_string(locale, "user.greeting"),
            &[("firstName", &first_name as &dyn ::std::fmt::Display), ("lastName", &last_name as &dyn ::std::fmt::Display)],
        )
    }

    /// `app.title`: "Kotoba"
    #[must_use]
    pub fn app_title(&self, locale: &str) -> ::std::string::String {
        ::kotoba::runtime::format_positional(
            &self.bundle.get_string(locale, "app.title"),
            &[],
        )
    }
}
