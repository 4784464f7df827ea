// @generated by kotoba from the `string` bundle. Do not edit by hand.
// Locales: default

/// Typed messages of the `string` bundle.
#[derive(Debug, Clone)]
pub struct String {
    bundle: ::kotoba::runtime::BundleHandle,
}

impl String {
    /// Bundle the accessors read from.
    pub const BUNDLE: &'static str = "string";

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
                    ("use.template", "Apply {template} now"),
                    ("a\nb", "Line {0}"),
                    ("smile", "😀 {name}"),
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
            "use.template",
            "a\nb",
            "smile",
        ]
    }

    /// `use.template`: "Apply {template} now"
    #[must_use]
    pub fn use_template(&self, locale: &str, template: impl ::std::fmt::Display) -> ::std::string::String {
        ::kotoba::runtime::format_named(
            &self.bundle.get_string(locale, "use.template"),
            &[("template", &template as &dyn ::std::fmt::Display)],
        )
    }

    /// `a\nb`: "Line {0}"
    #[must_use]
    pub fn a_b(&self, locale: &str, arg0: impl ::std::fmt::Display) -> ::std::string::String {
        ::kotoba::runtime::format_positional(
            &self.bundle.get_string(locale, "a\nb"),
            &[&arg0 as &dyn ::std::fmt::Display],
        )
    }

    /// `smile`: "😀 {name}"
    #[must_use]
    pub fn smile(&self, locale: &str, name: impl ::std::fmt::Display) -> ::std::string::String {
        ::kotoba::runtime::format_named(
            &self.bundle.get_string(locale, "smile"),
            &[("name", &name as &dyn ::std::fmt::Display)],
        )
    }
}
