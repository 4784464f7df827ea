//! End-to-end tests of catalog loading, validation and generation.

use anyhow::{Result, bail, ensure};
use kotoba::catalog::CatalogError;
use kotoba::codegen::{CodegenOptions, GenerateError, generate_bundle};
use kotoba::model::{DeclaredMode, Mismatch, MethodCase, ModelOptions, ValidationError};
use rstest::rstest;
use test_support::{CatalogWorkspace, GREETINGS_DEFAULT, GREETINGS_FR};

fn generate_in(
    ws: &CatalogWorkspace,
    options: &ModelOptions,
) -> Result<kotoba::codegen::Generated, GenerateError> {
    generate_bundle(
        &ws.root().join("locales"),
        "greetings",
        options,
        &CodegenOptions::for_bundle("greetings"),
    )
}

#[rstest]
fn every_problem_is_reported_in_one_pass() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog(
        "locales",
        "greetings",
        None,
        "mixed = {0} and {name}\nbroken = {0\nok = Hi {0}\nuser.name = a\nuserName = b\n",
    )?;
    ws.catalog("locales", "greetings", Some("fr"), "ok = Salut {0} {1}\n")?;

    let Err(GenerateError::Validation(report)) = generate_in(&ws, &ModelOptions::default())
    else {
        bail!("expected a validation failure");
    };
    ensure!(report.bundle == "greetings");
    ensure!(report.errors.len() == 4, "got {:#?}", report.errors);
    ensure!(matches!(
        report.errors.first(),
        Some(ValidationError::InconsistentPlaceholderMode { key, .. }) if key == "mixed"
    ));
    ensure!(matches!(
        report.errors.get(1),
        Some(ValidationError::MalformedPlaceholder { key, .. }) if key == "broken"
    ));
    ensure!(matches!(
        report.errors.get(2),
        Some(ValidationError::MethodNameCollision { first_key, second_key, .. })
            if first_key == "user.name" && second_key == "userName"
    ));
    ensure!(matches!(
        report.errors.get(3),
        Some(ValidationError::LocaleInconsistency {
            locale,
            key,
            mismatch: Mismatch::IndexOutOfRange { indices, arity: 1 },
            ..
        }) if locale == "fr" && key == "ok" && indices == &[1]
    ));
    Ok(())
}

#[rstest]
fn variant_with_unknown_name_is_rejected() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, "user.greeting = Dear {firstName}\n")?;
    ws.catalog(
        "locales",
        "greetings",
        Some("fr"),
        "user.greeting = Cher {nom} {firstName} {titre}\n",
    )?;

    let Err(GenerateError::Validation(report)) = generate_in(&ws, &ModelOptions::default())
    else {
        bail!("expected a validation failure");
    };
    ensure!(matches!(
        report.errors.as_slice(),
        [ValidationError::LocaleInconsistency {
            mismatch: Mismatch::UnknownName { names },
            ..
        }] if names == &["nom", "titre"]
    ));
    Ok(())
}

#[rstest]
fn missing_default_catalog_is_not_found() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", Some("fr"), GREETINGS_FR)?;

    let Err(GenerateError::Catalog(CatalogError::NotFound { bundle, file, .. })) =
        generate_in(&ws, &ModelOptions::default())
    else {
        bail!("expected a missing default catalog");
    };
    ensure!(bundle == "greetings");
    ensure!(file == "greetings.properties");
    Ok(())
}

#[rstest]
fn missing_directory_is_not_found() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ensure!(matches!(
        generate_in(&ws, &ModelOptions::default()),
        Err(GenerateError::Catalog(CatalogError::NotFound { .. }))
    ));
    Ok(())
}

#[rstest]
fn files_without_a_locale_suffix_are_skipped() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, GREETINGS_DEFAULT)?;
    ws.catalog("locales", "greetings", Some("backup"), "junk = {\n")?;
    ws.catalog("locales", "greetings", Some("fr"), GREETINGS_FR)?;
    ws.write("locales/other_fr.properties", "welcome.message = {9}\n")?;

    let generated = generate_in(&ws, &ModelOptions::default())?;
    ensure!(generated.spec.locales == ["fr"], "{:?}", generated.spec.locales);
    Ok(())
}

#[rstest]
fn two_spellings_of_one_locale_conflict() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, GREETINGS_DEFAULT)?;
    ws.catalog("locales", "greetings", Some("fr_CA"), "app.title = A\n")?;
    ws.catalog("locales", "greetings", Some("fr-CA"), "app.title = B\n")?;

    let Err(GenerateError::Catalog(CatalogError::DuplicateLocale { locale, .. })) =
        generate_in(&ws, &ModelOptions::default())
    else {
        bail!("expected a duplicate locale");
    };
    ensure!(locale == "fr-CA");
    Ok(())
}

#[rstest]
fn duplicate_key_points_at_both_lines() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, "a = 1\n# note\na = 2\n")?;

    let Err(GenerateError::Catalog(CatalogError::DuplicateKey {
        key,
        line,
        first_line,
        ..
    })) = generate_in(&ws, &ModelOptions::default())
    else {
        bail!("expected a duplicate key");
    };
    ensure!(key == "a" && line == 3 && first_line == 1);
    Ok(())
}

#[rstest]
#[case(MethodCase::Snake, "pub fn welcome_message(", "first_name: impl")]
#[case(MethodCase::Camel, "pub fn welcomeMessage(", "firstName: impl")]
fn method_case_shapes_identifiers(
    #[case] method_case: MethodCase,
    #[case] method: &str,
    #[case] parameter: &str,
) -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, GREETINGS_DEFAULT)?;
    let options = ModelOptions {
        method_case,
        ..ModelOptions::default()
    };

    let generated = generate_in(&ws, &options)?;
    ensure!(generated.source.contains(method), "{}", generated.source);
    ensure!(generated.source.contains(parameter), "{}", generated.source);
    Ok(())
}

#[rstest]
fn declared_mode_rejects_the_other_mode() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, GREETINGS_DEFAULT)?;
    let options = ModelOptions {
        mode: Some(DeclaredMode::Positional),
        ..ModelOptions::default()
    };

    let Err(GenerateError::Validation(report)) = generate_in(&ws, &options) else {
        bail!("expected a validation failure");
    };
    ensure!(matches!(
        report.errors.as_slice(),
        [ValidationError::InconsistentPlaceholderMode { key, .. }] if key == "user.greeting"
    ));
    Ok(())
}

#[rstest]
fn orphan_keys_do_not_fail_generation() -> Result<()> {
    let ws = CatalogWorkspace::new()?;
    ws.catalog("locales", "greetings", None, GREETINGS_DEFAULT)?;
    ws.catalog("locales", "greetings", Some("fr"), "extra.key = Oui\n")?;

    let generated = generate_in(&ws, &ModelOptions::default())?;
    ensure!(generated.spec.orphans.len() == 1);
    ensure!(
        !generated.source.contains("extra_key"),
        "orphans must not produce methods"
    );
    ensure!(generated.source.contains("(\"extra.key\", \"Oui\")"));
    Ok(())
}
