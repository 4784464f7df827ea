//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! handles command execution. Every selected bundle is generated in memory
//! before anything is written, so a failing bundle leaves all outputs
//! untouched.

mod error;
mod file_io;

pub use error::RunnerError;

use crate::cli::{BundleArgs, Cli, Commands};
use crate::codegen::{self, GenerateError, Generated};
use crate::declaration::{BundleDeclaration, Declaration, DeclarationError};
use crate::model::AccessorSpec;
use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use file_io::WriteOutcome;
use itertools::Itertools;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use serde::Serialize;
use tracing::{debug, info};

/// Execute the parsed [`Cli`] commands.
///
/// # Errors
///
/// Returns an error if the declaration cannot be loaded, a bundle fails to
/// generate, an output cannot be written, or `check` finds stale outputs.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Generate(BundleArgs::default()));
    let declaration = load_declaration(cli)?;
    match command {
        Commands::Generate(args) => handle_generate(&declaration, &args),
        Commands::Check(args) => handle_check(&declaration, &args),
        Commands::Describe(args) => handle_describe(&declaration, &args),
    }
}

/// Render `err` for the terminal, using the graphical `miette` report when
/// the chain carries one of the crate's diagnostics.
#[must_use]
pub fn render_error(err: &anyhow::Error) -> String {
    let diagnostic = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<GenerateError>()
            .map(|diag| diag as &dyn Diagnostic)
            .or_else(|| {
                cause
                    .downcast_ref::<DeclarationError>()
                    .map(|diag| diag as &dyn Diagnostic)
            })
            .or_else(|| {
                cause
                    .downcast_ref::<RunnerError>()
                    .map(|diag| diag as &dyn Diagnostic)
            })
    });
    let mut rendered = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    match diagnostic {
        Some(diag) if handler.render_report(&mut rendered, diag).is_ok() => {
            format!("{err}\n{rendered}")
        }
        _ => format!("{err:?}"),
    }
}

/// Determine the declaration path respecting the CLI's directory option.
fn resolve_declaration_path(cli: &Cli) -> Result<Utf8PathBuf> {
    let file = Utf8PathBuf::from_path_buf(cli.file.clone())
        .map_err(|path| anyhow!("declaration path {} is not valid UTF-8", path.display()))?;
    let Some(dir) = &cli.directory else {
        return Ok(file);
    };
    let base = Utf8PathBuf::from_path_buf(dir.clone())
        .map_err(|path| anyhow!("directory {} is not valid UTF-8", path.display()))?;
    Ok(base.join(file))
}

fn load_declaration(cli: &Cli) -> Result<Declaration> {
    let path = resolve_declaration_path(cli)?;
    if !path.is_file() {
        return Err(RunnerError::DeclarationNotFound { path }.into());
    }
    let declaration =
        Declaration::load(&path).with_context(|| format!("loading declaration {path}"))?;
    debug!(
        path = %path,
        bundles = declaration.bundles.len(),
        "loaded declaration"
    );
    Ok(declaration)
}

fn select<'a>(declaration: &'a Declaration, args: &BundleArgs) -> Result<Vec<&'a BundleDeclaration>> {
    let Some(name) = &args.bundle else {
        return Ok(declaration.bundles.iter().collect());
    };
    declaration.bundle(name).map(|bundle| vec![bundle]).ok_or_else(|| {
        RunnerError::UnknownBundle {
            name: name.clone(),
            available: declaration.bundles.iter().map(|b| b.name.as_str()).join(", "),
        }
        .into()
    })
}

fn generate(declaration: &Declaration, bundle: &BundleDeclaration) -> Result<Generated> {
    let siblings: Vec<&str> = declaration
        .bundles
        .iter()
        .filter(|other| other.dir == bundle.dir && other.name != bundle.name)
        .map(|other| other.name.as_str())
        .collect();
    codegen::generate_bundle_among(
        &bundle.dir,
        &bundle.name,
        &siblings,
        &bundle.model_options(),
        &bundle.codegen_options(),
    )
    .with_context(|| format!("generating bundle `{}`", bundle.name))
}

fn generate_selected<'a>(
    declaration: &'a Declaration,
    args: &BundleArgs,
) -> Result<Vec<(&'a BundleDeclaration, Generated)>> {
    select(declaration, args)?
        .into_iter()
        .map(|bundle| generate(declaration, bundle).map(|generated| (bundle, generated)))
        .collect()
}

fn handle_generate(declaration: &Declaration, args: &BundleArgs) -> Result<()> {
    for (bundle, generated) in generate_selected(declaration, args)? {
        match file_io::write_if_changed(&bundle.output, &generated.source)? {
            WriteOutcome::Written => {
                info!(bundle = %bundle.name, "Generated accessor at {}", bundle.output);
            }
            WriteOutcome::Unchanged => {
                debug!(bundle = %bundle.name, "{} is up to date", bundle.output);
            }
        }
    }
    Ok(())
}

fn handle_check(declaration: &Declaration, args: &BundleArgs) -> Result<()> {
    let mut stale: Vec<&Utf8Path> = Vec::new();
    for (bundle, generated) in generate_selected(declaration, args)? {
        let current = file_io::read_existing(&bundle.output)?;
        if current.as_deref() == Some(generated.source.as_str()) {
            debug!(bundle = %bundle.name, "{} is up to date", bundle.output);
        } else {
            stale.push(&bundle.output);
        }
    }
    if stale.is_empty() {
        return Ok(());
    }
    Err(RunnerError::StaleOutputs {
        count: stale.len(),
        paths: stale.iter().join(", "),
    }
    .into())
}

/// JSON shape printed by `describe`.
#[derive(Debug, Serialize)]
struct BundleDescription<'a> {
    type_name: String,
    output: &'a Utf8Path,
    #[serde(flatten)]
    spec: &'a AccessorSpec,
}

fn handle_describe(declaration: &Declaration, args: &BundleArgs) -> Result<()> {
    let generated = generate_selected(declaration, args)?;
    let descriptions: Vec<BundleDescription<'_>> = generated
        .iter()
        .map(|(bundle, output)| BundleDescription {
            type_name: bundle.codegen_options().type_name,
            output: &bundle.output,
            spec: &output.spec,
        })
        .collect();
    let mut json =
        serde_json::to_string_pretty(&descriptions).context("serialising bundle descriptions")?;
    json.push('\n');
    file_io::write_stdout(&json)
}
