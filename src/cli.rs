//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::declaration::DEFAULT_DECLARATION;

/// Generates strongly typed Rust accessors from properties message catalogs.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the declaration file to use.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_DECLARATION)]
    pub file: PathBuf,

    /// Change to this directory before doing anything.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse command-line arguments, providing `generate` as the default
    /// command.
    #[must_use]
    pub fn parse_with_default() -> Self {
        Self::parse().with_default_command()
    }

    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Generate(BundleArgs::default()));
        }
        self
    }
}

/// Bundle selection shared by every command.
#[derive(Debug, Args, PartialEq, Eq, Clone, Default)]
pub struct BundleArgs {
    /// Only process this bundle; every declared bundle when omitted.
    #[arg(long, value_name = "NAME")]
    pub bundle: Option<String>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Generate accessors and write every changed output file (default).
    Generate(BundleArgs),

    /// Fail when any generated output on disk is out of date; writes nothing.
    Check(BundleArgs),

    /// Print the validated key model of each bundle as JSON.
    Describe(BundleArgs),
}
