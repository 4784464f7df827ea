//! Running the built `kotoba` binary against a [`CatalogWorkspace`].

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;

use crate::CatalogWorkspace;

/// Outcome of one `kotoba` run.
#[derive(Debug)]
pub struct KotobaRun {
    /// Arguments the binary was started with, for failure messages.
    pub args: Vec<String>,
    /// Standard output: the `describe` JSON, otherwise empty.
    pub stdout: String,
    /// Diagnostics and logs.
    pub stderr: String,
    /// Whether the process exited successfully.
    pub success: bool,
}

impl KotobaRun {
    /// Fail unless the run succeeded, quoting its diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error holding stderr when the run failed.
    pub fn ensure_success(&self) -> Result<&Self> {
        ensure!(
            self.success,
            "kotoba {} failed:\n{}",
            self.args.join(" "),
            self.stderr
        );
        Ok(self)
    }

    /// Fail unless the run failed with diagnostics containing every one of
    /// `fragments`.
    ///
    /// # Errors
    ///
    /// Returns an error when the run succeeded or a fragment is missing.
    pub fn ensure_failure_mentioning(&self, fragments: &[&str]) -> Result<&Self> {
        ensure!(
            !self.success,
            "kotoba {} should have failed",
            self.args.join(" ")
        );
        for fragment in fragments {
            ensure!(
                self.stderr.contains(fragment),
                "kotoba {} did not mention `{fragment}`:\n{}",
                self.args.join(" "),
                self.stderr
            );
        }
        Ok(self)
    }
}

impl CatalogWorkspace {
    /// Run `kotoba` with `args` from the workspace root, where it finds the
    /// workspace's `kotoba.yml`.
    ///
    /// `NO_COLOR` keeps miette's diagnostics plain so tests can match on
    /// their text.
    ///
    /// # Errors
    ///
    /// Returns an error when the binary cannot be located or spawned.
    pub fn kotoba(&self, args: &[&str]) -> Result<KotobaRun> {
        let output = Command::cargo_bin("kotoba")
            .context("locate kotoba binary")?
            .current_dir(self.root())
            .env("NO_COLOR", "1")
            .args(args)
            .output()
            .with_context(|| format!("run kotoba {}", args.join(" ")))?;
        Ok(KotobaRun {
            args: args.iter().map(|&arg| arg.to_owned()).collect(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }

    /// Declare `bundles` as `(name, dir, output)` triples in `kotoba.yml`,
    /// replacing any existing declaration.
    ///
    /// # Errors
    ///
    /// Returns an error when the declaration cannot be written.
    pub fn declare(&self, bundles: &[(&str, &str, &str)]) -> Result<()> {
        let entries: String = bundles
            .iter()
            .map(|(name, dir, output)| {
                format!("  - name: {name}\n    dir: {dir}\n    output: {output}\n")
            })
            .collect();
        self.write(
            "kotoba.yml",
            &crate::declaration_yaml(&format!("bundles:\n{entries}")),
        )?;
        Ok(())
    }
}
