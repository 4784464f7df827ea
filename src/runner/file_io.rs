//! File helpers for generated outputs.
//! Outputs are reached through capability directories and replaced
//! atomically, only when their content changes.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::io::{self, Write};
use tracing::debug;

/// What [`write_if_changed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum WriteOutcome {
    /// The file was created or replaced.
    Written,
    /// The file already held the content.
    Unchanged,
}

fn split_output(path: &Utf8Path) -> Result<(&Utf8Path, &str)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("output path {path} does not name a file"))?;
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, file_name))
}

/// Current content of `path`, or `None` when it does not exist.
pub(super) fn read_existing(path: &Utf8Path) -> Result<Option<String>> {
    let (parent, file_name) = split_output(path)?;
    let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).with_context(|| format!("failed to open {parent}")),
    };
    match dir.read_to_string(file_name) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read {path}")),
    }
}

/// Open the closest existing ancestor of `path` and the remainder below it.
fn nearest_existing_ancestor(path: &Utf8Path) -> Result<(Dir, Utf8PathBuf)> {
    if path.is_relative() {
        let dir = Dir::open_ambient_dir(".", ambient_authority())
            .context("failed to open the working directory")?;
        return Ok((dir, path.to_owned()));
    }
    let (base, dir) = path
        .ancestors()
        .find_map(|candidate| {
            Dir::open_ambient_dir(candidate, ambient_authority())
                .ok()
                .map(|dir| (candidate, dir))
        })
        .ok_or_else(|| anyhow!("no existing ancestor of {path}"))?;
    let relative = path
        .strip_prefix(base)
        .with_context(|| format!("{path} is not below {base}"))?
        .to_owned();
    Ok((dir, relative))
}

/// Open `parent`, creating it and any missing ancestors.
fn open_parent(parent: &Utf8Path) -> Result<Dir> {
    let (base, relative) = nearest_existing_ancestor(parent)?;
    if relative.as_str().is_empty() {
        return Ok(base);
    }
    base.create_dir_all(&relative)
        .with_context(|| format!("failed to create parent directory {parent}"))?;
    base.open_dir(&relative)
        .with_context(|| format!("failed to open {parent}"))
}

fn write_synced(dir: &Dir, file_name: &str, content: &str) -> io::Result<()> {
    let mut file = dir.create(file_name)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.sync_all()
}

/// Replace `path` with `content` through a sibling temporary file, leaving
/// it untouched when it already matches.
pub(super) fn write_if_changed(path: &Utf8Path, content: &str) -> Result<WriteOutcome> {
    if read_existing(path)?.as_deref() == Some(content) {
        return Ok(WriteOutcome::Unchanged);
    }
    let (parent, file_name) = split_output(path)?;
    let dir = open_parent(parent)?;
    let staging = format!(".{file_name}.kotoba-{}.tmp", std::process::id());
    let replaced = write_synced(&dir, &staging, content)
        .and_then(|()| dir.rename(&staging, &dir, file_name));
    if let Err(err) = replaced {
        if let Err(cleanup) = dir.remove_file(&staging) {
            debug!("leaving {staging} in {parent}: {cleanup}");
        }
        return Err(err).with_context(|| format!("failed to replace {path}"));
    }
    Ok(WriteOutcome::Written)
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Write `content` to stdout, treating a closed pipe as success.
pub(super) fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let result = stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush());
    match result {
        Err(err) if !is_broken_pipe(&err) => Err(err).context("failed to write to stdout"),
        _ => Ok(()),
    }
}
