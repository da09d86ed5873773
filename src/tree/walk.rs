//! Recursive descent over open directory handles.

use std::ffi::OsStr;
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use termcolor::WriteColor;
use thiserror::Error;

use super::{list_entries, Config, EntryKind, PrefixStack};
use crate::render;

/// Failure that unwinds the walk of one root.
///
/// Per-entry problems (a child that cannot be statted, a subdirectory that
/// cannot be opened, an unreadable link target) are stderr diagnostics, not
/// errors. Only a directory stream that cannot be enumerated or a sink that
/// stops accepting output ends the walk early.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The directory stream could not be opened or read.
    #[error("cannot enumerate directory contents at level {level}: {source}")]
    Enumerate { level: usize, source: io::Error },
    /// Writing a rendered line to the sink failed.
    #[error("cannot write to output: {0}")]
    Output(#[from] io::Error),
}

/// Name globs whose matching directories are rendered but never entered.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    globs: GlobSet,
    patterns: Vec<String>,
}

impl ExcludeSet {
    /// A set matching nothing.
    pub fn empty() -> Self {
        Self {
            globs: GlobSet::empty(),
            patterns: Vec::new(),
        }
    }

    /// Compile `--exclude` values. Pieces are trimmed, empty pieces dropped,
    /// duplicates warned about and stored once. A malformed glob is an error,
    /// as is a flag that carried nothing usable.
    pub fn build(raw: &[String]) -> anyhow::Result<Self> {
        let mut patterns: Vec<String> = Vec::new();
        for piece in raw {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            if patterns.iter().any(|p| p == piece) {
                eprintln!("arbor: duplicate --exclude pattern `{}`", piece);
                continue;
            }
            patterns.push(piece.to_string());
        }
        if !raw.is_empty() && patterns.is_empty() {
            anyhow::bail!("--exclude needs at least one file name or glob");
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid --exclude pattern `{}`", pattern))?;
            builder.add(glob);
        }
        let globs = builder.build().context("cannot compile --exclude patterns")?;
        Ok(Self { globs, patterns })
    }

    /// Test a bare entry name against the set.
    pub fn matches(&self, name: &OsStr) -> bool {
        self.globs.is_match(Path::new(name))
    }

    /// Whether a root path equals one of the raw patterns verbatim. Such
    /// roots are skipped outright rather than matched as names.
    pub fn contains_literal(&self, path: &Path) -> bool {
        self.patterns.iter().any(|p| OsStr::new(p) == path.as_os_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Open a root path as a directory handle. Everything below it is opened
/// relative to a parent handle, never by joined path.
pub fn open_root(path: &Path) -> io::Result<OwnedFd> {
    use rustix::fs::{Mode, OFlags};
    Ok(rustix::fs::open(
        path,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )?)
}

/// Subdirectories are reopened by bare name under the parent handle.
/// NOFOLLOW keeps a racing symlink swap from redirecting the descent.
fn open_subdir(dir: BorrowedFd<'_>, name: &OsStr) -> io::Result<OwnedFd> {
    use rustix::fs::{Mode, OFlags};
    Ok(rustix::fs::openat(
        dir,
        name,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::NOFOLLOW | OFlags::CLOEXEC,
        Mode::empty(),
    )?)
}

/// Walk one open directory: render each entry of its listing in order and
/// descend into eligible subdirectories. Entries directly inside a root are
/// level 1. The handle closes when the frame returns, on every path.
///
/// Descent requires a real (non-symlink) directory within the depth limit
/// whose name matches no exclusion glob. Symlinked directories are never
/// entered, which also forecloses symlink cycles; `--follow-symlinks` only
/// changes what gets statted, never where the walk goes.
pub fn walk(
    dir: OwnedFd,
    config: &Config,
    level: usize,
    prefix: &mut PrefixStack,
    out: &mut dyn WriteColor,
) -> Result<(), WalkError> {
    let entries = list_entries(dir.as_fd(), config)
        .map_err(|source| WalkError::Enumerate { level, source })?;

    let last_index = entries.len().saturating_sub(1);
    for (index, entry) in entries.iter().enumerate() {
        let is_last = index == last_index;
        render::render_entry(out, dir.as_fd(), entry, is_last, prefix.as_str(), config)?;

        let descend = entry.kind == EntryKind::Directory
            && !entry.is_symlink
            && config.max_depth.map_or(true, |max| level < max)
            && !config.exclude.matches(&entry.name);
        if !descend {
            continue;
        }

        let subdir = match open_subdir(dir.as_fd(), &entry.name) {
            Ok(fd) => fd,
            Err(err) => {
                if config.report_failures {
                    eprintln!(
                        "arbor: cannot open `{}`: {}",
                        entry.name.to_string_lossy(),
                        err
                    );
                }
                continue;
            }
        };

        // Truncate on the error path too: the stack is shared with whatever
        // roots remain after a failed walk.
        let mark = prefix.extend(is_last, config.glyphs);
        let outcome = walk(subdir, config, level + 1, prefix, out);
        prefix.truncate(mark);
        outcome?;
    }

    Ok(())
}
