//! Directory traversal: entry model, listing, prefix bookkeeping, walking.

mod list;
mod prefix;
mod walk;

pub use list::list_entries;
pub use prefix::{PrefixMark, PrefixStack};
pub use walk::{open_root, walk, ExcludeSet, WalkError};

use std::ffi::OsString;

use crate::render::{GlyphSet, SizeMode};

/// A single statted directory child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Bare file name, never containing a path separator.
    pub name: OsString,
    /// Size in bytes from the governing stat.
    pub size: u64,
    /// Displayed type, honoring the follow-symlinks policy.
    pub kind: EntryKind,
    /// Whether the entry itself is a symlink, regardless of that policy.
    pub is_symlink: bool,
    /// Whether any execute permission bit is set.
    pub executable: bool,
}

/// Entry type as rendered. `Other` covers devices and anything unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Symlink,
    Socket,
    Fifo,
    Regular,
    Other,
}

/// Immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Include hidden files (dotfiles).
    pub show_hidden: bool,
    /// List directories only.
    pub dirs_only: bool,
    /// Stat symlink targets instead of the links themselves.
    pub follow_symlinks: bool,
    /// Report per-entry open/stat failures on stderr.
    pub report_failures: bool,
    /// Size suffix mode.
    pub size: SizeMode,
    /// Branch-drawing characters.
    pub glyphs: GlyphSet,
    /// Maximum descent depth; `None` is unlimited, 0 never descends.
    pub max_depth: Option<usize>,
    /// Directory names to stay out of.
    pub exclude: ExcludeSet,
}
