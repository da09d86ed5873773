//! Line rendering: branch glyphs, type-derived color, sizes, symlink targets.

use std::ffi::OsStr;
use std::io::{self, Write};
use std::os::fd::BorrowedFd;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use termcolor::{Color, ColorSpec, WriteColor};

use crate::tree::{Config, Entry, EntryKind};

/// The four strings a tree branch is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    /// Vertical continuation under a non-last ancestor.
    pub column: &'static str,
    /// Horizontal bar, drawn twice after the branch glyph.
    pub row: &'static str,
    /// Branch glyph of the last sibling.
    pub corner: &'static str,
    /// Branch glyph of every other sibling.
    pub joint: &'static str,
}

impl GlyphSet {
    pub const UNICODE: GlyphSet = GlyphSet {
        column: "│",
        row: "─",
        corner: "└",
        joint: "├",
    };

    pub const ASCII: GlyphSet = GlyphSet {
        column: "|",
        row: "-",
        corner: "`",
        joint: "|",
    };
}

/// How entry sizes are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeMode {
    /// No size suffix.
    #[default]
    Off,
    /// Exact byte count: ` [123 bytes]`.
    Bytes,
    /// Truncated binary units: ` [1 KiB]`.
    Human,
}

const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Reduce a byte count to the largest binary unit not exceeding it,
/// truncating. 1536 is `1 KiB`, not `1.5 KiB`.
pub fn human_size(bytes: u64) -> (u64, &'static str) {
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024 && unit < UNITS.len() - 1 {
        value /= 1024;
        unit += 1;
    }
    (value, UNITS[unit])
}

/// Sanitize control characters to avoid terminal control-sequence injection.
fn sanitize_terminal_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\x{:02X}", code));
                } else {
                    out.push_str(&format!("\\u{{{:X}}}", code));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

// Color is a function of the entry type alone; the sink decides whether
// escapes are actually emitted.
fn entry_color(entry: &Entry) -> Option<ColorSpec> {
    let mut spec = ColorSpec::new();
    match entry.kind {
        EntryKind::Directory => {
            spec.set_fg(Some(Color::Blue)).set_bold(true);
        }
        EntryKind::Symlink => {
            spec.set_fg(Some(Color::Magenta));
        }
        EntryKind::Socket => {
            spec.set_fg(Some(Color::Green));
        }
        EntryKind::Fifo => {
            spec.set_fg(Some(Color::Yellow));
        }
        EntryKind::Regular if entry.executable => {
            spec.set_fg(Some(Color::Red));
        }
        EntryKind::Regular | EntryKind::Other => return None,
    }
    Some(spec)
}

/// Write one entry's line: prefix, branch glyph, colored name, then the
/// optional size suffix and symlink target. Exactly one newline is emitted.
///
/// The link target is read from `dir` while the line is being written; if the
/// read fails, the line is terminated first and the failure reported after,
/// so stdout never carries an unterminated line.
pub fn render_entry(
    out: &mut dyn WriteColor,
    dir: BorrowedFd<'_>,
    entry: &Entry,
    is_last: bool,
    prefix: &str,
    config: &Config,
) -> io::Result<()> {
    let glyphs = config.glyphs;
    let branch = if is_last { glyphs.corner } else { glyphs.joint };
    write!(out, "{}{}{}{} ", prefix, branch, glyphs.row, glyphs.row)?;

    let name = sanitize_terminal_text(&entry.name.to_string_lossy());
    match entry_color(entry) {
        Some(spec) => {
            out.set_color(&spec)?;
            write!(out, "{}", name)?;
            out.reset()?;
        }
        None => write!(out, "{}", name)?,
    }

    match config.size {
        SizeMode::Off => {}
        SizeMode::Bytes => write!(out, " [{} bytes]", entry.size)?,
        SizeMode::Human => {
            let (value, unit) = human_size(entry.size);
            write!(out, " [{} {}]", value, unit)?;
        }
    }

    if entry.kind == EntryKind::Symlink {
        match rustix::fs::readlinkat(dir, entry.name.as_os_str(), Vec::new()) {
            Ok(target) => {
                let target = OsStr::from_bytes(target.to_bytes()).to_string_lossy();
                write!(out, " -> {}", sanitize_terminal_text(&target))?;
            }
            Err(err) => {
                // The line is already partially written; terminate it before
                // reporting.
                writeln!(out)?;
                eprintln!("arbor: cannot read link target of `{}`: {}", name, err);
                return Ok(());
            }
        }
    }

    writeln!(out)
}

/// Print a root path as given on the command line, colored as a directory.
pub fn render_root(out: &mut dyn WriteColor, path: &Path) -> io::Result<()> {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Blue)).set_bold(true);
    out.set_color(&spec)?;
    write!(
        out,
        "{}",
        sanitize_terminal_text(&path.display().to_string())
    )?;
    out.reset()?;
    writeln!(out)
}
