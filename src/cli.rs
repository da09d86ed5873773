use clap::{Parser, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use termcolor::ColorChoice;

use crate::render::SizeMode;

#[derive(Parser, Debug, Clone)]
#[command(name = "arbor", version, about = "Print directory trees")]
pub struct Args {
    /// Directories to print (default: current directory)
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Include entries whose names start with a dot
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Print the size of each entry in bytes
    #[arg(short = 's', long = "size")]
    pub size: bool,

    /// Print sizes in binary units (KiB, MiB, ...); implies --size
    #[arg(short = 'H', long = "human")]
    pub human: bool,

    /// Draw branches with ASCII characters instead of Unicode
    #[arg(short = 'c', long = "ascii")]
    pub ascii: bool,

    /// Report entries that cannot be opened or statted on stderr
    #[arg(short = 'e', long = "errors")]
    pub errors: bool,

    /// Stat the target of each symlink instead of the link itself
    #[arg(short = 'l', long = "follow-symlinks")]
    pub follow_symlinks: bool,

    /// List directories only
    #[arg(short = 'd', long = "dirs-only")]
    pub dirs_only: bool,

    /// Descend at most N levels; 0 lists a root without descending
    #[arg(long = "depth", value_name = "N")]
    pub depth: Option<usize>,

    /// Comma-separated name globs; matching directories are not entered
    #[arg(long = "exclude", value_name = "GLOBS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// When to color the output
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,
}

impl Args {
    /// Size display mode implied by `--size` / `--human`.
    pub fn size_mode(&self) -> SizeMode {
        if self.human {
            SizeMode::Human
        } else if self.size {
            SizeMode::Bytes
        } else {
            SizeMode::Off
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    Auto,
    /// Always emit color escapes
    Always,
    /// Never emit color escapes
    Never,
}

impl ColorMode {
    /// Resolve to a termcolor choice. Auto honors NO_COLOR and FORCE_COLOR
    /// and falls back to terminal detection on stdout.
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto => {
                if std::env::var_os("NO_COLOR").is_some() {
                    ColorChoice::Never
                } else if std::env::var_os("FORCE_COLOR").is_some() {
                    ColorChoice::Always
                } else if std::io::stdout().is_terminal() {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                }
            }
        }
    }
}
