#![forbid(unsafe_code)]

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use termcolor::BufferedStandardStream;

use arbor::cli::Args;
use arbor::render::{self, GlyphSet};
use arbor::tree::{self, Config, ExcludeSet, PrefixStack};

fn main() -> ExitCode {
    match run_app() {
        Ok(status) => status,
        Err(e) => {
            eprintln!("arbor: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_app() -> Result<ExitCode> {
    let args = Args::parse();

    let config = Config {
        show_hidden: args.all,
        dirs_only: args.dirs_only,
        follow_symlinks: args.follow_symlinks,
        report_failures: args.errors,
        size: args.size_mode(),
        glyphs: if args.ascii {
            GlyphSet::ASCII
        } else {
            GlyphSet::UNICODE
        },
        max_depth: args.depth,
        exclude: ExcludeSet::build(&args.exclude)?,
    };

    let mut out = BufferedStandardStream::stdout(args.color.choice());
    let mut prefix = PrefixStack::new();
    let mut status = ExitCode::SUCCESS;
    let mut printed_any = false;

    for path in &args.paths {
        // A root spelled exactly like an exclusion pattern is skipped, the
        // same as a matching subdirectory would be.
        if config.exclude.contains_literal(path) {
            continue;
        }

        let root = match tree::open_root(path) {
            Ok(fd) => fd,
            Err(err) => {
                eprintln!("arbor: cannot open `{}`: {}", path.display(), err);
                continue;
            }
        };

        if printed_any {
            writeln!(out).context("cannot write to standard output")?;
        }
        printed_any = true;
        render::render_root(&mut out, path).context("cannot write to standard output")?;

        // A failed walk poisons the exit status but not the remaining roots.
        if let Err(err) = tree::walk(root, &config, 1, &mut prefix, &mut out) {
            eprintln!("arbor: `{}`: {}", path.display(), err);
            status = ExitCode::FAILURE;
        }
        debug_assert!(prefix.is_empty());
    }

    out.flush().context("cannot flush standard output")?;
    Ok(status)
}
