use std::fs;
use std::path::Path;

use tempfile::TempDir;
use termcolor::NoColor;

use arbor::render::{GlyphSet, SizeMode};
use arbor::tree::{self, Config, ExcludeSet, PrefixStack};

/// Default Config: nothing hidden shown, no sizes, Unicode glyphs, no
/// exclusions, unlimited depth.
pub fn default_config() -> Config {
    Config {
        show_hidden: false,
        dirs_only: false,
        follow_symlinks: false,
        report_failures: false,
        size: SizeMode::Off,
        glyphs: GlyphSet::UNICODE,
        max_depth: None,
        exclude: ExcludeSet::empty(),
    }
}

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// Walk `root` with `config` and return the rendered text, color escapes
/// suppressed. Panics on walk failure; failure cases drive `walk` directly.
pub fn walk_to_string(root: &Path, config: &Config) -> String {
    let fd = tree::open_root(root).unwrap();
    let mut sink = NoColor::new(Vec::new());
    let mut prefix = PrefixStack::new();
    tree::walk(fd, config, 1, &mut prefix, &mut sink).unwrap();
    String::from_utf8(sink.into_inner()).unwrap()
}
