//! Single-directory enumeration: read the stream, stat, filter, sort.

use std::ffi::OsStr;
use std::io;
use std::os::fd::BorrowedFd;
use std::os::unix::ffi::OsStrExt;

use rustix::fs::{self, AtFlags, FileType, RawMode};

use super::{Config, Entry, EntryKind};

/// Produce the sorted, filtered listing of one open directory.
///
/// Entries whose metadata cannot be read are dropped (reported when
/// `report_failures` is set); hidden-name filtering is silent. An empty or
/// fully filtered directory is an empty listing, not an error. Only a failure
/// of the directory stream itself propagates.
///
/// The last sibling of the listing is decided here, after every filter has
/// run: an entry that fails its stat can never leave a phantom last branch.
pub fn list_entries(dir: BorrowedFd<'_>, config: &Config) -> io::Result<Vec<Entry>> {
    // The stream reads through a dup that shares the descriptor's offset;
    // start from the top no matter what the caller did with the handle.
    let mut stream = fs::Dir::read_from(dir)?;
    stream.rewind();

    let mut entries = Vec::new();
    for item in stream {
        let dirent = item?;
        let bytes = dirent.file_name().to_bytes();
        if bytes == b"." || bytes == b".." {
            continue;
        }
        if !config.show_hidden && bytes.starts_with(b".") {
            continue;
        }
        let name = OsStr::from_bytes(bytes);

        // The entry's own identity first; the follow policy only selects
        // which object supplies the displayed metadata.
        let lstat = match fs::statat(dir, name, AtFlags::SYMLINK_NOFOLLOW) {
            Ok(stat) => stat,
            Err(err) => {
                warn_stat(config, name, err);
                continue;
            }
        };
        let is_symlink = kind_from_mode(lstat.st_mode) == EntryKind::Symlink;

        let stat = if is_symlink && config.follow_symlinks {
            match fs::statat(dir, name, AtFlags::empty()) {
                Ok(stat) => stat,
                Err(err) => {
                    warn_stat(config, name, err);
                    continue;
                }
            }
        } else {
            lstat
        };
        let kind = kind_from_mode(stat.st_mode);

        if config.dirs_only && kind != EntryKind::Directory {
            continue;
        }

        entries.push(Entry {
            name: name.to_os_string(),
            size: u64::try_from(stat.st_size).unwrap_or(0),
            kind,
            is_symlink,
            executable: stat.st_mode & 0o111 != 0,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn kind_from_mode(mode: RawMode) -> EntryKind {
    match FileType::from_raw_mode(mode) {
        FileType::Directory => EntryKind::Directory,
        FileType::Symlink => EntryKind::Symlink,
        FileType::Socket => EntryKind::Socket,
        FileType::Fifo => EntryKind::Fifo,
        FileType::RegularFile => EntryKind::Regular,
        _ => EntryKind::Other,
    }
}

fn warn_stat(config: &Config, name: &OsStr, err: rustix::io::Errno) {
    if config.report_failures {
        eprintln!("arbor: cannot stat `{}`: {}", name.to_string_lossy(), err);
    }
}
