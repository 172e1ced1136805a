//! Capability-style file access for CLI inputs and reports.
//!
//! Every helper opens the containing directory with ambient authority and
//! then works relative to it through `cap-std`.

use std::io;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open `path` for reading.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Whether `path` names a regular file.
///
/// A missing path is an [`io::ErrorKind::NotFound`] error rather than
/// `false`, so callers can tell "absent" from "not a file".
pub(crate) fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = containing_dir(path)?;
    dir.metadata(name).map(|meta| meta.is_file())
}

/// Write `contents` to `path`, creating missing parent directories.
pub(crate) fn write_utf8_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        let (anchor, rest) = anchor_and_rest(parent);
        if !rest.as_str().is_empty() {
            fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&rest)?;
        }
    }
    let (dir, name) = containing_dir(path)?;
    dir.write(name, contents)
}

fn containing_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, &str)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `dir` into the part cap-std must open ambiently (a drive prefix,
/// the root, or `.`) and the relative remainder below it.
fn anchor_and_rest(dir: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut rest = Utf8PathBuf::new();
    for component in dir.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => anchor.push(component),
            other => rest.push(other),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, rest)
}
