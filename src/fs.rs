use crate::errors::CoreError;
use crate::models::EntryKind;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// An entry produced by [`FileSystem::walk`]. The kind never follows symlinks.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Filesystem boundary used by the renamer.
///
/// Keeping this trait narrow makes it easy to write deterministic tests, e.g.
/// a backend that refuses to rename one particular entry.
pub trait FileSystem: Send + Sync {
    /// Returns true when something occupies `path`. Dangling symlinks count.
    fn exists(&self, path: &Path) -> bool;

    /// Reads file metadata, following symlinks.
    fn metadata(&self, path: &Path) -> crate::Result<Metadata>;

    /// Returns true when the current process may create and rename entries
    /// inside `path`.
    fn is_writable(&self, path: &Path) -> bool;

    /// Renames a path. Both paths share a parent for every caller in this crate.
    fn rename(&self, from: &Path, to: &Path) -> crate::Result<()>;

    /// Lists directory children as concrete paths.
    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>>;

    /// Every entry below `root` (not `root` itself), children before their
    /// directory, siblings sorted by name. A directory that cannot be read
    /// shows up as an `Err` item and the walk goes on.
    fn walk(&self, root: &Path) -> Vec<crate::Result<WalkEntry>>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn metadata(&self, path: &Path) -> crate::Result<Metadata> {
        fs::metadata(path).map_err(|err| CoreError::io(path, err))
    }

    #[cfg(unix)]
    fn is_writable(&self, path: &Path) -> bool {
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        match CString::new(path.as_os_str().as_bytes()) {
            Ok(path) => unsafe { libc::access(path.as_ptr(), libc::W_OK | libc::X_OK) == 0 },
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    fn is_writable(&self, path: &Path) -> bool {
        fs::metadata(path)
            .map(|metadata| !metadata.permissions().readonly())
            .unwrap_or(false)
    }

    fn rename(&self, from: &Path, to: &Path) -> crate::Result<()> {
        fs::rename(from, to).map_err(|err| CoreError::io(from, err))
    }

    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .map_err(|err| CoreError::io(path, err))?
            .map(|entry| entry.map(|v| v.path()))
            .collect::<Result<Vec<PathBuf>, io::Error>>()
            .map_err(|err| CoreError::io(path, err))
    }

    fn walk(&self, root: &Path) -> Vec<crate::Result<WalkEntry>> {
        WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .contents_first(true)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let kind = if file_type.is_symlink() {
                        EntryKind::Symlink
                    } else if file_type.is_dir() {
                        EntryKind::Directory
                    } else {
                        EntryKind::File
                    };
                    Ok(WalkEntry {
                        path: entry.into_path(),
                        kind,
                    })
                }
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    Err(CoreError::io(path, io::Error::from(err)))
                }
            })
            .collect()
    }
}
