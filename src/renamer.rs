//! Tree walk and in-place renaming.
//!
//! A run has two phases. [`Renamer::plan`] walks the tree contents-first and
//! decides every rename up front, so directory listings are never read while
//! entries inside them move. [`Renamer::execute`] then applies the operations
//! in plan order: children always come before the directory holding them,
//! which keeps every planned path valid until it is used.

use crate::errors::CoreError;
use crate::fs::{FileSystem, RealFileSystem, WalkEntry};
use crate::helpers::{
    canonical_or_relaxed, is_protected_directory, is_valid_name, matches_extension,
    remove_substrings, sanitize_user_path,
};
use crate::models::{
    EntryKind, RenameEvent, RenameOperation, RenameOptions, RenamePlan, RenameReport,
    SkipReason, SkippedEntry,
};
use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct Renamer<F: FileSystem = RealFileSystem> {
    fs: F,
    options: RenameOptions,
}

impl Renamer<RealFileSystem> {
    pub fn new(options: RenameOptions) -> Self {
        Self::with_file_system(RealFileSystem, options)
    }
}

impl<F: FileSystem> Renamer<F> {
    pub fn with_file_system(fs: F, options: RenameOptions) -> Self {
        Self { fs, options }
    }

    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// Checks that `root` can be processed at all. Every error here is fatal
    /// and is raised before anything is renamed.
    pub fn validate_root(&self, root: &Path) -> crate::Result<()> {
        let shown = sanitize_user_path(root);
        let metadata = match self.fs.metadata(root) {
            Ok(metadata) => metadata,
            Err(CoreError::Io(_, err)) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CoreError::invalid_path(format!("{shown} does not exist")));
            }
            Err(CoreError::Io(_, err)) if err.kind() == io::ErrorKind::PermissionDenied => {
                return Err(CoreError::precondition(format!("{shown} is not accessible")));
            }
            Err(err) => return Err(err),
        };
        if !metadata.is_dir() {
            return Err(CoreError::invalid_path(format!("{shown} is not a directory")));
        }

        if let Err(err) = self.fs.list_dir(root) {
            return Err(CoreError::precondition(format!("cannot list {shown}: {err}")));
        }
        if !self.options.dry_run && !self.fs.is_writable(root) {
            return Err(CoreError::precondition(format!("{shown} is not writable")));
        }

        if !self.options.allow_protected {
            let resolved = canonical_or_relaxed(root);
            let home = std::env::var_os("HOME").map(|home| canonical_or_relaxed(Path::new(&home)));
            if is_protected_directory(&resolved, home.as_deref()) {
                return Err(CoreError::Protected(resolved));
            }
        }
        Ok(())
    }

    /// Walks `root` deepest-first and works out every rename without touching
    /// the filesystem. The root itself is never renamed.
    pub fn plan(&self, root: &Path) -> RenamePlan {
        let mut plan = RenamePlan::default();
        let mut siblings: HashMap<PathBuf, HashSet<OsString>> = HashMap::new();

        for entry in self.fs.walk(root) {
            let WalkEntry { path, kind } = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = match &err {
                        CoreError::Io(path, _) => path.clone(),
                        _ => root.to_path_buf(),
                    };
                    warn!(path = %path.display(), error = %err, "skipping unreadable entry");
                    plan.skipped.push(SkippedEntry {
                        path,
                        reason: SkipReason::Unreadable(err.to_string()),
                    });
                    continue;
                }
            };

            let Some(file_name) = path.file_name() else {
                continue;
            };
            let Some(old_name) = file_name.to_str() else {
                self.note_non_utf8(&path, &mut plan);
                continue;
            };
            if kind != EntryKind::Directory && !matches_extension(old_name, &self.options.extensions) {
                continue;
            }

            let new_name =
                remove_substrings(old_name, &self.options.substrings, self.options.ignore_case);
            if new_name == old_name {
                continue;
            }

            if new_name.is_empty() {
                debug!(path = %path.display(), "name would become empty");
                plan.skipped.push(SkippedEntry {
                    path: path.clone(),
                    reason: SkipReason::EmptyName,
                });
                continue;
            }
            if !is_valid_name(&new_name) {
                debug!(path = %path.display(), new_name = %new_name, "name would become invalid");
                plan.skipped.push(SkippedEntry {
                    path: path.clone(),
                    reason: SkipReason::InvalidName(new_name),
                });
                continue;
            }

            let parent = path.parent().unwrap_or(root);
            let names = siblings
                .entry(parent.to_path_buf())
                .or_insert_with(|| self.sibling_names(parent));
            if names.contains(OsStr::new(&new_name)) {
                debug!(path = %path.display(), new_name = %new_name, "target name already taken");
                plan.skipped.push(SkippedEntry {
                    path: path.clone(),
                    reason: SkipReason::Collision { new_name },
                });
                continue;
            }
            names.remove(OsStr::new(old_name));
            names.insert(OsString::from(&new_name));

            debug!(path = %path.display(), new_name = %new_name, "planned rename");
            plan.operations.push(RenameOperation {
                from: path.clone(),
                to: parent.join(&new_name),
                old_name: old_name.to_string(),
                new_name,
                kind,
            });
        }

        plan
    }

    /// Applies `plan` in order. A failing entry is reported through
    /// `on_event` and the remaining operations still run.
    pub fn execute(&self, plan: &RenamePlan, mut on_event: impl FnMut(&RenameEvent)) -> RenameReport {
        let mut report = RenameReport::default();
        for operation in &plan.operations {
            let event = self.apply(operation);
            on_event(&event);
            report.record(event);
        }
        report
    }

    fn apply(&self, operation: &RenameOperation) -> RenameEvent {
        // Something may have appeared since planning; never overwrite it.
        if self.fs.exists(&operation.to) {
            warn!(to = %operation.to.display(), "target appeared after planning");
            return RenameEvent::Skipped(SkippedEntry {
                path: operation.from.clone(),
                reason: SkipReason::Collision {
                    new_name: operation.new_name.clone(),
                },
            });
        }

        match self.fs.rename(&operation.from, &operation.to) {
            Ok(()) => {
                info!(from = %operation.from.display(), to = %operation.to.display(), "renamed");
                RenameEvent::Renamed(operation.clone())
            }
            Err(err) => {
                warn!(from = %operation.from.display(), error = %err, "rename failed");
                RenameEvent::Failed {
                    operation: operation.clone(),
                    reason: err.to_string(),
                }
            }
        }
    }

    fn sibling_names(&self, dir: &Path) -> HashSet<OsString> {
        match self.fs.list_dir(dir) {
            Ok(children) => children
                .iter()
                .filter_map(|child| child.file_name().map(OsStr::to_os_string))
                .collect(),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot list siblings");
                HashSet::new()
            }
        }
    }

    // Undecodable names cannot be rewritten safely. They are only reported
    // when a lossy view suggests the user meant to rename them.
    fn note_non_utf8(&self, path: &Path, plan: &mut RenamePlan) {
        let lossy = path.file_name().map(OsStr::to_string_lossy).unwrap_or_default();
        let stripped = remove_substrings(&lossy, &self.options.substrings, self.options.ignore_case);
        if stripped == lossy {
            return;
        }
        debug!(path = %path.display(), "leaving non UTF-8 name untouched");
        plan.skipped.push(SkippedEntry {
            path: path.to_path_buf(),
            reason: SkipReason::NonUtf8Name,
        });
    }
}
