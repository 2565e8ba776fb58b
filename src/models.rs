use crate::errors::CoreError;
use crate::helpers::{dedup_preserving_order, normalize_extensions, sanitize_user_path};
use std::fmt;
use std::path::PathBuf;

/// Settings for one run, built from the command line.
#[derive(Debug, Clone, Default)]
pub struct RenameOptions {
    pub substrings: Vec<String>,
    pub dry_run: bool,
    pub ignore_case: bool,
    pub extensions: Vec<String>,
    pub allow_protected: bool,
}

impl RenameOptions {
    /// Validates and normalizes the substring list. Fails on an empty list or
    /// an empty substring.
    pub fn new(substrings: Vec<String>) -> crate::Result<Self> {
        if substrings.is_empty() {
            return Err(CoreError::invalid_input("at least one substring is required"));
        }
        if substrings.iter().any(String::is_empty) {
            return Err(CoreError::invalid_input("substrings must not be empty"));
        }
        Ok(Self {
            substrings: dedup_preserving_order(substrings),
            ..Self::default()
        })
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    pub fn extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = normalize_extensions(extensions);
        self
    }

    pub fn allow_protected(mut self, allow_protected: bool) -> Self {
        self.allow_protected = allow_protected;
        self
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One planned in-place rename. `from` and `to` share a parent directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RenameOperation {
    pub from: PathBuf,
    pub to: PathBuf,
    pub old_name: String,
    pub new_name: String,
    pub kind: EntryKind,
}

impl RenameOperation {
    pub fn parent(&self) -> Option<&std::path::Path> {
        self.from.parent()
    }
}

impl fmt::Display for RenameOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' -> '{}' in {}",
            self.kind,
            self.old_name,
            self.new_name,
            self.parent().map(sanitize_user_path).unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SkipReason {
    /// The candidate name is already taken by a sibling.
    Collision { new_name: String },
    /// Every character of the name was removed.
    EmptyName,
    /// The candidate is made of dots and whitespace only.
    InvalidName(String),
    /// The entry name is not valid UTF-8 and cannot be matched.
    NonUtf8Name,
    /// A directory could not be read while walking the tree.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collision { new_name } => write!(f, "'{new_name}' already exists"),
            Self::EmptyName => write!(f, "resulting name would be empty"),
            Self::InvalidName(name) => write!(f, "resulting name '{name}' is not a valid name"),
            Self::NonUtf8Name => write!(f, "name is not valid UTF-8"),
            Self::Unreadable(message) => write!(f, "cannot read: {message}"),
        }
    }
}

/// An entry left alone, with the reason.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: SkipReason,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", sanitize_user_path(&self.path), self.reason)
    }
}

/// Result of the planning phase: operations in execution order (children
/// before their parent) and entries that will not be renamed.
#[derive(Debug, Clone, Default)]
pub struct RenamePlan {
    pub operations: Vec<RenameOperation>,
    pub skipped: Vec<SkippedEntry>,
}

impl RenamePlan {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn count(&self, kind: EntryKind) -> usize {
        self.operations.iter().filter(|op| op.kind == kind).count()
    }
}

/// Per-entry outcome of executing a plan.
#[derive(Debug, Clone)]
pub enum RenameEvent {
    Renamed(RenameOperation),
    Skipped(SkippedEntry),
    Failed {
        operation: RenameOperation,
        reason: String,
    },
}

impl fmt::Display for RenameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed(op) => write!(f, "renamed {op}"),
            Self::Skipped(entry) => write!(f, "skipped {entry}"),
            Self::Failed { operation, reason } => write!(f, "failed {operation}: {reason}"),
        }
    }
}

/// Summary of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RenameReport {
    pub renamed: Vec<RenameOperation>,
    pub skipped: Vec<SkippedEntry>,
    pub failed: Vec<(RenameOperation, String)>,
}

impl RenameReport {
    pub fn record(&mut self, event: RenameEvent) {
        match event {
            RenameEvent::Renamed(op) => self.renamed.push(op),
            RenameEvent::Skipped(entry) => self.skipped.push(entry),
            RenameEvent::Failed { operation, reason } => self.failed.push((operation, reason)),
        }
    }

    pub fn renamed_files(&self) -> usize {
        self.renamed.iter().filter(|op| op.kind != EntryKind::Directory).count()
    }

    pub fn renamed_directories(&self) -> usize {
        self.renamed.iter().filter(|op| op.kind == EntryKind::Directory).count()
    }

    pub fn problems(&self) -> usize {
        self.skipped.len() + self.failed.len()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ExitStatusLike {
    Ok,
    Error,
}

impl ExitStatusLike {
    pub fn as_code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Error => 1,
        }
    }
}
