//! Batch renaming of files and directories by removing literal substrings
//! from their names. The binary is a thin front end over [`Renamer`].

pub mod errors;
pub mod fs;
pub mod helpers;
pub mod models;
pub mod renamer;

pub use errors::{CoreError, Result};
pub use fs::{FileSystem, RealFileSystem, WalkEntry};
pub use helpers::{is_valid_name, remove_substrings, sanitize_user_path};
pub use models::{
    EntryKind,
    ExitStatusLike,
    RenameEvent,
    RenameOperation,
    RenameOptions,
    RenamePlan,
    RenameReport,
    SkipReason,
    SkippedEntry,
};
pub use renamer::Renamer;

/// Re-export the small stable API surface for callers.
pub mod prelude {
    pub use crate::{
        errors::{CoreError, Result},
        fs::{FileSystem, RealFileSystem, WalkEntry},
        helpers::*,
        models::*,
        renamer::Renamer,
    };
}
