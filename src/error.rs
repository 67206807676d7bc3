use std::path::PathBuf;

use thiserror::Error;

/// Discovery failures surfaced by the loader.
///
/// Every variant is a static configuration defect, reproducible at each
/// startup, so there is no retry path: with `fail_fast` the loader returns the
/// first one it hits, otherwise it warns and records the skip in the
/// [`LoadReport`](crate::loader::LoadReport). Escalating to process exit is the
/// caller's call, never this crate's.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// The configured migrations directory could not be listed.
    #[error("cannot list migrations directory {}: {reason}", path.display())]
    DirectoryUnreadable { path: PathBuf, reason: String },

    /// A file-derived key matched nothing in the type registry.
    ///
    /// The registry only holds contract-satisfying factories, so this single
    /// variant also covers "a type exists but is not a migration": such a type
    /// simply never got a key.
    #[error("no registered migration type for key `{key}` (derived from `{file}`)")]
    UnresolvableType { key: String, file: String },

    /// Two directory entries produced migrations with the same `name()`.
    ///
    /// The runner's ledger keys applied state on the name, so letting the
    /// second one through would corrupt tracking.
    #[error("duplicate migration name `{name}` (from `{file}`)")]
    DuplicateName { name: String, file: String },
}
