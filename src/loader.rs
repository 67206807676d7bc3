// Directory scan -> qualified key -> factory -> registered instance.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::LoaderError;
use crate::registry;
use crate::runner::MigrationRegistrar;

/// Configuration for one [`load_auto_migrations`] call. Immutable for the
/// duration of the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Migrations directory, resolved against the working directory unless
    /// absolute. No folder traversal: only direct entries are considered.
    pub path: PathBuf,
    /// Leading component of every qualified lookup key.
    pub namespace: String,
    /// Inserted between namespace and file base name. Compensates for
    /// identifiers not being allowed to start with a digit when file names
    /// carry numeric timestamps; set to `""` for unprefixed type names.
    pub prefix: String,
    /// `true`: return the first discovery error to the caller.
    /// `false`: warn, record the skip, and keep going.
    pub fail_fast: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("migrations"),
            namespace: "App".to_string(),
            prefix: "M".to_string(),
            fail_fast: false,
        }
    }
}

/// What one load pass did: migration names in registration order, plus one
/// entry per skipped file. Only produced on the non-fail-fast path or when the
/// whole pass succeeded.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub registered: Vec<String>,
    pub skipped: Vec<SkippedEntry>,
}

/// A directory entry the loader could not turn into a registered migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub file: String,
    pub reason: LoaderError,
}

/// Scan `config.path` and register one migration instance per resolvable
/// directory entry into `registrar`.
///
/// Entry names are sorted lexicographically before processing, so
/// timestamp-prefixed file names register (and therefore later execute) in
/// creation order regardless of platform directory-listing order.
///
/// For each entry the loader strips the last extension, builds the key
/// `namespace + prefix + base_name`, and resolves it against the type registry
/// populated via [`register_migrations!`](crate::register_migrations) or
/// [`registry::register`]. A miss, a duplicate migration name, or an unlistable
/// directory is a configuration defect: with `fail_fast` the loader returns it
/// immediately (instances registered before the defect stay registered, later
/// entries are never attempted); otherwise it warns and continues with the
/// remaining entries.
///
/// The loader never terminates the process. Whether a returned error is fatal
/// is the caller's policy.
pub fn load_auto_migrations<R: MigrationRegistrar>(
    config: &LoaderConfig,
    registrar: &mut R,
) -> Result<LoadReport, LoaderError> {
    let mut report = LoadReport::default();

    let dir = resolve_migrations_dir(&config.path);
    let entries = match list_entry_names(&dir) {
        Ok(entries) => entries,
        Err(err) => {
            if config.fail_fast {
                return Err(err);
            }
            warn!(error = %err, "Skipping auto-migration load");
            return Ok(report);
        }
    };

    for file in entries {
        let key = qualified_key(&config.namespace, &config.prefix, &file);
        debug!(file = %file, key = %key, "Resolving migration entry");

        let outcome = match registry::resolve(&key) {
            Some(factory) => {
                let migration = factory();
                let name = migration.name().to_string();
                if registrar.contains(&name) {
                    Err(LoaderError::DuplicateName {
                        name,
                        file: file.clone(),
                    })
                } else {
                    registrar.add(migration);
                    Ok(name)
                }
            }
            None => Err(LoaderError::UnresolvableType {
                key,
                file: file.clone(),
            }),
        };

        match outcome {
            Ok(name) => {
                info!(migration = %name, file = %file, "Registered migration");
                report.registered.push(name);
            }
            Err(err) => {
                if config.fail_fast {
                    return Err(err);
                }
                warn!(error = %err, "Skipping migration entry");
                report.skipped.push(SkippedEntry { file, reason: err });
            }
        }
    }

    info!(
        path = %dir.display(),
        registered = report.registered.len(),
        skipped = report.skipped.len(),
        "Auto-migration load finished"
    );
    Ok(report)
}

/// Join the configured path onto the detected working directory. An absolute
/// path stands alone. If the working directory itself cannot be detected the
/// configured path is used as-is and the subsequent listing reports the
/// failure.
fn resolve_migrations_dir(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(err) => {
            warn!(error = %err, "Cannot detect working directory");
            path.to_path_buf()
        }
    }
}

/// Entry names at `dir`, sorted lexicographically.
fn list_entry_names(dir: &Path) -> Result<Vec<String>, LoaderError> {
    let read_dir = fs::read_dir(dir).map_err(|err| LoaderError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        reason: err.to_string(),
    })?;

    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|err| LoaderError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            reason: err.to_string(),
        })?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// `namespace + prefix + (file name minus its last extension)`, plain
/// concatenation. `20230101_CreateUsers.sql` under namespace `App` and prefix
/// `M` becomes `AppM20230101_CreateUsers`.
fn qualified_key(namespace: &str, prefix: &str, file: &str) -> String {
    let base = Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{namespace}{prefix}{base}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Migrations;

    #[test]
    fn qualified_key_strips_last_extension_only() {
        assert_eq!(
            qualified_key("App", "M", "20230101_CreateUsers.ext"),
            "AppM20230101_CreateUsers"
        );
        // Only the final extension component goes.
        assert_eq!(
            qualified_key("App", "M", "20230101_CreateUsers.up.sql"),
            "AppM20230101_CreateUsers.up"
        );
        assert_eq!(qualified_key("App", "", "Seed.sql"), "AppSeed");
    }

    #[test]
    fn default_config_matches_convention() {
        let config = LoaderConfig::default();
        assert_eq!(config.path, PathBuf::from("migrations"));
        assert_eq!(config.namespace, "App");
        assert_eq!(config.prefix, "M");
        assert!(!config.fail_fast);
    }

    #[test]
    fn unreadable_directory_is_skipped_without_fail_fast() {
        let config = LoaderConfig {
            path: PathBuf::from("definitely/not/a/real/migrations/dir"),
            namespace: "LoaderTestA".to_string(),
            ..LoaderConfig::default()
        };
        let mut migrations = Migrations::new();

        // Two passes: no registrations and no residual state either time.
        for _ in 0..2 {
            let report = load_auto_migrations(&config, &mut migrations).expect("non-fatal path");
            assert!(report.registered.is_empty());
            assert!(report.skipped.is_empty());
            assert!(migrations.is_empty());
        }
    }

    #[test]
    fn unreadable_directory_fails_fast_with_resolved_path() {
        let config = LoaderConfig {
            path: PathBuf::from("definitely/not/a/real/migrations/dir"),
            namespace: "LoaderTestB".to_string(),
            fail_fast: true,
            ..LoaderConfig::default()
        };
        let mut migrations = Migrations::new();

        let err = load_auto_migrations(&config, &mut migrations).expect_err("missing directory");
        match err {
            LoaderError::DirectoryUnreadable { path, .. } => {
                assert!(path.is_absolute(), "diagnostic names the resolved path");
                assert!(path.ends_with("definitely/not/a/real/migrations/dir"));
            }
            other => panic!("expected DirectoryUnreadable, got {other:?}"),
        }
        assert!(migrations.is_empty());
    }
}
