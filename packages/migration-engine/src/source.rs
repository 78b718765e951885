use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::MigrationError;

const UP_MARKER: &str = "-- +migrate Up";
const DOWN_MARKER: &str = "-- +migrate Down";

/// One parsed migration file.
#[derive(Debug, Clone)]
pub struct MigrationFile {
    /// 14-digit timestamp prefix, e.g. `20240102030405`.
    pub version: String,
    /// Human-readable suffix, e.g. `add_users_table`.
    pub name: String,
    /// File name on disk.
    pub file_name: String,
    pub up_sql: String,
    pub down_sql: String,
}

impl MigrationFile {
    /// Ledger key: the file stem, `<version>_<name>`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.version, self.name)
    }
}

/// Migration files discovered in a directory.
#[derive(Debug, Clone)]
pub struct FileMigrationSource {
    dir: PathBuf,
}

impl FileMigrationSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and parse every migration file, sorted lexicographically by
    /// file name (== chronologically, given the timestamp prefix).
    ///
    /// Entries that are not `.sql` files or do not match the
    /// `<14-digit-timestamp>_<name>.sql` shape are skipped with a warning.
    pub fn load(&self) -> Result<Vec<MigrationFile>, MigrationError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            MigrationError::io(format!(
                "failed to read migrations directory '{}': {e}",
                self.dir.display()
            ))
        })?;

        let mut migrations = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                MigrationError::io(format!(
                    "failed to read migrations directory '{}': {e}",
                    self.dir.display()
                ))
            })?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("sql") {
                continue;
            }

            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };
            let Some((version, name)) = split_file_name(&file_name) else {
                warn!("skipping migration file with unexpected name: {file_name}");
                continue;
            };

            let content = fs::read_to_string(&path).map_err(|e| {
                MigrationError::io(format!("failed to read '{}': {e}", path.display()))
            })?;
            let (up_sql, down_sql) = split_sections(&content).ok_or_else(|| {
                MigrationError::invalid_file(
                    file_name.clone(),
                    format!("missing '{UP_MARKER}' marker"),
                )
            })?;

            migrations.push(MigrationFile {
                version,
                name,
                file_name,
                up_sql,
                down_sql,
            });
        }

        migrations.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(migrations)
    }
}

/// Split `<version>_<name>.sql` into its version and name parts. Returns
/// `None` when the file name does not match the naming convention.
fn split_file_name(file_name: &str) -> Option<(String, String)> {
    let stem = file_name.strip_suffix(".sql")?;
    let (version, name) = stem.split_once('_')?;
    if version.len() != 14 || !version.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if name.is_empty() {
        return None;
    }
    Some((version.to_string(), name.to_string()))
}

/// Split a file into its up and down sections. Returns `None` when the up
/// marker is missing; an absent down section yields an empty string.
fn split_sections(content: &str) -> Option<(String, String)> {
    let up_start = content.find(UP_MARKER)?;
    let after_up = &content[up_start + UP_MARKER.len()..];
    match after_up.find(DOWN_MARKER) {
        Some(down_start) => {
            let up = after_up[..down_start].trim().to_string();
            let down = after_up[down_start + DOWN_MARKER.len()..].trim().to_string();
            Some((up, down))
        }
        None => Some((after_up.trim().to_string(), String::new())),
    }
}
