use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::MigrationError;

/// Template written into every new migration file. The two markers are the
/// fixed syntax the runner splits files on.
pub const MIGRATION_TEMPLATE: &str = "-- +migrate Up\n\n-- +migrate Down\n\n";

/// Build the timestamped file name for a new migration.
///
/// Every space in the name becomes an underscore; the fixed-width prefix
/// makes file names sort chronologically.
pub fn migration_file_name(name: &str, now: NaiveDateTime) -> String {
    format!("{}_{}.sql", now.format("%Y%m%d%H%M%S"), name.replace(' ', "_"))
}

/// Write a new, empty migration file into `dir`, creating the directory
/// when missing. A name collision silently overwrites.
pub fn create_migration_file(
    dir: &Path,
    name: &str,
    now: NaiveDateTime,
) -> Result<PathBuf, MigrationError> {
    fs::create_dir_all(dir).map_err(|e| {
        MigrationError::io(format!("failed to create '{}': {e}", dir.display()))
    })?;

    let path = dir.join(migration_file_name(name, now));
    fs::write(&path, MIGRATION_TEMPLATE)
        .map_err(|e| MigrationError::io(format!("failed to write '{}': {e}", path.display())))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::{NaiveDate, NaiveDateTime};

    use super::{create_migration_file, migration_file_name, MIGRATION_TEMPLATE};

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap()
    }

    #[test]
    fn file_name_is_timestamp_prefixed_with_spaces_replaced() {
        assert_eq!(
            migration_file_name("add users table", fixed_now()),
            "20240102030405_add_users_table.sql"
        );
    }

    #[test]
    fn file_name_passes_through_names_without_spaces() {
        assert_eq!(
            migration_file_name("add_users_table", fixed_now()),
            "20240102030405_add_users_table.sql"
        );
    }

    #[test]
    fn create_writes_the_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_migration_file(dir.path(), "add users table", fixed_now()).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "20240102030405_add_users_table.sql"
        );
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "-- +migrate Up\n\n-- +migrate Down\n\n"
        );
    }

    #[test]
    fn create_makes_the_directory_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("db").join("migrations");
        let path = create_migration_file(&nested, "init", fixed_now()).unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn create_overwrites_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20240102030405_init.sql");
        fs::write(&path, "stale content").unwrap();

        let written = create_migration_file(dir.path(), "init", fixed_now()).unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read_to_string(&path).unwrap(), MIGRATION_TEMPLATE);
    }
}
