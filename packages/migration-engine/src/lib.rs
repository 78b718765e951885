//! File-based SQL migration engine.
//!
//! Discovers `<timestamp>_<name>.sql` files in a directory, splits each
//! into its `-- +migrate Up` and `-- +migrate Down` sections, and applies
//! the ones not yet recorded in the `schema_migrations` ledger, in
//! filename order. Also owns the scaffold template for new files.

pub mod error;
pub mod runner;
pub mod scaffold;
pub mod source;

pub use error::MigrationError;
pub use runner::{apply_pending, revert_last, status, MigrationStatus};
pub use scaffold::{create_migration_file, migration_file_name, MIGRATION_TEMPLATE};
pub use source::{FileMigrationSource, MigrationFile};
