use std::collections::HashSet;

use tokio_postgres::Client;
use tracing::info;

use crate::error::MigrationError;
use crate::source::{FileMigrationSource, MigrationFile};

/// Idempotently create the ledger of applied migrations.
async fn ensure_migrations_table(client: &Client) -> Result<(), MigrationError> {
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                id TEXT PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .await
        .map_err(|e| MigrationError::db(format!("failed to create schema_migrations: {e}")))
}

/// Ids already recorded in the ledger.
async fn applied_ids(client: &Client) -> Result<HashSet<String>, MigrationError> {
    let rows = client
        .query("SELECT id FROM schema_migrations", &[])
        .await
        .map_err(|e| MigrationError::db(format!("failed to query schema_migrations: {e}")))?;
    Ok(rows.into_iter().map(|row| row.get(0)).collect())
}

/// Select the migrations not yet applied, preserving filename order.
pub(crate) fn pending<'a>(
    files: &'a [MigrationFile],
    applied: &HashSet<String>,
) -> Vec<&'a MigrationFile> {
    files.iter().filter(|m| !applied.contains(&m.id())).collect()
}

/// Apply every pending migration's up section, each in its own
/// transaction, in filename order. Returns the count applied.
///
/// The first failure aborts further application; the open transaction
/// rolls back on drop, so the failing file's effects are not recorded.
pub async fn apply_pending(
    client: &mut Client,
    source: &FileMigrationSource,
) -> Result<usize, MigrationError> {
    let files = source.load()?;
    ensure_migrations_table(client).await?;
    let applied = applied_ids(client).await?;

    let mut count = 0;
    for migration in pending(&files, &applied) {
        let tx = client
            .transaction()
            .await
            .map_err(|e| MigrationError::db(format!("failed to begin transaction: {e}")))?;
        tx.batch_execute(&migration.up_sql)
            .await
            .map_err(|e| MigrationError::apply(migration.file_name.clone(), e.to_string()))?;
        tx.execute(
            "INSERT INTO schema_migrations (id) VALUES ($1)",
            &[&migration.id()],
        )
        .await
        .map_err(|e| MigrationError::db(format!("failed to record migration: {e}")))?;
        tx.commit()
            .await
            .map_err(|e| MigrationError::apply(migration.file_name.clone(), e.to_string()))?;

        info!("applied migration {}", migration.file_name);
        count += 1;
    }

    Ok(count)
}

/// Revert the most recently applied migration by running its down section
/// and deleting its ledger row, in one transaction. Returns 1, or 0 when
/// nothing is applied.
pub async fn revert_last(
    client: &mut Client,
    source: &FileMigrationSource,
) -> Result<usize, MigrationError> {
    let files = source.load()?;
    ensure_migrations_table(client).await?;
    let applied = applied_ids(client).await?;

    let Some(last) = files.iter().rev().find(|m| applied.contains(&m.id())) else {
        return Ok(0);
    };

    let tx = client
        .transaction()
        .await
        .map_err(|e| MigrationError::db(format!("failed to begin transaction: {e}")))?;
    // An empty down section reverts to a ledger-only removal.
    if !last.down_sql.is_empty() {
        tx.batch_execute(&last.down_sql)
            .await
            .map_err(|e| MigrationError::apply(last.file_name.clone(), e.to_string()))?;
    }
    tx.execute(
        "DELETE FROM schema_migrations WHERE id = $1",
        &[&last.id()],
    )
    .await
    .map_err(|e| MigrationError::db(format!("failed to unrecord migration: {e}")))?;
    tx.commit()
        .await
        .map_err(|e| MigrationError::apply(last.file_name.clone(), e.to_string()))?;

    info!("reverted migration {}", last.file_name);
    Ok(1)
}

/// One file's position relative to the ledger.
#[derive(Debug)]
pub struct MigrationStatus {
    pub file_name: String,
    pub applied: bool,
}

/// Report every known migration file with its applied flag.
pub async fn status(
    client: &Client,
    source: &FileMigrationSource,
) -> Result<Vec<MigrationStatus>, MigrationError> {
    let files = source.load()?;
    ensure_migrations_table(client).await?;
    let applied = applied_ids(client).await?;

    Ok(files
        .iter()
        .map(|m| MigrationStatus {
            file_name: m.file_name.clone(),
            applied: applied.contains(&m.id()),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::pending;
    use crate::source::MigrationFile;

    fn migration(version: &str, name: &str) -> MigrationFile {
        MigrationFile {
            version: version.to_string(),
            name: name.to_string(),
            file_name: format!("{version}_{name}.sql"),
            up_sql: "SELECT 1;".to_string(),
            down_sql: String::new(),
        }
    }

    #[test]
    fn pending_preserves_order_and_filters_applied() {
        let files = vec![
            migration("20240101000000", "first"),
            migration("20240102000000", "second"),
            migration("20240103000000", "third"),
        ];
        let applied: HashSet<String> = ["20240102000000_second".to_string()].into();

        let pending_ids: Vec<String> = pending(&files, &applied).iter().map(|m| m.id()).collect();
        assert_eq!(
            pending_ids,
            ["20240101000000_first", "20240103000000_third"]
        );
    }

    #[test]
    fn pending_is_empty_when_everything_is_applied() {
        let files = vec![
            migration("20240101000000", "first"),
            migration("20240102000000", "second"),
        ];
        let applied: HashSet<String> = files.iter().map(|m| m.id()).collect();

        // A second run over the same directory applies nothing.
        assert!(pending(&files, &applied).is_empty());
    }

    #[test]
    fn pending_returns_everything_for_fresh_ledger() {
        let files = vec![
            migration("20240101000000", "first"),
            migration("20240102000000", "second"),
        ];
        assert_eq!(pending(&files, &HashSet::new()).len(), 2);
    }
}
