use tokio_postgres::{Client, NoTls};
use tracing::error;

use crate::config::{connection_string, ConnectionParams, EnvConfig};
use crate::error::DbConnectError;

/// Open a database-qualified connection. Does NOT run any migrations.
///
/// The client releases the connection when dropped, on every exit path.
pub async fn connect(
    params: &ConnectionParams,
    env: &EnvConfig,
) -> Result<Client, DbConnectError> {
    let conn_string = connection_string(params, env, true)?;

    let (client, connection) = tokio_postgres::connect(&conn_string, NoTls)
        .await
        .map_err(|e| {
            DbConnectError::connection(format!("failed to open database connection: {e}"))
        })?;

    // The connection object drives the socket; the client makes no
    // progress unless it is polled.
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("database connection error: {e}");
        }
    });

    Ok(client)
}
