use std::time::Duration;

use anyhow::{Context, Result};
use diesel::{
    Connection, PgConnection,
    connection::CacheSize,
    r2d2::{Builder, ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool},
};
use tracing::info;

use crate::config::config_model::Database;

/// Poolers in transaction mode reject named prepared statements, so every checked out
/// connection runs with the statement cache off.
#[derive(Debug, Default)]
struct DisablePreparedStatements;

impl CustomizeConnection<PgConnection, R2d2Error> for DisablePreparedStatements {
    fn on_acquire(&self, conn: &mut PgConnection) -> std::result::Result<(), R2d2Error> {
        conn.set_prepared_statement_cache_size(CacheSize::Disabled);
        Ok(())
    }
}

pub type PgPoolSquad = Pool<ConnectionManager<PgConnection>>;

fn pool_builder(database: &Database) -> Builder<ConnectionManager<PgConnection>> {
    Pool::builder()
        .max_size(database.max_connections)
        .connection_timeout(Duration::from_secs(database.connect_timeout))
        .connection_customizer(Box::new(DisablePreparedStatements))
}

/// Fails fast when the database cannot be reached within `connect_timeout`.
pub fn establish_connection(database: &Database) -> Result<PgPoolSquad> {
    let manager = ConnectionManager::<PgConnection>::new(&database.url);
    let pool = pool_builder(database)
        .build(manager)
        .context("failed to connect to postgres")?;

    info!(
        max_connections = database.max_connections,
        connect_timeout_secs = database.connect_timeout,
        "postgres: connection pool ready"
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_follows_database_config() {
        let database = Database {
            url: "postgres://reporting@localhost/whispers".to_string(),
            max_connections: 4,
            connect_timeout: 2,
        };

        let manager = ConnectionManager::<PgConnection>::new(&database.url);
        let pool = pool_builder(&database)
            .min_idle(Some(0))
            .build_unchecked(manager);

        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.state().connections, 0);
    }
}
