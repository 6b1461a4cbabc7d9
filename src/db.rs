//! SQLite connection pool.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// How long a writer waits on a locked database before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Pragmas applied to every connection handed out by the pool.
///
/// Tenant isolation relies on cascading deletes, so foreign keys are always
/// switched on.
#[derive(Debug, Clone, Copy)]
pub struct SqlitePragmas {
    pub wal: bool,
    pub busy_timeout: Duration,
}

impl Default for SqlitePragmas {
    fn default() -> Self {
        Self {
            wal: true,
            busy_timeout: BUSY_TIMEOUT,
        }
    }
}

impl SqlitePragmas {
    fn statements(&self) -> String {
        let mut sql = String::from("PRAGMA foreign_keys = ON;");
        if self.wal {
            sql.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        sql.push_str(&format!(
            " PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ));
        sql
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&self.statements())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the pool used by the web server and the admin binaries.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas::default()))
        .build(ConnectionManager::<SqliteConnection>::new(database_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pragmas_always_enable_foreign_keys() {
        let sql = SqlitePragmas {
            wal: false,
            busy_timeout: Duration::from_millis(250),
        }
        .statements();

        assert!(sql.starts_with("PRAGMA foreign_keys = ON;"));
        assert!(!sql.contains("journal_mode"));
        assert!(sql.ends_with("PRAGMA busy_timeout = 250;"));
    }

    #[test]
    fn default_pragmas_use_wal() {
        let sql = SqlitePragmas::default().statements();
        assert!(sql.contains("journal_mode = WAL"));
        assert!(sql.contains("busy_timeout = 30000"));
    }
}
