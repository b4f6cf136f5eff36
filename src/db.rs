use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

/// Bounded pool shared by every repository. Connections are opened on demand,
/// so a server that is down at startup does not stop the process.
pub fn init_db(database_url: &str, max_connections: u32) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(database_url)
}
