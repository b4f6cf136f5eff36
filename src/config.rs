use anyhow::{Context, Result};
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_addr: String,
    pub api_prefix: String,

    // kept for startup diagnostics; never log the password
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_name: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let db_host = env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string());
        let db_port: u16 = env::var("DB_PORT")
            .unwrap_or_else(|_| "3306".to_string())
            .parse()
            .context("DB_PORT must be a port number")?;
        let db_user = env::var("DB_USER").unwrap_or_default();
        let db_password = env::var("DB_PASSWORD").unwrap_or_default();
        let db_name = env::var("DB_DATABASE").ok().filter(|s| !s.is_empty());

        let database_url = match env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => mysql_url(&db_host, db_port, &db_user, &db_password, db_name.as_deref()),
        };

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DB_MAX_CONNECTIONS must be a positive integer")?;

        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .context("PORT must be a port number")?;

        Ok(Self {
            database_url,
            max_connections,
            server_addr: format!("{}:{}", host, port),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            db_host,
            db_port,
            db_user,
            db_name,
        })
    }
}

fn mysql_url(host: &str, port: u16, user: &str, password: &str, database: Option<&str>) -> String {
    let credentials = match (user.is_empty(), password.is_empty()) {
        (true, _) => String::new(),
        (false, true) => format!("{}@", user),
        (false, false) => format!("{}:{}@", user, password),
    };
    format!(
        "mysql://{}{}:{}/{}",
        credentials,
        host,
        port,
        database.unwrap_or_default()
    )
}
