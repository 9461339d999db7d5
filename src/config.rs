use std::env;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Cookie signing/encryption key material; must be 64+ bytes to be used.
    pub session_key: Option<String>,
    /// Base for public form links handed out on publish.
    pub public_base_url: String,
    pub db_max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://{bind_addr}"));
        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse()
                .map_err(|_| format!("DB_MAX_CONNECTIONS must be a positive integer, got {v:?}"))?,
            Err(_) => 8,
        };

        Ok(AppConfig {
            database_url,
            bind_addr,
            session_key: env::var("SESSION_KEY").ok(),
            public_base_url,
            db_max_connections,
        })
    }
}
