use crate::common::env::FromEnv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,

    pub storage: StorageSettings,
}

/// Everything the reports store needs to pick and reach its backend.
#[derive(Clone, Debug)]
pub struct StorageSettings {
    /// `sqlite` or `mysql`, compared case-insensitively.
    pub storage_type: String,
    /// Directory holding SQLite database files.
    pub save_path: PathBuf,

    /// `host` or `host:port`.
    pub mysql_host: String,
    pub mysql_db_name: String,
    pub mysql_username: String,
    pub mysql_password: String,

    pub db_max_connections: u32,
    pub db_wait_timeout: Duration,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            storage_type: "sqlite".to_owned(),
            save_path: PathBuf::from("."),
            mysql_host: "localhost:3306".to_owned(),
            mysql_db_name: String::new(),
            mysql_username: String::new(),
            mysql_password: String::new(),
            db_max_connections: 5,
            db_wait_timeout: Duration::from_secs(30),
        }
    }
}

impl StorageSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let storage_type = env::var("STORAGE_TYPE")?;
        let save_path = PathBuf::from_env("STORAGE_SAVE_PATH")?;

        let mysql_host = String::from_env_or("MYSQL_HOST", "localhost:3306".to_owned())?;
        let mysql_db_name = String::from_env_or("MYSQL_DB_NAME", String::new())?;
        let mysql_username = String::from_env_or("MYSQL_USERNAME", String::new())?;
        let mysql_password = String::from_env_or("MYSQL_PASSWORD", String::new())?;

        let db_max_connections = u32::from_env_or("DB_MAX_CONNECTIONS", 5)?;
        let db_wait_timeout_secs = u64::from_env_or("DB_WAIT_TIMEOUT_SECS", 30)?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);

        Ok(StorageSettings {
            storage_type,
            save_path,

            mysql_host,
            mysql_db_name,
            mysql_username,
            mysql_password,

            db_max_connections,
            db_wait_timeout,
        })
    }
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT")?;
        let level = Level::from_env("LOG_LEVEL")?;
        let storage = StorageSettings::load_from_env()?;

        Ok(AppSettings {
            app_component,
            level,
            storage,
        })
    }
}
