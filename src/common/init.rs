use crate::common::dialect::{Dialect, StorageType};
use crate::common::error::{AppError, ServiceResult};
use crate::common::schema;
use crate::common::state::ReportsDb;
use crate::repositories::reports::REPORTS_TABLE;
use crate::settings::{AppSettings, StorageSettings};
use anyhow::anyhow;
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, ConnectOptions};
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_reports_db(
    name: &str,
    settings: &StorageSettings,
) -> ServiceResult<ReportsDb> {
    let storage_type = StorageType::from_str(&settings.storage_type)?;
    let options = match storage_type {
        StorageType::Sqlite => sqlite_options(&settings.save_path, name)?,
        StorageType::MySql => mysql_options(settings)?,
    };
    let db = initialize_db(settings, options);
    let dialect: Arc<dyn Dialect> = Arc::from(storage_type.dialect());

    let change = schema::ensure_table_structure(&db, dialect.as_ref(), &REPORTS_TABLE).await?;
    info!(
        storage_type = storage_type.as_str(),
        ?change,
        "Reports database ready"
    );
    Ok(ReportsDb::new(db, dialect))
}

/// Builds the pool without connecting. The first query opens the connection.
pub fn initialize_db(settings: &StorageSettings, options: AnyConnectOptions) -> AnyPool {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections)
        .connect_lazy_with(options)
}

fn sqlite_options(save_path: &Path, name: &str) -> ServiceResult<AnyConnectOptions> {
    let path = std::path::absolute(save_path.join(format!("{name}.sqlite"))).map_err(|e| {
        error!(save_path = %save_path.display(), "Invalid SQLite save path: {e}");
        AppError::StorageInvalidPath
    })?;
    let url = sqlite_url(&path)?;
    Ok(AnyConnectOptions::from_url(&url)?)
}

/// `sqlite://` URL for an absolute `path`, percent-encoded so that `%`, `?`
/// and `#` in directory names reach the driver unchanged.
fn sqlite_url(path: &Path) -> ServiceResult<Url> {
    let invalid_path = || {
        error!(path = %path.display(), "SQLite database path is not a valid absolute path");
        AppError::StorageInvalidPath
    };
    let file_url = Url::from_file_path(path).map_err(|()| invalid_path())?;
    Url::parse(&format!("sqlite://{}?mode=rwc", file_url.path())).map_err(|_| invalid_path())
}

fn mysql_options(settings: &StorageSettings) -> ServiceResult<AnyConnectOptions> {
    let (host, port) = match parse_mysql_host(&settings.mysql_host) {
        Ok(v) => v,
        Err(e) => {
            error!(mysql_host = %settings.mysql_host, "Invalid MySQL port: {e}");
            return Err(AppError::StorageNotSetUp);
        }
    };
    let url = mysql_url(host, port, settings).map_err(|e| {
        error!(mysql_host = %settings.mysql_host, "Failed to build MySQL connection options: {e}");
        AppError::StorageNotSetUp
    })?;
    AnyConnectOptions::from_url(&url).map_err(|e| {
        error!("Failed to build MySQL connection options: {e:?}");
        AppError::StorageNotSetUp
    })
}

/// Every credential component is fully percent-encoded, so user names and
/// passwords containing `:`, `@` or `%` survive the driver's decoding.
fn mysql_url(host: &str, port: u16, settings: &StorageSettings) -> anyhow::Result<Url> {
    let mut url = Url::parse("mysql://localhost")?;
    url.set_host(Some(host))?;
    url.set_port(Some(port))
        .map_err(|()| anyhow!("cannot set port {port}"))?;
    url.set_username(&urlencoding::encode(&settings.mysql_username))
        .map_err(|()| anyhow!("cannot set username"))?;
    url.set_password(Some(&urlencoding::encode(&settings.mysql_password)))
        .map_err(|()| anyhow!("cannot set password"))?;
    url.set_path(&urlencoding::encode(&settings.mysql_db_name));
    Ok(url)
}

/// Splits `host[:port]`, defaulting the port to 3306.
pub fn parse_mysql_host(host: &str) -> Result<(&str, u16), ParseIntError> {
    match host.split_once(':') {
        Some((host, port)) => Ok((host, port.parse()?)),
        None => Ok((host, DEFAULT_MYSQL_PORT)),
    }
}
