use crate::common::state::ReportsDb;
use crate::settings::AppSettings;
use std::time::Instant;
use tracing::info;

/// File name of the SQLite database holding the reports table.
pub const DATABASE_NAME: &str = "Reports";

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let now = Instant::now();
    info!(
        storage_type = %settings.storage.storage_type,
        "Ensuring reports schema"
    );
    let db = ReportsDb::init(DATABASE_NAME, &settings.storage).await?;
    info!(
        mysql = db.is_mysql(),
        "Reports schema ensured in {:?}",
        now.elapsed()
    );
    db.close().await;
    Ok(())
}
