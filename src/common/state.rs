use crate::common::context::Context;
use crate::common::dialect::{Dialect, StorageType};
use crate::common::error::ServiceResult;
use crate::common::init;
use crate::settings::StorageSettings;
use sqlx::AnyPool;
use std::sync::Arc;

/// Handle to the reports database. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct ReportsDb {
    pub db: AnyPool,
    dialect: Arc<dyn Dialect>,
}

impl ReportsDb {
    pub(crate) fn new(db: AnyPool, dialect: Arc<dyn Dialect>) -> Self {
        Self { db, dialect }
    }

    /// Connects to the configured backend and ensures the `Reports` table.
    ///
    /// `name` is the file name (without `.sqlite`) when using SQLite. MySQL
    /// takes its database name from `settings`.
    pub async fn init(name: &str, settings: &StorageSettings) -> ServiceResult<Self> {
        init::initialize_reports_db(name, settings).await
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn storage_type(&self) -> StorageType {
        self.dialect.storage_type()
    }

    pub fn is_mysql(&self) -> bool {
        self.storage_type() == StorageType::MySql
    }

    pub async fn close(&self) {
        self.db.close().await
    }
}

impl Context for ReportsDb {
    fn db(&self) -> &AnyPool {
        &self.db
    }
}
